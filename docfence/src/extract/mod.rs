mod commonmark;

const FENCE: &str = "```";

/// The inner text of one labeled fenced block, fences excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// 0-based position among the extracted blocks, in document order.
    pub index: usize,
    pub content: String,
}

/// How fenced blocks are located in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extraction {
    /// Scan for "```<label>" + line break and stop at the next "```".
    #[default]
    Literal,
    /// Walk the CommonMark event stream and keep fenced code blocks whose
    /// info string equals the label.
    CommonMark,
}

/// Extract blocks tagged with `label` using the given mode.
pub fn extract(text: &str, label: &str, mode: Extraction) -> Vec<FencedBlock> {
    let blocks = match mode {
        Extraction::Literal => extract_blocks(text, label),
        Extraction::CommonMark => commonmark::extract_blocks(text, label),
    };
    tracing::debug!(label, ?mode, count = blocks.len(), "extracted fenced blocks");
    blocks
}

/// Extract every "```<label>" block from `text`, in document order.
///
/// The label must be followed directly by the line break. The opening marker
/// is not anchored to the start of a line. Content may span any number of
/// lines and ends at the next three-backtick sequence, wherever it appears;
/// content containing a literal "```" is therefore cut short.
pub fn extract_blocks(text: &str, label: &str) -> Vec<FencedBlock> {
    let open = format!("{}{}", FENCE, label);
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(&open) {
        let after = &rest[pos + open.len()..];
        let Some(body) = after
            .strip_prefix('\n')
            .or_else(|| after.strip_prefix("\r\n"))
        else {
            rest = &rest[pos + 1..];
            continue;
        };
        // No fence follows, so no later block can open either.
        let Some(end) = body.find(FENCE) else {
            break;
        };
        blocks.push(FencedBlock {
            index: blocks.len(),
            content: body[..end].to_string(),
        });
        rest = &body[end + FENCE.len()..];
    }

    blocks
}
