use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::FencedBlock;

pub(super) fn extract_blocks(text: &str, label: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new_ext(text, Options::empty()) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if &*info == label => {
                current = Some(String::new());
            }
            Event::Text(chunk) => {
                if let Some(content) = current.as_mut() {
                    content.push_str(&chunk);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(content) = current.take() {
                    blocks.push(FencedBlock {
                        index: blocks.len(),
                        content,
                    });
                }
            }
            _ => {}
        }
    }

    blocks
}
