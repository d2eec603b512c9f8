use std::fmt;
use std::path::Path;

use crate::DEFAULT_LABEL;
use crate::document::Document;
use crate::error::{BlockError, CheckError};
use crate::extract::{self, Extraction, FencedBlock};
use crate::grammar::{self, Grammar};

/// Terminal state of a check, without the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
            Status::Skip => write!(f, "SKIP"),
        }
    }
}

/// Result of checking one document.
#[derive(Debug)]
pub enum Outcome {
    /// Every labeled block parsed.
    Pass { blocks: usize },
    /// The document has no labeled blocks, so there was nothing to check.
    Skip,
    Fail(CheckError),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Pass { .. } => Status::Pass,
            Outcome::Skip => Status::Skip,
            Outcome::Fail(_) => Status::Fail,
        }
    }

    pub fn error(&self) -> Option<&CheckError> {
        match self {
            Outcome::Fail(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Fail(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass { blocks } => write!(f, "PASS ({} block(s) parsed)", blocks),
            Outcome::Skip => write!(f, "SKIP (no labeled blocks, not applicable)"),
            Outcome::Fail(err) => write!(f, "FAIL ({}): {}", err.kind(), err),
        }
    }
}

/// Parse one extracted block with `grammar`.
pub fn validate_block(grammar: &dyn Grammar, block: &FencedBlock) -> Result<(), BlockError> {
    grammar.parse(&block.content).map_err(|message| BlockError {
        index: block.index,
        grammar: grammar.name(),
        message,
    })
}

/// Check the document at `path` for malformed YAML blocks with the default settings.
pub fn run_check(path: impl AsRef<Path>) -> Outcome {
    Checker::new().run(path)
}

/// Extracts labeled blocks from documents and validates them against a grammar.
pub struct Checker {
    label: String,
    extraction: Extraction,
    grammar: Option<Box<dyn Grammar>>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Self {
        Checker {
            label: DEFAULT_LABEL.to_string(),
            extraction: Extraction::default(),
            grammar: grammar::yaml(),
        }
    }

    /// Check blocks tagged `label`; the grammar follows the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self.grammar = grammar::for_label(&self.label);
        self
    }

    pub fn with_extraction(mut self, extraction: Extraction) -> Self {
        self.extraction = extraction;
        self
    }

    /// Override the grammar. `None` models a build without a parser.
    pub fn with_grammar(mut self, grammar: Option<Box<dyn Grammar>>) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extraction(&self) -> Extraction {
        self.extraction
    }

    pub fn blocks(&self, document: &Document) -> Vec<FencedBlock> {
        extract::extract(&document.text, &self.label, self.extraction)
    }

    /// Load and check the document at `path`.
    pub fn run(&self, path: impl AsRef<Path>) -> Outcome {
        match Document::load(path) {
            Ok(document) => self.check_document(&document),
            Err(err) => {
                tracing::info!(error = %err, "check failed");
                Outcome::Fail(err)
            }
        }
    }

    pub fn check_document(&self, document: &Document) -> Outcome {
        let outcome = self.evaluate(document);
        tracing::info!(
            path = %document.path.display(),
            label = %self.label,
            status = %outcome.status(),
            "check finished"
        );
        outcome
    }

    fn evaluate(&self, document: &Document) -> Outcome {
        let blocks = self.blocks(document);
        if blocks.is_empty() {
            return Outcome::Skip;
        }

        let Some(grammar) = self.grammar.as_deref() else {
            return Outcome::Fail(CheckError::CapabilityMissing {
                label: self.label.clone(),
            });
        };

        let failures: Vec<BlockError> = blocks
            .iter()
            .filter_map(|block| validate_block(grammar, block).err())
            .inspect(|failure| tracing::warn!(%failure, "malformed block"))
            .collect();

        if failures.is_empty() {
            Outcome::Pass {
                blocks: blocks.len(),
            }
        } else {
            Outcome::Fail(CheckError::Malformed {
                path: document.path.clone(),
                failures,
            })
        }
    }
}
