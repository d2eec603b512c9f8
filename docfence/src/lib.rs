pub mod check;
pub mod document;
pub mod error;
pub mod extract;
pub mod grammar;

pub use check::{Checker, Outcome, Status, run_check, validate_block};
pub use document::{Document, readme_path};
pub use error::{BlockError, CheckError};
pub use extract::{Extraction, FencedBlock, extract, extract_blocks};
pub use grammar::Grammar;

/// Label of the fenced blocks checked when none is configured.
pub const DEFAULT_LABEL: &str = "yaml";
