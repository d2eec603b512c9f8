use std::io;
use std::path::PathBuf;

use codespan_reporting::diagnostic::Diagnostic;
use thiserror::Error;

/// A single fenced block that its grammar rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("block #{index} is not valid {grammar}: {message}")]
pub struct BlockError {
    /// 0-based position of the block in document order.
    pub index: usize,
    pub grammar: &'static str,
    /// The underlying parser's diagnostic text.
    pub message: String,
}

/// Why a check run failed.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("cannot read document '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot check '{label}' blocks: no parser for them is available in this build")]
    CapabilityMissing { label: String },

    #[error(
        "{} has {} malformed block(s); first: {}",
        path.display(),
        failures.len(),
        first_failure(failures)
    )]
    Malformed {
        path: PathBuf,
        failures: Vec<BlockError>,
    },
}

fn first_failure(failures: &[BlockError]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

impl CheckError {
    /// Short name of the failing condition, as shown in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Io { .. } => "missing or unreadable document",
            CheckError::CapabilityMissing { .. } => "missing parser",
            CheckError::Malformed { .. } => "malformed block",
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    ///
    /// Diagnostics carry no source labels; every malformed block becomes a note.
    pub fn to_diagnostic<FileId>(&self) -> Diagnostic<FileId> {
        let diagnostic = Diagnostic::error().with_message(format!("{}: {}", self.kind(), self));
        match self {
            CheckError::Malformed { failures, .. } => {
                diagnostic.with_notes(failures.iter().map(ToString::to_string).collect())
            }
            CheckError::CapabilityMissing { .. } => diagnostic
                .with_notes(vec!["rebuild docfence with the `yaml` feature enabled".into()]),
            CheckError::Io { .. } => diagnostic,
        }
    }
}
