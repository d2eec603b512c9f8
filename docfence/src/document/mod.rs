use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CheckError;

/// A text document loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    /// Read a UTF-8 document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded document");
        Ok(Self::from_text(path, text))
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        Document {
            path: path.into(),
            text,
        }
    }
}

/// Location of the workspace README, one directory above this crate.
///
/// Derived from the crate's manifest directory so the result does not depend
/// on the working directory of whoever runs the check.
pub fn readme_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .join("README.md")
}
