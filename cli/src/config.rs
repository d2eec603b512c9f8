use std::path::{Path, PathBuf};

use serde::Deserialize;

use docfence::{Checker, DEFAULT_LABEL, Extraction};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "docfence.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSetting {
    #[default]
    Literal,
    CommonMark,
}

impl From<ExtractionSetting> for Extraction {
    fn from(setting: ExtractionSetting) -> Self {
        match setting {
            ExtractionSetting::Literal => Extraction::Literal,
            ExtractionSetting::CommonMark => Extraction::CommonMark,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Fence label to check. Defaults to "yaml".
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default)]
    pub extraction: ExtractionSetting,

    /// Documents or directories checked when none are given on the command line.
    #[serde(default)]
    pub documents: Vec<PathBuf>,

    /// Directory names skipped while searching directories for documents.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["target".to_string(), ".git".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            label: default_label(),
            extraction: ExtractionSetting::default(),
            documents: Vec::new(),
            exclude: default_exclude(),
        }
    }
}

impl Config {
    pub fn parse(source: &str) -> Result<Config, String> {
        toml::from_str(source).map_err(|e| format!("TOML parse error: {}", e))
    }

    pub fn load(path: &Path) -> Result<Config, String> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        Config::parse(&source).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Load `explicit` if given, else `docfence.toml` if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Config, String> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Config::load(fallback)
        } else {
            Ok(Config::default())
        }
    }

    pub fn checker(&self) -> Checker {
        Checker::new()
            .with_label(self.label.clone())
            .with_extraction(self.extraction.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.label, "yaml");
        assert_eq!(config.extraction, ExtractionSetting::Literal);
        assert!(config.documents.is_empty());
        assert_eq!(config.exclude, vec!["target", ".git"]);
    }

    #[test]
    fn full_config() {
        let config = Config::parse(
            "label = \"yml\"\nextraction = \"commonmark\"\ndocuments = [\"docs\"]\nexclude = []\n",
        )
        .unwrap();
        assert_eq!(config.label, "yml");
        assert_eq!(Extraction::from(config.extraction), Extraction::CommonMark);
        assert_eq!(config.documents, vec![PathBuf::from("docs")]);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("lable = \"yaml\"\n").unwrap_err();
        assert!(err.contains("TOML parse error"), "{err}");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = Config::discover(Some(Path::new("no/such/docfence.toml"))).unwrap_err();
        assert!(err.contains("cannot read"), "{err}");
    }

    #[test]
    fn readme_config_examples_deserialize() {
        let readme = include_str!("../../README.md");
        let blocks = docfence::extract_blocks(readme, "toml");
        assert!(!blocks.is_empty());
        for block in blocks {
            Config::parse(&block.content).unwrap();
        }
    }
}
