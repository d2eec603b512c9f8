#[cfg(feature = "yaml")]
mod yaml;

#[cfg(feature = "yaml")]
pub use yaml::Yaml;

/// A structured-data grammar that fenced block content is checked against.
///
/// Implementations accept only plain data (scalars, mappings, sequences),
/// reject anything that would need a type or code to construct, and never
/// run anything found in the input.
pub trait Grammar {
    /// Human-readable format name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Parse `text`, returning the parser's message on failure.
    fn parse(&self, text: &str) -> Result<(), String>;
}

/// The YAML grammar, if this build carries a YAML parser.
#[cfg(feature = "yaml")]
pub fn yaml() -> Option<Box<dyn Grammar>> {
    Some(Box::new(Yaml))
}

/// The YAML grammar, if this build carries a YAML parser.
#[cfg(not(feature = "yaml"))]
pub fn yaml() -> Option<Box<dyn Grammar>> {
    None
}

/// Resolve the grammar for a fence label. Labels other than the YAML ones
/// have no grammar.
pub fn for_label(label: &str) -> Option<Box<dyn Grammar>> {
    match label {
        "yaml" | "yml" => yaml(),
        _ => None,
    }
}
