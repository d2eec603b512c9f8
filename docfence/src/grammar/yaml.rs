use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use super::Grammar;

/// Tags a safe load knows how to construct, as suffixes of `tag:yaml.org,2002:`.
const CORE_TAGS: &[&str] = &[
    "null", "bool", "int", "float", "binary", "timestamp", "omap", "pairs", "set", "str", "seq",
    "map",
];

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// YAML checked on the parser's event stream.
///
/// Nothing is constructed, so nesting depth is bounded only by the scanner.
/// Tags outside the core schema, undecodable `!!binary` scalars, duplicate
/// scalar keys and more than one document per block are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Grammar for Yaml {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn parse(&self, text: &str) -> Result<(), String> {
        let mut walker = EventWalker::default();
        let scanned = Parser::new_from_str(text).load(&mut walker, true);
        // The walker only sees events before a scan error, so its error comes first.
        if let Some(err) = walker.error {
            return Err(err);
        }
        scanned.map_err(|err| err.to_string())
    }
}

enum Frame {
    Sequence,
    Mapping {
        keys: HashSet<String>,
        expecting_key: bool,
    },
}

#[derive(Default)]
struct EventWalker {
    stack: Vec<Frame>,
    documents: usize,
    error: Option<String>,
}

fn at(mark: &Marker) -> String {
    format!("line {} column {}", mark.line(), mark.col() + 1)
}

fn tag_name(handle: &str, suffix: &str) -> String {
    if handle == "!!" {
        format!("{}{}", CORE_TAG_PREFIX, suffix)
    } else {
        format!("{}{}", handle, suffix)
    }
}

/// The core tag `handle`+`suffix` resolves to, or `None` for other tags.
fn core_tag<'a>(handle: &str, suffix: &'a str) -> Option<&'a str> {
    let core = handle == "!!" || handle == CORE_TAG_PREFIX;
    (core && CORE_TAGS.contains(&suffix)).then_some(suffix)
}

impl EventWalker {
    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    /// Reject tags a safe load could not construct. `!` alone is non-specific.
    fn check_tag(&mut self, handle: &str, suffix: &str, mark: &Marker) -> Option<&'static str> {
        if (handle == "!" && suffix.is_empty()) || (handle.is_empty() && suffix == "!") {
            return None;
        }
        match core_tag(handle, suffix) {
            Some("binary") => Some("binary"),
            Some(_) => None,
            None => {
                self.fail(format!(
                    "could not determine a constructor for the tag '{}' at {}",
                    tag_name(handle, suffix),
                    at(mark)
                ));
                None
            }
        }
    }

    /// Record a finished node; `key` is its text when it is a plain scalar.
    fn node_done(&mut self, key: Option<&str>, mark: &Marker) {
        let duplicate = match self.stack.last_mut() {
            Some(Frame::Mapping {
                keys,
                expecting_key,
            }) => {
                let duplicate = *expecting_key
                    && key.is_some_and(|key| !keys.insert(key.to_string()));
                *expecting_key = !*expecting_key;
                duplicate
            }
            _ => false,
        };
        if duplicate {
            self.fail(format!(
                "found duplicate key '{}' at {}",
                key.unwrap_or_default(),
                at(mark)
            ));
        }
    }
}

impl MarkedEventReceiver for EventWalker {
    fn on_event(&mut self, event: Event, mark: Marker) {
        match event {
            Event::DocumentStart { .. } => {
                self.documents += 1;
                if self.documents == 2 {
                    self.fail(format!(
                        "expected a single YAML document, found another at {}",
                        at(&mark)
                    ));
                }
            }
            Event::Scalar(value, _, _, tag) => {
                if let Some(tag) = tag {
                    if self.check_tag(&tag.handle, &tag.suffix, &mark) == Some("binary") {
                        let packed: String = value.split_whitespace().collect();
                        if let Err(err) = STANDARD.decode(packed.as_bytes()) {
                            self.fail(format!(
                                "failed to decode base64 data for !!binary: {} at {}",
                                err,
                                at(&mark)
                            ));
                        }
                    }
                }
                self.node_done(Some(&value), &mark);
            }
            Event::Alias(_) => self.node_done(None, &mark),
            Event::SequenceStart(_, tag) => {
                if let Some(tag) = tag {
                    self.check_tag(&tag.handle, &tag.suffix, &mark);
                }
                self.stack.push(Frame::Sequence);
            }
            Event::MappingStart(_, tag) => {
                if let Some(tag) = tag {
                    self.check_tag(&tag.handle, &tag.suffix, &mark);
                }
                self.stack.push(Frame::Mapping {
                    keys: HashSet::new(),
                    expecting_key: true,
                });
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.stack.pop();
                self.node_done(None, &mark);
            }
            _ => {}
        }
    }
}
