//! Front-matter parsing, derivation and merging.
//!
//! # Precedence
//!
//! For every recognized key the value written is, in order:
//! 1. the explicit value from the source document, when present and non-empty
//! 2. the value derived from the file name
//!
//! Keys the source carries that are not recognized are kept verbatim after
//! the recognized ones, in their original order.
//!
//! ```text
//! ---                        ---
//! title: Workflows     +     id: workflow            ──►  id: workflow
//! owner: core                title: Workflow              title: Workflows
//! ---                        sidebar_label: Workflow      sidebar_label: Workflows
//!   (explicit)               description: ...             description: ...
//!                              (derived)                  owner: core
//! ```

use serde_yaml::{Mapping, Value};

/// Recognized keys, in output order.
pub const KEYS: [&str; 5] = ["id", "title", "sidebar_label", "sidebar_position", "description"];

// ============================================================================
// Document
// ============================================================================

/// A markdown document split into front-matter and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub front_matter: Mapping,
    pub body: String,
}

impl Document {
    /// Parse a document; text without a leading `---` block has empty front-matter.
    ///
    /// # Errors
    /// Returns error if the front-matter block is not a YAML mapping.
    pub fn parse(input: &str) -> Result<Self, serde_yaml::Error> {
        let Some((yaml, body)) = split_front_matter(input) else {
            return Ok(Self {
                front_matter: Mapping::new(),
                body: input.trim_start_matches('\u{feff}').to_owned(),
            });
        };

        let front_matter = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str::<Mapping>(yaml)?
        };

        Ok(Self {
            front_matter,
            body: body.to_owned(),
        })
    }

    /// Non-empty string value of `key`
    pub fn explicit_str(&self, key: &str) -> Option<&str> {
        self.front_matter
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Split `---`-delimited front-matter from the body.
///
/// The opening line may carry a BOM; the block closes with `---` or `...`.
/// Returns `None` when the text has no complete block.
fn split_front_matter(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start_matches('\u{feff}');
    let mut lines = input.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&input[yaml_start..offset], &input[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

// ============================================================================
// Front-matter values
// ============================================================================

/// The recognized front-matter fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub id: String,
    pub title: String,
    pub sidebar_label: Option<String>,
    pub sidebar_position: Option<usize>,
    pub description: String,
}

impl FrontMatter {
    /// Recognized fields as an ordered mapping.
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        mapping.insert("id".into(), self.id.as_str().into());
        mapping.insert("title".into(), self.title.as_str().into());
        if let Some(label) = &self.sidebar_label {
            mapping.insert("sidebar_label".into(), label.as_str().into());
        }
        if let Some(position) = self.sidebar_position {
            mapping.insert("sidebar_position".into(), Value::Number((position as u64).into()));
        }
        mapping.insert("description".into(), self.description.as_str().into());
        mapping
    }
}

/// Merge explicit source front-matter over derived values.
///
/// Explicit values win when present and non-empty; unrecognized explicit keys
/// are appended in their original order.
pub fn merge(explicit: &Mapping, derived: &FrontMatter) -> Mapping {
    let derived = derived.to_mapping();
    let mut merged = Mapping::new();

    for key in KEYS {
        let value = explicit
            .get(key)
            .filter(|value| is_present(value))
            .or_else(|| derived.get(key));
        if let Some(value) = value {
            merged.insert(key.into(), value.clone());
        }
    }

    for (key, value) in explicit {
        let recognized = key.as_str().is_some_and(|k| KEYS.contains(&k));
        if !recognized {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Render front-matter and body into a markdown document.
///
/// # Errors
/// Returns error if the mapping cannot be serialized.
pub fn render(front_matter: &Mapping, body: &str) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(front_matter)?;
    let body = body.trim_start_matches(['\r', '\n']);
    Ok(format!("---\n{yaml}---\n\n{body}"))
}

// ============================================================================
// Title derivation
// ============================================================================

/// Display title from a kebab-case file stem.
///
/// ```ignore
/// title_from_stem("event-model")   // → "Event Model"
/// title_from_stem("api--v2")       // → "Api V2"
/// ```
pub fn title_from_stem(stem: &str) -> String {
    stem.split('-')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
