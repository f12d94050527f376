//! Display labels from loosely-typed catalog fields.
//!
//! Site pipelines hand titles over in whatever shape their templating layer
//! produced: a plain string, a number (version-like titles such as `2`), a list
//! of inline fragments, or an object wrapping the text. [`Label`] captures
//! those shapes explicitly and [`Label::to_plain`] flattens them to one string.
//!
//! ## Flattening rules
//!
//! | Shape | Result |
//! |-------|--------|
//! | `"  Guide "` | `"Guide"` (trimmed) |
//! | `2`, `true` | `"2"`, `"true"` |
//! | `["Getting ", "Started"]` | `"Getting Started"` (joined, then trimmed) |
//! | `{"value": "Docs"}` | first non-empty of `text`, `value`, `content`, `label`, `title` |
//! | `null`, `{}` | `""` |
//!
//! The literal `"[object Object]"` is what a stringified object looks like
//! when an upstream template coerced it blindly; it is treated as empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields tried, in order, when flattening a keyed label.
pub const KEYED_FIELDS: &[&str] = &["text", "value", "content", "label", "title"];

const OBJECT_PLACEHOLDER: &str = "[object Object]";

/// A loosely-typed display label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Composite(Vec<Label>),
    Keyed(BTreeMap<String, Label>),
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

impl Label {
    /// Flatten to plain text. Returns an empty string when nothing usable is found.
    pub fn to_plain(&self) -> String {
        match self {
            Label::Null => String::new(),
            Label::Bool(b) => b.to_string(),
            Label::Number(n) => n.to_string(),
            Label::Text(s) => reject_placeholder(s.trim()),
            Label::Composite(parts) => {
                let joined: String = parts.iter().map(Label::fragment_text).collect();
                reject_placeholder(joined.trim())
            }
            Label::Keyed(fields) => KEYED_FIELDS
                .iter()
                .filter_map(|key| fields.get(*key))
                .map(Label::to_plain)
                .find(|s| !s.is_empty())
                .unwrap_or_default(),
        }
    }

    /// Untrimmed text of one composite fragment, so spacing between
    /// fragments survives the join.
    fn fragment_text(&self) -> String {
        match self {
            Label::Text(s) if s.trim() == OBJECT_PLACEHOLDER => String::new(),
            Label::Text(s) => s.clone(),
            Label::Composite(parts) => parts.iter().map(Label::fragment_text).collect(),
            other => other.to_plain(),
        }
    }

    /// Plain text, or `fallback` when the label flattens to nothing.
    pub fn or_default_text(&self, fallback: &str) -> String {
        let plain = self.to_plain();
        if plain.is_empty() {
            fallback.to_string()
        } else {
            plain
        }
    }
}

fn reject_placeholder(s: &str) -> String {
    if s == OBJECT_PLACEHOLDER {
        String::new()
    } else {
        s.to_string()
    }
}
