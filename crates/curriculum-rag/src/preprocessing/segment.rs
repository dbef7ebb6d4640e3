//! Segment type produced by the processor chain

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag value attached to a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// Textual tag (e.g. `type`, `section`, `semester`)
    Text(String),
    /// Integer tag (e.g. `hours`)
    Int(u32),
}

impl TagValue {
    /// Get the value as a string slice, if textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Get the value as an integer, if numeric
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Convert into a JSON value for chunk metadata
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::json!(s),
            Self::Int(n) => serde_json::json!(n),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for TagValue {
    fn from(value: u32) -> Self {
        Self::Int(value)
    }
}

/// Tag mapping, iterated in key order
///
/// Tags end up as chunk metadata, a JSON object whose key order carries no
/// meaning, so insertion order is not kept. Sorted keys make serialized
/// segments and chunk metadata byte-stable across runs.
pub type Tags = BTreeMap<String, TagValue>;

/// A bounded, tagged unit of text produced by a processor
///
/// Segments are immutable once built; the chunk splitter copies their tags
/// onto every sub-chunk it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    text: String,
    #[serde(default)]
    tags: Tags,
}

impl Segment {
    /// Create an untagged segment
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: Tags::new(),
        }
    }

    /// Create a segment with tags
    pub fn with_tags<K, V, I>(text: impl Into<String>, tags: I) -> Self
    where
        K: Into<String>,
        V: Into<TagValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            text: text.into(),
            tags: tags
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Segment text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Segment tags
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Look up a single tag
    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Value of the `type` tag, if any
    pub fn segment_type(&self) -> Option<&str> {
        self.tag("type").and_then(TagValue::as_text)
    }

    /// Same tags over different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: self.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_tags_mixes_text_and_int() {
        let segment = Segment::with_tags(
            "body",
            [("type", TagValue::from("dcg")), ("hours", TagValue::from(60u32))],
        );

        assert_eq!(segment.segment_type(), Some("dcg"));
        assert_eq!(segment.tag("hours").and_then(TagValue::as_int), Some(60));
        assert!(segment.tag("semester").is_none());
    }

    #[test]
    fn test_tags_serialize_untagged() {
        let segment = Segment::with_tags("x", [("hours", 120u32)]);
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["tags"]["hours"], serde_json::json!(120));
    }

    #[test]
    fn test_tag_order_does_not_depend_on_insertion() {
        let a = Segment::with_tags("x", [("type", "dcg"), ("section", "Fixo"), ("hours", "60")]);
        let b = Segment::with_tags("x", [("hours", "60"), ("type", "dcg"), ("section", "Fixo")]);

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        let keys: Vec<&str> = a.tags().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hours", "section", "type"]);
    }

    #[test]
    fn test_with_text_keeps_tags() {
        let segment = Segment::with_tags("long body", [("semester", "1° Semestre")]);
        let piece = segment.with_text("body");
        assert_eq!(piece.text(), "body");
        assert_eq!(piece.tags(), segment.tags());
    }
}
