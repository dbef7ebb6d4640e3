//! Fallback processor for unstructured text

use super::{DocumentKind, DocumentProcessor, Segment};

/// Accepts anything and returns the flattened text as a single untagged segment
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericProcessor;

impl DocumentProcessor for GenericProcessor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Generic
    }

    fn can_handle(&self, _content: &str) -> bool {
        true
    }

    fn process(&self, content: &str) -> Vec<Segment> {
        vec![Segment::new(content.replace('\n', " ").trim())]
    }
}
