//! Document classification and structural decomposition
//!
//! Raw PDF text is routed through an ordered chain of processors. The first
//! processor whose predicate accepts the text decomposes it into tagged
//! [`Segment`]s; later processors are never consulted.

mod curriculum;
pub mod extract;
mod generic;
mod segment;
mod subject_grid;
pub mod vocabulary;

pub use curriculum::{CurriculumStructureProcessor, HourTotals};
pub use extract::{HourParser, SectionExtractor, WorkloadExtractor};
pub use generic::GenericProcessor;
pub use segment::{Segment, TagValue, Tags};
pub use subject_grid::SubjectGridProcessor;
pub use vocabulary::{Locale, Vocabulary};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a document, named after the processor that handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    CurriculumStructure,
    SubjectGrid,
    Generic,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CurriculumStructure => "curriculum_structure",
            Self::SubjectGrid => "subject_grid",
            Self::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// A link in the processor chain
///
/// Implementations are pure: no I/O and no interior mutability, so a single
/// instance can be shared across requests.
pub trait DocumentProcessor: Send + Sync {
    /// Kind reported when this processor handles a document
    fn kind(&self) -> DocumentKind;

    /// Whether this processor recognizes the document
    fn can_handle(&self, content: &str) -> bool;

    /// Decompose the document into segments
    fn process(&self, content: &str) -> Vec<Segment>;
}

/// Result of running a document through the chain
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// A processor accepted the document (its output may still be empty)
    Matched {
        kind: DocumentKind,
        segments: Vec<Segment>,
    },
    /// No processor accepted the document
    NoMatch,
}

impl ChainOutcome {
    /// Kind of the processor that handled the document
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            Self::Matched { kind, .. } => Some(*kind),
            Self::NoMatch => None,
        }
    }

    /// Segments, with `NoMatch` collapsed to an empty list
    pub fn into_segments(self) -> Vec<Segment> {
        match self {
            Self::Matched { segments, .. } => segments,
            Self::NoMatch => Vec::new(),
        }
    }
}

/// Ordered list of processors tried in priority order
pub struct ProcessorChain {
    processors: Vec<Box<dyn DocumentProcessor>>,
}

impl ProcessorChain {
    /// Build a chain from processors in priority order
    pub fn new(processors: Vec<Box<dyn DocumentProcessor>>) -> Self {
        Self { processors }
    }

    /// Curriculum structure, then subject grid, then the generic fallback
    pub fn standard(vocabulary: &Vocabulary) -> Self {
        let mut processors = Self::structured(vocabulary);
        processors.push(Box::new(GenericProcessor));
        Self::new(processors)
    }

    /// Standard chain without the generic fallback
    pub fn without_fallback(vocabulary: &Vocabulary) -> Self {
        Self::new(Self::structured(vocabulary))
    }

    fn structured(vocabulary: &Vocabulary) -> Vec<Box<dyn DocumentProcessor>> {
        vec![
            Box::new(CurriculumStructureProcessor::new(vocabulary)),
            Box::new(SubjectGridProcessor::new(vocabulary)),
        ]
    }

    fn select(&self, content: &str) -> Option<&dyn DocumentProcessor> {
        self.processors
            .iter()
            .map(|p| p.as_ref())
            .find(|p| p.can_handle(content))
    }

    /// Kind of the processor that would handle the document
    pub fn classify(&self, content: &str) -> Option<DocumentKind> {
        self.select(content).map(|p| p.kind())
    }

    /// Run the first matching processor
    pub fn handle(&self, content: &str) -> ChainOutcome {
        match self.select(content) {
            Some(processor) => {
                let kind = processor.kind();
                let segments = processor.process(content);
                tracing::debug!(%kind, segments = segments.len(), "Document processed");
                ChainOutcome::Matched { kind, segments }
            }
            None => ChainOutcome::NoMatch,
        }
    }

    /// Number of processors in the chain
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether the chain has no processors
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl Default for ProcessorChain {
    fn default() -> Self {
        Self::standard(&Vocabulary::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH_SHAPES: &str = "Estrutura Curricular\nCarga horária\n\
        Conteúdos do currículo fixo\nCarga horária mínima: 1800 horas\n\
        1° Semestre\nAlgoritmos\n2° Semestre\nBanco de Dados";

    #[test]
    fn test_priority_curriculum_over_subject_grid() {
        let chain = ProcessorChain::default();
        assert!(SubjectGridProcessor::default().can_handle(BOTH_SHAPES));

        let outcome = chain.handle(BOTH_SHAPES);
        assert_eq!(outcome.kind(), Some(DocumentKind::CurriculumStructure));
        let segments = outcome.into_segments();
        assert_eq!(segments[0].segment_type(), Some("summary_workload"));
        assert!(segments.iter().all(|s| s.segment_type() != Some("subject_grid")));
    }

    #[test]
    fn test_classify() {
        let chain = ProcessorChain::default();
        assert_eq!(chain.classify(BOTH_SHAPES), Some(DocumentKind::CurriculumStructure));
        assert_eq!(chain.classify("1° Semestre\nX"), Some(DocumentKind::SubjectGrid));
        assert_eq!(chain.classify("plain text"), Some(DocumentKind::Generic));
        assert_eq!(chain.classify(""), Some(DocumentKind::Generic));
    }

    #[test]
    fn test_generic_fallback_matches_empty() {
        let outcome = ProcessorChain::default().handle("");
        assert_eq!(
            outcome,
            ChainOutcome::Matched {
                kind: DocumentKind::Generic,
                segments: vec![Segment::new("")],
            }
        );
    }

    #[test]
    fn test_without_fallback_reports_no_match() {
        let chain = ProcessorChain::without_fallback(&Vocabulary::default());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.handle(""), ChainOutcome::NoMatch);
        assert_eq!(chain.handle("plain text"), ChainOutcome::NoMatch);
        assert!(chain.handle("plain text").into_segments().is_empty());
        assert_eq!(chain.classify("plain text"), None);
    }

    #[test]
    fn test_empty_chain() {
        let chain = ProcessorChain::new(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(chain.handle("anything"), ChainOutcome::NoMatch);
    }

    #[test]
    fn test_matched_with_zero_segments_is_not_no_match() {
        struct Silent;
        impl DocumentProcessor for Silent {
            fn kind(&self) -> DocumentKind {
                DocumentKind::Generic
            }
            fn can_handle(&self, _content: &str) -> bool {
                true
            }
            fn process(&self, _content: &str) -> Vec<Segment> {
                Vec::new()
            }
        }

        let chain = ProcessorChain::new(vec![Box::new(Silent)]);
        let outcome = chain.handle("x");
        assert_eq!(outcome.kind(), Some(DocumentKind::Generic));
        assert!(outcome.into_segments().is_empty());
    }

    #[test]
    fn test_english_chain() {
        let chain = ProcessorChain::standard(&Vocabulary::for_locale(Locale::English));
        assert_eq!(
            chain.classify("Curricular Structure\nCourse load"),
            Some(DocumentKind::CurriculumStructure)
        );
        assert_eq!(chain.classify("2° Semester\nNetworks"), Some(DocumentKind::SubjectGrid));
    }
}
