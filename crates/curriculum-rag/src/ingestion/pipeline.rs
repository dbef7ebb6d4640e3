//! Ingestion pipeline orchestration

use crate::config::RagConfig;
use crate::error::Result;
use crate::preprocessing::{ChainOutcome, DocumentKind, ProcessorChain, Segment, Vocabulary};
use crate::types::{Chunk, Document};

use super::parser::ParsedDocument;
use super::splitter::ChunkSplitter;

/// Chunks produced for one document
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Processor that decomposed the document, `None` when raw pages were used
    pub kind: Option<DocumentKind>,
    /// Segments before splitting
    pub segment_count: usize,
    /// Chunks ready for embedding
    pub chunks: Vec<Chunk>,
}

/// Runs the processor chain and the splitter over parsed PDFs
pub struct IngestPipeline {
    chain: ProcessorChain,
    splitter: ChunkSplitter,
}

impl IngestPipeline {
    /// Create a pipeline from its parts
    pub fn new(chain: ProcessorChain, splitter: ChunkSplitter) -> Self {
        Self { chain, splitter }
    }

    /// Standard chain for the configured locale and the configured chunk sizes
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let vocabulary = Vocabulary::for_locale(config.preprocessing.locale);
        Ok(Self::new(
            ProcessorChain::standard(&vocabulary),
            ChunkSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?,
        ))
    }

    /// Decompose and split a parsed document into chunks
    pub fn ingest(&self, document: &Document, parsed: &ParsedDocument) -> IngestOutcome {
        let (kind, segments) = match self.chain.handle(&parsed.content) {
            ChainOutcome::Matched { kind, segments } if !segments.is_empty() => {
                (Some(kind), segments)
            }
            outcome => {
                tracing::warn!(
                    "No processor produced segments for '{}' ({:?}), indexing raw pages",
                    document.filename,
                    outcome.kind()
                );
                let pages = parsed
                    .pages
                    .iter()
                    .map(|page| Segment::new(page.content.clone()))
                    .collect();
                (None, pages)
            }
        };

        let chunks: Vec<Chunk> = segments
            .iter()
            .flat_map(|segment| self.splitter.split_segment(segment))
            .enumerate()
            .map(|(index, piece)| {
                Chunk::new(document, piece.text().to_string(), index as u32, piece.tags())
            })
            .collect();

        tracing::info!(
            "Decomposed '{}' as {} into {} segments and {} chunks",
            document.filename,
            kind.map(|k| k.to_string()).unwrap_or_else(|| "raw pages".to_string()),
            segments.len(),
            chunks.len()
        );

        IngestOutcome {
            kind,
            segment_count: segments.len(),
            chunks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::parser::PageContent;

    fn parsed(content: &str) -> ParsedDocument {
        ParsedDocument {
            content: content.to_string(),
            content_hash: "hash".to_string(),
            total_pages: Some(1),
            pages: vec![PageContent {
                page_number: 1,
                content: content.to_string(),
            }],
        }
    }

    fn standard() -> IngestPipeline {
        IngestPipeline::from_config(&RagConfig::default()).unwrap()
    }

    fn document() -> Document {
        Document::new("doc.pdf".to_string(), "hash".to_string(), 100)
    }

    #[test]
    fn test_subject_grid_chunks_keep_semester_tags() {
        let pipeline = standard();
        let doc = document();
        let outcome = pipeline.ingest(&doc, &parsed("1° Semestre\nCálculo I\n2° Semestre\nÁlgebra Linear"));

        assert_eq!(outcome.kind, Some(DocumentKind::SubjectGrid));
        assert_eq!(outcome.segment_count, 2);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[0].metadata_str("semester"), Some("1° Semestre"));
        assert_eq!(outcome.chunks[1].metadata_str("semester"), Some("2° Semestre"));
        assert_eq!(outcome.chunks[1].chunk_index, 1);
        assert_eq!(outcome.chunks[1].metadata_str("filename"), Some("doc.pdf"));
    }

    #[test]
    fn test_curriculum_summary_is_first_chunk() {
        let pipeline = standard();
        let text = "Estrutura Curricular\nCarga horária\nConteúdos do currículo fixo\n\
                    Carga horária mínima: 2400 horas\nDisciplinas do currículo flexível";
        let outcome = pipeline.ingest(&document(), &parsed(text));

        assert_eq!(outcome.kind, Some(DocumentKind::CurriculumStructure));
        assert_eq!(outcome.chunks[0].metadata_str("type"), Some("summary_workload"));
        let fixed = outcome
            .chunks
            .iter()
            .find(|c| c.metadata_str("type") == Some("fixed_curriculum"))
            .unwrap();
        assert_eq!(fixed.metadata_u64("hours"), Some(2400));
    }

    #[test]
    fn test_long_segment_is_split_with_shared_tags() {
        let pipeline = IngestPipeline::new(
            ProcessorChain::default(),
            ChunkSplitter::new(40, 10).unwrap(),
        );
        let block = "Disciplina optativa de programação ".repeat(10);
        let outcome = pipeline.ingest(&document(), &parsed(&format!("1° Semestre\n{}", block)));

        assert!(outcome.chunks.len() > 1);
        assert!(outcome
            .chunks
            .iter()
            .all(|c| c.metadata_str("type") == Some("subject_grid")));
    }

    #[test]
    fn test_no_match_indexes_raw_pages() {
        let pipeline = IngestPipeline::new(
            ProcessorChain::without_fallback(&Vocabulary::default()),
            ChunkSplitter::new(800, 200).unwrap(),
        );
        let outcome = pipeline.ingest(&document(), &parsed("Texto livre\nsem marcadores"));

        assert_eq!(outcome.kind, None);
        assert_eq!(outcome.chunks.len(), 1);
        assert_eq!(outcome.chunks[0].content, "Texto livre\nsem marcadores");
        assert!(outcome.chunks[0].metadata_str("type").is_none());
    }

    #[test]
    fn test_generic_fallback_flattens() {
        let outcome = standard().ingest(&document(), &parsed("Hello\nWorld  "));
        assert_eq!(outcome.kind, Some(DocumentKind::Generic));
        assert_eq!(outcome.chunks[0].content, "Hello World");
    }

    #[test]
    fn test_bad_chunking_settings_are_rejected() {
        let mut config = RagConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(IngestPipeline::from_config(&config).is_err());
    }
}
