//! PDF ingestion: text extraction, structural decomposition and chunking

mod parser;
mod pipeline;
mod splitter;

pub use parser::{PageContent, ParsedDocument, PdfParser};
pub use pipeline::{IngestOutcome, IngestPipeline};
pub use splitter::ChunkSplitter;
