//! PDF text extraction

use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::error::{Error, Result};

/// How long pdf-extract may run before it is abandoned
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Parsed PDF with extracted text
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Full text: page texts joined by a single space
    pub content: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Total pages
    pub total_pages: Option<u32>,
    /// Page-level content
    pub pages: Vec<PageContent>,
}

/// Content from a single page
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Text content of the page
    pub content: String,
}

/// PDF parser
pub struct PdfParser;

impl PdfParser {
    /// Parse an uploaded file; anything that is not a PDF is rejected
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        if !Self::is_pdf(filename, data) {
            let extension = filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_lowercase())
                .unwrap_or_default();
            return Err(Error::UnsupportedFileType(format!(
                "{} - only PDF documents are accepted",
                if extension.is_empty() { "unknown" } else { &extension }
            )));
        }

        let pages = match Self::extract_pages(data) {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!("lopdf could not read '{}': {}, trying pdf-extract", filename, e);
                Vec::new()
            }
        };
        let total_pages = (!pages.is_empty()).then(|| pages.len() as u32);

        let (content, pages) = if pages.iter().any(|p| !p.content.trim().is_empty()) {
            let content = pages
                .iter()
                .map(|p| p.content.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            (content, pages)
        } else {
            tracing::warn!("No per-page text in '{}', falling back to pdf-extract", filename);
            let content = Self::extract_with_timeout(filename, data)?;
            let pages = vec![PageContent {
                page_number: 1,
                content: content.clone(),
            }];
            (content, pages)
        };

        if content.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        Ok(ParsedDocument {
            content_hash: hash_content(&content),
            content,
            total_pages: total_pages.or(Some(pages.len() as u32)),
            pages,
        })
    }

    fn is_pdf(filename: &str, data: &[u8]) -> bool {
        data.starts_with(b"%PDF") || filename.to_lowercase().ends_with(".pdf")
    }

    /// Text of every page, in page order
    fn extract_pages(data: &[u8]) -> Result<Vec<PageContent>> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse("document.pdf", format!("Failed to load PDF: {}", e)))?;

        let pages = doc
            .get_pages()
            .into_keys()
            .map(|page_number| {
                let content = match doc.extract_text(&[page_number]) {
                    Ok(text) => cleanup_pdf_text(&text),
                    Err(e) => {
                        tracing::debug!("Could not extract text from page {}: {}", page_number, e);
                        String::new()
                    }
                };
                PageContent {
                    page_number,
                    content,
                }
            })
            .collect();

        Ok(pages)
    }

    /// Whole-document extraction on a worker thread, bounded by a timeout
    fn extract_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
        use std::sync::mpsc;
        use std::thread;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(PDF_EXTRACT_TIMEOUT) {
            Ok(Ok(text)) => Ok(cleanup_pdf_text(&text)),
            Ok(Err(e)) => Err(Error::file_parse(filename, format!("pdf-extract failed: {}", e))),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("PDF extraction timeout after {:?}", PDF_EXTRACT_TIMEOUT);
                Err(Error::file_parse(filename, "PDF extraction timed out"))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed");
                Err(Error::file_parse(filename, "PDF extraction thread crashed"))
            }
        }
    }
}

/// Drop NUL bytes and undo the ligatures PDF fonts commonly emit
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
}

/// Hash content for deduplication
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a one-page PDF showing `text` in Helvetica
    fn sample_pdf(text: &str) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_rejects_non_pdf() {
        let err = PdfParser::parse("notes.docx", b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(ref m) if m.starts_with("docx")));
    }

    #[test]
    fn test_garbage_pdf_is_parse_error() {
        let err = PdfParser::parse("broken.pdf", b"not really a pdf").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_extracts_page_text() {
        let bytes = sample_pdf("Hello Curriculum");
        let parsed = PdfParser::parse("sample.pdf", &bytes).unwrap();

        assert!(parsed.content.contains("Hello Curriculum"));
        assert_eq!(parsed.total_pages, Some(1));
        assert_eq!(parsed.pages.len(), 1);
        assert_eq!(parsed.content_hash.len(), 64);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }

    #[test]
    fn test_cleanup() {
        assert_eq!(cleanup_pdf_text("\u{FB01}m\0\u{00A0}x"), "fim x");
    }
}
