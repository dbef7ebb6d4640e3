//! PDF upload endpoint

use axum::{
    extract::{Multipart, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use std::time::{Duration, Instant};
use tokio::sync::OwnedMutexGuard;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::ingestion::{ParsedDocument, PdfParser};
use crate::server::state::{AppState, FileStatus};
use crate::types::{Chunk, Document, UploadResponse};

/// Multipart field carrying the PDF
const FILE_FIELD: &str = "file";

/// POST /upload - Index one PDF
pub async fn upload_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    authorize(&headers, state.config().upload.token.as_deref())?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload
        .ok_or_else(|| Error::bad_request(format!("Missing multipart field '{}'", FILE_FIELD)))?;

    tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());
    let start = Instant::now();
    let limit = Duration::from_secs(state.config().server.upload_timeout_secs);

    let result = timeout(limit, process_upload(&state, filename.clone(), data.to_vec()))
        .await
        .unwrap_or_else(|_| {
            Err(Error::internal(format!(
                "Processing '{}' timed out after {}s",
                filename,
                limit.as_secs()
            )))
        });
    let response = result.inspect_err(|e| tracing::error!("Upload of {} failed: {}", filename, e))?;

    tracing::info!(
        "Upload of {} finished in {:.1}s: {}",
        filename,
        start.elapsed().as_secs_f64(),
        response.message
    );
    Ok(Json(response))
}

/// Check the bearer token when one is configured
fn authorize(headers: &HeaderMap, expected: Option<&str>) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match provided {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(Error::Unauthorized("invalid upload token".to_string())),
        None => Err(Error::Unauthorized("missing upload token".to_string())),
    }
}

/// Parse, dedup and index one file
async fn process_upload(state: &AppState, filename: String, data: Vec<u8>) -> Result<UploadResponse> {
    let file_size = data.len() as u64;
    let parse_name = filename.clone();
    let parsed = tokio::task::spawn_blocking(move || PdfParser::parse(&parse_name, &data))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

    index_parsed(state, filename, file_size, parsed).await
}

/// Dedup against the registry, then chunk, embed and store a parsed PDF
///
/// Nothing is written until every chunk is embedded. The write itself runs on
/// its own task holding the ingest lock, so an upload timeout cannot cut it
/// short. A replaced version is removed only after the new one is stored.
async fn index_parsed(
    state: &AppState,
    filename: String,
    file_size: u64,
    parsed: ParsedDocument,
) -> Result<UploadResponse> {
    let guard = state.lock_ingest().await;

    let replaced = match state.check_file_status(&filename, &parsed.content_hash) {
        FileStatus::Unchanged(existing) => {
            tracing::info!("Skipping unchanged file: {}", filename);
            return Ok(UploadResponse::skipped(&existing));
        }
        FileStatus::Duplicate(existing) => {
            tracing::info!(
                "Skipping {}: same content already indexed as {}",
                filename,
                existing.filename
            );
            return Ok(UploadResponse::skipped(&existing));
        }
        FileStatus::Modified(old) => Some(old),
        FileStatus::New => None,
    };

    let mut doc = Document::new(filename, parsed.content_hash.clone(), file_size);
    doc.total_pages = parsed.total_pages;

    let pipeline = state.pipeline().clone();
    let outcome = {
        let doc = doc.clone();
        tokio::task::spawn_blocking(move || pipeline.ingest(&doc, &parsed))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    };
    let mut chunks = outcome.chunks;

    // Only the embedding input carries the passage prefix
    let prefix = &state.config().embeddings.passage_prefix;
    let inputs: Vec<String> = chunks
        .iter()
        .map(|c| format!("{}{}", prefix, c.content))
        .collect();
    let embeddings = state.embedding_provider().embed_batch(&inputs).await?;
    if embeddings.len() != chunks.len() {
        return Err(Error::embedding(format!(
            "Expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        )));
    }
    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }

    doc.total_chunks = chunks.len() as u32;
    doc.kind = outcome.kind;

    tokio::spawn(commit_document(state.clone(), doc, chunks, replaced, guard))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
}

/// Store a fully embedded document, then drop the version it replaces
async fn commit_document(
    state: AppState,
    doc: Document,
    chunks: Vec<Chunk>,
    replaced: Option<Document>,
    _guard: OwnedMutexGuard<()>,
) -> Result<UploadResponse> {
    if !chunks.is_empty() {
        state.vector_store_provider().insert_chunks(&chunks).await?;
    }
    state.add_document(doc.clone());

    if let Some(old) = replaced {
        match state.delete_document_with_chunks(&old.id).await {
            Ok(deleted) => tracing::info!(
                "File {} changed, deleted {} old chunks",
                doc.filename,
                deleted
            ),
            Err(e) => tracing::error!(
                "Indexed new version of {} but failed to delete the old one ({}): {}",
                doc.filename,
                old.id,
                e
            ),
        }
    }

    Ok(UploadResponse::indexed(&doc, chunks.len()))
}
