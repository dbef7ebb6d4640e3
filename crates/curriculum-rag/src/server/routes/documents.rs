//! Document registry endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentListResponse, DocumentSummary};

/// GET /documents - List indexed documents
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentListResponse> {
    let documents: Vec<DocumentSummary> = state
        .list_documents()
        .iter()
        .map(DocumentSummary::from)
        .collect();

    Json(DocumentListResponse {
        total_count: documents.len(),
        documents,
    })
}

/// GET /documents/:id - Get one document
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentSummary>> {
    state
        .get_document(&id)
        .map(|doc| Json(DocumentSummary::from(&doc)))
        .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
}

/// DELETE /documents/:id - Remove a document and its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>> {
    let _guard = state.lock_ingest().await;

    let doc = state
        .get_document(&id)
        .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;

    let deleted_chunks = state.delete_document_with_chunks(&id).await?;
    tracing::info!("Deleted {} ({} chunks)", doc.filename, deleted_chunks);

    Ok(Json(json!({
        "success": true,
        "document_id": id,
        "filename": doc.filename,
        "deleted_chunks": deleted_chunks,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::state::testing::{config_in, harness};
    use crate::types::Document;

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(config_in(dir.path()));
        let doc = Document::new("grade.pdf".to_string(), "h".to_string(), 1);
        h.state.add_document(doc.clone());

        let Json(list) = list_documents(State(h.state.clone())).await;
        assert_eq!(list.total_count, 1);
        assert_eq!(list.documents[0].filename, "grade.pdf");

        let Json(body) = delete_document(State(h.state.clone()), Path(doc.id))
            .await
            .unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["deleted_chunks"], 0);
        assert!(h.state.list_documents().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let h = harness(config_in(dir.path()));
        let id = Uuid::new_v4();

        assert!(matches!(
            get_document(State(h.state.clone()), Path(id)).await,
            Err(Error::DocumentNotFound(_))
        ));
        assert!(matches!(
            delete_document(State(h.state.clone()), Path(id)).await,
            Err(Error::DocumentNotFound(_))
        ));
    }
}
