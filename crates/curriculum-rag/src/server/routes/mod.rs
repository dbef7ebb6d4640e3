//! HTTP routes for the RAG server

pub mod ask;
pub mod documents;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all service routes
pub fn service_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/ask", post(ask::ask))
        // Uploads get a larger body limit
        .route(
            "/upload",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents/:id",
            get(documents::get_document).delete(documents::delete_document),
        )
}

/// Service banner
async fn banner() -> Json<Value> {
    Json(json!({
        "message": "Curriculum RAG service is up!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /upload": "Index a curriculum PDF (multipart field 'file')",
            "POST /ask": "Answer a question from the indexed documents",
            "GET /documents": "List indexed documents",
            "GET /documents/:id": "Get document details",
            "DELETE /documents/:id": "Delete a document and its chunks"
        }
    }))
}
