//! Question answering endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /ask - Answer a question from the indexed documents
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    let question = request.question();
    if question.is_empty() {
        return Err(Error::bad_request("prompt must not be empty"));
    }

    let config = state.config();
    tracing::info!("Question: {}", question);

    let query = format!("{}{}", config.embeddings.query_prefix, question);
    let query_embedding = state.embedding_provider().embed(&query).await?;

    let results = state
        .vector_store_provider()
        .search(&query_embedding, config.retrieval.top_k)
        .await?;
    tracing::debug!("Retrieved {} chunks", results.len());

    if results.is_empty() {
        return Ok(Json(AskResponse {
            answer: PromptBuilder::insufficient_information(config.preprocessing.locale)
                .to_string(),
            chunks_retrieved: 0,
        }));
    }

    let context = PromptBuilder::build_context(&results);
    let answer = state
        .llm_provider()
        .generate_answer(question, &context)
        .await?;

    tracing::info!(
        "Answered with {} chunks in {:.1}s",
        results.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(Json(AskResponse {
        answer: answer.trim().to_string(),
        chunks_retrieved: results.len(),
    }))
}
