//! Curriculum RAG server binary
//!
//! Run with: cargo run -p curriculum-rag --bin curriculum-rag-server [config.toml]

use std::path::PathBuf;

use curriculum_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Config file used when no path is given on the command line
const ENV_CONFIG_PATH: &str = "CURRICULUM_RAG_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curriculum_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                    Curriculum RAG                         ║
║        Course curriculum Q&A over uploaded PDFs           ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG_PATH).ok())
        .map(PathBuf::from);
    let config = RagConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Locale: {:?}", config.preprocessing.locale);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Vector store: {}", config.vector_db.storage_path.display());
    if config.upload.token.is_none() {
        tracing::warn!("No upload token configured, /upload is open");
    }

    let server = RagServer::new(config.clone()).await?;

    if server.state().is_ready() {
        tracing::info!("Ollama is running at {}", config.llm.base_url);
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!(
            "  Pull models: ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model
        );
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /upload         - Index a curriculum PDF");
    println!("  POST   /ask            - Ask a question");
    println!("  GET    /documents      - List documents");
    println!("  DELETE /documents/:id  - Remove a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
