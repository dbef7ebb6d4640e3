//! Vector store for chunk storage and search
//!
//! Chunks and their embeddings live in SQLite; an HNSW graph rebuilt from those
//! rows at startup answers nearest-neighbour queries. The SQLite `seq` column is
//! the HNSW data id, so rows deleted after the graph was built are simply not
//! found when a search result is resolved.

use hnsw_rs::prelude::*;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::config::{RagConfig, VectorDbConfig};
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Upper bound on layers in the HNSW graph
const MAX_LAYER: usize = 16;
/// Element count the graph is sized for initially
const INITIAL_CAPACITY: usize = 100_000;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity in [-1, 1]
    pub similarity: f32,
}

/// SQLite-backed chunk store with an in-memory HNSW index
pub struct VectorStore {
    /// Embedding dimensions
    dimensions: usize,
    /// Chunk rows
    conn: Mutex<Connection>,
    /// Cosine HNSW graph keyed by row `seq`
    index: Hnsw<'static, f32, DistCosine>,
    /// Points inserted into the graph
    indexed: AtomicUsize,
    /// Rows deleted since the graph was built; searches over-fetch by this much
    removed: AtomicUsize,
    /// ef used at query time
    ef_search: usize,
}

fn db_error(e: rusqlite::Error) -> Error {
    Error::vector_db(format!("SQLite error: {}", e))
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Raw columns of a `chunks` row
struct StoredChunk {
    id: String,
    document_id: String,
    content: String,
    chunk_index: u32,
    metadata: String,
    embedding: Vec<u8>,
}

impl StoredChunk {
    const COLUMNS: &'static str = "id, document_id, content, chunk_index, metadata, embedding";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            document_id: row.get(1)?,
            content: row.get(2)?,
            chunk_index: row.get(3)?,
            metadata: row.get(4)?,
            embedding: row.get(5)?,
        })
    }

    fn into_chunk(self) -> Result<Chunk> {
        let parse_id = |raw: &str| {
            Uuid::parse_str(raw).map_err(|e| Error::vector_db(format!("Bad id {}: {}", raw, e)))
        };
        let metadata: BTreeMap<String, serde_json::Value> = serde_json::from_str(&self.metadata)?;

        Ok(Chunk {
            id: parse_id(&self.id)?,
            document_id: parse_id(&self.document_id)?,
            content: self.content,
            embedding: decode_embedding(&self.embedding),
            chunk_index: self.chunk_index,
            metadata,
        })
    }
}

impl VectorStore {
    /// Open the store configured in `vector_db`
    pub fn new(config: &RagConfig) -> Result<Self> {
        Self::open(&config.vector_db, config.embeddings.dimensions)
    }

    /// Open (or create) the SQLite file and rebuild the graph from it
    pub fn open(config: &VectorDbConfig, dimensions: usize) -> Result<Self> {
        let path: &Path = &config.storage_path;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::vector_db(format!("Failed to open {}: {}", path.display(), e)))?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#,
        )
        .map_err(db_error)?;

        Self::with_connection(conn, config, dimensions)
    }

    /// Store backed by an in-memory database
    pub fn in_memory(dimensions: usize) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::with_connection(conn, &VectorDbConfig::default(), dimensions)
    }

    fn with_connection(conn: Connection, config: &VectorDbConfig, dimensions: usize) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                document_id TEXT NOT NULL,
                content TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                metadata TEXT NOT NULL,
                embedding BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);
        "#,
        )
        .map_err(db_error)?;

        let store = Self {
            dimensions,
            index: Hnsw::new(
                config.hnsw_m,
                INITIAL_CAPACITY,
                MAX_LAYER,
                config.hnsw_ef_construction,
                DistCosine {},
            ),
            conn: Mutex::new(conn),
            indexed: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
            ef_search: config.hnsw_ef_search,
        };
        store.rebuild_index()?;
        Ok(store)
    }

    /// Insert every stored embedding into the graph
    fn rebuild_index(&self) -> Result<()> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT seq, embedding FROM chunks ORDER BY seq")
            .map_err(db_error)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?)))
            .map_err(db_error)?;

        for row in rows {
            let (seq, bytes) = row.map_err(db_error)?;
            let embedding = decode_embedding(&bytes);
            if embedding.len() != self.dimensions {
                return Err(Error::vector_db(format!(
                    "Stored embedding has {} dimensions, store expects {}",
                    embedding.len(),
                    self.dimensions
                )));
            }
            self.index.insert_slice((embedding.as_slice(), seq as usize));
            self.indexed.fetch_add(1, Ordering::Relaxed);
        }

        tracing::info!("Indexed {} stored chunks", self.indexed.load(Ordering::Relaxed));
        Ok(())
    }

    /// Embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn check_embedding(&self, chunk: &Chunk) -> Result<()> {
        if chunk.embedding.is_empty() {
            return Err(Error::vector_db("Chunk has no embedding"));
        }
        if chunk.embedding.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Embedding has {} dimensions, store expects {}",
                chunk.embedding.len(),
                self.dimensions
            )));
        }
        Ok(())
    }

    /// Insert a chunk into the vector store
    pub fn insert_chunk(&self, chunk: &Chunk) -> Result<()> {
        self.insert_chunks(std::slice::from_ref(chunk))
    }

    /// Insert several chunks in one transaction
    ///
    /// Nothing reaches the graph unless the transaction commits.
    pub fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        for chunk in chunks {
            self.check_embedding(chunk)?;
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(db_error)?;
        let mut seqs = Vec::with_capacity(chunks.len());
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO chunks (id, document_id, content, chunk_index, metadata, embedding)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(db_error)?;

            for chunk in chunks {
                stmt.execute(params![
                    chunk.id.to_string(),
                    chunk.document_id.to_string(),
                    chunk.content,
                    chunk.chunk_index,
                    serde_json::to_string(&chunk.metadata)?,
                    encode_embedding(&chunk.embedding),
                ])
                .map_err(db_error)?;
                seqs.push(tx.last_insert_rowid());
            }
        }
        tx.commit().map_err(db_error)?;

        for (chunk, seq) in chunks.iter().zip(seqs) {
            self.index.insert_slice((chunk.embedding.as_slice(), seq as usize));
        }
        self.indexed.fetch_add(chunks.len(), Ordering::Relaxed);
        Ok(())
    }

    /// Search for similar chunks, best first
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if query_embedding.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Query has {} dimensions, store expects {}",
                query_embedding.len(),
                self.dimensions
            )));
        }
        if top_k == 0 || self.indexed.load(Ordering::Relaxed) == 0 {
            return Ok(Vec::new());
        }

        let fetch = top_k + self.removed.load(Ordering::Relaxed);
        let neighbours = self
            .index
            .search(query_embedding, fetch, self.ef_search.max(fetch));

        let conn = self.conn.lock();
        let sql = format!("SELECT {} FROM chunks WHERE seq = ?1", StoredChunk::COLUMNS);
        let mut stmt = conn.prepare(&sql).map_err(db_error)?;

        let mut results = Vec::with_capacity(top_k);
        for neighbour in neighbours {
            let stored = stmt
                .query_row([neighbour.d_id as i64], StoredChunk::from_row)
                .optional()
                .map_err(db_error)?;
            // Deleted since the graph was built
            let Some(stored) = stored else { continue };

            results.push(SearchResult {
                chunk: stored.into_chunk()?,
                similarity: 1.0 - neighbour.distance,
            });
        }

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(CmpOrdering::Equal)
        });
        results.truncate(top_k);
        Ok(results)
    }

    /// Delete all chunks of a document
    pub fn delete_by_document(&self, document_id: &Uuid) -> Result<usize> {
        let deleted = self
            .conn
            .lock()
            .execute(
                "DELETE FROM chunks WHERE document_id = ?1",
                [document_id.to_string()],
            )
            .map_err(db_error)?;

        self.removed.fetch_add(deleted, Ordering::Relaxed);
        Ok(deleted)
    }

    /// Number of stored chunks
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
            .map_err(db_error)?;
        Ok(count as usize)
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
