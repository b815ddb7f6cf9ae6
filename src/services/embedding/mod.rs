//! Text embedding backends
//!
//! The catalog index and every query must be encoded by the same `Embedder`:
//! scores computed across two different models are meaningless. The recommender
//! holds a single shared instance for the whole process lifetime.

use crate::{
    config::{Config, EmbeddingBackend},
    error::{AppError, AppResult},
    models::Embedding,
};
use std::sync::Arc;

pub mod local;
pub mod remote;

pub use local::LocalEmbedder;
pub use remote::RemoteEmbedder;

/// Trait for sentence-embedding models
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Encode a batch of texts, returning one vector per input in input order
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Embedding>>;

    /// Encode a single text
    async fn embed(&self, text: &str) -> AppResult<Embedding> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Embedding("model returned no embeddings".to_string()))
    }

    /// Model identifier for logging and health reporting
    fn model_name(&self) -> &str;
}

/// Creates the embedder selected by configuration
pub async fn create_embedder(config: &Config) -> AppResult<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.embedding_backend {
        EmbeddingBackend::Local => {
            let model_name = config.embedding_model.clone();
            let cache_dir = config.model_cache_dir.clone();
            // Model download and ONNX session setup are blocking
            let embedder = tokio::task::spawn_blocking(move || {
                LocalEmbedder::new(&model_name, cache_dir)
            })
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
            Arc::new(embedder)
        }
        EmbeddingBackend::Remote => {
            let api_url = config.embedding_api_url.clone().ok_or_else(|| {
                AppError::InvalidInput(
                    "EMBEDDING_API_URL is required for the remote backend".to_string(),
                )
            })?;
            Arc::new(RemoteEmbedder::new(
                api_url,
                config.embedding_model.clone(),
                config.embedding_api_key.clone(),
            ))
        }
    };

    tracing::info!(
        backend = ?config.embedding_backend,
        model = embedder.model_name(),
        "Embedding model ready"
    );

    Ok(embedder)
}
