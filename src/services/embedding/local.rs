use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::{
    error::{AppError, AppResult},
    models::Embedding,
    services::embedding::Embedder,
};

/// In-process sentence embedder backed by fastembed's ONNX runtime
///
/// Inference is CPU-bound, so every call is moved onto the blocking pool.
/// The ONNX session sits behind a mutex and is shared by all requests.
#[derive(Clone)]
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
}

impl LocalEmbedder {
    /// Loads the named model, downloading it on first use
    pub fn new(model_name: &str, cache_dir: Option<PathBuf>) -> AppResult<Self> {
        let model = resolve_model(model_name)?;

        let mut options = InitOptions::new(model).with_show_download_progress(true);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        tracing::info!(model = %model_name, "Loading local embedding model");

        let embedding = TextEmbedding::try_new(options)
            .map_err(|e| AppError::Embedding(format!("Failed to load {}: {}", model_name, e)))?;

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Embedder for LocalEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let model = model
                .lock()
                .map_err(|_| AppError::Internal("embedding model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| AppError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Maps a sentence-transformers style model name onto a fastembed model
fn resolve_model(name: &str) -> AppResult<EmbeddingModel> {
    let short = name.rsplit('/').next().unwrap_or(name);

    match short.to_ascii_lowercase().as_str() {
        "paraphrase-multilingual-minilm-l12-v2" => Ok(EmbeddingModel::ParaphraseMLMiniLML12V2),
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
        _ => Err(AppError::InvalidInput(format!(
            "Unsupported local embedding model: {}",
            name
        ))),
    }
}
