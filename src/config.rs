use serde::Deserialize;
use std::path::PathBuf;

/// Which embedding implementation encodes catalog descriptions and queries
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// In-process ONNX model via fastembed
    #[default]
    Local,
    /// OpenAI-compatible `/v1/embeddings` endpoint
    Remote,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the titles CSV (title, description, listed_in, release_year)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default)]
    pub embedding_backend: EmbeddingBackend,

    /// Model identifier, e.g. `paraphrase-multilingual-MiniLM-L12-v2`
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Base URL of the remote embedding service (remote backend only)
    #[serde(default)]
    pub embedding_api_url: Option<String>,

    /// Bearer token for the remote embedding service
    #[serde(default)]
    pub embedding_api_key: Option<String>,

    /// Number of descriptions encoded per embedding call while building the index
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,

    /// Where the local backend stores downloaded model files
    #[serde(default)]
    pub model_cache_dir: Option<PathBuf>,

    /// Number of titles returned by the recommendation endpoint
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("netflix_titles.csv")
}

fn default_embedding_model() -> String {
    "paraphrase-multilingual-MiniLM-L12-v2".to_string()
}

fn default_embedding_batch_size() -> usize {
    64
}

fn default_recommendation_count() -> usize {
    3
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would only fail later, at index build or request time
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recommendation_count == 0 {
            anyhow::bail!("RECOMMENDATION_COUNT must be at least 1");
        }
        if self.embedding_batch_size == 0 {
            anyhow::bail!("EMBEDDING_BATCH_SIZE must be at least 1");
        }
        if self.embedding_backend == EmbeddingBackend::Remote && self.embedding_api_url.is_none()
        {
            anyhow::bail!("EMBEDDING_API_URL is required when EMBEDDING_BACKEND=remote");
        }
        Ok(())
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
