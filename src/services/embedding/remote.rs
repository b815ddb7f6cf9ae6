//! OpenAI-compatible embedding provider
//!
//! Works against any server exposing `POST /v1/embeddings` (OpenAI, Ollama,
//! text-embeddings-inference, vLLM). The model name is passed through verbatim.

use crate::{
    error::{AppError, AppResult},
    models::Embedding,
    services::embedding::Embedder,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct RemoteEmbedder {
    http_client: HttpClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Embedding,
}

impl RemoteEmbedder {
    pub fn new(api_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.api_url);
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Embedding API returned status {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;

        tracing::debug!(
            model = %self.model,
            inputs = texts.len(),
            "Remote embedding batch completed"
        );

        into_embeddings(parsed, texts.len())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Orders returned vectors by their `index` and checks that every input got one
fn into_embeddings(response: EmbeddingResponse, expected: usize) -> AppResult<Vec<Embedding>> {
    if response.data.len() != expected {
        return Err(AppError::ExternalApi(format!(
            "Embedding API returned {} vectors for {} inputs",
            response.data.len(),
            expected
        )));
    }

    let mut data = response.data;
    data.sort_by_key(|d| d.index);

    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_embeddings_orders_by_index() {
        let response: EmbeddingResponse = serde_json::from_str(
            r#"{
                "object": "list",
                "data": [
                    {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                    {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
                ],
                "model": "all-minilm"
            }"#,
        )
        .unwrap();

        let embeddings = into_embeddings(response, 2).unwrap();
        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_into_embeddings_count_mismatch() {
        let response: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();

        let result = into_embeddings(response, 3);
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let texts = vec!["robots in space".to_string()];
        let body = EmbeddingRequest {
            model: "nomic-embed-text",
            input: &texts,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["input"][0], "robots in space");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let embedder = RemoteEmbedder::new(
            "http://localhost:11434/".to_string(),
            "nomic-embed-text".to_string(),
            None,
        );
        assert_eq!(embedder.api_url, "http://localhost:11434");
        assert_eq!(embedder.model_name(), "nomic-embed-text");
    }
}
