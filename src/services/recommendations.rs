use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
    services::{catalog::CatalogIndex, embedding::Embedder, similarity},
};

/// Ranks catalog entries against a query embedding
///
/// Returns at most `top_n` recommendations, sorted by descending similarity.
/// Entries with equal similarity keep catalog order.
pub fn rank(
    index: &CatalogIndex,
    query_embedding: &[f32],
    top_n: usize,
) -> AppResult<Vec<Recommendation>> {
    if top_n == 0 {
        return Err(AppError::InvalidInput("top_n must be at least 1".to_string()));
    }

    if query_embedding.len() != index.dimension() {
        return Err(AppError::DimensionMismatch {
            expected: index.dimension(),
            got: query_embedding.len(),
        });
    }

    let scores: Vec<f32> = index
        .entries()
        .iter()
        .map(|entry| similarity::cosine_similarity(query_embedding, &entry.embedding))
        .collect();

    let recommendations = similarity::top_n(&scores, top_n)
        .into_iter()
        .map(|scored| Recommendation::from_entry(&index.entries()[scored.index], scored.score))
        .collect();

    Ok(recommendations)
}

/// Generates watch recommendations from a free-text description
///
/// Holds the one embedder and the catalog it encoded. Both are built once at
/// startup and only read afterwards, so the recommender is cheap to clone
/// into request handlers.
#[derive(Clone)]
pub struct Recommender {
    embedder: Arc<dyn Embedder>,
    index: Arc<CatalogIndex>,
}

impl Recommender {
    pub fn new(embedder: Arc<dyn Embedder>, index: CatalogIndex) -> Self {
        Self {
            embedder,
            index: Arc::new(index),
        }
    }

    /// Embeds the query with the catalog's embedder and returns the best matches
    pub async fn recommend(&self, query: &str, top_n: usize) -> AppResult<Vec<Recommendation>> {
        let query_embedding = self.embedder.embed(query).await?;
        let recommendations = rank(&self.index, &query_embedding, top_n)?;

        tracing::debug!(
            query_len = query.len(),
            top_n,
            returned = recommendations.len(),
            best = ?recommendations.first().map(|r| r.match_percentage),
            "Ranked catalog"
        );

        Ok(recommendations)
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }
}
