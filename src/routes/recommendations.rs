use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::Recommendation,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub movie_description: String,
}

/// Handler for the recommendations endpoint
///
/// The description is passed to the embedder as-is; the number of results
/// comes from configuration, not from the request.
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    tracing::info!(
        request_id = %request_id,
        description_len = params.movie_description.len(),
        top_n = state.recommendation_count,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(&params.movie_description, state.recommendation_count)
        .await?;

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(recommendations))
}
