use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use mockall::mock;
use uuid::Uuid;

use cinematch_api::{
    error::{AppError, AppResult},
    models::{CatalogEntry, Embedding, Recommendation},
    routes::{create_router, AppState},
    services::{CatalogIndex, Embedder, Recommender},
};

const VOCABULARY: [&str; 8] = [
    "space", "robots", "opera", "romantic", "comedy", "heist", "crew", "love",
];

/// Bag-of-words embedder over a fixed vocabulary
struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Embedding>> {
        Ok(texts.iter().map(|text| keyword_vector(text)).collect())
    }

    fn model_name(&self) -> &str {
        "keywords"
    }
}

fn keyword_vector(text: &str) -> Embedding {
    let lower = text.to_lowercase();
    VOCABULARY
        .iter()
        .map(|word| lower.split_whitespace().filter(|w| w == word).count() as f32)
        .collect()
}

mock! {
    pub Embedder {}

    #[async_trait]
    impl Embedder for Embedder {
        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Embedding>>;
        async fn embed(&self, text: &str) -> AppResult<Embedding>;
        fn model_name(&self) -> &str;
    }
}

const CATALOG: [(&str, &str); 4] = [
    ("A", "space opera with robots"),
    ("B", "romantic comedy"),
    ("C", "a heist crew in space"),
    ("D", "love and robots"),
];

fn catalog_index(titles: &[(&str, &str)]) -> CatalogIndex {
    let entries = titles
        .iter()
        .enumerate()
        .map(|(i, (title, description))| CatalogEntry {
            title: title.to_string(),
            description: description.to_string(),
            genres: "Sci-Fi & Fantasy".to_string(),
            release_year: 2000 + i as i32,
            embedding: keyword_vector(description),
        })
        .collect();

    CatalogIndex::from_entries(entries).unwrap()
}

fn create_test_server_with(
    embedder: Arc<dyn Embedder>,
    titles: &[(&str, &str)],
    recommendation_count: usize,
) -> TestServer {
    let recommender = Recommender::new(embedder, catalog_index(titles));
    let state = Arc::new(AppState::new(recommender, recommendation_count));
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(Arc::new(KeywordEmbedder), &CATALOG, 3)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_size"], 4);
    assert_eq!(body["model"], "keywords");
}

#[tokio::test]
async fn test_get_recommendations() {
    let server = create_test_server();

    let response = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "robots in space")
        .await;
    response.assert_status_ok();

    let results: Vec<Recommendation> = response.json();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "A");
    assert!(results
        .windows(2)
        .all(|w| w[0].match_percentage >= w[1].match_percentage));

    let raw: Vec<serde_json::Value> = response.json();
    for field in ["title", "description", "genres", "release_year", "match_percentage"] {
        assert!(raw[0].get(field).is_some(), "missing field {}", field);
    }
}

#[tokio::test]
async fn test_exact_description_scores_one_hundred() {
    let server = create_test_server();

    let response = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "romantic comedy")
        .await;
    response.assert_status_ok();

    let results: Vec<Recommendation> = response.json();
    assert_eq!(results[0].title, "B");
    assert!((results[0].match_percentage - 100.0).abs() < 1e-3);
}

#[tokio::test]
async fn test_count_capped_by_catalog_size() {
    let server = create_test_server_with(
        Arc::new(KeywordEmbedder),
        &[("A", "space opera with robots"), ("B", "romantic comedy")],
        10,
    );

    let response = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "robots in space")
        .await;
    response.assert_status_ok();

    let results: Vec<Recommendation> = response.json();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "A");
}

#[tokio::test]
async fn test_empty_description_is_not_special_cased() {
    let server = create_test_server();

    let response = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "")
        .await;
    response.assert_status_ok();

    // A zero query vector scores every title 0, so catalog order decides
    let results: Vec<Recommendation> = response.json();
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert!(results.iter().all(|r| r.match_percentage == 0.0));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let server = create_test_server();

    let first: Vec<Recommendation> = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "a love story about robots")
        .await
        .json();
    let second: Vec<Recommendation> = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "a love story about robots")
        .await
        .json();

    assert_eq!(first, second);
    assert_eq!(first[0].title, "D");
}

#[tokio::test]
async fn test_missing_description_is_bad_request() {
    let server = create_test_server();

    let response = server.get("/getRecommendations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_embedding_failure_is_server_error() {
    let mut embedder = MockEmbedder::new();
    embedder
        .expect_embed()
        .times(1)
        .returning(|_| Err(AppError::Embedding("model unavailable".to_string())));
    embedder.expect_model_name().return_const("mock".to_string());

    let server = create_test_server_with(Arc::new(embedder), &CATALOG, 3);

    let response = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "robots in space")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Embedding error: model unavailable");
}

#[tokio::test]
async fn test_wrong_dimension_query_is_server_error() {
    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().returning(|_| Ok(vec![1.0, 0.0]));
    embedder.expect_model_name().return_const("mock".to_string());

    let server = create_test_server_with(Arc::new(embedder), &CATALOG, 3);

    let response = server
        .get("/getRecommendations")
        .add_query_param("movie_description", "robots in space")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_request_id_propagated() {
    let server = create_test_server();
    let request_id = Uuid::new_v4().to_string();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&request_id).unwrap(),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id.as_str());
}

#[tokio::test]
async fn test_request_id_generated() {
    let server = create_test_server();

    let response = server.get("/health").await;

    let header = response.header("x-request-id");
    assert!(Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
