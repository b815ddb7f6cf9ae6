use serde::{Deserialize, Serialize};

/// A vector embedding produced by the configured model
pub type Embedding = Vec<f32>;

// ============================================================================
// Dataset Types
// ============================================================================

/// Raw dataset row as it appears in the titles CSV
///
/// Only the columns the recommender needs are mapped; any other column
/// (`show_id`, `director`, `cast`, ...) is ignored by the reader.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogRow {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated genre list, e.g. "Dramas, International Movies"
    #[serde(default)]
    pub listed_in: Option<String>,
    pub release_year: i32,
}

impl CatalogRow {
    /// Returns the description if it carries any text
    pub fn usable_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A movie or show in the recommendation catalog, with its precomputed embedding
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub description: String,
    pub genres: String,
    pub release_year: i32,
    pub embedding: Embedding,
}

// ============================================================================
// Response Types
// ============================================================================

/// A single ranked recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub genres: String,
    pub release_year: i32,
    /// Cosine similarity scaled to a percentage; negative when the vectors point apart
    pub match_percentage: f32,
}

impl Recommendation {
    /// Builds a recommendation from a catalog entry and its cosine similarity
    pub fn from_entry(entry: &CatalogEntry, similarity: f32) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            genres: entry.genres.clone(),
            release_year: entry.release_year,
            match_percentage: similarity * 100.0,
        }
    }
}
