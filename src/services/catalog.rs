use std::{fs::File, io::Read, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, CatalogRow},
    services::embedding::Embedder,
};

/// Immutable, precomputed catalog of titles and their description embeddings
///
/// Built once at startup and shared read-only for the process lifetime.
/// Entries keep dataset row order.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    dimension: usize,
}

impl CatalogIndex {
    /// Builds the index from prepared entries, checking that every embedding
    /// has the same dimension
    pub fn from_entries(entries: Vec<CatalogEntry>) -> AppResult<Self> {
        let dimension = entries
            .first()
            .map(|entry| entry.embedding.len())
            .ok_or_else(|| AppError::Dataset("catalog has no titles with a description".to_string()))?;

        if dimension == 0 {
            return Err(AppError::Embedding("model produced empty embeddings".to_string()));
        }

        if let Some(entry) = entries.iter().find(|e| e.embedding.len() != dimension) {
            return Err(AppError::DimensionMismatch {
                expected: dimension,
                got: entry.embedding.len(),
            });
        }

        Ok(Self { entries, dimension })
    }

    /// Encodes every row with a usable description and builds the index
    ///
    /// Rows without a description are skipped. Any embedding failure aborts
    /// the build; a partial index is never returned.
    pub async fn build(
        rows: Vec<CatalogRow>,
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> AppResult<Self> {
        if batch_size == 0 {
            return Err(AppError::InvalidInput("batch size must be at least 1".to_string()));
        }

        let total_rows = rows.len();
        let described: Vec<CatalogRow> = rows
            .into_iter()
            .filter(|row| row.usable_description().is_some())
            .collect();

        tracing::info!(
            total_rows,
            kept = described.len(),
            dropped = total_rows - described.len(),
            "Filtered catalog rows without descriptions"
        );

        let mut entries = Vec::with_capacity(described.len());

        for (batch_number, batch) in described.chunks(batch_size).enumerate() {
            let texts: Vec<String> = batch
                .iter()
                .map(|row| row.usable_description().unwrap_or_default().to_string())
                .collect();

            let embeddings = embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(AppError::Embedding(format!(
                    "model returned {} embeddings for {} descriptions",
                    embeddings.len(),
                    batch.len()
                )));
            }

            for ((row, description), embedding) in batch.iter().zip(texts).zip(embeddings) {
                entries.push(CatalogEntry {
                    title: row.title.clone(),
                    description,
                    genres: row.listed_in.clone().unwrap_or_default(),
                    release_year: row.release_year,
                    embedding,
                });
            }

            tracing::debug!(
                batch = batch_number,
                encoded = entries.len(),
                total = described.len(),
                "Encoded catalog batch"
            );
        }

        let index = Self::from_entries(entries)?;

        tracing::info!(
            entries = index.len(),
            dimension = index.dimension(),
            model = embedder.model_name(),
            "Catalog index built"
        );

        Ok(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Embedding dimension shared by every entry
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads catalog rows from a CSV file on disk
pub fn load_rows(path: &Path) -> AppResult<Vec<CatalogRow>> {
    let file = File::open(path).map_err(|e| {
        AppError::Dataset(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rows = read_rows(file)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Loaded dataset");

    Ok(rows)
}

/// Reads catalog rows from CSV with a header line
///
/// Columns beyond `title, description, listed_in, release_year` are ignored.
/// A row that cannot be parsed fails the whole load.
pub fn read_rows<R: Read>(reader: R) -> AppResult<Vec<CatalogRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = record.map_err(|e| AppError::Dataset(format!("Malformed row {}: {}", line + 1, e)))?;
        rows.push(row);
    }

    Ok(rows)
}
