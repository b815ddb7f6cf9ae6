pub mod catalog;
pub mod embedding;
pub mod recommendations;
pub mod similarity;

pub use catalog::CatalogIndex;
pub use embedding::Embedder;
pub use recommendations::Recommender;
