//! Cosine similarity and top-N selection

use std::cmp::Ordering;

/// A catalog position paired with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f32,
}

/// Calculate cosine similarity between two embeddings
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B||)
///
/// Returns a value in [-1, 1]. Defined as 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        return 0.0;
    }

    // Rounding can push identical vectors a hair past 1.0
    similarity.clamp(-1.0, 1.0)
}

/// Ranking order: higher score first, then lower catalog index
fn rank_order(a: &ScoredIndex, b: &ScoredIndex) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.index.cmp(&b.index))
}

/// Select the `top_n` highest scores, sorted best first
///
/// Partitions with `select_nth_unstable_by` so only the selected head is
/// fully sorted. Equal scores keep catalog order.
pub fn top_n(scores: &[f32], top_n: usize) -> Vec<ScoredIndex> {
    let mut scored: Vec<ScoredIndex> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| ScoredIndex { index, score })
        .collect();

    let keep = top_n.min(scored.len());
    if keep == 0 {
        return Vec::new();
    }

    if keep < scored.len() {
        scored.select_nth_unstable_by(keep - 1, rank_order);
        scored.truncate(keep);
    }

    scored.sort_unstable_by(rank_order);
    scored
}
