//! Nearest-passage retrieval over a [`CorpusIndex`].
//!
//! Every chunk is scored against the query by cosine similarity. Results are
//! ordered by score (desc), then chunk index (asc), and truncated to `k`.
//! The explicit index tie-break keeps the order deterministic when many
//! chunks share a score, including the all-zero case where no query term is
//! in the vocabulary.

use std::cmp::Ordering;

use serde::Serialize;

use crate::index::{cosine_similarity, CorpusIndex};

/// One ranked chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk<'a> {
    /// Position of the chunk in the corpus.
    pub index: usize,
    /// Chunk text, as handed to the prompt.
    pub text: &'a str,
    /// Cosine similarity in `[0.0, 1.0]`.
    pub score: f32,
}

/// Return the `k` chunks most similar to `query`.
///
/// Never returns more than `k` results or more than the corpus holds. A query
/// with no known terms still yields `k` chunks, all scored `0.0`.
pub fn retrieve<'a>(corpus: &'a CorpusIndex, query: &str, k: usize) -> Vec<ScoredChunk<'a>> {
    if k == 0 {
        return Vec::new();
    }

    let index = corpus.vector_index();
    let query_vec = index.vectorizer().transform(query);

    let mut scored: Vec<(usize, f32)> = index
        .vectors()
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_similarity(&query_vec, v)))
        .collect();

    scored.sort_by(|a, b| rank_order(*a, *b));
    scored.truncate(k);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let top: Vec<String> = scored
            .iter()
            .map(|(i, s)| format!("#{}={:.4}", i, s))
            .collect();
        tracing::debug!(known_terms = query_vec.entries().len(), top = %top.join(" "), "ranked chunks");
    }

    scored
        .into_iter()
        .filter_map(|(i, score)| {
            corpus.chunk(i).map(|text| ScoredChunk {
                index: i,
                text,
                score,
            })
        })
        .collect()
}

/// Higher score first; equal scores fall back to the lower chunk index.
fn rank_order(a: (usize, f32), b: (usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
