//! TF-IDF vector index over the chunk sequence.
//!
//! The vectorizer is fitted once on the chunks themselves. Its vocabulary is
//! frozen after fitting: queries are projected into the same term space and
//! unknown terms are dropped.
//!
//! # Weighting
//!
//! ```text
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = count(t, d) × idf(t)
//! vector(d) = w(·, d) / ‖w(·, d)‖₂
//! ```
//!
//! where `n` is the number of chunks and `df(t)` the number of chunks
//! containing `t`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::chunk::{chunk_words, word_count};
use crate::error::IndexError;

/// A sparse, L2-normalised term vector. Entries are sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    fn from_weights(weights: BTreeMap<usize, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm < f32::EPSILON {
            return Self::default();
        }
        Self {
            entries: weights.into_iter().map(|(t, w)| (t, w / norm)).collect(),
        }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of products over the terms both vectors share.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine similarity between two sparse vectors.
///
/// Returns `0.0` when either vector is empty (e.g. a query with no known
/// terms).
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let norm_a = a.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    let norm_b = b.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;
    if denom < f32::EPSILON {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Lowercased tokens: maximal runs of alphanumeric characters or `_`.
/// Single-character tokens are kept.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// A fitted term-frequency / inverse-document-frequency model.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and IDF weights on `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, IndexError> {
        if documents.is_empty() {
            return Err(IndexError::EmptyDocument);
        }

        let per_doc: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|d| tokenize(d.as_ref()).collect())
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &per_doc {
            for term in terms {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(IndexError::EmptyVocabulary {
                chunks: documents.len(),
            });
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        // BTreeMap iteration is sorted, so term ids follow lexical order.
        for (id, (term, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), id);
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        Ok(Self { vocabulary, idf })
    }

    /// Project `text` into the fitted term space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&id) = self.vocabulary.get(&token) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        for (id, weight) in counts.iter_mut() {
            *weight *= self.idf[*id];
        }
        SparseVector::from_weights(counts)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn term_id(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

/// Fitted vectorizer plus one vector per chunk, in chunk order.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    vectorizer: TfidfVectorizer,
    vectors: Vec<SparseVector>,
}

impl VectorIndex {
    /// Fit on `chunks` and vectorise each of them.
    pub fn build<S: AsRef<str>>(chunks: &[S]) -> Result<Self, IndexError> {
        let vectorizer = TfidfVectorizer::fit(chunks)?;
        let vectors = chunks
            .iter()
            .map(|c| vectorizer.transform(c.as_ref()))
            .collect();
        Ok(Self {
            vectorizer,
            vectors,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Summary of a built corpus, reported by `docqa stats` and at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CorpusStats {
    pub words: usize,
    pub chunks: usize,
    pub vocabulary: usize,
    pub chunk_size: usize,
}

/// The immutable chunk sequence together with its vector index.
///
/// Chunk `i` and vector `i` describe the same passage; construction fails if
/// the two ever disagree in length.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    chunks: Vec<String>,
    index: VectorIndex,
    stats: CorpusStats,
}

impl CorpusIndex {
    /// Chunk `text` and fit the vector index over the chunks.
    pub fn build(text: &str, chunk_size: usize) -> Result<Self, IndexError> {
        let chunks = chunk_words(text, chunk_size)?;
        if chunks.is_empty() {
            return Err(IndexError::EmptyDocument);
        }
        let index = VectorIndex::build(&chunks)?;
        let stats = CorpusStats {
            words: word_count(text),
            chunks: chunks.len(),
            vocabulary: index.vectorizer().vocabulary_size(),
            chunk_size,
        };
        let corpus = Self::from_parts(chunks, index, stats)?;

        tracing::info!(
            words = stats.words,
            chunks = stats.chunks,
            vocabulary = stats.vocabulary,
            chunk_size,
            "built corpus index"
        );
        Ok(corpus)
    }

    fn from_parts(
        chunks: Vec<String>,
        index: VectorIndex,
        stats: CorpusStats,
    ) -> Result<Self, IndexError> {
        if chunks.len() != index.len() {
            return Err(IndexError::LengthMismatch {
                chunks: chunks.len(),
                vectors: index.len(),
            });
        }
        Ok(Self {
            chunks,
            index,
            stats,
        })
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn chunk(&self, i: usize) -> Option<&str> {
        self.chunks.get(i).map(String::as_str)
    }

    pub fn vector_index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn stats(&self) -> CorpusStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
