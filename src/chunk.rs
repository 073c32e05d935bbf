//! Fixed-size word chunker.
//!
//! Splits document text on whitespace and emits consecutive, non-overlapping
//! windows of `chunk_size` words. Chunks keep document order and their
//! position in the returned vector is their only identity.

use crate::error::IndexError;

/// Split `text` into chunks of `chunk_size` words, joined by single spaces.
///
/// The final chunk holds the remainder and may be shorter. Text without any
/// words produces no chunks.
///
/// # Errors
///
/// Returns [`IndexError::ZeroChunkSize`] if `chunk_size` is zero.
pub fn chunk_words(text: &str, chunk_size: usize) -> Result<Vec<String>, IndexError> {
    if chunk_size == 0 {
        return Err(IndexError::ZeroChunkSize);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    Ok(words
        .chunks(chunk_size)
        .map(|window| window.join(" "))
        .collect())
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
