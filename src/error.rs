//! Error types shared across the indexing, extraction, and generation layers.
//!
//! Startup failures are fatal and abort the process before any question is
//! served. Generation failures are recoverable: they travel as a typed
//! [`GenerationError`] up to the boundary, which renders them as a visible
//! `"Error: ..."` answer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning document text into a chunked vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("chunk_size must be > 0")]
    ZeroChunkSize,

    #[error("document contains no words")]
    EmptyDocument,

    #[error("no vocabulary could be extracted from {chunks} chunk(s)")]
    EmptyVocabulary { chunks: usize },

    #[error("vector index has {vectors} rows but corpus has {chunks} chunks")]
    LengthMismatch { chunks: usize, vectors: usize },
}

/// Failures while extracting plain text from a source document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("document is not valid UTF-8 text")]
    NotUtf8,
}

/// A failed call to the external completion service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GenerationError::MalformedResponse(err.to_string())
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Anything that prevents the engine from being built.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read document {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {path}: {source}")]
    DocumentExtract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("environment variable {0} is not set; it must hold the completion API key")]
    MissingApiKey(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
