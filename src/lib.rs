//! # docqa
//!
//! Answers questions about one fixed document by retrieving the most
//! relevant passages and handing them, with the question, to an LLM
//! chat-completion service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────┐
//! │ Document │──▶│ Chunker  │──▶│ TF-IDF     │   built once at startup
//! │ PDF/DOCX │   │ N words  │   │ index      │
//! └──────────┘   └──────────┘   └─────┬──────┘
//!                                     │
//!   question ──▶ retrieve top-K ◀─────┘
//!                     │
//!                     ▼
//!               prompt ──▶ completion API ──▶ answer / "Error: ..."
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | Document text extraction |
//! | [`chunk`] | Fixed-size word chunking |
//! | [`index`] | TF-IDF vectorizer and corpus index |
//! | [`retrieve`] | Cosine-similarity top-K retrieval |
//! | [`prompt`] | Prompt template |
//! | [`generate`] | Completion service client |
//! | [`engine`] | Question-in/answer-out entry point |
//! | [`server`] | JSON HTTP boundary |
//! | [`error`] | Error types |

pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod generate;
pub mod index;
pub mod prompt;
pub mod retrieve;
pub mod server;
