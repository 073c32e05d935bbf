//! The question-answering engine.
//!
//! [`Engine`] is built once at startup from the document and configuration
//! and is immutable afterwards. Handlers share it behind an `Arc` and call
//! [`Engine::answer`] for every question; nothing is recomputed per call
//! except the query projection and similarity scan.

use crate::config::Config;
use crate::error::{GenerationError, StartupError};
use crate::extract::load_document;
use crate::generate::{Generator, OpenAiGenerator};
use crate::index::CorpusIndex;
use crate::prompt::build_prompt;
use crate::retrieve::{retrieve, ScoredChunk};

/// Prefix of every answer produced from a failed completion call.
pub const ERROR_PREFIX: &str = "Error: ";

pub struct Engine {
    corpus: CorpusIndex,
    generator: Box<dyn Generator>,
    top_k: usize,
}

impl Engine {
    pub fn new(corpus: CorpusIndex, generator: Box<dyn Generator>, top_k: usize) -> Self {
        Self {
            corpus,
            generator,
            top_k,
        }
    }

    /// Load the configured document, index it, and connect the generator.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let corpus = load_corpus(config)?;
        let generator = OpenAiGenerator::from_config(&config.generator)?;
        tracing::info!(model = generator.model_name(), top_k = config.retrieval.top_k, "engine ready");
        Ok(Self::new(corpus, Box::new(generator), config.retrieval.top_k))
    }

    pub fn corpus(&self) -> &CorpusIndex {
        &self.corpus
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Rank chunks for `query` using the configured `top_k`.
    pub fn context_for(&self, query: &str) -> Vec<ScoredChunk<'_>> {
        retrieve(&self.corpus, query, self.top_k)
    }

    /// Retrieve context, build the prompt, and call the generator once.
    ///
    /// The completion is trimmed of surrounding whitespace.
    pub async fn ask(&self, question: &str) -> Result<String, GenerationError> {
        let context = self.context_for(question);
        let prompt = build_prompt(&context, question);
        let completion = self.generator.complete(&prompt).await?;
        Ok(completion.trim().to_string())
    }

    /// Answer `question`, rendering generation failures as `"Error: ..."`.
    pub async fn answer(&self, question: &str) -> String {
        render_answer(self.ask(question).await)
    }
}

/// Turn the typed generation outcome into the caller-facing answer string.
pub fn render_answer(result: Result<String, GenerationError>) -> String {
    match result {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "answer generation failed");
            format!("{}{}", ERROR_PREFIX, e)
        }
    }
}

/// Load and index the configured document without touching the generator.
pub fn load_corpus(config: &Config) -> Result<CorpusIndex, StartupError> {
    let text = load_document(&config.document.path)?;
    Ok(CorpusIndex::build(&text, config.chunking.chunk_size)?)
}
