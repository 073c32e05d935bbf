//! # docqa CLI
//!
//! ## Usage
//!
//! ```bash
//! docqa --config ./config/docqa.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docqa serve` | Index the document and start the chat HTTP server |
//! | `docqa ask "<question>"` | Answer one question and exit |
//! | `docqa search "<query>"` | Show the ranked chunks for a query (no completion call) |
//! | `docqa stats` | Print word, chunk, and vocabulary counts |
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=docqa=debug`) to change
//! verbosity.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use docqa::config::{load_config, Config};
use docqa::engine::{load_corpus, Engine};
use docqa::retrieve::retrieve;
use docqa::server::{run_server, NO_QUESTION_REPLY};

/// Ask questions about a document. Passages are retrieved with TF-IDF and
/// answered by an LLM chat-completion service.
#[derive(Parser)]
#[command(name = "docqa", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/docqa.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the document and serve `POST /api/chat`.
    Serve {
        /// Override `[server].bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Answer a single question and print the reply.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Print the chunks that would be sent as context for a query.
    Search {
        /// The search query string.
        query: String,

        /// Number of chunks to return (defaults to `[retrieval].top_k`).
        #[arg(long)]
        k: Option<usize>,

        /// Emit results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print corpus statistics.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docqa=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let engine = Arc::new(Engine::from_config(&config)?);
            run_server(&bind, engine).await?;
        }
        Commands::Ask { question } => {
            let question = question.trim();
            if question.is_empty() {
                println!("{}", NO_QUESTION_REPLY);
                return Ok(());
            }
            let engine = Engine::from_config(&config)?;
            println!("{}", engine.answer(question).await);
        }
        Commands::Search { query, k, json } => run_search(&config, &query, k, json)?,
        Commands::Stats => {
            let corpus = load_corpus(&config)?;
            let stats = corpus.stats();
            println!("document:   {}", config.document.path.display());
            println!("words:      {}", stats.words);
            println!("chunk_size: {}", stats.chunk_size);
            println!("chunks:     {}", stats.chunks);
            println!("vocabulary: {}", stats.vocabulary);
        }
    }

    Ok(())
}

fn run_search(config: &Config, query: &str, k: Option<usize>, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let corpus = load_corpus(config)?;
    let results = retrieve(&corpus, query, k.unwrap_or(config.retrieval.top_k));

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (rank, r) in results.iter().enumerate() {
        println!("{}. [chunk {}] score={:.4}", rank + 1, r.index, r.score);
        println!("   {}", preview(r.text, 160));
    }
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
