//! TOML configuration.
//!
//! Only `[document]` is mandatory; every other section falls back to the
//! defaults below. The completion API key is never part of the file: the
//! config names the environment variable it is read from.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub document: DocumentConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

/// Load and validate the configuration file at `path`.
///
/// A relative `document.path` is resolved against the directory holding the
/// config file, so a config can sit next to the document it describes.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = parse_config(&content)?;

    if config.document.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.document.path = dir.join(&config.document.path);
        }
    }

    Ok(config)
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }

    if config.retrieval.top_k == 0 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if config.generator.model.trim().is_empty() {
        anyhow::bail!("generator.model must not be empty");
    }

    if config.generator.api_key_env.trim().is_empty() {
        anyhow::bail!("generator.api_key_env must name an environment variable");
    }

    if config.generator.timeout_secs == 0 {
        anyhow::bail!("generator.timeout_secs must be > 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse_config("[document]\npath = \"book.pdf\"\n").unwrap();
        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.generator.model, "gpt-3.5-turbo");
        assert_eq!(config.generator.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.server.bind, "127.0.0.1:5000");
    }

    #[test]
    fn missing_document_section_is_rejected() {
        assert!(parse_config("[chunking]\nchunk_size = 10\n").is_err());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = parse_config("[document]\npath = \"a.txt\"\n[chunking]\nchunk_size = 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let err =
            parse_config("[document]\npath = \"a.txt\"\n[retrieval]\ntop_k = 0\n").unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn relative_document_path_resolves_against_config_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config_path = tmp.path().join("docqa.toml");
        std::fs::write(&config_path, "[document]\npath = \"book.txt\"\n").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.document.path, tmp.path().join("book.txt"));
    }
}
