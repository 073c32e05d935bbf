//! Answer generation through an external chat-completion service.
//!
//! [`Generator`] is the seam between the core and the remote model. The
//! production implementation, [`OpenAiGenerator`], sends the prompt as a
//! single user message to an OpenAI-compatible `/chat/completions` endpoint.
//!
//! The call is made at most once per question. There is no retry: a failure
//! is returned as a [`GenerationError`] and surfaces to the caller as a
//! visible `"Error: ..."` answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, StartupError};

/// A completion backend: prompt in, raw completion text out.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Identifier of the model answering questions (for logs and `/health`).
    fn model_name(&self) -> &str;

    /// Run one completion for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Chat-completion client for OpenAI-compatible APIs.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    /// Build a client from configuration, reading the API key from the
    /// environment variable named by `generator.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::MissingApiKey`] if the variable is unset or
    /// empty.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, StartupError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| StartupError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    /// Build a client with an explicit API key.
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self, StartupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StartupError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        // Undecodable bodies map to `MalformedResponse` via `From<reqwest::Error>`.
        let parsed: ChatResponse = response.json().await?;
        first_message_content(parsed)
    }
}

/// Extract `choices[0].message.content` from a decoded chat-completion response.
fn first_message_content(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response has no message content".to_string())
        })
}
