//! Hosted LLM client.
//!
//! The language model is a black box: one composed prompt plus a fixed
//! system instruction in, plain response text out. `LlmGenerate` is the
//! seam; `TogetherClient` is the production implementation against the
//! Together chat-completions API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instruction-following model used for explanations and appeals.
const DEFAULT_MODEL: &str = "meta-llama/Llama-3-70b-chat-hf";
const DEFAULT_API_URL: &str = "https://api.together.xyz/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Cap on response length.
const MAX_TOKENS: u32 = 2048;
/// Low temperature for factual, less creative output.
const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    #[error("Request to LLM service timed out")]
    Timeout,

    #[error("Could not connect to LLM service: {0}")]
    Connection(String),

    #[error("LLM service returned an error: {status}")]
    Api { status: u16, body: String },

    #[error("Failed to parse a valid response from the LLM service")]
    MalformedResponse,

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Prompt-in/text-out generation seam.
pub trait LlmGenerate: Send + Sync {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// HTTP client for the Together chat-completions API.
pub struct TogetherClient {
    api_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl TogetherClient {
    /// Create a client with an explicit endpoint (mainly for tests).
    pub fn new(api_url: &str, api_key: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Client against the hosted Together endpoint.
    pub fn hosted(api_key: &str) -> Self {
        Self::new(DEFAULT_API_URL, api_key)
    }

    /// The model name requests are sent with.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
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

impl LlmGenerate for TogetherClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().map_err(|_| LlmError::MalformedResponse)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(content)
    }
}
