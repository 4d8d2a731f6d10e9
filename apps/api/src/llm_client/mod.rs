//! LLM client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the LLM gateway directly.
//! Question generation, answer scoring and summaries all go through here.
//!
//! Each call is attempted exactly once. Callers own the fallback policy.
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

const API_VERSION: &str = "2024-02-15-preview";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by the LLM gateway")]
    RateLimited,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No JSON {0} found in LLM output")]
    MissingJson(JsonShape),

    #[error("LLM output violated the expected schema: {0}")]
    Schema(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The kind of top-level JSON value a prompt asks the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn opener(self) -> char {
        match self {
            JsonShape::Object => '{',
            JsonShape::Array => '[',
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            JsonShape::Object => value.is_object(),
            JsonShape::Array => value.is_array(),
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonShape::Object => f.write_str("object"),
            JsonShape::Array => f.write_str("array"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    message: String,
}

/// The single LLM client shared by all interview services.
/// Wraps the Azure OpenAI chat-completions API with structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.ai_call_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: format!(
                "{}/openai/deployments/{}/chat/completions?api-version={API_VERSION}",
                config.azure_openai_endpoint, config.azure_openai_deployment
            ),
            api_key: config.azure_openai_api_key.clone(),
        })
    }

    /// Makes one chat-completion call and returns the raw reply text.
    pub async fn call(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
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
        };

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            warn!("LLM gateway rate limited the request");
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GatewayError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text()
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }

    /// Calls the LLM and deserializes the first JSON value of `shape` found in the reply.
    /// Model output may wrap the JSON in prose or code fences.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        shape: JsonShape,
    ) -> Result<T, LlmError> {
        let text = self.call(system, prompt).await?;
        parse_json_reply(&text, shape)
    }
}

/// Runs the extraction step and deserializes the located value.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str, shape: JsonShape) -> Result<T, LlmError> {
    let value = extract_json(text, shape).ok_or(LlmError::MissingJson(shape))?;
    serde_json::from_value(value).map_err(LlmError::Parse)
}

/// Locates the first well-formed JSON value of the requested shape in `text`.
///
/// Every opener character is tried as a candidate start; the first candidate
/// that parses as a complete value of the right shape wins.
pub fn extract_json(text: &str, shape: JsonShape) -> Option<Value> {
    let opener = shape.opener();
    text.char_indices()
        .filter(|&(_, c)| c == opener)
        .find_map(|(start, _)| {
            let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(value)) if shape.matches(&value) => Some(value),
                _ => None,
            }
        })
}
