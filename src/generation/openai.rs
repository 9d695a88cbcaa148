//! OpenAI-compatible chat completions client.
//!
//! Sends the notes wrapped in the flashcard prompt, pulls the first choice's
//! message content out of the response, and parses it as a JSON array.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::prompt::{build_prompt, SYSTEM_PROMPT};
use super::CardGenerator;
use crate::config::GenerationConfig;
use crate::error::{Error, Result};

pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_completion_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_completion_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        if config.api_key.is_none() {
            tracing::warn!("no API key configured; /generate will fail until OPENAI_API_KEY is set");
        }

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_completion_tokens: config.max_completion_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl CardGenerator for OpenAiGenerator {
    async fn generate(&self, notes: &str) -> Result<Vec<Value>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Upstream("no API key configured".into()))?;

        let prompt = build_prompt(notes);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_completion_tokens: self.max_completion_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, notes_len = notes.len(), "requesting flashcards");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "generation API returned an error");
            return Err(Error::Upstream(format!(
                "API returned HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("unreadable API response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Upstream("API response contained no message".into()))?;

        parse_cards(&content)
    }
}

/// Parse the model's reply into raw card entries.
pub(crate) fn parse_cards(content: &str) -> Result<Vec<Value>> {
    let body = strip_code_fence(content.trim());
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(Error::Validation(vec![
            "AI response is not a JSON array".into(),
        ])),
        Err(e) => Err(Error::Upstream(format!(
            "failed to parse AI response as JSON: {e}"
        ))),
    }
}

/// Models often wrap JSON in a ```json fence despite being told not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
