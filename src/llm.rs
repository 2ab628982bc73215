//! Chat-completions client for the review model.
//!
//! Talks to an OpenAI-compatible endpoint (default: DashScope compatible
//! mode) over blocking HTTP. The CLI is fully synchronous: one review is
//! one request, with the timeout owned by this layer.

use crate::config::Config;
use crate::error::{Result, RevetError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One chat message in the request payload.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for the review model API.
#[derive(Debug)]
pub struct ChatClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ChatClient {
    /// Build a client from configuration, reading the API key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// * `RevetError::UserError` - API key not set
    /// * `RevetError::ApiError` - HTTP client construction failed
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            RevetError::UserError(format!(
                "environment variable {} is not set.\n\
                 Fix: export {}='your-api-key'",
                config.api_key_env, config.api_key_env
            ))
        })?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RevetError::ApiError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// The model this client sends requests for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat request and return the assistant message content.
    ///
    /// With `json_mode` the request asks the endpoint for a JSON object
    /// response; the reply parser still tolerates plain text.
    pub fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            response_format: json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| RevetError::ApiError(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(500).collect();
            return Err(RevetError::ApiError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                snippet
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| RevetError::ApiError(format!("failed to decode response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RevetError::ApiError("response contained no choices".to_string()))
    }
}
