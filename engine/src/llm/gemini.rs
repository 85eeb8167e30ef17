//! Gemini executor
//!
//! reqwest transport for the Google `generateContent` endpoint. The API key
//! is read from the `GEMINI_API_KEY` environment variable, falling back to
//! `llm.gemini.api_key` in the config file.

use super::{LlmError, LlmExecutor, Result};
use crate::config::GeminiConfig;
use async_trait::async_trait;
use serde_json::json;

pub struct GeminiExecutor {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiExecutor {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_key(&self) -> Result<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| self.config.api_key.clone())
            .ok_or_else(|| {
                LlmError::AuthenticationFailed(
                    "no Gemini API key: set GEMINI_API_KEY or llm.gemini.api_key".to_string(),
                )
            })
    }
}

#[async_trait]
impl LlmExecutor for GeminiExecutor {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn execute(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        );

        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                400 | 404 => LlmError::InvalidRequest(text),
                401 | 403 => LlmError::AuthenticationFailed(text),
                429 => LlmError::RateLimitExceeded,
                _ => LlmError::ProviderUnavailable(format!(
                    "Gemini API error ({}): {}",
                    status, text
                )),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::ResponseFormat(e.to_string()))?;

        let parts = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                LlmError::ResponseFormat("no candidate parts in response".to_string())
            })?;

        let mut full_text = String::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                full_text.push_str(text);
            }
        }

        Ok(full_text)
    }
}
