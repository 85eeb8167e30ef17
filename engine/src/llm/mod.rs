//! LLM Executor Abstraction Layer
//!
//! This module provides the single-method capability the recommendation
//! protocol talks to: send one prompt, get the model's raw reply text back.
//! Concrete transports (Gemini, Ollama) implement the LlmExecutor trait;
//! tests substitute deterministic scripted stubs.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::errors::EngineError;

pub mod gemini;
pub mod ollama;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while talking to a language model
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Malformed provider response: {0}")]
    ResponseFormat(String),
}

/// Executor capability: one prompt in, the model's reply text out.
///
/// Transport, timeout, and retry policy belong to the implementation; the
/// recommendation protocol treats every failure as terminal for the call.
#[async_trait]
pub trait LlmExecutor: Send + Sync {
    /// Short provider name, e.g. "gemini" or "ollama"
    fn name(&self) -> &str;

    /// Execute one prompt and return the reply text verbatim
    async fn execute(&self, prompt: &str) -> Result<String>;
}

/// Build the executor selected by `llm.provider` in the configuration.
pub fn build_executor(
    config: &LlmConfig,
) -> std::result::Result<Arc<dyn LlmExecutor>, EngineError> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(gemini::GeminiExecutor::new(config.gemini.clone()))),
        "ollama" => Ok(Arc::new(ollama::OllamaExecutor::new(
            config.ollama.base_url.as_str(),
            config.ollama.model.as_str(),
        ))),
        other => Err(EngineError::UnknownProvider(other.to_string())),
    }
}

/// Extract the first balanced top-level JSON object from `text`.
///
/// Scans from the first `{`, counting brace depth and respecting string
/// literals and escapes, so prose before or after the object is tolerated.
/// Returns `None` when no balanced object is found.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let s = &text[start..];
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
