//! Configuration management
//!
//! This module handles loading and validation of the TuneScout configuration.
//! Configuration is stored in TOML format at ~/.tunescout/config.toml and a
//! default file is written on first run.
//!
//! # Configuration Sections
//!
//! - **core**: log level
//! - **llm**: executor selection and per-provider settings

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// LLM executor configuration
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// LLM executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Executor used for the recommendation protocol (gemini or ollama)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Gemini executor settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama executor settings
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Gemini executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for the Gemini API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API key; the GEMINI_API_KEY environment variable wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Ollama executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            api_key: None,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.tunescout/config.toml),
    /// writing a default file first if none exists.
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Create the default configuration and save it to `path`.
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default_config();
        config.validate()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!(path = %path.display(), "wrote default configuration");
        Ok(config)
    }

    /// Default configuration file path (~/.tunescout/config.toml)
    fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".tunescout").join("config.toml"))
    }

    fn default_config() -> Self {
        Self {
            core: CoreConfig::default(),
            llm: LlmConfig::default(),
        }
    }

    /// Validate field values after loading.
    fn validate(&self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_providers = ["gemini", "ollama"];
        if !valid_providers.contains(&self.llm.provider.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid provider '{}'. Must be one of: {}",
                self.llm.provider,
                valid_providers.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.ollama.base_url, "http://localhost:11434");
        assert!(config.llm.gemini.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default_config();
        let toml_string = toml::to_string(&config).expect("serialize");

        let deserialized: Config = toml::from_str(&toml_string).expect("deserialize");
        assert_eq!(config.core.log_level, deserialized.core.log_level);
        assert_eq!(config.llm.provider, deserialized.llm.provider);
        assert_eq!(config.llm.gemini.model, deserialized.llm.gemini.model);
    }

    #[test]
    fn test_partial_config_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            provider = "ollama"
            "#,
        )
        .expect("parse partial config");

        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.gemini.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = Config::default_config();
        config.core.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_provider_rejected() {
        let mut config = Config::default_config();
        config.llm.provider = "openai".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
            [core]
            log_level = "debug"

            [llm]
            provider = "ollama"

            [llm.ollama]
            base_url = "http://localhost:11434"
            model = "llama3.1:70b"
            "#
        )
        .expect("write config");

        let config = Config::load_from_path(file.path()).expect("load");
        assert_eq!(config.core.log_level, "debug");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.ollama.model, "llama3.1:70b");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = Config::load_from_path(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
