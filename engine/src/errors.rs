//! Error types for the engine surface
//!
//! Catalog, protocol, and executor errors live next to their modules
//! ([`crate::catalog::CatalogError`], [`crate::recommender::RecommendError`],
//! [`crate::llm::LlmError`]); this enum covers the configuration and CLI
//! surface around them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid song spec {0:?}: expected \"Title|Artist|Genre\"")]
    InvalidSongSpec(String),
}
