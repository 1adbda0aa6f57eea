use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the knowledge-base pipeline.
///
/// Provider failures carry the upstream detail as a string so callers can
/// decide policy without inspecting error types: fatal at build time,
/// degraded-but-answered at query time.
#[derive(Debug, Error)]
pub enum KbError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("index corruption: {0}")]
    Corruption(String),
    #[error("nothing to index: every configured source returned zero documents")]
    EmptyCorpus,
    #[error("knowledge base not found at {0}; run `answerdesk build` first")]
    IndexNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corpus serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
}

impl KbError {
    pub fn provider<E: std::fmt::Display>(err: E) -> Self {
        KbError::Provider(err.to_string())
    }

    pub fn corruption<E: std::fmt::Display>(err: E) -> Self {
        KbError::Corruption(err.to_string())
    }
}
