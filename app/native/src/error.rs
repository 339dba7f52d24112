//! Error types for Trellis.
//!
//! Library layers keep their own error enums ([`TilingError`], [`ConfigError`],
//! [`ActorError`]). CLI commands return [`TrellisError`], which flattens them
//! into a serializable `kind`/`message` pair.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::tiling::{ActorError, TilingError};

/// Errors surfaced by the CLI.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum TrellisError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Scenario file could not be read or understood.
    #[error("Scenario error: {0}")]
    ScenarioError(String),
    /// Tiling core error.
    #[error("Tiling error: {0}")]
    TilingError(String),
    /// The tiling actor could not be reached.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for TrellisError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for TrellisError {
    fn from(err: serde_json::Error) -> Self { Self::ScenarioError(err.to_string()) }
}

impl From<ConfigError> for TrellisError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<TilingError> for TrellisError {
    fn from(err: TilingError) -> Self { Self::TilingError(err.to_string()) }
}

impl From<ActorError> for TrellisError {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::Command(err) => err.into(),
            other => Self::RuntimeError(other.to_string()),
        }
    }
}
