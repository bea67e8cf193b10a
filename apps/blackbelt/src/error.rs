//! # Application Errors

use crate::client::ClientError;
use blackbelt_core::BlackbeltError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `blackbelt` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BlackbeltError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command-line or interactive input.
    #[error("{0}")]
    Input(String),
}
