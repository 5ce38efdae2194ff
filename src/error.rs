//! Crate-level error type.

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::loader::LoadError;
use crate::routing::path::PathError;
use crate::security::PermissionError;

/// Thin wrapper over the subsystem errors, for callers that don't care which one.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
