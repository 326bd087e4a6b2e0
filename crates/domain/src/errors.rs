//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Service Layer operations
///
/// Lookups signal absence through `Ok(None)` rather than through this enum;
/// `NotFound` is reserved for operations that require the entity to exist
/// (for example a partial update of a missing item).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ServiceLayerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Batch sub-request error: {0}")]
    Batch(String),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Service Layer operations
pub type Result<T> = std::result::Result<T, ServiceLayerError>;
