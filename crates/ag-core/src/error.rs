//! # AppError
//!
//! Centralized error handling for the Agora workspace.
//! Every engine command reports its outcome through this type.

use thiserror::Error;

/// The primary error type for all ag-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Referenced entity does not exist (e.g., Member, Community, Thread, Reply)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Malformed input rejected at a transport boundary
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Resource already exists (e.g., duplicate community name)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The engine task has shut down and no longer accepts commands
    #[error("community engine is not running")]
    EngineStopped,

    /// Unexpected failure inside a component
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        AppError::NotFound(kind, id.to_string())
    }
}

/// A specialized Result type for Agora logic.
pub type Result<T> = std::result::Result<T, AppError>;
