//! # AppError
//!
//! Centralized error taxonomy for the forum engine. Validation and
//! authorization failures are detected before any mutation; store failures
//! abort the in-flight mutation. The API layer maps each variant onto a
//! status code and a stable wire code; internal detail never reaches the
//! caller.

use thiserror::Error;

/// The primary error type for all forum operations.
///
/// For [`ValidationError`] and [`AuthenticationError`] the payload doubles
/// as the stable wire code (e.g. `content_required`, `no_token`), matching
/// the codes the mobile client already understands.
///
/// [`ValidationError`]: AppError::ValidationError
/// [`AuthenticationError`]: AppError::AuthenticationError
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource absent, or hidden from this caller (e.g. a banned post).
    #[error("{0} not found with id {1}")]
    NotFound(&'static str, String),

    /// Missing or malformed input.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Missing or unresolvable caller identity.
    #[error("authentication error: {0}")]
    AuthenticationError(String),

    /// Authenticated, but not authorized for the target action.
    #[error("forbidden: {0}")]
    ForbiddenError(String),

    /// Unique-constraint clash. Vote upserts resolve these internally;
    /// a surfaced Conflict indicates a genuine duplicate.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying data-store failure.
    #[error("storage failure: {0}")]
    StoreError(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> AppError {
        AppError::NotFound(entity, id.to_string())
    }

    pub fn validation(code: impl Into<String>) -> AppError {
        AppError::ValidationError(code.into())
    }
}

/// A specialized Result type for forum logic.
pub type Result<T> = std::result::Result<T, AppError>;
