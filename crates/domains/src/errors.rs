//! # DomainError
//!
//! Centralized error type for the content store and ingestion pipeline.
//! Port traits return `anyhow::Result`; these variants are what callers of
//! the services layer actually see.

use thiserror::Error;

/// The primary error type surfaced to callers.
#[derive(Error, Debug)]
pub enum DomainError {
    /// No backend client could be built (missing URL or key)
    #[error("backend is not configured")]
    NotConfigured,

    /// Sign-in rejected, or a write attempted without a session
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Validation failure (e.g., empty city, crop outside the image)
    #[error("validation error: {0}")]
    Validation(String),

    /// Decode/encode failure in the image pipeline
    #[error("media processing failed: {0}")]
    Media(String),

    /// A remote call failed (network, HTTP status, storage)
    #[error("remote call failed: {0:#}")]
    Remote(anyhow::Error),
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        DomainError::Remote(err)
    }
}

/// A specialized Result type for domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
