//! Error types for Folio Core

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while reading a book file or cache entry
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid book file: {0}")]
    InvalidJson(String),

    #[error("Invalid book file format: missing `pages` array")]
    MissingPages,

    #[error("Failed to read book file: {0}")]
    ReadFailed(String),
}

/// Errors that occur while producing an export artifact
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Font registration failed: {0}")]
    FontRegistration(String),

    #[error("Document surface error: {0}")]
    Surface(String),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
