//! Error types for upload ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading and parsing an upload.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Upload file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Payload Errors ===
    /// Payload exceeds the configured size ceiling.
    #[error("upload is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge { size: u64, max_size: u64 },

    /// No non-blank lines remain after decoding.
    #[error("upload contains no non-blank lines")]
    EmptyInput,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
