//! Error types for sweep-core

use thiserror::Error;

/// Core error type for Fieldsweep
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Archive path does not exist
    #[error("[E003] Archive not found: {path}")]
    ArchiveNotFound { path: String },

    /// E004: Archive exists but could not be opened as a zip container
    #[error("[E004] Failed to open archive '{path}': {message}")]
    ArchiveOpen { path: String, message: String },

    /// E005: Required document missing from the archive
    #[error("[E005] Archive '{archive}' does not contain required document '{document}'")]
    DocumentMissing { archive: String, document: String },

    /// E006: Document failed every supported text encoding
    #[error("[E006] Unable to decode '{document}' as JSON in any supported encoding (UTF-16LE, UTF-16BE, UTF-8)")]
    DocumentUndecodable { document: String },

    /// E007: Document exceeds the size limit
    #[error("[E007] Document '{document}' is too large: {size} bytes (limit: {limit} bytes)")]
    DocumentTooLarge {
        document: String,
        size: u64,
        limit: u64,
    },

    /// E008: IO error
    #[error("[E008] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E009: IO error with file path context
    #[error("[E009] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E010: Config YAML parse error
    #[error("[E010] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
