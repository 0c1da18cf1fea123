//! Error types for sweep-analysis

use thiserror::Error;

/// Analysis error type
///
/// Only unreadable inputs are errors. Malformed parts of otherwise readable
/// documents degrade the result instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// AE001: Core error propagation (archive, decoding, config)
    #[error("[AE001] {0}")]
    Core(#[from] sweep_core::CoreError),

    /// AE002: Field named for explanation is not in the catalog
    #[error("[AE002] Field '{field}' is not declared by any table in the schema")]
    UnknownField { field: String },

    /// AE003: Field reference could not be parsed
    #[error("[AE003] Invalid field reference '{input}': expected Table[Name]")]
    InvalidFieldReference { input: String },
}

/// Result type alias for AnalysisError
pub type AnalysisResult<T> = Result<T, AnalysisError>;
