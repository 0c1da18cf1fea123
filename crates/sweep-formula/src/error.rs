//! Error types for sweep-formula

use thiserror::Error;

/// Formula scanning error type
///
/// The lexical scanner never fails; these exist for scanners that actually
/// parse formula text.
#[derive(Error, Debug)]
pub enum FormulaError {
    /// F001: Formula text could not be tokenized or parsed
    #[error("[F001] Failed to scan formula: {message}")]
    ScanFailed { message: String },
}

/// Result type alias for FormulaError
pub type FormulaResult<T> = Result<T, FormulaError>;
