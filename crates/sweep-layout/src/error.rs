//! Error types for sweep-layout

use thiserror::Error;

/// Errors raised while scanning one layout payload.
///
/// These never abort a scan: the affected scope is skipped and counted.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// L001: Embedded payload string is not valid JSON
    #[error("[L001] {scope} payload is not valid JSON: {source}")]
    PayloadDecode {
        scope: String,
        #[source]
        source: serde_json::Error,
    },

    /// L002: Payload decoded but is not shaped as expected
    #[error("[L002] {scope} payload has an unexpected shape: {message}")]
    UnexpectedShape { scope: String, message: String },
}

/// Result type alias for LayoutError
pub type LayoutResult<T> = Result<T, LayoutError>;
