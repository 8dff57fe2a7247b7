//! Error types shared across Growbox crates.

use thiserror::Error;

/// Schema-level errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for schema checks.
pub type SchemaResult<T> = Result<T, SchemaError>;
