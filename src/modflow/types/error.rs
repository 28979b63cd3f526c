//! Custom error types for the modflow-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum ModflowError {
    /// An error originating from opening or mapping the input file.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A record header or payload extends past the end of the file.
    #[error("Truncated {kind} record at offset {offset}: needs {needed} bytes, only {available} left")]
    Truncated {
        kind: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// A structured record declares a grid shape or layer that differs from the caller's.
    #[error("Dimension mismatch for {context}: expected {expected}, but the file declares {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: i64,
        found: i64,
    },

    /// A header field makes the record impossible to size.
    #[error("Invalid {kind} record at offset {offset}: {reason}")]
    InvalidRecord {
        kind: &'static str,
        offset: u64,
        reason: String,
    },
}

/// A convenience `Result` type alias using the crate's `ModflowError` type.
pub type Result<T> = std::result::Result<T, ModflowError>;
