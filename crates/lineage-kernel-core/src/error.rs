//! Error types for the Lineage Kernel Core.

use thiserror::Error;

/// Errors raised while canonicalizing or addressing content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The value contains something with no canonical JSON form
    /// (non-finite number, byte string, tag, non-text map key).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("duplicate map key: {0:?}")]
    DuplicateKey(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid cid: {0}")]
    InvalidCid(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
