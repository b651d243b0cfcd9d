//! Error types for the Registry.

use lineage_kernel_core::KbId;
use lineage_kernel_royalty::RoyaltyError;
use lineage_kernel_store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable machine-readable rejection codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidEnvelope,
    SourcesNotSorted,
    SchemaInvalid,
    CycleDetected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidEnvelope => "INVALID_ENVELOPE",
            ErrorCode::SourcesNotSorted => "SOURCES_NOT_SORTED",
            ErrorCode::SchemaInvalid => "SCHEMA_INVALID",
            ErrorCode::CycleDetected => "CYCLE_DETECTED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during Registry operations.
///
/// The first four variants are input rejections and carry an [`ErrorCode`].
/// None of them is retryable.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("sources not sorted: {0}")]
    SourcesNotSorted(String),

    #[error("schema invalid: {0}")]
    SchemaInvalid(String),

    #[error("cycle detected: {0}")]
    CycleDetected(String),

    /// An ancestry query passed [`crate::RegistryConfig::max_lineage_depth`].
    #[error("lineage of {id} exceeds {limit} records")]
    LineageTooDeep { id: KbId, limit: usize },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Royalty invariant violation while settling.
    #[error("royalty error: {0}")]
    Royalty(#[from] RoyaltyError),
}

impl RegistryError {
    /// The rejection code, if this is an input rejection.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            RegistryError::InvalidEnvelope(_) => Some(ErrorCode::InvalidEnvelope),
            RegistryError::SourcesNotSorted(_) => Some(ErrorCode::SourcesNotSorted),
            RegistryError::SchemaInvalid(_) => Some(ErrorCode::SchemaInvalid),
            RegistryError::CycleDetected(_) => Some(ErrorCode::CycleDetected),
            RegistryError::LineageTooDeep { .. }
            | RegistryError::Store(_)
            | RegistryError::Royalty(_) => None,
        }
    }
}

/// Result type for Registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
