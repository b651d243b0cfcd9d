//! Error types for royalty-graph validation.

use thiserror::Error;

use crate::types::RoyaltyPath;

/// Errors raised by the royalty invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoyaltyError {
    #[error("cycle detected in royalty DAG: {}", render_cycles(.cycles))]
    CycleDetected { cycles: Vec<Vec<String>> },

    #[error("royalty path exceeds 100%: {} = {}%", render_shares(.path), .path.total_share)]
    PathShareExceeded { path: RoyaltyPath },

    #[error("invalid base royalty for {node}: {value}")]
    InvalidBaseRoyalty { node: String, value: f64 },

    #[error("invalid parent share for {node} → {parent}: {value}")]
    InvalidParentShare {
        node: String,
        parent: String,
        value: f64,
    },

    #[error("parent shares for {node} exceed 100%: {total}%")]
    ParentSharesExceeded { node: String, total: f64 },

    #[error("base royalty ({base}%) + parent shares ({parents}%) for {node} exceed 100%")]
    TotalShareExceeded {
        node: String,
        base: f64,
        parents: f64,
    },

    #[error("traversal deeper than {limit} edges")]
    DepthLimitExceeded { limit: usize },

    #[error("more than {limit} royalty paths")]
    PathLimitExceeded { limit: usize },
}

impl RoyaltyError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            RoyaltyError::CycleDetected { .. } => "CYCLE_DETECTED",
            RoyaltyError::PathShareExceeded { .. } => "PATH_SHARE_EXCEEDED",
            RoyaltyError::InvalidBaseRoyalty { .. } => "INVALID_BASE_ROYALTY",
            RoyaltyError::InvalidParentShare { .. } => "INVALID_PARENT_SHARE",
            RoyaltyError::ParentSharesExceeded { .. } => "PARENT_SHARES_EXCEEDED",
            RoyaltyError::TotalShareExceeded { .. } => "TOTAL_SHARE_EXCEEDED",
            RoyaltyError::DepthLimitExceeded { .. } => "DEPTH_LIMIT_EXCEEDED",
            RoyaltyError::PathLimitExceeded { .. } => "PATH_LIMIT_EXCEEDED",
        }
    }
}

fn render_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|c| c.join(" → "))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_shares(path: &RoyaltyPath) -> String {
    path.edges
        .iter()
        .map(|e| format!("{}%", e.share))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Result type for royalty operations.
pub type Result<T> = std::result::Result<T, RoyaltyError>;
