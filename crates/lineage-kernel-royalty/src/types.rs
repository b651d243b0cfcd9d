//! Royalty graph data.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A child's obligation to one parent: `share` percent of the child's revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoyaltyEdge {
    /// Child artifact id.
    pub from: String,
    /// Parent artifact id.
    pub to: String,
    /// Percentage in `0..=100`.
    pub share: f64,
}

impl RoyaltyEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, share: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            share,
        }
    }
}

/// One artifact and its direct royalty obligations.
///
/// Valid nodes satisfy `base_royalty + Σ parents.share ≤ 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyNode {
    pub id: String,
    pub creator: String,
    /// Percentage the creator keeps.
    pub base_royalty: f64,
    pub parents: Vec<RoyaltyEdge>,
}

impl RoyaltyNode {
    pub fn new(id: impl Into<String>, creator: impl Into<String>, base_royalty: f64) -> Self {
        Self {
            id: id.into(),
            creator: creator.into(),
            base_royalty,
            parents: Vec::new(),
        }
    }

    /// Add a parent edge from this node.
    pub fn with_parent(mut self, parent: impl Into<String>, share: f64) -> Self {
        let edge = RoyaltyEdge::new(self.id.clone(), parent, share);
        self.parents.push(edge);
        self
    }

    pub fn parent_share_total(&self) -> f64 {
        self.parents.iter().map(|p| p.share).sum()
    }
}

/// A leaf-to-root walk and the raw sum of its edge shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyPath {
    pub edges: Vec<RoyaltyEdge>,
    pub total_share: f64,
    /// Node ids visited, starting at the leaf.
    pub nodes: Vec<String>,
}

/// Nodes by id.
pub type NodeMap = HashMap<String, RoyaltyNode>;

/// Payout per creator.
pub type Distribution = BTreeMap<String, f64>;

/// Index nodes by id. A later node with a repeated id replaces the earlier one.
pub fn index_nodes(nodes: &[RoyaltyNode]) -> NodeMap {
    let mut map = NodeMap::with_capacity(nodes.len());
    for node in nodes {
        map.insert(node.id.clone(), node.clone());
    }
    map
}

/// Traversal bounds for the recursive walks.
///
/// Path enumeration is exponential in the number of diamonds, so it is
/// capped on both depth and output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoyaltyLimits {
    /// Maximum edges followed from the starting node.
    pub max_depth: usize,
    /// Maximum paths `find_all_paths` may return.
    pub max_paths: usize,
}

impl Default for RoyaltyLimits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_paths: 100_000,
        }
    }
}
