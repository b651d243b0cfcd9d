//! Leaf-to-root path enumeration and the path-sum invariant.

use std::collections::{HashMap, HashSet};

use crate::cycles::validate_no_cycles;
use crate::error::{Result, RoyaltyError};
use crate::types::{RoyaltyEdge, RoyaltyLimits, RoyaltyNode, RoyaltyPath};

/// Every path from a leaf (a node no one names as a parent) up to a node with
/// no parents or a parent missing from `nodes`.
///
/// Uses [`RoyaltyLimits::default`]; see [`find_all_paths_with_limits`].
pub fn find_all_paths(nodes: &[RoyaltyNode]) -> Result<Vec<RoyaltyPath>> {
    find_all_paths_with_limits(nodes, &RoyaltyLimits::default())
}

pub fn find_all_paths_with_limits(
    nodes: &[RoyaltyNode],
    limits: &RoyaltyLimits,
) -> Result<Vec<RoyaltyPath>> {
    let mut graph: HashMap<&str, &RoyaltyNode> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        graph.insert(node.id.as_str(), node);
    }

    let referenced: HashSet<&str> = nodes
        .iter()
        .flat_map(|n| n.parents.iter().map(|p| p.to.as_str()))
        .collect();

    let mut walk = PathWalk {
        graph: &graph,
        limits,
        edges: Vec::new(),
        visited: Vec::new(),
        paths: Vec::new(),
    };

    for leaf in nodes.iter().filter(|n| !referenced.contains(n.id.as_str())) {
        walk.visited.push(leaf.id.clone());
        walk.descend(&leaf.id)?;
        walk.visited.pop();
    }

    Ok(walk.paths)
}

struct PathWalk<'a> {
    graph: &'a HashMap<&'a str, &'a RoyaltyNode>,
    limits: &'a RoyaltyLimits,
    edges: Vec<RoyaltyEdge>,
    visited: Vec<String>,
    paths: Vec<RoyaltyPath>,
}

impl PathWalk<'_> {
    fn descend(&mut self, current: &str) -> Result<()> {
        let graph = self.graph;
        let parents = match graph.get(current) {
            Some(node) if !node.parents.is_empty() => &node.parents,
            _ => return self.emit(),
        };

        if self.edges.len() >= self.limits.max_depth {
            tracing::warn!(limit = self.limits.max_depth, "royalty path depth limit hit");
            return Err(RoyaltyError::DepthLimitExceeded {
                limit: self.limits.max_depth,
            });
        }

        for parent in parents {
            self.edges.push(parent.clone());
            self.visited.push(parent.to.clone());
            self.descend(&parent.to)?;
            self.visited.pop();
            self.edges.pop();
        }
        Ok(())
    }

    fn emit(&mut self) -> Result<()> {
        if self.edges.is_empty() {
            return Ok(());
        }
        if self.paths.len() >= self.limits.max_paths {
            tracing::warn!(limit = self.limits.max_paths, "royalty path count limit hit");
            return Err(RoyaltyError::PathLimitExceeded {
                limit: self.limits.max_paths,
            });
        }
        self.paths.push(RoyaltyPath {
            edges: self.edges.clone(),
            total_share: self.edges.iter().map(|e| e.share).sum(),
            nodes: self.visited.clone(),
        });
        Ok(())
    }
}

/// Acyclic, and no path's raw share sum exceeds 100.
pub fn validate_royalty_dag(nodes: &[RoyaltyNode]) -> Result<()> {
    validate_royalty_dag_with_limits(nodes, &RoyaltyLimits::default())
}

pub fn validate_royalty_dag_with_limits(
    nodes: &[RoyaltyNode],
    limits: &RoyaltyLimits,
) -> Result<()> {
    validate_no_cycles(nodes)?;
    for path in find_all_paths_with_limits(nodes, limits)? {
        if path.total_share > 100.0 {
            return Err(RoyaltyError::PathShareExceeded { path });
        }
    }
    Ok(())
}
