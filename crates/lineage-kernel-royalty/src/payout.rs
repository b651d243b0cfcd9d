//! Recursive obligation and payment distribution.
//!
//! Both walks share one visited set per call: a node reached a second time
//! (a diamond merge) contributes nothing further. Neither walk rejects cycles;
//! run [`validate_no_cycles`](crate::validate_no_cycles) first.

use std::collections::HashSet;

use crate::error::{Result, RoyaltyError};
use crate::types::{Distribution, NodeMap, RoyaltyLimits};

/// Percentage of `node_id`'s revenue that ultimately flows upstream.
///
/// Per parent edge: `share + share × obligation(parent) / 100`, summed and
/// clamped to 100. Unknown nodes owe nothing.
pub fn calculate_total_obligation(node_id: &str, nodes: &NodeMap) -> Result<f64> {
    calculate_total_obligation_with_limits(node_id, nodes, &RoyaltyLimits::default())
}

pub fn calculate_total_obligation_with_limits(
    node_id: &str,
    nodes: &NodeMap,
    limits: &RoyaltyLimits,
) -> Result<f64> {
    let mut visited = HashSet::new();
    obligation(node_id, nodes, &mut visited, 0, limits)
}

fn obligation<'a>(
    node_id: &'a str,
    nodes: &'a NodeMap,
    visited: &mut HashSet<&'a str>,
    depth: usize,
    limits: &RoyaltyLimits,
) -> Result<f64> {
    if !visited.insert(node_id) {
        return Ok(0.0);
    }
    let Some(node) = nodes.get(node_id) else {
        return Ok(0.0);
    };
    if depth > limits.max_depth {
        return Err(depth_exceeded(limits));
    }

    let mut total = 0.0;
    for parent in &node.parents {
        let parent_obligation = obligation(&parent.to, nodes, visited, depth + 1, limits)?;
        total += parent.share + parent.share * parent_obligation / 100.0;
    }

    Ok(total.min(100.0))
}

/// Split `amount` paid to `asset_id` across creators.
///
/// The node's creator takes `amount × base_royalty / 100`. The remainder goes
/// to parents by share, rescaled proportionally when shares sum past 100, and
/// each parent's portion is split again the same way.
pub fn calculate_distribution(asset_id: &str, nodes: &NodeMap, amount: f64) -> Result<Distribution> {
    calculate_distribution_with_limits(asset_id, nodes, amount, &RoyaltyLimits::default())
}

pub fn calculate_distribution_with_limits(
    asset_id: &str,
    nodes: &NodeMap,
    amount: f64,
    limits: &RoyaltyLimits,
) -> Result<Distribution> {
    let mut walk = DistributionWalk {
        nodes,
        limits,
        visited: HashSet::new(),
        distribution: Distribution::new(),
    };
    walk.traverse(asset_id, amount, 0)?;
    Ok(walk.distribution)
}

struct DistributionWalk<'a> {
    nodes: &'a NodeMap,
    limits: &'a RoyaltyLimits,
    visited: HashSet<&'a str>,
    distribution: Distribution,
}

impl<'a> DistributionWalk<'a> {
    fn traverse(&mut self, current: &'a str, amount: f64, depth: usize) -> Result<()> {
        if !self.visited.insert(current) {
            return Ok(());
        }
        let nodes = self.nodes;
        let Some(node) = nodes.get(current) else {
            return Ok(());
        };
        if depth > self.limits.max_depth {
            return Err(depth_exceeded(self.limits));
        }

        let creator_share = amount * node.base_royalty / 100.0;
        *self.distribution.entry(node.creator.clone()).or_insert(0.0) += creator_share;

        let remaining = amount - creator_share;
        if remaining > 0.0 && !node.parents.is_empty() {
            let total_parent_share = node.parent_share_total();
            for parent in &node.parents {
                let share = if total_parent_share > 100.0 {
                    parent.share / total_parent_share * 100.0
                } else {
                    parent.share
                };
                self.traverse(&parent.to, remaining * share / 100.0, depth + 1)?;
            }
        }
        Ok(())
    }
}

fn depth_exceeded(limits: &RoyaltyLimits) -> RoyaltyError {
    tracing::warn!(limit = limits.max_depth, "royalty traversal depth limit hit");
    RoyaltyError::DepthLimitExceeded {
        limit: limits.max_depth,
    }
}
