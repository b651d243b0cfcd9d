//! Cycle detection over parent edges.
//!
//! This is a detector, not an enumerator: each DFS root reports at most one
//! cycle, and nodes reached from an earlier root are not searched again.
//! Stopping at the first back edge leaves the rest of that root's stack marked
//! visited, so a second cycle through one of those nodes (`a→c→a` next to
//! `a→b→a`) goes unreported. An empty result still means the graph is acyclic.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, RoyaltyError};
use crate::types::RoyaltyNode;

/// Find cycles, each as the path from the repeated node back to itself
/// (`[a, b, c, a]`).
pub fn find_cycles(nodes: &[RoyaltyNode]) -> Vec<Vec<String>> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        graph.insert(
            node.id.as_str(),
            node.parents.iter().map(|p| p.to.as_str()).collect(),
        );
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut cycles = Vec::new();

    for node in nodes {
        if visited.contains(node.id.as_str()) {
            continue;
        }
        if let Some(cycle) = first_cycle_from(node.id.as_str(), &graph, &mut visited) {
            cycles.push(cycle);
        }
    }

    cycles
}

/// Iterative DFS from `root`; stops at the first back edge.
fn first_cycle_from<'a>(
    root: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    let mut path: Vec<&'a str> = vec![root];
    let mut on_stack: HashSet<&'a str> = HashSet::from([root]);
    // (node, index of the next neighbor to try)
    let mut frames: Vec<(&'a str, usize)> = vec![(root, 0)];
    visited.insert(root);

    while let Some(&(current, next)) = frames.last() {
        let neighbor = graph.get(current).and_then(|n| n.get(next)).copied();
        match neighbor {
            Some(neighbor) => {
                if let Some(top) = frames.last_mut() {
                    top.1 += 1;
                }
                if on_stack.contains(neighbor) {
                    let start = path.iter().position(|n| *n == neighbor).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(neighbor.to_string());
                    return Some(cycle);
                }
                if visited.insert(neighbor) {
                    on_stack.insert(neighbor);
                    path.push(neighbor);
                    frames.push((neighbor, 0));
                }
            }
            None => {
                on_stack.remove(current);
                path.pop();
                frames.pop();
            }
        }
    }

    None
}

/// Fail if the graph has any cycle.
pub fn validate_no_cycles(nodes: &[RoyaltyNode]) -> Result<()> {
    let cycles = find_cycles(nodes);
    if cycles.is_empty() {
        Ok(())
    } else {
        Err(RoyaltyError::CycleDetected { cycles })
    }
}
