//! Binary Merkle root over an ordered list of leaf strings.
//!
//! Pairs are hashed as `sha256_hex(left || right)` over the concatenated text.
//! An odd tail node is paired with itself. The root commits to the sequence,
//! not the set: callers wanting order independence sort before calling.

use crate::crypto::sha256_hex;

/// Root of an empty leaf list.
pub const EMPTY_ROOT: &str = "0000000000000000000000000000000000000000000000000000000000000000";

fn hash_pair(left: &str, right: &str) -> String {
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    sha256_hex(&joined)
}

fn next_layer(layer: &[String]) -> Vec<String> {
    layer
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            hash_pair(left, pair.get(1).unwrap_or(left))
        })
        .collect()
}

/// Merkle root of `leaves`.
///
/// Empty input yields [`EMPTY_ROOT`]; a single leaf is returned unchanged.
pub fn merkle_root<S: AsRef<str>>(leaves: &[S]) -> String {
    if leaves.is_empty() {
        return EMPTY_ROOT.to_string();
    }
    let mut layer: Vec<String> = leaves.iter().map(|l| l.as_ref().to_string()).collect();
    while layer.len() > 1 {
        layer = next_layer(&layer);
    }
    layer.swap_remove(0)
}

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One level of an inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    pub sibling: String,
    pub side: Side,
}

/// Inclusion proof for one leaf, bottom layer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    pub index: usize,
    pub steps: Vec<ProofStep>,
}

/// Build the inclusion proof for `leaves[index]`.
pub fn merkle_proof<S: AsRef<str>>(leaves: &[S], index: usize) -> Option<MerkleProof> {
    if index >= leaves.len() {
        return None;
    }
    let mut layer: Vec<String> = leaves.iter().map(|l| l.as_ref().to_string()).collect();
    let mut pos = index;
    let mut steps = Vec::new();

    while layer.len() > 1 {
        let step = if pos % 2 == 0 {
            // Odd tail: the node is its own partner.
            let sibling = layer.get(pos + 1).unwrap_or(&layer[pos]).clone();
            ProofStep {
                sibling,
                side: Side::Right,
            }
        } else {
            ProofStep {
                sibling: layer[pos - 1].clone(),
                side: Side::Left,
            }
        };
        steps.push(step);
        layer = next_layer(&layer);
        pos /= 2;
    }

    Some(MerkleProof { index, steps })
}

/// Check that `leaf` folds up to `root` along `proof`.
pub fn verify_merkle_proof(leaf: &str, proof: &MerkleProof, root: &str) -> bool {
    let computed = proof
        .steps
        .iter()
        .fold(leaf.to_string(), |acc, step| match step.side {
            Side::Left => hash_pair(&step.sibling, &acc),
            Side::Right => hash_pair(&acc, &step.sibling),
        });
    computed == root
}
