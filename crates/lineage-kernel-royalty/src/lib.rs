//! # Lineage Kernel Royalty
//!
//! Royalty-graph invariants a settlement process runs before moving value
//! across a derivation DAG.
//!
//! ## Overview
//!
//! Nodes are artifacts; each parent edge says what percentage of the child's
//! revenue flows to that parent. Everything here is a pure function over
//! plain node data, safe to call from any number of threads.
//!
//! - [`find_cycles`] / [`validate_no_cycles`] - acyclicity
//! - [`find_all_paths`] / [`validate_royalty_dag`] - raw path sums ≤ 100
//! - [`calculate_total_obligation`] - compounded upstream obligation
//! - [`calculate_distribution`] - split one payment across creators
//! - [`validate_royalty_shares`] - per-node bounds
//!
//! Recursive walks are bounded by [`RoyaltyLimits`]. Path enumeration is
//! exponential in the number of diamonds and should not be run on unbounded
//! graphs without a cap.
//!
//! ## Usage
//!
//! ```rust
//! use lineage_kernel_royalty::{calculate_distribution, index_nodes, validate_royalty_dag, RoyaltyNode};
//!
//! let nodes = vec![
//!     RoyaltyNode::new("remix", "0xbob", 70.0).with_parent("song", 30.0),
//!     RoyaltyNode::new("song", "0xalice", 100.0),
//! ];
//! validate_royalty_dag(&nodes).unwrap();
//!
//! let payout = calculate_distribution("remix", &index_nodes(&nodes), 1000.0).unwrap();
//! assert_eq!(payout["0xbob"], 700.0);
//! assert_eq!(payout["0xalice"], 90.0);
//! ```

pub mod cycles;
pub mod error;
pub mod paths;
pub mod payout;
pub mod shares;
pub mod types;

pub use cycles::{find_cycles, validate_no_cycles};
pub use error::{Result, RoyaltyError};
pub use paths::{
    find_all_paths, find_all_paths_with_limits, validate_royalty_dag,
    validate_royalty_dag_with_limits,
};
pub use payout::{
    calculate_distribution, calculate_distribution_with_limits, calculate_total_obligation,
    calculate_total_obligation_with_limits,
};
pub use shares::validate_royalty_shares;
pub use types::{
    index_nodes, Distribution, NodeMap, RoyaltyEdge, RoyaltyLimits, RoyaltyNode, RoyaltyPath,
};
