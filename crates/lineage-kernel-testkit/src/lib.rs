//! # Lineage Kernel Testkit
//!
//! Testing utilities for the Lineage Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: fixed envelopes with their canonical string, id and CID
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: a registry over a fresh store, and sample payloads
//!
//! ## Golden Vectors
//!
//! ```rust
//! use lineage_kernel_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, id) in verify_all_vectors() {
//!     assert!(matches, "{name}: {id}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use lineage_kernel_core::content_hash;
//! use lineage_kernel_testkit::generators::envelope;
//!
//! proptest! {
//!     #[test]
//!     fn id_is_deterministic(env in envelope()) {
//!         prop_assert_eq!(content_hash(&env).unwrap(), content_hash(&env).unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use lineage_kernel_testkit::fixtures::TestFixture;
//!
//! async fn example() -> lineage_kernel::Result<()> {
//!     let fixture = TestFixture::new();
//!     let root = fixture.register_root("r").await?;
//!     let child = fixture.register_child("c", &[root]).await?;
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_curators, sample_payload, TestFixture};
pub use generators::{envelope, json_value, royalty_dag, shuffle_keys};
pub use vectors::{all_vectors, merkle_vectors, verify_all_vectors, GoldenVector, MerkleVector};
