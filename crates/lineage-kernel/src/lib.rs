//! # Lineage Kernel
//!
//! The unified API for the Lineage Kernel: permanent, content-derived
//! identity for knowledge blocks, and the invariants that make a citation
//! graph safe to settle payments over.
//!
//! ## Overview
//!
//! - **Envelopes**: the fixed-shape record whose canonical JSON is hashed
//! - **Identity**: `0x` + SHA-256 of that JSON, plus the matching CIDv1
//! - **Registry**: append-only, idempotent commit with lineage checks
//! - **Royalties**: pure graph checks and payout over the derivation DAG
//!
//! ## Key Concepts
//!
//! - **Idempotent registration**: identical content always yields the same
//!   id. Curator and time are recorded but never hashed.
//! - **Sorted sources**: callers pre-sort; unsorted input is rejected.
//! - **Ancestors first**: every source must be registered before the
//!   envelope that cites it, so the registry stays acyclic.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lineage_kernel::{Registry, RegistryConfig};
//! use lineage_kernel::core::{payload::PracticePayload, CanonicalEnvelope, Curator, Payload};
//! use lineage_kernel::store::MemoryStore;
//!
//! async fn example() -> lineage_kernel::Result<()> {
//!     let registry = Registry::new(MemoryStore::new(), RegistryConfig::default());
//!
//!     let envelope = CanonicalEnvelope::root(
//!         "demo",
//!         Payload::Practice(PracticePayload {
//!             rationale: "r".into(),
//!             contexts: vec![],
//!             failure_modes: vec![],
//!         }),
//!     );
//!
//!     let out = registry.register(&envelope, &Curator::new("0xalice")).await?;
//!     assert!(out.is_new);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `lineage_kernel::core` - Envelopes, canonicalization, addressing, Merkle
//! - `lineage_kernel::store` - Storage abstraction and the in-memory store
//! - `lineage_kernel::royalty` - Royalty-graph invariants

pub mod error;
pub mod registry;
pub mod settlement;
pub mod validation;

// Re-export component crates
pub use lineage_kernel_core as core;
pub use lineage_kernel_royalty as royalty;
pub use lineage_kernel_store as store;

pub use error::{ErrorCode, RegistryError, Result};
pub use registry::{Registration, Registry, RegistryConfig};
pub use validation::{decode_document, validate_envelope};

// Commonly used core types
pub use lineage_kernel_core::{
    CanonicalEnvelope, Curator, EnvelopeBuilder, KbId, KbType, Payload, RecordView,
};
