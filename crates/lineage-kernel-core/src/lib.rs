//! # Lineage Kernel Core
//!
//! Pure primitives for the Lineage Kernel: canonical envelopes, content
//! addressing, and Merkle aggregation.
//!
//! This crate contains no I/O and no storage. Everything here is a function of
//! its inputs.
//!
//! ## Key Types
//!
//! - [`CanonicalEnvelope`] - The unit of identity
//! - [`KbId`] - Content-addressed identifier (SHA-256 of the canonical envelope)
//! - [`Payload`] - Typed payload, one variant per [`KbType`]
//! - [`StoredRecord`] - What the registry commits for each identifier
//!
//! ## Canonicalization
//!
//! Envelopes are rendered as sorted-key, whitespace-free JSON before hashing.
//! See the [`canonical`] module.

pub mod address;
pub mod builder;
pub mod canonical;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod merkle;
pub mod payload;
pub mod record;
pub mod types;

pub use address::{
    address, canonical_envelope_string, cid_v1, cid_v1_document, cid_v1_from_canonical,
    content_hash, content_hash_document, content_hash_from_canonical, normalize,
    normalize_document, sort_sources, ContentAddress,
};
pub use builder::{build_derived_envelope, DerivedEnvelopeInput, EnvelopeBuilder};
pub use canonical::{canonicalize, canonicalize_json, to_canonical_string};
pub use crypto::{cid_v1_from_bytes, verify_cid, Sha256Hash};
pub use envelope::{CanonicalEnvelope, Derivation, DerivationInput, DerivationType};
pub use error::{CoreError, Result};
pub use merkle::{merkle_proof, merkle_root, verify_merkle_proof, MerkleProof, EMPTY_ROOT};
pub use payload::{KbType, Payload};
pub use record::{equal_split, AttributionShare, RecordView, StoredRecord, BASIS_POINTS};
pub use types::{normalize_id, Curator, KbId};
