//! Store trait: the abstract interface for record persistence.
//!
//! The registry is storage-agnostic. It needs three things from a backend:
//! point lookups, an atomic insert-if-absent, and an ordered scan.

use async_trait::async_trait;
use lineage_kernel_core::{KbId, StoredRecord};

use crate::error::Result;

/// Result of inserting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// Record was inserted.
    Inserted,
    /// A record with this id already exists (idempotent - not an error).
    /// The stored record is left untouched.
    AlreadyExists,
}

/// Async interface for record persistence.
///
/// # Design Notes
///
/// - **Append-only**: records are never updated. A second insert of the same
///   id returns `AlreadyExists` and keeps the first record.
/// - **Atomic insert**: `insert_if_absent` must check and insert under one
///   critical section, so concurrent inserts of one id yield exactly one
///   `Inserted`.
/// - **Ordered scans**: `ids` and `derived_from` return records in insertion
///   order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a record unless its id is already present.
    async fn insert_if_absent(&self, record: StoredRecord) -> Result<InsertResult>;

    /// Get a record by id.
    async fn get(&self, id: &KbId) -> Result<Option<StoredRecord>>;

    /// Check whether a record exists.
    async fn contains(&self, id: &KbId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scans
    // ─────────────────────────────────────────────────────────────────────────

    /// All ids, in insertion order.
    async fn ids(&self) -> Result<Vec<KbId>>;

    /// Ids of records that list `parent` among their sources, in insertion order.
    async fn derived_from(&self, parent: &KbId) -> Result<Vec<KbId>>;

    /// Number of records.
    async fn len(&self) -> Result<usize>;

    /// Whether the store holds no records.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Maintenance
    // ─────────────────────────────────────────────────────────────────────────

    /// Drop every record. Intended for test isolation.
    async fn clear(&self) -> Result<()>;
}
