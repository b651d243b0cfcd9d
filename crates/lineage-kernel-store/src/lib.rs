//! # Lineage Kernel Store
//!
//! Storage abstraction for registry records.
//!
//! ## Overview
//!
//! The [`RecordStore`] trait defines the interface the registry commits
//! through. The only operation that mutates is [`RecordStore::insert_if_absent`],
//! which is atomic per identifier.
//!
//! [`MemoryStore`] is the in-process implementation. Construct one per
//! registry; nothing is global.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{InsertResult, RecordStore};
