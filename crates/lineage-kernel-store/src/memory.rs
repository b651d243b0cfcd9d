//! In-memory implementation of the RecordStore trait.
//!
//! Records live for the lifetime of the store. Thread-safe via an async
//! RwLock; inserts hold the write guard for the whole check-and-insert.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lineage_kernel_core::{KbId, StoredRecord};

use crate::error::Result;
use crate::traits::{InsertResult, RecordStore};

/// In-memory store implementation.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Records indexed by id.
    records: HashMap<KbId, StoredRecord>,

    /// Insertion order.
    order: Vec<KbId>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_if_absent(&self, record: StoredRecord) -> Result<InsertResult> {
        let mut inner = self.inner.write().await;

        if inner.records.contains_key(&record.id) {
            return Ok(InsertResult::AlreadyExists);
        }

        let id = record.id;
        inner.records.insert(id, record);
        inner.order.push(id);
        tracing::trace!(%id, "record inserted");
        Ok(InsertResult::Inserted)
    }

    async fn get(&self, id: &KbId) -> Result<Option<StoredRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(id).cloned())
    }

    async fn contains(&self, id: &KbId) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner.records.contains_key(id))
    }

    async fn ids(&self) -> Result<Vec<KbId>> {
        let inner = self.inner.read().await;
        Ok(inner.order.clone())
    }

    async fn derived_from(&self, parent: &KbId) -> Result<Vec<KbId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter(|id| {
                inner
                    .records
                    .get(id)
                    .is_some_and(|r| r.sources.contains(parent))
            })
            .copied()
            .collect())
    }

    async fn len(&self) -> Result<usize> {
        let inner = self.inner.read().await;
        Ok(inner.records.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.records.clear();
        inner.order.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_kernel_core::{Curator, KbType};
    use std::sync::Arc;

    fn record(byte: u8, sources: Vec<KbId>) -> StoredRecord {
        StoredRecord {
            id: KbId::from_bytes([byte; 32]),
            curator: Curator::from("0xcurator"),
            kind: KbType::Practice,
            sources,
            registered_at: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let r = record(1, vec![]);

        assert_eq!(store.insert_if_absent(r.clone()).await.unwrap(), InsertResult::Inserted);
        assert_eq!(store.get(&r.id).await.unwrap(), Some(r.clone()));
        assert!(store.contains(&r.id).await.unwrap());
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_is_idempotent_and_keeps_first() {
        let store = MemoryStore::new();
        let first = record(1, vec![]);
        let mut second = first.clone();
        second.curator = Curator::from("0xother");

        store.insert_if_absent(first.clone()).await.unwrap();
        assert_eq!(
            store.insert_if_absent(second).await.unwrap(),
            InsertResult::AlreadyExists
        );
        assert_eq!(store.get(&first.id).await.unwrap().unwrap().curator, first.curator);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let store = MemoryStore::new();
        let id = KbId::from_bytes([9; 32]);
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.contains(&id).await.unwrap());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_derived_from_in_insertion_order() {
        let store = MemoryStore::new();
        let parent = record(1, vec![]);
        let child_b = record(3, vec![parent.id]);
        let child_a = record(2, vec![parent.id]);
        let unrelated = record(4, vec![]);

        for r in [parent.clone(), child_b.clone(), unrelated, child_a.clone()] {
            store.insert_if_absent(r).await.unwrap();
        }

        assert_eq!(
            store.derived_from(&parent.id).await.unwrap(),
            vec![child_b.id, child_a.id]
        );
        assert_eq!(store.ids().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.insert_if_absent(record(1, vec![])).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty().await.unwrap());
        assert!(store.ids().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_single_winner() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert_if_absent(record(7, vec![])).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for h in handles {
            if h.await.unwrap() == InsertResult::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
