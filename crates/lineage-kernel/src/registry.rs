//! The Registry: append-only, idempotent commit of canonical envelopes.
//!
//! Validation runs in a fixed order and the first failing rule decides the
//! error code. Steps 1 to 5 are stateless (see [`crate::validation`]); steps
//! 6 to 9 consult the store and end in one atomic insert-if-absent.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use lineage_kernel_core::{
    address, equal_split, normalize_id, AttributionShare, CanonicalEnvelope, ContentAddress,
    Curator, KbId, RecordView, StoredRecord,
};
use lineage_kernel_royalty::RoyaltyLimits;
use lineage_kernel_store::{InsertResult, RecordStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};
use crate::validation::{decode_document, validate_envelope};

/// Configuration for the Registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Most sources one envelope may declare.
    pub max_sources: usize,
    /// Most ancestors [`Registry::lineage`] may return.
    pub max_lineage_depth: usize,
    /// Bounds for settlement walks.
    pub royalty: RoyaltyLimits,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_sources: 1024,
            max_lineage_depth: 4096,
            royalty: RoyaltyLimits::default(),
        }
    }
}

/// Outcome of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: KbId,
    pub cid_v1: String,
    /// `false` when the identifier was already registered.
    pub is_new: bool,
}

/// The main Registry struct.
///
/// Holds an injected store; two registries over two stores share nothing.
pub struct Registry<S: RecordStore> {
    store: Arc<S>,
    config: RegistryConfig,
}

impl<S: RecordStore> Registry<S> {
    /// Create a registry over `store`.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Create a registry over a store shared with other owners.
    pub fn with_shared_store(store: Arc<S>, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a typed envelope on behalf of `curator`.
    ///
    /// Identical content always yields the identical id, whoever submits it
    /// and whenever. A known id returns `is_new == false` without re-running
    /// the graph checks.
    pub async fn register(
        &self,
        envelope: &CanonicalEnvelope,
        curator: &Curator,
    ) -> Result<Registration> {
        let outcome = match validate_envelope(envelope, &self.config) {
            Ok(()) => self.commit(envelope, curator).await,
            Err(e) => Err(e),
        };
        log_rejection(&outcome);
        outcome
    }

    /// Register an untyped envelope document.
    ///
    /// Accepts the legacy `parents` member in place of `sources`.
    pub async fn register_document(
        &self,
        document: &Value,
        curator: &Curator,
    ) -> Result<Registration> {
        let outcome = match decode_document(document, &self.config) {
            Ok(envelope) => self.commit(&envelope, curator).await,
            Err(e) => Err(e),
        };
        log_rejection(&outcome);
        outcome
    }

    /// Steps 6 to 9 on an envelope that passed 1 to 5.
    async fn commit(&self, envelope: &CanonicalEnvelope, curator: &Curator) -> Result<Registration> {
        // 6. Identity
        let ContentAddress { id, cid, .. } =
            address(envelope).map_err(|e| RegistryError::InvalidEnvelope(e.to_string()))?;
        if self.store.contains(&id).await? {
            debug!(id = %id, "already registered");
            return Ok(Registration {
                id,
                cid_v1: cid,
                is_new: false,
            });
        }

        // 7. Every source must already be registered
        let mut sources = Vec::with_capacity(envelope.sources.len());
        for source in &envelope.sources {
            let normalized = normalize_id(source);
            let parent = KbId::parse(&normalized)
                .map_err(|_| unregistered_source(&normalized))?;
            if !self.store.contains(&parent).await? {
                return Err(unregistered_source(&normalized));
            }
            sources.push(parent);
        }
        sources.sort();

        // 8. No two parents may be each other's ancestors
        self.check_parent_overlap(&sources).await?;

        // 9. Commit
        let record = StoredRecord {
            id,
            curator: curator.clone(),
            kind: envelope.kind,
            sources,
            registered_at: now_secs(),
        };
        let source_count = record.sources.len();
        match self.store.insert_if_absent(record).await? {
            InsertResult::Inserted => {
                info!(id = %id, curator = %curator, sources = source_count, "registered");
                Ok(Registration {
                    id,
                    cid_v1: cid,
                    is_new: true,
                })
            }
            InsertResult::AlreadyExists => {
                warn!(id = %id, "concurrent registration won the insert");
                Ok(Registration {
                    id,
                    cid_v1: cid,
                    is_new: false,
                })
            }
        }
    }

    async fn check_parent_overlap(&self, parents: &[KbId]) -> Result<()> {
        if parents.len() < 2 {
            return Ok(());
        }
        for (i, pi) in parents.iter().enumerate() {
            let ancestors_i = self.ancestors(pi).await?;
            for pj in &parents[i + 1..] {
                if ancestors_i.contains(pj) && self.ancestors(pj).await?.contains(pi) {
                    return Err(RegistryError::CycleDetected(format!(
                        "sources {pi} and {pj} are ancestors of each other"
                    )));
                }
            }
        }
        Ok(())
    }

    /// `id` and all its transitive parents.
    ///
    /// Unbounded: records are only ever inserted after their sources, so the
    /// stored graph is acyclic and the walk terminates.
    async fn ancestors(&self, id: &KbId) -> Result<HashSet<KbId>> {
        let mut seen = HashSet::new();
        let mut stack = vec![*id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(record) = self.store.get(&current).await? {
                stack.extend(record.sources.iter().filter(|p| !seen.contains(*p)));
            }
        }
        Ok(seen)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn is_registered(&self, id: &KbId) -> Result<bool> {
        Ok(self.store.contains(id).await?)
    }

    /// Curator of `id`, or the zero address when unknown.
    pub async fn curator(&self, id: &KbId) -> Result<Curator> {
        Ok(self
            .store
            .get(id)
            .await?
            .map(|r| r.curator)
            .unwrap_or_else(Curator::zero))
    }

    /// The full record, or a placeholder with `exists == false`.
    pub async fn record(&self, id: &KbId) -> Result<RecordView> {
        Ok(self
            .store
            .get(id)
            .await?
            .map(RecordView::from)
            .unwrap_or_else(|| RecordView::placeholder(*id)))
    }

    /// Equal-split attribution across the sources of `id`.
    pub async fn attribution_dag(&self, id: &KbId) -> Result<Vec<AttributionShare>> {
        Ok(self
            .store
            .get(id)
            .await?
            .map(|r| equal_split(&r.sources))
            .unwrap_or_default())
    }

    /// Records that cite `parent` directly, in registration order.
    pub async fn derived_records(&self, parent: &KbId) -> Result<Vec<KbId>> {
        Ok(self.store.derived_from(parent).await?)
    }

    /// Transitive ancestors of `id`, nearest first. Excludes `id` itself.
    pub async fn lineage(&self, id: &KbId) -> Result<Vec<KbId>> {
        let mut seen = HashSet::from([*id]);
        let mut queue = VecDeque::from([*id]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            let Some(record) = self.store.get(&current).await? else {
                continue;
            };
            for parent in record.sources {
                if seen.insert(parent) {
                    if out.len() >= self.config.max_lineage_depth {
                        return Err(RegistryError::LineageTooDeep {
                            id: *id,
                            limit: self.config.max_lineage_depth,
                        });
                    }
                    out.push(parent);
                    queue.push_back(parent);
                }
            }
        }
        Ok(out)
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.store.len().await?)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty().await?)
    }

    /// Drop every record. Test isolation only.
    pub async fn reset(&self) -> Result<()> {
        self.store.clear().await?;
        debug!("registry reset");
        Ok(())
    }
}

fn unregistered_source(source: &str) -> RegistryError {
    RegistryError::CycleDetected(format!(
        "source {source} not registered; register sources before descendants"
    ))
}

fn log_rejection(outcome: &Result<Registration>) {
    if let Err(e) = outcome {
        match e.code() {
            Some(code) => debug!(code = %code, error = %e, "registration rejected"),
            None => warn!(error = %e, "registration failed"),
        }
    }
}

/// Get current time in unix seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
