//! Stored records and the read models built from them.

use serde::{Deserialize, Serialize};

use crate::payload::KbType;
use crate::types::{Curator, KbId};

/// Basis points in 100%.
pub const BASIS_POINTS: u32 = 10_000;

/// A committed registration. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: KbId,
    pub curator: Curator,
    #[serde(rename = "type")]
    pub kind: KbType,
    /// Normalized, sorted parent identifiers.
    pub sources: Vec<KbId>,
    /// Unix seconds. Not part of the identity.
    pub registered_at: i64,
}

/// Result of a record lookup; `exists == false` marks the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub id: KbId,
    pub exists: bool,
    pub curator: Curator,
    #[serde(rename = "type")]
    pub kind: KbType,
    pub sources: Vec<KbId>,
    pub registered_at: i64,
}

impl RecordView {
    /// What lookups return for an unknown identifier.
    pub fn placeholder(id: KbId) -> Self {
        Self {
            id,
            exists: false,
            curator: Curator::zero(),
            kind: KbType::Practice,
            sources: Vec::new(),
            registered_at: 0,
        }
    }
}

impl From<StoredRecord> for RecordView {
    fn from(record: StoredRecord) -> Self {
        Self {
            id: record.id,
            exists: true,
            curator: record.curator,
            kind: record.kind,
            sources: record.sources,
            registered_at: record.registered_at,
        }
    }
}

/// A parent's share of attribution, in basis points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionShare {
    pub parent_id: KbId,
    pub share_basis_points: u32,
}

/// Equal split over `sources`, `floor(10000 / n)` each.
pub fn equal_split(sources: &[KbId]) -> Vec<AttributionShare> {
    if sources.is_empty() {
        return Vec::new();
    }
    let share = BASIS_POINTS / sources.len() as u32;
    sources
        .iter()
        .map(|parent_id| AttributionShare {
            parent_id: *parent_id,
            share_basis_points: share,
        })
        .collect()
}
