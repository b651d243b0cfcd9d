//! Settlement bridge: registry lineage as a royalty graph.
//!
//! Every artifact keeps `base_royalty` percent for its curator and splits the
//! rest equally across its sources, following the attribution DAG.

use lineage_kernel_core::{equal_split, KbId, BASIS_POINTS};
use lineage_kernel_royalty::{
    calculate_distribution_with_limits, index_nodes, validate_no_cycles,
    validate_royalty_shares, Distribution, RoyaltyNode,
};
use lineage_kernel_store::RecordStore;
use tracing::debug;

use crate::error::Result;
use crate::registry::Registry;

impl<S: RecordStore> Registry<S> {
    /// Royalty nodes for `id` and every registered ancestor, `id` first.
    ///
    /// Each parent edge carries `(100 - base_royalty) × bps / 10000` where
    /// `bps` is the equal-split attribution. Empty when `id` is unknown.
    pub async fn royalty_nodes(&self, id: &KbId, base_royalty: f64) -> Result<Vec<RoyaltyNode>> {
        if !self.is_registered(id).await? {
            return Ok(Vec::new());
        }
        let mut ids = vec![*id];
        ids.extend(self.lineage(id).await?);

        let upstream = 100.0 - base_royalty;
        let mut nodes = Vec::with_capacity(ids.len());
        for current in ids {
            let Some(record) = self.store().get(&current).await? else {
                continue;
            };
            let mut node = RoyaltyNode::new(
                current.to_string(),
                record.curator.to_string(),
                base_royalty,
            );
            for share in equal_split(&record.sources) {
                let percent =
                    upstream * f64::from(share.share_basis_points) / f64::from(BASIS_POINTS);
                node = node.with_parent(share.parent_id.to_string(), percent);
            }
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Split `amount` paid to `id` across the curators of its lineage.
    ///
    /// Shares and acyclicity are validated before anything is computed.
    pub async fn distribution(
        &self,
        id: &KbId,
        base_royalty: f64,
        amount: f64,
    ) -> Result<Distribution> {
        let nodes = self.royalty_nodes(id, base_royalty).await?;
        validate_royalty_shares(&nodes)?;
        validate_no_cycles(&nodes)?;
        debug!(id = %id, nodes = nodes.len(), amount, "settling");
        Ok(calculate_distribution_with_limits(
            &id.to_string(),
            &index_nodes(&nodes),
            amount,
            &self.config().royalty,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::RegistryError;
    use crate::registry::{Registry, RegistryConfig};
    use lineage_kernel_core::payload::PracticePayload;
    use lineage_kernel_core::{CanonicalEnvelope, Curator, EnvelopeBuilder, KbId, Payload};
    use lineage_kernel_royalty::RoyaltyError;
    use lineage_kernel_store::MemoryStore;

    fn practice(rationale: &str) -> Payload {
        Payload::Practice(PracticePayload {
            rationale: rationale.into(),
            contexts: vec![],
            failure_modes: vec![],
        })
    }

    async fn chain() -> (Registry<MemoryStore>, KbId, KbId) {
        let reg = Registry::new(MemoryStore::new(), RegistryConfig::default());
        let root = reg
            .register(
                &CanonicalEnvelope::root("demo", practice("song")),
                &Curator::new("0xalice"),
            )
            .await
            .unwrap()
            .id;
        let remix = EnvelopeBuilder::new("demo", practice("remix"))
            .source(root.to_string())
            .build();
        let remix = reg
            .register(&remix, &Curator::new("0xbob"))
            .await
            .unwrap()
            .id;
        (reg, root, remix)
    }

    #[tokio::test]
    async fn test_royalty_nodes_follow_lineage() {
        let (reg, root, remix) = chain().await;
        let nodes = reg.royalty_nodes(&remix, 70.0).await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, remix.to_string());
        assert_eq!(nodes[0].creator, "0xbob");
        assert_eq!(nodes[0].parents.len(), 1);
        assert_eq!(nodes[0].parents[0].to, root.to_string());
        assert_eq!(nodes[0].parents[0].share, 30.0);
        assert!(nodes[1].parents.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_has_no_nodes() {
        let (reg, _, _) = chain().await;
        let nodes = reg
            .royalty_nodes(&KbId::from_bytes([3; 32]), 50.0)
            .await
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_distribution() {
        let (reg, _, remix) = chain().await;
        let payout = reg.distribution(&remix, 70.0, 1000.0).await.unwrap();
        assert_eq!(payout["0xbob"], 700.0);
        // Root keeps its own base royalty of the 300 it receives.
        assert_eq!(payout["0xalice"], 210.0);
    }

    #[tokio::test]
    async fn test_distribution_rejects_bad_base() {
        let (reg, _, remix) = chain().await;
        let err = reg.distribution(&remix, 120.0, 1000.0).await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Royalty(RoyaltyError::InvalidBaseRoyalty { .. })
        ));
        assert_eq!(err.code(), None);
    }
}
