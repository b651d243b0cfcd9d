//! Per-node share bounds.

use crate::error::{Result, RoyaltyError};
use crate::types::RoyaltyNode;

fn is_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Check every node: base and each share within `0..=100`, shares summing to
/// at most 100, and base plus shares at most 100. Reports the first violation.
pub fn validate_royalty_shares(nodes: &[RoyaltyNode]) -> Result<()> {
    for node in nodes {
        if !is_percentage(node.base_royalty) {
            return Err(RoyaltyError::InvalidBaseRoyalty {
                node: node.id.clone(),
                value: node.base_royalty,
            });
        }

        let mut total = 0.0;
        for parent in &node.parents {
            if !is_percentage(parent.share) {
                return Err(RoyaltyError::InvalidParentShare {
                    node: node.id.clone(),
                    parent: parent.to.clone(),
                    value: parent.share,
                });
            }
            total += parent.share;
        }

        if total > 100.0 {
            return Err(RoyaltyError::ParentSharesExceeded {
                node: node.id.clone(),
                total,
            });
        }

        if node.base_royalty + total > 100.0 {
            return Err(RoyaltyError::TotalShareExceeded {
                node: node.id.clone(),
                base: node.base_royalty,
                parents: total,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base_plus_share_over_100() {
        let nodes = vec![RoyaltyNode::new("n", "c", 70.0).with_parent("p", 40.0)];
        let err = validate_royalty_shares(&nodes).unwrap_err();
        assert_eq!(
            err,
            RoyaltyError::TotalShareExceeded {
                node: "n".into(),
                base: 70.0,
                parents: 40.0
            }
        );
        assert_eq!(
            err.to_string(),
            "base royalty (70%) + parent shares (40%) for n exceed 100%"
        );
    }

    #[test]
    fn test_exactly_100_allowed() {
        let nodes = vec![RoyaltyNode::new("n", "c", 60.0)
            .with_parent("p", 25.0)
            .with_parent("q", 15.0)];
        assert!(validate_royalty_shares(&nodes).is_ok());
    }

    #[test]
    fn test_invalid_base() {
        for base in [-1.0, 100.5, f64::NAN] {
            let nodes = vec![RoyaltyNode::new("n", "c", base)];
            assert_eq!(
                validate_royalty_shares(&nodes).unwrap_err().code(),
                "INVALID_BASE_ROYALTY"
            );
        }
    }

    #[test]
    fn test_invalid_share() {
        let nodes = vec![RoyaltyNode::new("n", "c", 0.0).with_parent("p", 101.0)];
        assert!(matches!(
            validate_royalty_shares(&nodes),
            Err(RoyaltyError::InvalidParentShare { ref parent, .. }) if parent == "p"
        ));
    }

    #[test]
    fn test_parent_sum_checked_before_total() {
        let nodes = vec![RoyaltyNode::new("n", "c", 0.0)
            .with_parent("p", 60.0)
            .with_parent("q", 60.0)];
        assert_eq!(
            validate_royalty_shares(&nodes).unwrap_err().code(),
            "PARENT_SHARES_EXCEEDED"
        );
    }

    #[test]
    fn test_first_violation_named() {
        let nodes = vec![
            RoyaltyNode::new("ok", "c", 10.0),
            RoyaltyNode::new("bad1", "c", 200.0),
            RoyaltyNode::new("bad2", "c", 300.0),
        ];
        assert!(validate_royalty_shares(&nodes)
            .unwrap_err()
            .to_string()
            .contains("bad1"));
    }

    proptest! {
        #[test]
        fn prop_valid_node_never_overpays(
            base in 0.0f64..=100.0,
            raw_shares in prop::collection::vec(0.0f64..=100.0, 0..5),
            amount in 0.0f64..1e9,
        ) {
            // Scale shares so the node is valid.
            let room = 100.0 - base;
            let sum: f64 = raw_shares.iter().sum();
            let scale = if sum > room && sum > 0.0 { room / sum } else { 1.0 };
            let mut node = RoyaltyNode::new("n", "creator", base);
            for (i, s) in raw_shares.iter().enumerate() {
                node = node.with_parent(format!("p{i}"), s * scale * 0.999);
            }
            prop_assert!(validate_royalty_shares(std::slice::from_ref(&node)).is_ok());

            let mut nodes = vec![node];
            for i in 0..raw_shares.len() {
                nodes.push(RoyaltyNode::new(format!("p{i}"), format!("parent{i}"), 100.0));
            }
            let map = crate::index_nodes(&nodes);
            let dist = crate::calculate_distribution("n", &map, amount).unwrap();
            let paid: f64 = dist.values().sum();
            prop_assert!(paid <= amount * (1.0 + 1e-9) + 1e-6);
        }
    }
}
