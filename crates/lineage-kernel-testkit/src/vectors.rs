//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical string, identifier, and CID of fixed
//! envelopes. Any other implementation of the registry must reproduce them
//! byte for byte.

use lineage_kernel_core::{
    canonicalize_json, cid_v1_from_canonical, content_hash_from_canonical, merkle_root,
    normalize_document,
};
use serde_json::Value;

/// A golden envelope vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Envelope document as JSON text, in arbitrary key order.
    pub document: &'static str,
    /// Expected canonical string.
    pub expected_canonical: &'static str,
    /// Expected identifier.
    pub expected_id: &'static str,
    /// Expected CIDv1.
    pub expected_cid: &'static str,
}

/// A golden Merkle vector.
#[derive(Debug, Clone)]
pub struct MerkleVector {
    pub name: &'static str,
    pub leaves: &'static [&'static str],
    pub expected_root: &'static str,
}

pub const PRACTICE_ROOT_ID: &str =
    "0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7";
pub const SYNTHESIS_ID: &str =
    "0xe02fdbac1ee61467f83c73c05de762ff5eb0219c5c93e437c6da441cd15c3a35";
pub const RUBRIC_ID: &str = "0xfcda87a6151fa0487026bc8fd6d6bb3ae20d6462e06be8f5988868b48d3c248a";

/// CIDv1 of zero bytes.
pub const EMPTY_CONTENT_CID: &str = "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku";

/// Get all golden envelope vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "root practice",
            document: r#"{"type":"practice","domain":"demo","sources":[],"payload":{"type":"practice","rationale":"r","contexts":[],"failureModes":[]}}"#,
            expected_canonical: r#"{"domain":"demo","payload":{"contexts":[],"failureModes":[],"rationale":"r","type":"practice"},"sources":[],"type":"practice"}"#,
            expected_id: PRACTICE_ROOT_ID,
            expected_cid: "bafkreibhuazej6h7cbb7ecyw3lcy6csc3rckaoyh4c2o537iltcef3s444",
        },
        GoldenVector {
            name: "derived synthesis with derivation",
            document: r#"{"payload":{"citations":{"0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7":"primary"},"type":"synthesis","question":"q","answer":"a"},"type":"synthesis","domain":"demo","sources":["0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7"],"derivation":{"type":"compose","recipe":{"mode":"verbatim"},"inputs":[{"selectors":["/rationale"],"kbId":"0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7"}]}}"#,
            expected_canonical: r#"{"derivation":{"inputs":[{"kbId":"0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7","selectors":["/rationale"]}],"recipe":{"mode":"verbatim"},"type":"compose"},"domain":"demo","payload":{"answer":"a","citations":{"0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7":"primary"},"question":"q","type":"synthesis"},"sources":["0x27a03244f8ff1043f20b16dac58f0a42dc44a03b07e0b4eeefe85cc442ee5ce7"],"type":"synthesis"}"#,
            expected_id: SYNTHESIS_ID,
            expected_cid: "bafkreihaf7n2yhxgcrt7qpdtybo6oyx7l2ycdhc4spsdprw2iqoncxb2gu",
        },
        GoldenVector {
            name: "rubric with fractional and integral weights",
            document: r#"{"type":"rubric","domain":"review","sources":[],"payload":{"type":"rubric","dimensions":[{"criterion":"clarity","weight":0.5},{"criterion":"accuracy","weight":1.0}],"scoringLogic":"weighted","thresholds":{"pass":0.7,"escalate":0.3}}}"#,
            expected_canonical: r#"{"domain":"review","payload":{"dimensions":[{"criterion":"clarity","weight":0.5},{"criterion":"accuracy","weight":1}],"scoringLogic":"weighted","thresholds":{"escalate":0.3,"pass":0.7},"type":"rubric"},"sources":[],"type":"rubric"}"#,
            expected_id: RUBRIC_ID,
            expected_cid: "bafkreih43kd2mfi7ubehajv4r7lnnoz24igwiyxanpuplgeinc2i2pberi",
        },
        GoldenVector {
            name: "non-ASCII text and escapes",
            document: r#"{"type":"enhancement","domain":"données","sources":[],"payload":{"type":"enhancement","concern":"security","enhancedContent":"résumé \"quoted\"\n"}}"#,
            expected_canonical: r#"{"domain":"données","payload":{"concern":"security","enhancedContent":"résumé \"quoted\"\n","type":"enhancement"},"sources":[],"type":"enhancement"}"#,
            expected_id: "0xa3a07536928a1af8ebc7408e8761fad7a538b108903c9e61518bc240afb705a7",
            expected_cid: "bafkreifdub2tneukdl4oxr2ar2dwd6wxuu4lcceqhspgcumlyjak7nyfu4",
        },
    ]
}

/// Get all golden Merkle vectors.
pub fn merkle_vectors() -> Vec<MerkleVector> {
    vec![
        MerkleVector {
            name: "empty",
            leaves: &[],
            expected_root: "0000000000000000000000000000000000000000000000000000000000000000",
        },
        MerkleVector {
            name: "single leaf",
            leaves: &[PRACTICE_ROOT_ID],
            expected_root: PRACTICE_ROOT_ID,
        },
        MerkleVector {
            name: "pair",
            leaves: &[PRACTICE_ROOT_ID, SYNTHESIS_ID],
            expected_root: "1db7b6f57f74b996e70723cebb437ca755cccd3af96352bac671bed8c2d9090e",
        },
        MerkleVector {
            name: "odd tail duplicated",
            leaves: &[PRACTICE_ROOT_ID, SYNTHESIS_ID, RUBRIC_ID],
            expected_root: "3fa7276298644db45550d1dfb3ad42715249519c8da215f02b2c296978e4d2bf",
        },
    ]
}

/// Canonical string, identifier and CID of a vector's document.
pub fn address_vector(vector: &GoldenVector) -> Result<(String, String, String), String> {
    let document: Value = serde_json::from_str(vector.document).map_err(|e| e.to_string())?;
    let canonical =
        canonicalize_json(&normalize_document(&document)).map_err(|e| e.to_string())?;
    let id = content_hash_from_canonical(&canonical).to_string();
    let cid = cid_v1_from_canonical(&canonical);
    Ok((canonical, id, cid))
}

/// Verify every golden vector: `(name, matches, computed id or error)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let envelopes = all_vectors().into_iter().map(|v| match address_vector(&v) {
        Ok((canonical, id, cid)) => {
            let matches = canonical == v.expected_canonical
                && id == v.expected_id
                && cid == v.expected_cid;
            (v.name.to_string(), matches, id)
        }
        Err(e) => (v.name.to_string(), false, e),
    });
    let merkle = merkle_vectors().into_iter().map(|v| {
        let root = merkle_root(v.leaves);
        (format!("merkle: {}", v.name), root == v.expected_root, root)
    });
    envelopes.chain(merkle).collect()
}
