//! # Sign-Off Attestations
//!
//! An attestation binds a record to a node: the transaction hash is the
//! SHA-256 of the record's canonical bytes, and the signature covers the
//! same bytes. Two attestations over records that differ in any field
//! (including a nonce) have different hashes.

use greenlink_core::{sha256_digest, CanonicalBytes, CryptoError, GreenlinkError};
use serde::{Deserialize, Serialize};

use crate::ed25519::{self, NodeKeyPair, NodePublicKey, NodeSignature};

/// Proof that a node signed a particular record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    /// `0x` + uppercase SHA-256 hex of the canonical record.
    pub tx_hash: String,
    pub signature: NodeSignature,
    pub public_key: NodePublicKey,
}

/// Canonicalize, hash and sign `record`.
pub fn attest(record: &impl Serialize, key: &NodeKeyPair) -> Result<Attestation, GreenlinkError> {
    let canonical = CanonicalBytes::new(record)?;
    Ok(Attestation {
        tx_hash: sha256_digest(&canonical).to_tx_hash(),
        signature: key.sign(&canonical),
        public_key: key.public_key(),
    })
}

/// Check that `attestation` was produced over exactly `record`.
pub fn verify_attestation(
    record: &impl Serialize,
    attestation: &Attestation,
) -> Result<(), GreenlinkError> {
    let canonical = CanonicalBytes::new(record)?;
    let expected = sha256_digest(&canonical).to_tx_hash();
    if expected != attestation.tx_hash {
        return Err(CryptoError::VerificationFailed(format!(
            "tx hash mismatch: expected {expected}, got {}",
            attestation.tx_hash
        ))
        .into());
    }
    ed25519::verify(&canonical, &attestation.signature, &attestation.public_key)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attestation_verifies() {
        let key = NodeKeyPair::generate();
        let record = serde_json::json!({"jobId": "ASSET-2026-002", "nonce": "a1"});
        let att = attest(&record, &key).unwrap();
        assert!(att.tx_hash.starts_with("0x"));
        assert!(verify_attestation(&record, &att).is_ok());
    }

    #[test]
    fn different_nonce_different_hash() {
        let key = NodeKeyPair::generate();
        let a = attest(&serde_json::json!({"jobId": "J", "nonce": "1"}), &key).unwrap();
        let b = attest(&serde_json::json!({"jobId": "J", "nonce": "2"}), &key).unwrap();
        assert_ne!(a.tx_hash, b.tx_hash);
    }

    #[test]
    fn mismatched_record_rejected() {
        let key = NodeKeyPair::generate();
        let att = attest(&serde_json::json!({"jobId": "J"}), &key).unwrap();
        assert!(verify_attestation(&serde_json::json!({"jobId": "K"}), &att).is_err());
    }

    #[test]
    fn float_records_cannot_be_attested() {
        let key = NodeKeyPair::generate();
        assert!(attest(&serde_json::json!({"weight": 1.5}), &key).is_err());
    }
}
