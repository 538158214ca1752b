//! # Ed25519 Node Keys
//!
//! Public keys and signatures serialize as lowercase hex strings.

use ed25519_dalek::{Signer, Verifier};
use greenlink_core::{CanonicalBytes, CryptoError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An Ed25519 public key identifying a signing node.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NodePublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NodeSignature(pub [u8; 64]);

/// A node's signing key. Not serializable.
pub struct NodeKeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl NodePublicKey {
    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_bytes(hex.trim(), 32).map_err(CryptoError::KeyError)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl NodeSignature {
    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse from a 128-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_bytes(hex.trim(), 64).map_err(CryptoError::VerificationFailed)?;
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl NodeKeyPair {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Deterministic key from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// The public half.
    pub fn public_key(&self) -> NodePublicKey {
        NodePublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> NodeSignature {
        NodeSignature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for NodeKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeKeyPair(<private>)")
    }
}

/// Verify a signature over canonical bytes.
pub fn verify(
    data: &CanonicalBytes,
    signature: &NodeSignature,
    public_key: &NodePublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(data.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
}

macro_rules! hex_serde {
    ($ty:ty, $label:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let hex = String::deserialize(deserializer)?;
                Self::from_hex(&hex).map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}...)", $label, &self.to_hex()[..8])
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }
    };
}

hex_serde!(NodePublicKey, "NodePublicKey");
hex_serde!(NodeSignature, "NodeSignature");

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_to_bytes(hex: &str, expected_len: usize) -> Result<Vec<u8>, String> {
    if hex.len() != expected_len * 2 {
        return Err(format!(
            "expected {} hex chars, got {}",
            expected_len * 2,
            hex.len()
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .ok_or_else(|| format!("invalid hex at position {i}"))
                .and_then(|pair| {
                    u8::from_str_radix(pair, 16).map_err(|e| format!("invalid hex at position {i}: {e}"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CanonicalBytes {
        CanonicalBytes::new(&serde_json::json!({"job": "ASSET-2026-001", "outcome": "VERIFIED_REPAIR"}))
            .unwrap()
    }

    #[test]
    fn sign_then_verify() {
        let kp = NodeKeyPair::generate();
        let sig = kp.sign(&record());
        assert!(verify(&record(), &sig, &kp.public_key()).is_ok());
    }

    #[test]
    fn wrong_key_fails() {
        let kp = NodeKeyPair::generate();
        let other = NodeKeyPair::generate();
        let sig = kp.sign(&record());
        assert!(verify(&record(), &sig, &other.public_key()).is_err());
    }

    #[test]
    fn tampered_record_fails() {
        let kp = NodeKeyPair::from_seed(&[7u8; 32]);
        let sig = kp.sign(&record());
        let tampered =
            CanonicalBytes::new(&serde_json::json!({"job": "ASSET-2026-001", "outcome": "VERIFIED_EOL"}))
                .unwrap();
        assert!(verify(&tampered, &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn seeded_keys_are_deterministic() {
        let a = NodeKeyPair::from_seed(&[1u8; 32]);
        let b = NodeKeyPair::from_seed(&[1u8; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.sign(&record()), b.sign(&record()));
    }

    #[test]
    fn hex_serde_roundtrip() {
        let kp = NodeKeyPair::generate();
        let pk = kp.public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json.len(), 64 + 2);
        let parsed: NodePublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pk);

        let sig = kp.sign(&record());
        let parsed: NodeSignature = serde_json::from_str(&serde_json::to_string(&sig).unwrap()).unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(NodePublicKey::from_hex("abc").is_err());
        assert!(NodePublicKey::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn debug_hides_private_key() {
        assert_eq!(format!("{:?}", NodeKeyPair::generate()), "NodeKeyPair(<private>)");
    }
}
