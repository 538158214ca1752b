//! # greenlink-crypto: Node Signing
//!
//! A technician node signs every lifecycle record it finalizes. The record
//! is canonicalized, hashed with SHA-256 to produce the transaction hash
//! shown to operators, and signed with the node's Ed25519 key so the
//! sign-off can be checked later.
//!
//! ## Crate Policy
//!
//! - Signing and verification accept only `&CanonicalBytes`.
//! - Private keys never implement `Serialize` or `Debug` output.

pub mod attestation;
pub mod ed25519;

pub use attestation::{attest, verify_attestation, Attestation};
pub use ed25519::{NodeKeyPair, NodePublicKey, NodeSignature};
