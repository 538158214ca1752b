//! # Error Types
//!
//! Shared error hierarchy. State machine crates define their own
//! transition errors; these cover canonicalization, cryptography, and
//! input parsing that every crate may hit.

use thiserror::Error;

/// Top-level error type for GreenLink.
#[derive(Error, Debug)]
pub enum GreenlinkError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Input could not be parsed into a domain value.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Floats are not permitted in canonical representations.
    #[error("float values are not permitted in canonical records: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key parsing failed.
    #[error("key error: {0}")]
    KeyError(String),
}
