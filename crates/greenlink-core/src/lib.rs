//! # greenlink-core: Foundational Types for GreenLink
//!
//! The leaf of the GreenLink crate graph. Defines the vocabulary every
//! role dashboard shares: who the user is, how entities are identified,
//! how time is recorded, and how records are reduced to canonical bytes
//! before they are hashed or signed.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `UserId`, `DeviceId`, `JobId`, `BatchId`,
//!    `ShipmentId`, `RequestId` and `NodeId` are distinct types. A batch id
//!    cannot be passed where a job id is expected.
//!
//! 2. **`CanonicalBytes` for every digest.** Sign-off records are hashed and
//!    signed only through `CanonicalBytes::new()`, which produces RFC 8785
//!    (JCS) output.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is truncated to seconds and always
//!    renders with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `greenlink-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod notification;
pub mod temporal;
pub mod user;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, CryptoError, GreenlinkError};
pub use identity::{BatchId, DeviceId, JobId, NodeId, RequestId, ShipmentId, UserId};
pub use notification::{Notification, NotificationKind};
pub use temporal::Timestamp;
pub use user::{ProfileData, ProfilePatch, Role, User};
