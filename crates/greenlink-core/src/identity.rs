//! # Identifier Newtypes
//!
//! Every entity kind has its own identifier type. Seeded demo records carry
//! human-readable ids (`ASSET-2026-001`, `BATCH-HYD-102`, `REQ-401`); newly
//! created entities get a UUID v4 via `generate()`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh identifier from a random UUID.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4().simple()))
            }

            /// Borrow the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a signed-in user.
    UserId,
    "USR"
);
string_id!(
    /// Identifier of a consumer's tracked device.
    DeviceId,
    "DEV"
);
string_id!(
    /// Identifier of a technician repair job.
    JobId,
    "ASSET"
);
string_id!(
    /// Identifier of a recycler processing batch.
    BatchId,
    "BATCH"
);
string_id!(
    /// Identifier of an inbound shipment awaiting acceptance at a recycler.
    ShipmentId,
    "SHIP"
);
string_id!(
    /// Identifier of an NGO restock request.
    RequestId,
    "REQ"
);
string_id!(
    /// Identifier of a registered facility (technician hub or recycler plant).
    NodeId,
    "NODE"
);

impl ShipmentId {
    /// The batch id a shipment becomes once accepted (`SHIP-9912` → `BATCH-9912`).
    pub fn to_batch_id(&self) -> BatchId {
        BatchId::new(self.0.replacen("SHIP", "BATCH", 1))
    }
}
