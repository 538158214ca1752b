//! # greenlink-sim: Workflow Runtime
//!
//! Timer-driven workflows on Tokio, one desk per role, composed by a
//! session shell.
//!
//! - **Consumer** (`consumer.rs`): device submissions, points, logistics
//!   auto-dispatch, nearby recycler lookup.
//! - **Technician** (`technician.rs`): biometric gate, repair protocol,
//!   signed sign-off, parts inventory.
//! - **Recycler** (`recycler.rs`): inbound loads, recovery steps, audits,
//!   commodity sale and compliance export.
//! - **NGO** (`ngo.rs`): restock verification and dispatch.
//! - **Session** (`session.rs`, `verification.rs`): routing and the
//!   professional verification gate.
//! - **Directory** (`directory.rs`): registered partner nodes and the
//!   nearby scan.
//!
//! ## Concurrency
//!
//! Every desk is a cheap `Clone` handle over `Arc<parking_lot::Mutex<_>>`.
//! Locks are taken for a read or a single transition and never held across
//! an `.await`. Timed operations claim their entity in a [`BusySet`] first;
//! a second call on a claimed entity returns
//! [`WorkflowError::ConcurrentActionIgnored`] and changes nothing. Delays
//! come from [`SimConfig`] and are scaled by `time_scale`.

pub mod busy;
pub mod config;
pub mod consumer;
pub mod directory;
pub mod error;
pub mod geolocation;
pub mod ngo;
pub mod recycler;
pub mod seed;
pub mod session;
pub mod technician;
pub mod verification;

pub use busy::{BusyClaim, BusySet};
pub use config::{ConfigError, SimConfig, TimingConfig, DEFAULT_SIGNER_ID};
pub use consumer::{ConsumerDesk, NearbyRecycler, SubmissionOutcome};
pub use directory::{DirectoryFilter, Partner, PartnerDirectory, PartnerKind};
pub use error::WorkflowError;
pub use geolocation::{Coordinates, FixedLocation, LocationError, LocationProvider, NoLocation};
pub use ngo::{
    Contributions, Contributor, NodeHealth, NodeStatus, RestockDesk, RestockSummary,
    IMPACT_INDEX_MONTHS, SEED_IMPACT_INDEX,
};
pub use recycler::{ComplianceCertificate, RecoveryPlant};
pub use seed::DemoNetwork;
pub use session::{RoleSelection, Screen, Session, View};
pub use technician::{ChainSync, SignedSignOff, Workbench};
pub use verification::{VerificationGate, VerificationStep};
