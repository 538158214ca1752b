//! # greenlink-state: Entity State Machines
//!
//! Synchronous, validated state machines for every entity a role dashboard
//! owns. Timers and re-entrancy guards live one layer up in
//! `greenlink-sim`; this crate only decides whether a transition is legal
//! and records it.
//!
//! ## State Machines
//!
//! - **Device** (`device.rs`): consumer intake through repair, recycling or
//!   end-of-life hand-over. The EOL path is gated by an explicit
//!   confirmation token.
//!
//! - **Repair job** (`job.rs`): `Pending → Ongoing → Verified-Repair |
//!   Verified-EOL`, a four-stage protocol counter, append-only notes and a
//!   stamp-once sign-off.
//!
//! - **Inventory** (`inventory.rs`): technician parts with low-stock
//!   thresholds and restock flags.
//!
//! - **Batch** (`batch.rs`): recycler batches whose status is a pure
//!   function of progress, plus the inbound shipment queue.
//!
//! - **Stock** (`stock.rs`): recovered material warehouse, yield
//!   computation and bulk commodity sale.
//!
//! - **Restock** (`restock.rs`): NGO approval pipeline
//!   `Pending → Verifying → Approved → Dispatched`.
//!
//! ## Design
//!
//! Each machine is an enum with validated transition methods returning
//! `Result`, rather than one type per state. The sequences are short and
//! linear, and entities live in collections keyed by id where a single
//! concrete type is needed.

pub mod batch;
pub mod device;
pub mod inventory;
pub mod job;
pub mod restock;
pub mod stock;

pub use batch::{
    BatchError, BatchStatus, InboundShipment, ProcessingBatch, PROGRESS_COMPLETE, PROGRESS_STEP,
};
pub use device::{
    ConfirmedEol, Device, DeviceCategory, DeviceError, DeviceIntake, DeviceLedger, DeviceStatus,
    DeviceTransitionRecord, EolWarning, Submission, SubmissionAction, SubmissionReceipt,
    EOL_CONDITION,
};
pub use inventory::{InventoryError, InventoryItem, PartGrade};
pub use job::{
    AssetClass, FinalizationReview, JobError, JobOutcome, JobStatus, Priority, ProtocolStage,
    RepairJob, SignOffRecord, SignOffStamp, MAX_STEP,
};
pub use restock::{RestockError, RestockRequest, RestockStatus, Urgency};
pub use stock::{yields_for, AuditRecord, MaterialStock, MaterialYield, StockUnit, Warehouse};
