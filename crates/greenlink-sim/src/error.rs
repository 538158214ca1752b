//! Workflow error taxonomy.
//!
//! `ValidationBlocked` means the action is not available in the current
//! state (a disabled control), not that something went wrong.
//! `ConcurrentActionIgnored` is returned for a re-entrant call while the
//! same entity has a timed operation in flight; the call has no effect.
//! `LocationUnavailable` is advisory and never fatal.

use thiserror::Error;

use greenlink_core::GreenlinkError;
use greenlink_state::{BatchError, DeviceError, InventoryError, JobError, RestockError};

use crate::geolocation::LocationError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("action unavailable: {0}")]
    ValidationBlocked(String),

    #[error("{entity} is busy; call ignored")]
    ConcurrentActionIgnored { entity: String },

    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Restock(#[from] RestockError),

    #[error(transparent)]
    Core(#[from] GreenlinkError),

    #[error("no async runtime available to schedule {0}")]
    NoRuntime(&'static str),

    #[error("workflow task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl WorkflowError {
    pub(crate) fn busy(entity: impl Into<String>) -> Self {
        Self::ConcurrentActionIgnored {
            entity: entity.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether the error only reports an ignored or unavailable action.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            Self::ValidationBlocked(_) | Self::ConcurrentActionIgnored { .. } | Self::LocationUnavailable(_)
        )
    }
}
