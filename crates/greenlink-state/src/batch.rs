//! # Recycler Batch Pipeline
//!
//! Inbound shipments are accepted into processing batches. A batch advances
//! in fixed steps of [`PROGRESS_STEP`] until it reaches 100, and its status
//! is always derived from progress:
//!
//! | progress | status            |
//! |----------|-------------------|
//! | 0        | Inbound           |
//! | 1–49     | Disassembly       |
//! | 50–99    | Material-Recovery |
//! | 100      | Final-Audit       |
//!
//! Status is never stored independently. Deserialized batches are checked
//! against the table and rejected if they disagree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenlink_core::{BatchId, NodeId, ShipmentId, Timestamp};

/// Progress added by one recovery step.
pub const PROGRESS_STEP: u8 = 20;

/// Progress at which a batch is ready for audit.
pub const PROGRESS_COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    Inbound,
    Disassembly,
    #[serde(rename = "Material-Recovery")]
    MaterialRecovery,
    #[serde(rename = "Final-Audit")]
    FinalAudit,
}

impl BatchStatus {
    /// The status a batch at `progress` must have.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => Self::Inbound,
            1..=49 => Self::Disassembly,
            50..=99 => Self::MaterialRecovery,
            _ => Self::FinalAudit,
        }
    }

    /// Log line appended when a step lands in this status.
    fn step_log(&self) -> Option<&'static str> {
        match self {
            Self::Inbound => None,
            Self::Disassembly => Some("Physical disassembly node active"),
            Self::MaterialRecovery => Some("Chemical leaching sequence initialized"),
            Self::FinalAudit => Some("Recovery sequence finalized. Ready for audit."),
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Inbound => "Inbound",
            Self::Disassembly => "Disassembly",
            Self::MaterialRecovery => "Material-Recovery",
            Self::FinalAudit => "Final-Audit",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum BatchError {
    /// The batch is already at 100.
    #[error("batch {0} has completed recovery")]
    RecoveryComplete(BatchId),

    #[error("batch {batch} is not ready for audit (progress {progress})")]
    AuditNotReady { batch: BatchId, progress: u8 },

    #[error("progress {0} is out of range")]
    ProgressOutOfRange(u8),

    #[error("status {status} does not match progress {progress}")]
    StatusMismatch { progress: u8, status: BatchStatus },
}

// ─── Inbound ─────────────────────────────────────────────────────────

/// A shipment waiting in the inbound logistics queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundShipment {
    pub id: ShipmentId,
    pub node: NodeId,
    #[serde(rename = "cat")]
    pub category: String,
    /// Display weight, e.g. `"1.2 Tons"`.
    pub weight: String,
    /// Weight in kilograms.
    pub weight_num: u32,
}

impl InboundShipment {
    /// Hazard tags for a shipment category.
    pub fn toxins(&self) -> Vec<String> {
        let tags: [&str; 2] = if self.category.contains("Consumer") {
            ["Lead", "Cadmium"]
        } else {
            ["Solder Flux", "Barium"]
        };
        tags.iter().map(|t| t.to_string()).collect()
    }

    /// Turn the shipment into a fresh batch at progress 0.
    pub fn accept(self, at: Timestamp) -> ProcessingBatch {
        let toxins = self.toxins();
        ProcessingBatch {
            id: self.id.to_batch_id(),
            origin: self.node.to_string(),
            batch_type: self.category,
            weight: self.weight,
            weight_num: self.weight_num,
            progress: 0,
            status: BatchStatus::Inbound,
            toxins,
            logs: vec![format!("Shipment accepted: {}", at.to_clock())],
        }
    }
}

// ─── Batch ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBatch {
    id: BatchId,
    origin: String,
    #[serde(rename = "type")]
    batch_type: String,
    weight: String,
    weight_num: u32,
    progress: u8,
    status: BatchStatus,
    #[serde(default)]
    toxins: Vec<String>,
    #[serde(default)]
    logs: Vec<String>,
}

impl TryFrom<RawBatch> for ProcessingBatch {
    type Error = BatchError;

    fn try_from(raw: RawBatch) -> Result<Self, Self::Error> {
        let mut batch = ProcessingBatch::new(
            raw.id,
            &raw.origin,
            &raw.batch_type,
            &raw.weight,
            raw.weight_num,
            raw.progress,
        )?;
        if batch.status != raw.status {
            return Err(BatchError::StatusMismatch {
                progress: raw.progress,
                status: raw.status,
            });
        }
        batch.toxins = raw.toxins;
        batch.logs = raw.logs;
        Ok(batch)
    }
}

/// A unit of material moving through disassembly and recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBatch")]
pub struct ProcessingBatch {
    pub id: BatchId,
    pub origin: String,
    #[serde(rename = "type")]
    pub batch_type: String,
    pub weight: String,
    /// Weight in kilograms.
    pub weight_num: u32,
    progress: u8,
    status: BatchStatus,
    pub toxins: Vec<String>,
    logs: Vec<String>,
}

impl ProcessingBatch {
    /// A batch at an arbitrary progress, with status derived from it.
    pub fn new(
        id: BatchId,
        origin: &str,
        batch_type: &str,
        weight: &str,
        weight_num: u32,
        progress: u8,
    ) -> Result<Self, BatchError> {
        if progress > PROGRESS_COMPLETE {
            return Err(BatchError::ProgressOutOfRange(progress));
        }
        Ok(Self {
            id,
            origin: origin.to_string(),
            batch_type: batch_type.to_string(),
            weight: weight.to_string(),
            weight_num,
            progress,
            status: BatchStatus::from_progress(progress),
            toxins: Vec::new(),
            logs: Vec::new(),
        })
    }

    pub fn with_toxins(mut self, toxins: &[&str]) -> Self {
        self.toxins = toxins.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_logs(mut self, logs: &[&str]) -> Self {
        self.logs = logs.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    /// Processing log, oldest first.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Whether the batch carries printed circuit boards.
    pub fn is_board(&self) -> bool {
        let t = self.batch_type.to_lowercase();
        t.contains("pcb") || t.contains("board")
    }

    pub fn ready_for_audit(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }

    /// Execute one recovery step: progress moves up by [`PROGRESS_STEP`]
    /// (capped at 100), status is re-derived, and the stage log appended.
    pub fn advance(&mut self) -> Result<BatchStatus, BatchError> {
        if self.ready_for_audit() {
            return Err(BatchError::RecoveryComplete(self.id.clone()));
        }
        self.progress = self.progress.saturating_add(PROGRESS_STEP).min(PROGRESS_COMPLETE);
        self.status = BatchStatus::from_progress(self.progress);
        if let Some(line) = self.status.step_log() {
            self.logs.push(line.to_string());
        }
        Ok(self.status)
    }

    /// Check that the batch may be audited.
    pub fn require_audit_ready(&self) -> Result<(), BatchError> {
        if !self.ready_for_audit() {
            return Err(BatchError::AuditNotReady {
                batch: self.id.clone(),
                progress: self.progress,
            });
        }
        Ok(())
    }
}
