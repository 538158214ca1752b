//! # Repair Job State Machine
//!
//! A technician node works through incoming repair jobs.
//!
//! ```text
//! Pending ──accept──▶ Ongoing ──finalize(Repair)──▶ Verified-Repair (terminal)
//!                        │
//!                        └──────finalize(EOL)────▶ Verified-EOL    (terminal)
//! ```
//!
//! While a job is Ongoing the operator logs protocol stages (at most four),
//! appends notes, and toggles parts in and out of the consumption set.
//! Finalization goes through a [`FinalizationReview`] that echoes device,
//! issue and parts back to the operator. The sign-off stamp (`completed_at`,
//! `tx_hash`, `signer_id`) is written exactly once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenlink_core::{JobId, Timestamp};

// ─── Enumerations ────────────────────────────────────────────────────

/// Lifecycle status of a repair job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Ongoing,
    #[serde(rename = "Verified-Repair")]
    VerifiedRepair,
    #[serde(rename = "Verified-EOL")]
    VerifiedEol,
}

impl JobStatus {
    /// Whether the job has been signed off.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::VerifiedRepair | Self::VerifiedEol)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Ongoing => "Ongoing",
            Self::VerifiedRepair => "Verified-Repair",
            Self::VerifiedEol => "Verified-EOL",
        };
        f.write_str(s)
    }
}

/// Who owns the asset under repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Government,
    Enterprise,
    Consumer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Standard,
}

/// Result the technician signs off with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobOutcome {
    Repair,
    Eol,
}

impl JobOutcome {
    /// Terminal status reached when finalizing with this outcome.
    pub fn terminal_status(&self) -> JobStatus {
        match self {
            Self::Repair => JobStatus::VerifiedRepair,
            Self::Eol => JobStatus::VerifiedEol,
        }
    }
}

impl std::fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repair => f.write_str("REPAIR"),
            Self::Eol => f.write_str("EOL"),
        }
    }
}

/// The four named stages of the repair protocol, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolStage {
    PhysicalInspection,
    VRailContinuity,
    ComponentReplacement,
    OsReflash,
}

impl ProtocolStage {
    pub const ALL: [ProtocolStage; 4] = [
        Self::PhysicalInspection,
        Self::VRailContinuity,
        Self::ComponentReplacement,
        Self::OsReflash,
    ];

    /// Stage at a zero-based step index, if any.
    pub fn at(step: u8) -> Option<Self> {
        Self::ALL.get(usize::from(step)).copied()
    }

    /// Operator-facing instruction for the stage.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PhysicalInspection => "Physical Inspection: Check for internal corrosion/swelling",
            Self::VRailContinuity => "V-Rail Continuity: Test 3.3V / 5.0V power gates",
            Self::ComponentReplacement => "Component Replacement: Swap faulty modules from inventory",
            Self::OsReflash => "OS Re-flash: Secure boot and data wiping verification",
        }
    }
}

/// Number of protocol stages a job can log.
pub const MAX_STEP: u8 = ProtocolStage::ALL.len() as u8;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from repair job operations.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("invalid job transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("job is in terminal state {state}")]
    TerminalState { state: String },

    /// All protocol stages are already logged.
    #[error("job {0} has already completed every protocol stage")]
    StepLimitReached(JobId),

    /// The sign-off stamp is already present.
    #[error("job {0} is already finalized")]
    AlreadyFinalized(JobId),

    #[error("note text is empty")]
    EmptyNote,

    /// The review was produced for a different job.
    #[error("review for job {review} cannot finalize job {job}")]
    ReviewMismatch { review: JobId, job: JobId },
}

// ─── Sign-off ────────────────────────────────────────────────────────

/// What the operator is shown before confirming finalization.
///
/// Only [`RepairJob::review`] constructs one, so a job cannot be finalized
/// without having gone through the review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationReview {
    job_id: JobId,
    device: String,
    issue: String,
    parts_consumed: Vec<String>,
    outcome: JobOutcome,
}

impl FinalizationReview {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn issue(&self) -> &str {
        &self.issue
    }

    pub fn parts_consumed(&self) -> &[String] {
        &self.parts_consumed
    }

    pub fn outcome(&self) -> JobOutcome {
        self.outcome
    }

    /// Build the record a node signs for this review.
    pub fn sign_off_record(&self, signer_id: &str) -> SignOffRecord {
        SignOffRecord {
            job_id: self.job_id.clone(),
            device: self.device.clone(),
            outcome: self.outcome,
            parts_consumed: self.parts_consumed.clone(),
            signer_id: signer_id.to_string(),
            completed_at: Timestamp::now(),
            nonce: uuid::Uuid::new_v4().simple().to_string(),
        }
    }
}

/// The lifecycle record a technician node signs at finalization.
///
/// The nonce makes every record, and therefore every transaction hash,
/// unique even when two finalizations share a job and second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOffRecord {
    pub job_id: JobId,
    pub device: String,
    pub outcome: JobOutcome,
    pub parts_consumed: Vec<String>,
    pub signer_id: String,
    pub completed_at: Timestamp,
    pub nonce: String,
}

/// Fields stamped onto a job when it is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOffStamp {
    /// Human-readable completion time.
    pub completed_at: String,
    pub tx_hash: String,
    pub signer_id: String,
}

// ─── Repair Job ──────────────────────────────────────────────────────

/// A repair assignment on a technician node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairJob {
    pub id: JobId,
    pub device: String,
    pub issue: String,
    /// Distance to the asset, as displayed.
    pub dist: String,
    /// When the request arrived, as displayed.
    pub date: String,
    pub status: JobStatus,
    pub asset_class: AssetClass,
    pub priority: Priority,
    pub current_step: u8,
    pub notes: Vec<String>,
    pub parts_to_replace: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_id: Option<String>,
}

impl RepairJob {
    /// A new pending job.
    pub fn new(
        id: JobId,
        device: impl Into<String>,
        issue: impl Into<String>,
        asset_class: AssetClass,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            device: device.into(),
            issue: issue.into(),
            dist: String::new(),
            date: String::new(),
            status: JobStatus::Pending,
            asset_class,
            priority,
            current_step: 0,
            notes: Vec::new(),
            parts_to_replace: Vec::new(),
            completed_at: None,
            tx_hash: None,
            signer_id: None,
        }
    }

    /// Whether the sign-off stamp has been written.
    pub fn is_finalized(&self) -> bool {
        self.tx_hash.is_some()
    }

    /// The stage the operator is currently working on, if any remain.
    pub fn current_stage(&self) -> Option<ProtocolStage> {
        ProtocolStage::at(self.current_step)
    }

    /// Whether every protocol stage has been logged.
    pub fn protocol_complete(&self) -> bool {
        self.current_step >= MAX_STEP
    }

    /// Pending → Ongoing.
    pub fn accept(&mut self) -> Result<(), JobError> {
        self.require_state(JobStatus::Pending, JobStatus::Ongoing)?;
        self.status = JobStatus::Ongoing;
        Ok(())
    }

    /// Log completion of the current protocol stage and return it.
    pub fn log_step(&mut self) -> Result<ProtocolStage, JobError> {
        self.require_state(JobStatus::Ongoing, JobStatus::Ongoing)?;
        let stage = self
            .current_stage()
            .ok_or_else(|| JobError::StepLimitReached(self.id.clone()))?;
        self.current_step += 1;
        Ok(stage)
    }

    /// Append a trimmed note. Allowed any time before finalization.
    pub fn add_note(&mut self, note: &str) -> Result<(), JobError> {
        self.require_open()?;
        let note = note.trim();
        if note.is_empty() {
            return Err(JobError::EmptyNote);
        }
        self.notes.push(note.to_string());
        Ok(())
    }

    /// Toggle a part in or out of the consumption set. Returns whether the
    /// part is now included.
    pub fn toggle_part(&mut self, part: &str) -> Result<bool, JobError> {
        self.require_open()?;
        if let Some(pos) = self.parts_to_replace.iter().position(|p| p == part) {
            self.parts_to_replace.remove(pos);
            Ok(false)
        } else {
            self.parts_to_replace.push(part.to_string());
            Ok(true)
        }
    }

    /// Open the confirmation review for finalizing with `outcome`.
    pub fn review(&self, outcome: JobOutcome) -> Result<FinalizationReview, JobError> {
        if self.is_finalized() {
            return Err(JobError::AlreadyFinalized(self.id.clone()));
        }
        self.require_state(JobStatus::Ongoing, outcome.terminal_status())?;
        Ok(FinalizationReview {
            job_id: self.id.clone(),
            device: self.device.clone(),
            issue: self.issue.clone(),
            parts_consumed: self.parts_to_replace.clone(),
            outcome,
        })
    }

    /// Commit a confirmed review. The stamp is written once; a second
    /// call fails with [`JobError::AlreadyFinalized`] and changes nothing.
    pub fn finalize(&mut self, review: &FinalizationReview, stamp: SignOffStamp) -> Result<(), JobError> {
        if self.is_finalized() {
            return Err(JobError::AlreadyFinalized(self.id.clone()));
        }
        if review.job_id != self.id {
            return Err(JobError::ReviewMismatch {
                review: review.job_id.clone(),
                job: self.id.clone(),
            });
        }
        let target = review.outcome.terminal_status();
        self.require_state(JobStatus::Ongoing, target)?;
        self.status = target;
        self.completed_at = Some(stamp.completed_at);
        self.tx_hash = Some(stamp.tx_hash);
        self.signer_id = Some(stamp.signer_id);
        Ok(())
    }

    fn require_open(&self) -> Result<(), JobError> {
        if self.status.is_terminal() {
            return Err(JobError::TerminalState {
                state: self.status.to_string(),
            });
        }
        Ok(())
    }

    fn require_state(&self, expected: JobStatus, target: JobStatus) -> Result<(), JobError> {
        self.require_open()?;
        if self.status != expected {
            return Err(JobError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
