//! # Device Lifecycle State Machine
//!
//! A consumer submits a device along one of three paths. Each path fixes
//! the initial status and the green credits awarded:
//!
//! ```text
//! REPAIR  ──▶ Pickup-Requested ──(logistics dispatch)──▶ In-Repair ──▶ Repaired
//!                                                            │
//!                                                            └──▶ Verified-Repair
//! RECYCLE ──▶ Awaiting-Logistics ──▶ Recycled
//! EOL     ──▶ Awaiting-Logistics ──▶ Verified-EOL      (condition marked "(EOL)")
//! ```
//!
//! Transitions only move forward. Repaired, Recycled, Verified-Repair and
//! Verified-EOL are terminal.
//!
//! ## EOL Safety Gate
//!
//! End-of-life hand-over requires a two-step confirmation. An
//! [`EolWarning`] is issued for a completed intake, and only
//! [`EolWarning::confirm`] produces the [`ConfirmedEol`] token that
//! [`Submission::EndOfLife`] requires. There is no other constructor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenlink_core::{DeviceId, Timestamp};
use greenlink_scoring::{assess, Feasibility};

/// Condition text recorded for every end-of-life submission.
pub const EOL_CONDITION: &str = "Total Hardware Failure (EOL)";

// ─── Category and Status ─────────────────────────────────────────────

/// Device category chosen at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceCategory {
    Mobile,
    Computing,
    #[serde(rename = "Home Appliances")]
    HomeAppliances,
    Entertainment,
    Other,
}

impl std::str::FromStr for DeviceCategory {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "mobile" => Ok(Self::Mobile),
            "computing" => Ok(Self::Computing),
            "home appliances" => Ok(Self::HomeAppliances),
            "entertainment" => Ok(Self::Entertainment),
            "other" => Ok(Self::Other),
            other => Err(DeviceError::UnknownCategory(other.to_string())),
        }
    }
}

/// Lifecycle status of a tracked device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[serde(rename = "Pickup-Requested")]
    PickupRequested,
    #[serde(rename = "Awaiting-Logistics")]
    AwaitingLogistics,
    #[serde(rename = "In-Repair")]
    InRepair,
    Repaired,
    Recycled,
    #[serde(rename = "Verified-Repair")]
    VerifiedRepair,
    #[serde(rename = "Verified-EOL")]
    VerifiedEol,
}

impl DeviceStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Repaired | Self::Recycled | Self::VerifiedRepair | Self::VerifiedEol
        )
    }

    /// Whether the device has a completion certificate to show instead of
    /// a tracking view.
    pub fn has_certificate(&self) -> bool {
        self.is_terminal()
    }

    /// Position along the lifecycle. Transitions must strictly increase it.
    fn stage(&self) -> u8 {
        match self {
            Self::PickupRequested | Self::AwaitingLogistics => 0,
            Self::InRepair => 1,
            Self::Repaired | Self::Recycled | Self::VerifiedRepair | Self::VerifiedEol => 2,
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PickupRequested => "Pickup-Requested",
            Self::AwaitingLogistics => "Awaiting-Logistics",
            Self::InRepair => "In-Repair",
            Self::Repaired => "Repaired",
            Self::Recycled => "Recycled",
            Self::VerifiedRepair => "Verified-Repair",
            Self::VerifiedEol => "Verified-EOL",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from device intake and lifecycle transitions.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid device transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// Device is in a terminal state.
    #[error("device is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: String,
    },

    /// Intake form is missing required fields.
    #[error("device intake incomplete: missing {0}")]
    IncompleteIntake(&'static str),

    /// Category text did not name a known category.
    #[error("unknown device category: {0}")]
    UnknownCategory(String),

    /// No device with this id.
    #[error("device {0} not found")]
    NotFound(DeviceId),
}

// ─── Intake ──────────────────────────────────────────────────────────

/// The consumer's intake form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIntake {
    pub category: Option<DeviceCategory>,
    #[serde(rename = "type")]
    pub device_type: String,
    pub age: String,
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DeviceIntake {
    /// Live feasibility verdict, `None` while the form is incomplete.
    pub fn feasibility(&self) -> Option<Feasibility> {
        assess(&self.device_type, &self.age, &self.condition)
    }

    /// Check every field a submission needs.
    pub fn validate(&self) -> Result<DeviceCategory, DeviceError> {
        let category = self.category.ok_or(DeviceError::IncompleteIntake("category"))?;
        if self.device_type.trim().is_empty() {
            return Err(DeviceError::IncompleteIntake("type"));
        }
        if self.age.trim().is_empty() {
            return Err(DeviceError::IncompleteIntake("age"));
        }
        if self.condition.trim().is_empty() {
            return Err(DeviceError::IncompleteIntake("condition"));
        }
        Ok(category)
    }

    /// Whether all required fields are present.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// First step of the EOL gate: raise the hazardous-material warning.
    pub fn request_eol(self) -> Result<EolWarning, DeviceError> {
        self.validate()?;
        Ok(EolWarning { intake: self })
    }
}

/// An outstanding end-of-life warning awaiting operator confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EolWarning {
    intake: DeviceIntake,
}

impl EolWarning {
    /// The device the warning is about.
    pub fn intake(&self) -> &DeviceIntake {
        &self.intake
    }

    /// Second step of the gate: the consumer accepts the warning.
    pub fn confirm(self) -> ConfirmedEol {
        ConfirmedEol {
            intake: self.intake,
        }
    }

    /// Back out and return the untouched form.
    pub fn cancel(self) -> DeviceIntake {
        self.intake
    }
}

/// Proof that the EOL warning was confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedEol {
    intake: DeviceIntake,
}

/// The three consumer actions available at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionAction {
    Repair,
    Recycle,
    Eol,
}

impl SubmissionAction {
    /// Status a newly submitted device starts in.
    pub fn initial_status(&self) -> DeviceStatus {
        match self {
            Self::Repair => DeviceStatus::PickupRequested,
            Self::Recycle | Self::Eol => DeviceStatus::AwaitingLogistics,
        }
    }

    /// Green credits awarded for the submission.
    pub fn points(&self) -> u64 {
        match self {
            Self::Repair | Self::Recycle => 150,
            Self::Eol => 200,
        }
    }
}

impl std::fmt::Display for SubmissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Repair => "REPAIR",
            Self::Recycle => "RECYCLE",
            Self::Eol => "EOL",
        };
        f.write_str(s)
    }
}

/// A submission ready to enter the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Repair(DeviceIntake),
    Recycle(DeviceIntake),
    EndOfLife(ConfirmedEol),
}

impl Submission {
    /// The action this submission represents.
    pub fn action(&self) -> SubmissionAction {
        match self {
            Self::Repair(_) => SubmissionAction::Repair,
            Self::Recycle(_) => SubmissionAction::Recycle,
            Self::EndOfLife(_) => SubmissionAction::Eol,
        }
    }

    fn into_device(self, owner: &str) -> Result<Device, DeviceError> {
        let action = self.action();
        let (intake, condition) = match self {
            Self::Repair(intake) | Self::Recycle(intake) => {
                let condition = intake.condition.replace('_', " ");
                (intake, condition)
            }
            Self::EndOfLife(confirmed) => (confirmed.intake, EOL_CONDITION.to_string()),
        };
        let category = intake.validate()?;
        Ok(Device {
            id: DeviceId::generate(),
            category,
            device_type: intake.device_type,
            age: intake.age,
            condition,
            status: action.initial_status(),
            owner: owner.to_string(),
            image: intake.image,
            transitions: Vec::new(),
        })
    }
}

// ─── Device ──────────────────────────────────────────────────────────

/// Record of a device status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTransitionRecord {
    pub from_state: DeviceStatus,
    pub to_state: DeviceStatus,
    pub timestamp: Timestamp,
    pub reason: String,
}

/// A tracked physical asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub category: DeviceCategory,
    #[serde(rename = "type")]
    pub device_type: String,
    /// Age in years as entered.
    pub age: String,
    pub condition: String,
    pub status: DeviceStatus,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub transitions: Vec<DeviceTransitionRecord>,
}

impl Device {
    /// A device already somewhere along its lifecycle. Used for seed data.
    pub fn seeded(
        id: &str,
        category: DeviceCategory,
        device_type: &str,
        age: &str,
        condition: &str,
        status: DeviceStatus,
    ) -> Self {
        Self {
            id: DeviceId::new(id),
            category,
            device_type: device_type.to_string(),
            age: age.to_string(),
            condition: condition.to_string(),
            status,
            owner: "Self".to_string(),
            image: None,
            transitions: Vec::new(),
        }
    }

    /// Whether the device is on the end-of-life path.
    pub fn is_eol(&self) -> bool {
        self.condition.contains("EOL")
    }

    /// Logistics dispatch reached the device (Pickup-Requested → In-Repair).
    pub fn begin_repair(&mut self) -> Result<(), DeviceError> {
        self.require(&[DeviceStatus::PickupRequested], DeviceStatus::InRepair)?;
        self.do_transition(DeviceStatus::InRepair, "Logistics dispatch collected device");
        Ok(())
    }

    /// Hub finished the repair (In-Repair → Repaired).
    pub fn complete_repair(&mut self) -> Result<(), DeviceError> {
        self.require(&[DeviceStatus::InRepair], DeviceStatus::Repaired)?;
        self.do_transition(DeviceStatus::Repaired, "Repair completed at hub");
        Ok(())
    }

    /// Hub signed a lifecycle record for the repair (In-Repair → Verified-Repair).
    pub fn certify_repair(&mut self) -> Result<(), DeviceError> {
        self.require(&[DeviceStatus::InRepair], DeviceStatus::VerifiedRepair)?;
        self.do_transition(DeviceStatus::VerifiedRepair, "Repair signed by technician node");
        Ok(())
    }

    /// Recycler processed the device (Awaiting-Logistics → Recycled, or
    /// Verified-EOL for end-of-life hand-overs).
    pub fn complete_recycling(&mut self) -> Result<(), DeviceError> {
        let target = if self.is_eol() {
            DeviceStatus::VerifiedEol
        } else {
            DeviceStatus::Recycled
        };
        self.require(&[DeviceStatus::AwaitingLogistics], target)?;
        self.do_transition(target, "Material recovery completed");
        Ok(())
    }

    fn require(&self, allowed: &[DeviceStatus], target: DeviceStatus) -> Result<(), DeviceError> {
        if self.status.is_terminal() {
            return Err(DeviceError::TerminalState {
                state: self.status.to_string(),
            });
        }
        if !allowed.contains(&self.status) || target.stage() <= self.status.stage() {
            return Err(DeviceError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: DeviceStatus, reason: &str) {
        self.transitions.push(DeviceTransitionRecord {
            from_state: self.status,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.status = to;
    }
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub device_id: DeviceId,
    pub action: SubmissionAction,
    pub status: DeviceStatus,
    pub points: u64,
}

/// A consumer's devices, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLedger {
    devices: Vec<Device>,
}

impl DeviceLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated in the given order.
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Add a submitted device at the front.
    pub fn submit(&mut self, submission: Submission, owner: &str) -> Result<SubmissionReceipt, DeviceError> {
        let action = submission.action();
        let device = submission.into_device(owner)?;
        let receipt = SubmissionReceipt {
            device_id: device.id.clone(),
            action,
            status: device.status,
            points: action.points(),
        };
        self.devices.insert(0, device);
        Ok(receipt)
    }

    /// The first device, in list order, still waiting for pickup.
    pub fn first_pending_pickup(&self) -> Option<&DeviceId> {
        self.devices
            .iter()
            .find(|d| d.status == DeviceStatus::PickupRequested)
            .map(|d| &d.id)
    }

    /// Look up a device.
    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| &d.id == id)
    }

    /// Look up a device for mutation.
    pub fn get_mut(&mut self, id: &DeviceId) -> Result<&mut Device, DeviceError> {
        self.devices
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| DeviceError::NotFound(id.clone()))
    }

    /// All devices, most recent first.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
