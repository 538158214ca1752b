//! # Technician Workbench
//!
//! Nothing on the workbench is visible until the biometric authorization
//! completes. After that the technician accepts jobs, works through the
//! repair protocol and signs each job off.
//!
//! Sign-off is a timed operation guarded per job: while a job's lifecycle
//! record is being signed, a second finalize on the same job is ignored.
//! The record is canonicalized and signed with the node's Ed25519 key; its
//! SHA-256 becomes the job's transaction hash.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use greenlink_core::{JobId, Timestamp};
use greenlink_crypto::{attest, verify_attestation, Attestation, NodeKeyPair};
use greenlink_state::inventory::find_mut;
use greenlink_state::{
    FinalizationReview, InventoryItem, JobOutcome, JobStatus, ProtocolStage, RepairJob,
    SignOffRecord, SignOffStamp,
};

use crate::busy::BusySet;
use crate::config::SimConfig;
use crate::error::WorkflowError;

const AUTH_KEY: &str = "technician:auth";
const SYNC_KEY: &str = "technician:sync";

/// A finalized job's signed lifecycle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedSignOff {
    pub record: SignOffRecord,
    pub attestation: Attestation,
}

/// Result of a ledger sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSync {
    pub verified: usize,
    pub failed: Vec<JobId>,
    pub synced_at: Timestamp,
}

#[derive(Debug)]
struct WorkbenchState {
    authorized: bool,
    jobs: Vec<RepairJob>,
    inventory: Vec<InventoryItem>,
    focused: Option<JobId>,
    sign_offs: Vec<SignedSignOff>,
}

impl WorkbenchState {
    fn job_mut(&mut self, id: &JobId) -> Result<&mut RepairJob, WorkflowError> {
        self.jobs
            .iter_mut()
            .find(|j| &j.id == id)
            .ok_or_else(|| WorkflowError::not_found("job", id))
    }

    fn job(&self, id: &JobId) -> Result<&RepairJob, WorkflowError> {
        self.jobs
            .iter()
            .find(|j| &j.id == id)
            .ok_or_else(|| WorkflowError::not_found("job", id))
    }

    fn filtered(&self, pred: impl Fn(JobStatus) -> bool) -> Vec<RepairJob> {
        self.jobs.iter().filter(|j| pred(j.status)).cloned().collect()
    }
}

#[derive(Debug, Clone)]
pub struct Workbench {
    config: Arc<SimConfig>,
    key: Arc<NodeKeyPair>,
    state: Arc<Mutex<WorkbenchState>>,
    busy: BusySet,
}

impl Workbench {
    pub fn new(
        config: Arc<SimConfig>,
        key: NodeKeyPair,
        jobs: Vec<RepairJob>,
        inventory: Vec<InventoryItem>,
    ) -> Self {
        Self {
            config,
            key: Arc::new(key),
            state: Arc::new(Mutex::new(WorkbenchState {
                authorized: false,
                jobs,
                inventory,
                focused: None,
                sign_offs: Vec::new(),
            })),
            busy: BusySet::new(),
        }
    }

    // ── Authorization ────────────────────────────────────────────────

    /// Run the mock biometric check. Idempotent once authorized.
    pub async fn authorize(&self) -> Result<(), WorkflowError> {
        if self.is_authorized() {
            return Ok(());
        }
        let _claim = self
            .busy
            .try_claim(AUTH_KEY)
            .ok_or_else(|| WorkflowError::busy(AUTH_KEY))?;
        tokio::time::sleep(self.config.delay(self.config.timing.biometric_auth_ms)).await;
        self.state.lock().authorized = true;
        info!(signer_id = %self.config.signer_id, "technician node authorized");
        Ok(())
    }

    pub fn is_authorized(&self) -> bool {
        self.state.lock().authorized
    }

    pub fn is_authorizing(&self) -> bool {
        self.busy.is_busy(AUTH_KEY)
    }

    fn require_authorized(&self) -> Result<(), WorkflowError> {
        if !self.is_authorized() {
            return Err(WorkflowError::ValidationBlocked(
                "biometric authorization required".to_string(),
            ));
        }
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Incoming jobs (Pending).
    pub fn requests(&self) -> Result<Vec<RepairJob>, WorkflowError> {
        self.require_authorized()?;
        Ok(self.state.lock().filtered(|s| s == JobStatus::Pending))
    }

    /// Jobs in progress (Ongoing).
    pub fn workbench(&self) -> Result<Vec<RepairJob>, WorkflowError> {
        self.require_authorized()?;
        Ok(self.state.lock().filtered(|s| s == JobStatus::Ongoing))
    }

    /// Signed-off jobs.
    pub fn history(&self) -> Result<Vec<RepairJob>, WorkflowError> {
        self.require_authorized()?;
        Ok(self.state.lock().filtered(|s| s.is_terminal()))
    }

    pub fn inventory(&self) -> Result<Vec<InventoryItem>, WorkflowError> {
        self.require_authorized()?;
        Ok(self.state.lock().inventory.clone())
    }

    pub fn job(&self, id: &JobId) -> Result<RepairJob, WorkflowError> {
        self.require_authorized()?;
        self.state.lock().job(id).cloned()
    }

    /// The job currently open for editing.
    pub fn focused_job(&self) -> Option<RepairJob> {
        let state = self.state.lock();
        let id = state.focused.as_ref()?;
        state.job(id).ok().cloned()
    }

    pub fn sign_off(&self, id: &JobId) -> Option<SignedSignOff> {
        self.state
            .lock()
            .sign_offs
            .iter()
            .find(|s| &s.record.job_id == id)
            .cloned()
    }

    pub fn is_finalizing(&self, id: &JobId) -> bool {
        self.busy.is_busy(id.as_str())
    }

    // ── Job actions ──────────────────────────────────────────────────

    /// Accept a pending job and focus it.
    pub fn accept_job(&self, id: &JobId) -> Result<(), WorkflowError> {
        self.require_authorized()?;
        let mut state = self.state.lock();
        state.job_mut(id)?.accept()?;
        state.focused = Some(id.clone());
        info!(job_id = %id, status = %JobStatus::Ongoing, "job accepted");
        Ok(())
    }

    /// Switch focus to another ongoing job.
    pub fn focus(&self, id: &JobId) -> Result<(), WorkflowError> {
        self.require_authorized()?;
        let mut state = self.state.lock();
        if state.job(id)?.status != JobStatus::Ongoing {
            return Err(WorkflowError::ValidationBlocked(format!(
                "job {id} is not on the workbench"
            )));
        }
        state.focused = Some(id.clone());
        Ok(())
    }

    /// Job edits are frozen while the job's sign-off is in flight.
    fn require_not_finalizing(&self, id: &JobId) -> Result<(), WorkflowError> {
        if self.is_finalizing(id) {
            warn!(job_id = %id, "edit ignored: sign-off in progress");
            return Err(WorkflowError::busy(id.as_str()));
        }
        Ok(())
    }

    pub fn log_step(&self, id: &JobId) -> Result<ProtocolStage, WorkflowError> {
        self.require_authorized()?;
        self.require_not_finalizing(id)?;
        let stage = self.state.lock().job_mut(id)?.log_step()?;
        debug!(job_id = %id, stage = stage.title(), "protocol stage logged");
        Ok(stage)
    }

    pub fn add_note(&self, id: &JobId, note: &str) -> Result<(), WorkflowError> {
        self.require_authorized()?;
        self.require_not_finalizing(id)?;
        self.state.lock().job_mut(id)?.add_note(note)?;
        Ok(())
    }

    /// Toggle a part in or out of the job. Returns whether it is now included.
    pub fn toggle_part(&self, id: &JobId, part: &str) -> Result<bool, WorkflowError> {
        self.require_authorized()?;
        self.require_not_finalizing(id)?;
        Ok(self.state.lock().job_mut(id)?.toggle_part(part)?)
    }

    /// Open the confirmation review.
    pub fn review(&self, id: &JobId, outcome: JobOutcome) -> Result<FinalizationReview, WorkflowError> {
        self.require_authorized()?;
        Ok(self.state.lock().job(id)?.review(outcome)?)
    }

    /// Sign and commit a confirmed review.
    pub async fn finalize(&self, review: FinalizationReview) -> Result<SignedSignOff, WorkflowError> {
        self.require_authorized()?;
        let job_id = review.job_id().clone();
        let _claim = match self.busy.try_claim(job_id.as_str()) {
            Some(claim) => claim,
            None => {
                warn!(job_id = %job_id, "finalize ignored: sign-off already in progress");
                return Err(WorkflowError::busy(job_id.as_str()));
            }
        };
        let current = self.state.lock().job(&job_id)?.review(review.outcome())?;
        if current != review {
            return Err(WorkflowError::ValidationBlocked(format!(
                "review of job {job_id} is stale; reopen it"
            )));
        }

        tokio::time::sleep(self.config.delay(self.config.timing.sign_off_ms)).await;

        let record = review.sign_off_record(&self.config.signer_id);
        let attestation = attest(&record, &self.key)?;
        let stamp = SignOffStamp {
            completed_at: record.completed_at.to_human(),
            tx_hash: attestation.tx_hash.clone(),
            signer_id: record.signer_id.clone(),
        };
        let signed = SignedSignOff {
            record,
            attestation,
        };

        let mut state = self.state.lock();
        state.job_mut(&job_id)?.finalize(&review, stamp)?;
        state.sign_offs.push(signed.clone());
        if state.focused.as_ref() == Some(&job_id) {
            state.focused = None;
        }
        info!(
            job_id = %job_id,
            status = %review.outcome().terminal_status(),
            tx_hash = %signed.attestation.tx_hash,
            "job signed off"
        );
        Ok(signed)
    }

    // ── Inventory ────────────────────────────────────────────────────

    /// Flag a low part for restock. Returns `false` if already pending.
    pub fn request_restock(&self, part: &str) -> Result<bool, WorkflowError> {
        self.require_authorized()?;
        let raised = find_mut(&mut self.state.lock().inventory, part)?.request_restock()?;
        if raised {
            info!(part, "restock requested");
        }
        Ok(raised)
    }

    /// Book a parts delivery into inventory. Returns the new count.
    pub fn receive_parts(&self, part: &str, quantity: u32) -> Result<u32, WorkflowError> {
        self.require_authorized()?;
        let mut state = self.state.lock();
        let item = find_mut(&mut state.inventory, part)?;
        item.receive(quantity);
        info!(part, quantity, count = item.count, "parts received");
        Ok(item.count)
    }

    // ── Ledger ───────────────────────────────────────────────────────

    /// Re-verify every stored sign-off against its record.
    pub async fn sync_chain(&self) -> Result<ChainSync, WorkflowError> {
        self.require_authorized()?;
        let _claim = self
            .busy
            .try_claim(SYNC_KEY)
            .ok_or_else(|| WorkflowError::busy(SYNC_KEY))?;
        tokio::time::sleep(self.config.delay(self.config.timing.chain_sync_ms)).await;

        let sign_offs = self.state.lock().sign_offs.clone();
        let mut failed = Vec::new();
        for s in &sign_offs {
            if let Err(e) = verify_attestation(&s.record, &s.attestation) {
                warn!(job_id = %s.record.job_id, error = %e, "sign-off failed verification");
                failed.push(s.record.job_id.clone());
            }
        }
        let sync = ChainSync {
            verified: sign_offs.len() - failed.len(),
            failed,
            synced_at: Timestamp::now(),
        };
        info!(verified = sync.verified, failed = sync.failed.len(), "ledger synced");
        Ok(sync)
    }
}
