//! Professional verification gate.
//!
//! Two timed document uploads (government ID, then business or
//! certification documents) lead to the review step. Reaching review is
//! what the session checks before marking a professional user verified.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use greenlink_core::Role;

use crate::busy::BusySet;
use crate::config::SimConfig;
use crate::error::WorkflowError;

const UPLOAD_KEY: &str = "verification:upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStep {
    Id,
    Docs,
    Review,
}

impl VerificationStep {
    fn next(self) -> Self {
        match self {
            Self::Id => Self::Docs,
            Self::Docs | Self::Review => Self::Review,
        }
    }

    /// Heading of the upload card, `None` once uploads are done.
    pub fn upload_title(&self) -> Option<&'static str> {
        match self {
            Self::Id => Some("Upload Government ID"),
            Self::Docs => Some("Business / Certification Documents"),
            Self::Review => None,
        }
    }
}

impl std::fmt::Display for VerificationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Id => "ID",
            Self::Docs => "DOCS",
            Self::Review => "REVIEW",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct GateState {
    step: VerificationStep,
    documents: Vec<String>,
}

/// Document upload flow for one professional role.
#[derive(Debug, Clone)]
pub struct VerificationGate {
    config: Arc<SimConfig>,
    role: Role,
    state: Arc<Mutex<GateState>>,
    busy: BusySet,
}

impl VerificationGate {
    pub fn new(config: Arc<SimConfig>, role: Role) -> Self {
        Self {
            config,
            role,
            state: Arc::new(Mutex::new(GateState {
                step: VerificationStep::Id,
                documents: Vec::new(),
            })),
            busy: BusySet::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn step(&self) -> VerificationStep {
        self.state.lock().step
    }

    pub fn documents(&self) -> Vec<String> {
        self.state.lock().documents.clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.busy.is_busy(UPLOAD_KEY)
    }

    /// Upload the document for the current step and move to the next one.
    pub async fn upload_document(&self, name: &str) -> Result<VerificationStep, WorkflowError> {
        let _claim = match self.busy.try_claim(UPLOAD_KEY) {
            Some(claim) => claim,
            None => {
                warn!(role = %self.role, "upload ignored: another upload is in flight");
                return Err(WorkflowError::busy(UPLOAD_KEY));
            }
        };
        if self.step() == VerificationStep::Review {
            return Err(WorkflowError::ValidationBlocked(
                "all documents already uploaded".to_string(),
            ));
        }

        tokio::time::sleep(self.config.delay(self.config.timing.document_upload_ms)).await;

        let mut state = self.state.lock();
        state.documents.push(name.to_string());
        state.step = state.step.next();
        info!(role = %self.role, step = %state.step, "verification document uploaded");
        Ok(state.step)
    }

    /// Succeeds once every upload is done.
    pub fn ensure_complete(&self) -> Result<(), WorkflowError> {
        match self.step() {
            VerificationStep::Review => Ok(()),
            step => Err(WorkflowError::ValidationBlocked(format!(
                "verification incomplete at step {step}"
            ))),
        }
    }
}
