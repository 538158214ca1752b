//! # Restock Request State Machine
//!
//! ```text
//! Pending ──verify──▶ Verifying ──approve──▶ Approved ──dispatch──▶ Dispatched (terminal)
//! ```
//!
//! Strictly sequential; no step may be skipped or reversed. Every transition
//! appends to the audit log, which is never truncated or reordered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenlink_core::{NodeId, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RestockStatus {
    Pending,
    Verifying,
    Approved,
    Dispatched,
}

impl RestockStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dispatched)
    }

    /// The only status this one may move to.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Verifying),
            Self::Verifying => Some(Self::Approved),
            Self::Approved => Some(Self::Dispatched),
            Self::Dispatched => None,
        }
    }

    /// Audit entries written on entering this status.
    fn audit_entries(&self) -> &'static [&'static str] {
        match self {
            Self::Pending => &[],
            Self::Verifying => &["Commencing Regional Audit..."],
            Self::Approved => &["Registry Match Confirmed", "Authorized by NGO Central Command"],
            Self::Dispatched => &["Fleet GL-102 Dispatched", "ETD: 45mins"],
        }
    }
}

impl std::fmt::Display for RestockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Verifying => "Verifying",
            Self::Approved => "Approved",
            Self::Dispatched => "Dispatched",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Standard,
}

#[derive(Error, Debug)]
pub enum RestockError {
    #[error("invalid restock transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("restock request is in terminal state {state}")]
    TerminalState { state: String },
}

/// A supply replenishment ticket raised by a technician node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub id: RequestId,
    pub node: NodeId,
    pub item: String,
    pub current_stock: u32,
    pub requested_qty: u32,
    pub urgency: Urgency,
    pub status: RestockStatus,
    /// When the request was raised, as displayed.
    pub request_date: String,
    pub audit_log: Vec<String>,
}

impl RestockRequest {
    /// A pending request with its opening log entry.
    pub fn new(
        id: RequestId,
        node: NodeId,
        item: &str,
        current_stock: u32,
        requested_qty: u32,
        urgency: Urgency,
        logged_by: &str,
    ) -> Self {
        Self {
            id,
            node,
            item: item.to_string(),
            current_stock,
            requested_qty,
            urgency,
            status: RestockStatus::Pending,
            request_date: String::new(),
            audit_log: vec![format!("Request Logged by {logged_by}")],
        }
    }

    /// Operator starts the regional audit (Pending → Verifying).
    pub fn begin_verification(&mut self) -> Result<(), RestockError> {
        self.step(RestockStatus::Verifying)
    }

    /// Registry check passed (Verifying → Approved).
    pub fn approve(&mut self) -> Result<(), RestockError> {
        self.step(RestockStatus::Approved)
    }

    /// Fleet dispatched (Approved → Dispatched).
    pub fn dispatch(&mut self) -> Result<(), RestockError> {
        self.step(RestockStatus::Dispatched)
    }

    fn step(&mut self, to: RestockStatus) -> Result<(), RestockError> {
        if self.status.is_terminal() {
            return Err(RestockError::TerminalState {
                state: self.status.to_string(),
            });
        }
        if self.status.next() != Some(to) {
            return Err(RestockError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.audit_log
            .extend(to.audit_entries().iter().map(|e| e.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RestockRequest {
        RestockRequest::new(
            RequestId::new("REQ-401"),
            NodeId::new("NODE-HYD-042"),
            "OLED Controller IC",
            2,
            50,
            Urgency::High,
            "Tech A. Varma",
        )
    }

    #[test]
    fn test_full_pipeline_in_order() {
        let mut r = request();
        let mut lengths = vec![r.audit_log.len()];
        r.begin_verification().unwrap();
        lengths.push(r.audit_log.len());
        r.approve().unwrap();
        lengths.push(r.audit_log.len());
        r.dispatch().unwrap();
        lengths.push(r.audit_log.len());

        assert_eq!(r.status, RestockStatus::Dispatched);
        assert_eq!(lengths, vec![1, 2, 4, 6]);
        assert_eq!(
            r.audit_log,
            vec![
                "Request Logged by Tech A. Varma",
                "Commencing Regional Audit...",
                "Registry Match Confirmed",
                "Authorized by NGO Central Command",
                "Fleet GL-102 Dispatched",
                "ETD: 45mins",
            ]
        );
    }

    #[test]
    fn test_cannot_skip_steps() {
        let mut r = request();
        assert!(matches!(r.approve(), Err(RestockError::InvalidTransition { .. })));
        assert!(r.dispatch().is_err());
        assert_eq!(r.status, RestockStatus::Pending);
        assert_eq!(r.audit_log.len(), 1);
    }

    #[test]
    fn test_cannot_repeat_verification() {
        let mut r = request();
        r.begin_verification().unwrap();
        assert!(r.begin_verification().is_err());
        assert_eq!(r.audit_log.len(), 2);
    }

    #[test]
    fn test_dispatched_is_terminal() {
        let mut r = request();
        r.begin_verification().unwrap();
        r.approve().unwrap();
        r.dispatch().unwrap();
        assert!(matches!(r.dispatch(), Err(RestockError::TerminalState { .. })));
    }

    #[test]
    fn test_next_is_strictly_increasing() {
        let mut s = RestockStatus::Pending;
        while let Some(n) = s.next() {
            assert!(n > s);
            s = n;
        }
        assert_eq!(s, RestockStatus::Dispatched);
    }
}
