//! # NGO Restock Desk
//!
//! Regional oversight of technician supply requests. An operator starts
//! verification on a pending request; from then on the request is driven by
//! timers alone: Verifying, then Approved after `restock_verify_ms`, then
//! Dispatched after a further `restock_dispatch_ms`.
//!
//! The pipeline runs in a spawned task so dropping the caller's handle does
//! not cancel it. A second start on a request already in flight is ignored.
//!
//! The desk also carries the contributor leaderboard and the twelve-month
//! impact index, which a timed refresh re-samples.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use greenlink_core::{NodeId, RequestId};
use greenlink_state::{RestockRequest, RestockStatus, Urgency};

use crate::busy::BusySet;
use crate::config::SimConfig;
use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeHealth {
    Online,
    Offline,
    Warning,
}

/// Health of a regional node as shown on the oversight map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub id: NodeId,
    pub name: String,
    pub status: NodeHealth,
    pub utilization: u32,
    pub last_sync: String,
}

/// Counts shown in the oversight header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockSummary {
    pub pending: usize,
    pub in_flight: usize,
    pub dispatched: usize,
    pub high_urgency_open: usize,
}

/// Devices a contributor has handed over, by class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    pub laptops: u32,
    pub phones: u32,
    pub misc: u32,
}

impl Contributions {
    pub fn total(&self) -> u32 {
        self.laptops + self.phones + self.misc
    }
}

/// A citizen on the regional leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub id: String,
    pub name: String,
    pub points: u64,
    pub impact: String,
    pub category: String,
    pub badges: Vec<String>,
    pub contributions: Contributions,
    pub join_date: String,
    pub last_action: String,
    pub toxins_diverted: String,
    pub regional_rank: u32,
}

/// Months in the impact index.
pub const IMPACT_INDEX_MONTHS: usize = 12;

const INDEX_KEY: &str = "ngo:index";

/// Opening impact index, January first.
pub const SEED_IMPACT_INDEX: [u32; IMPACT_INDEX_MONTHS] =
    [45, 62, 58, 88, 72, 95, 82, 64, 89, 75, 68, 92];

#[derive(Debug)]
struct DeskState {
    requests: Vec<RestockRequest>,
    nodes: Vec<NodeStatus>,
    contributors: Vec<Contributor>,
    impact_index: Vec<u32>,
}

impl DeskState {
    fn request_mut(&mut self, id: &RequestId) -> Result<&mut RestockRequest, WorkflowError> {
        self.requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WorkflowError::not_found("restock request", id))
    }
}

#[derive(Debug, Clone)]
pub struct RestockDesk {
    config: Arc<SimConfig>,
    state: Arc<Mutex<DeskState>>,
    busy: BusySet,
}

impl RestockDesk {
    pub fn new(config: Arc<SimConfig>, requests: Vec<RestockRequest>, nodes: Vec<NodeStatus>) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(DeskState {
                requests,
                nodes,
                contributors: Vec::new(),
                impact_index: SEED_IMPACT_INDEX.to_vec(),
            })),
            busy: BusySet::new(),
        }
    }

    /// Attach the contributor leaderboard.
    pub fn with_contributors(self, contributors: Vec<Contributor>) -> Self {
        self.state.lock().contributors = contributors;
        self
    }

    /// Contributors, highest points first.
    pub fn leaderboard(&self) -> Vec<Contributor> {
        let mut board = self.state.lock().contributors.clone();
        board.sort_by(|a, b| b.points.cmp(&a.points).then(a.regional_rank.cmp(&b.regional_rank)));
        board
    }

    pub fn contributor(&self, id: &str) -> Result<Contributor, WorkflowError> {
        self.state
            .lock()
            .contributors
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| WorkflowError::not_found("contributor", id))
    }

    pub fn impact_index(&self) -> Vec<u32> {
        self.state.lock().impact_index.clone()
    }

    pub fn is_refreshing_index(&self) -> bool {
        self.busy.is_busy(INDEX_KEY)
    }

    /// Re-sample the impact index after `index_refresh_ms`. Each month
    /// lands in `45..95`.
    pub async fn refresh_impact_index(&self) -> Result<Vec<u32>, WorkflowError> {
        let _claim = self
            .busy
            .try_claim(INDEX_KEY)
            .ok_or_else(|| WorkflowError::busy(INDEX_KEY))?;
        tokio::time::sleep(self.config.delay(self.config.timing.index_refresh_ms)).await;

        let mut rng = rand::thread_rng();
        let index: Vec<u32> = (0..IMPACT_INDEX_MONTHS).map(|_| rng.gen_range(45..95)).collect();
        self.state.lock().impact_index = index.clone();
        info!(months = index.len(), "impact index refreshed");
        Ok(index)
    }

    pub fn requests(&self) -> Vec<RestockRequest> {
        self.state.lock().requests.clone()
    }

    pub fn request(&self, id: &RequestId) -> Result<RestockRequest, WorkflowError> {
        self.state.lock().request_mut(id).map(|r| r.clone())
    }

    pub fn nodes(&self) -> Vec<NodeStatus> {
        self.state.lock().nodes.clone()
    }

    pub fn is_verifying(&self, id: &RequestId) -> bool {
        self.busy.is_busy(id.as_str())
    }

    pub fn summary(&self) -> RestockSummary {
        let state = self.state.lock();
        let mut summary = RestockSummary::default();
        for r in &state.requests {
            match r.status {
                RestockStatus::Pending => summary.pending += 1,
                RestockStatus::Verifying | RestockStatus::Approved => summary.in_flight += 1,
                RestockStatus::Dispatched => summary.dispatched += 1,
            }
            if r.urgency == Urgency::High && !r.status.is_terminal() {
                summary.high_urgency_open += 1;
            }
        }
        summary
    }

    /// Move a pending request into verification and schedule the rest of
    /// the pipeline. The returned handle resolves with the dispatched request.
    pub fn start_verification(
        &self,
        id: &RequestId,
    ) -> Result<JoinHandle<Result<RestockRequest, WorkflowError>>, WorkflowError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| WorkflowError::NoRuntime("restock verification"))?;
        let claim = match self.busy.try_claim(id.as_str()) {
            Some(claim) => claim,
            None => {
                warn!(request_id = %id, "verification ignored: already in flight");
                return Err(WorkflowError::busy(id.as_str()));
            }
        };
        self.state.lock().request_mut(id)?.begin_verification()?;
        info!(request_id = %id, status = %RestockStatus::Verifying, "restock verification started");

        let desk = self.clone();
        let id = id.clone();
        Ok(handle.spawn(async move {
            let _claim = claim;
            desk.run_pipeline(&id).await
        }))
    }

    /// Start verification and wait for dispatch.
    pub async fn verify(&self, id: &RequestId) -> Result<RestockRequest, WorkflowError> {
        self.start_verification(id)?.await?
    }

    async fn run_pipeline(&self, id: &RequestId) -> Result<RestockRequest, WorkflowError> {
        let timing = &self.config.timing;
        debug!(request_id = %id, delay_ms = timing.restock_verify_ms, "registry check scheduled");
        tokio::time::sleep(self.config.delay(timing.restock_verify_ms)).await;
        self.state.lock().request_mut(id)?.approve()?;
        info!(request_id = %id, status = %RestockStatus::Approved, "restock request approved");

        tokio::time::sleep(self.config.delay(timing.restock_dispatch_ms)).await;
        let mut state = self.state.lock();
        let request = state.request_mut(id)?;
        request.dispatch()?;
        info!(request_id = %id, status = %RestockStatus::Dispatched, "restock fleet dispatched");
        Ok(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn desk() -> RestockDesk {
        let requests = vec![
            RestockRequest::new(
                RequestId::new("REQ-401"),
                NodeId::new("NODE-HYD-042"),
                "OLED Controller IC",
                2,
                50,
                Urgency::High,
                "Tech A. Varma",
            ),
            RestockRequest::new(
                RequestId::new("REQ-403"),
                NodeId::new("NODE-CHE-005"),
                "ThinkPad Battery 57Wh",
                4,
                100,
                Urgency::Standard,
                "Site Manager",
            ),
        ];
        RestockDesk::new(Arc::new(SimConfig::default()), requests, Vec::new())
    }

    #[tokio::test(start_paused = true)]
    async fn pipeline_is_timer_driven() {
        let d = desk();
        let id = RequestId::new("REQ-401");
        let handle = d.start_verification(&id).unwrap();
        assert_eq!(d.request(&id).unwrap().status, RestockStatus::Verifying);

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(d.request(&id).unwrap().status, RestockStatus::Approved);

        let done = handle.await.unwrap().unwrap();
        assert_eq!(done.status, RestockStatus::Dispatched);
        assert_eq!(done.audit_log[0], "Request Logged by Tech A. Varma");
        assert!(done.audit_log.iter().any(|e| e == "Registry Match Confirmed"));
        assert!(!d.is_verifying(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_does_not_cancel() {
        let d = desk();
        let id = RequestId::new("REQ-403");
        drop(d.start_verification(&id).unwrap());
        tokio::time::sleep(Duration::from_millis(6000)).await;
        assert_eq!(d.request(&id).unwrap().status, RestockStatus::Dispatched);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_ignored() {
        let d = desk();
        let id = RequestId::new("REQ-401");
        let handle = d.start_verification(&id).unwrap();
        assert!(matches!(
            d.start_verification(&id),
            Err(WorkflowError::ConcurrentActionIgnored { .. })
        ));
        handle.await.unwrap().unwrap();
        // Dispatched is terminal.
        assert!(matches!(d.verify(&id).await, Err(WorkflowError::Restock(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn summary_counts_by_status() {
        let d = desk();
        assert_eq!(d.summary().pending, 2);
        assert_eq!(d.summary().high_urgency_open, 1);
        d.verify(&RequestId::new("REQ-401")).await.unwrap();
        let s = d.summary();
        assert_eq!((s.pending, s.dispatched, s.high_urgency_open), (1, 1, 0));
    }

    fn contributor(id: &str, name: &str, points: u64, rank: u32) -> Contributor {
        Contributor {
            id: id.to_string(),
            name: name.to_string(),
            points,
            impact: "10kg".to_string(),
            category: "Gold Guardian".to_string(),
            badges: Vec::new(),
            contributions: Contributions { laptops: 1, phones: 2, misc: 3 },
            join_date: "Jan 2024".to_string(),
            last_action: "2h ago".to_string(),
            toxins_diverted: "0.1kg".to_string(),
            regional_rank: rank,
        }
    }

    #[test]
    fn leaderboard_orders_by_points() {
        let d = desk().with_contributors(vec![
            contributor("3", "Kiran Deep", 9500, 3),
            contributor("1", "Arjun Mehta", 14200, 1),
            contributor("2", "Priya Sharma", 12800, 2),
        ]);
        let names: Vec<_> = d.leaderboard().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Arjun Mehta", "Priya Sharma", "Kiran Deep"]);
        assert_eq!(d.contributor("2").unwrap().contributions.total(), 6);
        assert!(matches!(d.contributor("9"), Err(WorkflowError::NotFound { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn impact_index_refresh_is_timed_and_bounded() {
        let d = desk();
        assert_eq!(d.impact_index(), SEED_IMPACT_INDEX.to_vec());

        let d2 = d.clone();
        let refresh = tokio::spawn(async move { d2.refresh_impact_index().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(d.is_refreshing_index());
        assert!(matches!(
            d.refresh_impact_index().await,
            Err(WorkflowError::ConcurrentActionIgnored { .. })
        ));
        assert_eq!(d.impact_index(), SEED_IMPACT_INDEX.to_vec());

        let index = refresh.await.unwrap().unwrap();
        assert_eq!(index.len(), IMPACT_INDEX_MONTHS);
        assert!(index.iter().all(|v| (45..95).contains(v)));
        assert_eq!(d.impact_index(), index);
        assert!(!d.is_refreshing_index());
    }

    #[test]
    fn start_without_runtime_is_reported() {
        let d = desk();
        assert!(matches!(
            d.start_verification(&RequestId::new("REQ-401")),
            Err(WorkflowError::NoRuntime(_))
        ));
        assert_eq!(
            d.request(&RequestId::new("REQ-401")).unwrap().status,
            RestockStatus::Pending
        );
    }
}
