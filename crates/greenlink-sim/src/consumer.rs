//! # Consumer Desk
//!
//! Device intake, green credits and nearby-recycler lookup for a citizen.
//!
//! Every submission awards points through the gamification engine. A
//! REPAIR submission leaves the device in Pickup-Requested; a logistics
//! dispatch then moves the first pending device in list order (the most
//! recent submission) to In-Repair after `logistics_dispatch_ms`. At most
//! one dispatch is pending at a time. Every change to the device list
//! cancels it and restarts the timer against the re-evaluated ledger, and
//! a dispatch that fires schedules the next pending device, if any.
//!
//! Dispatch scheduling spawns onto the current Tokio runtime. Outside a
//! runtime the submission still succeeds and the device stays pending
//! until the next submission made inside one.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use greenlink_core::{DeviceId, Notification, NotificationKind};
use greenlink_scoring::{award_points_with, Award, UserStats, REFERRAL_BONUS};
use greenlink_state::{Device, DeviceLedger, Submission, SubmissionAction, SubmissionReceipt};

use crate::busy::BusySet;
use crate::config::SimConfig;
use crate::error::WorkflowError;
use crate::geolocation::LocationProvider;

const LOCATE_KEY: &str = "consumer:locate";

/// A recycling point returned by the nearby lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRecycler {
    pub id: String,
    pub name: String,
    pub distance: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: f64,
    pub address: String,
}

fn mock_nearby() -> Vec<NearbyRecycler> {
    [
        ("rec-1", "GreenLoop Cyberabad", "1.2 km", "Industrial Recycler", 4.9, "HITEC City Node 4"),
        ("rec-2", "EcoMend Repairs", "2.4 km", "Premium Service Hub", 4.8, "Madhapur Main Rd"),
        ("rec-3", "ZeroWaste Gachibowli", "3.1 km", "E-Waste Drop-off", 4.7, "DLF Cyber City"),
    ]
    .into_iter()
    .map(|(id, name, distance, kind, rating, address)| NearbyRecycler {
        id: id.to_string(),
        name: name.to_string(),
        distance: distance.to_string(),
        kind: kind.to_string(),
        rating,
        address: address.to_string(),
    })
    .collect()
}

/// Result of a device submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub receipt: SubmissionReceipt,
    pub award: Award,
}

#[derive(Debug)]
struct PendingDispatch {
    device_id: DeviceId,
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
struct ConsumerState {
    stats: UserStats,
    ledger: DeviceLedger,
    notifications: Vec<Notification>,
    dispatch: Option<PendingDispatch>,
    dispatch_generation: u64,
    nearby: Vec<NearbyRecycler>,
    location_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConsumerDesk {
    config: Arc<SimConfig>,
    owner: String,
    state: Arc<Mutex<ConsumerState>>,
    busy: BusySet,
}

impl ConsumerDesk {
    /// An empty desk with the configured starting stats.
    pub fn new(config: Arc<SimConfig>) -> Self {
        Self::with_devices(config, Vec::new())
    }

    /// A desk pre-populated with devices, most recent first.
    pub fn with_devices(config: Arc<SimConfig>, devices: Vec<Device>) -> Self {
        let state = ConsumerState {
            stats: config.starting_stats.clone(),
            ledger: DeviceLedger::with_devices(devices),
            notifications: Vec::new(),
            dispatch: None,
            dispatch_generation: 0,
            nearby: Vec::new(),
            location_error: None,
        };
        Self {
            config,
            owner: "Self".to_string(),
            state: Arc::new(Mutex::new(state)),
            busy: BusySet::new(),
        }
    }

    pub fn stats(&self) -> UserStats {
        self.state.lock().stats.clone()
    }

    /// All devices, most recent first.
    pub fn devices(&self) -> Vec<Device> {
        self.state.lock().ledger.devices().to_vec()
    }

    pub fn device(&self, id: &DeviceId) -> Option<Device> {
        self.state.lock().ledger.get(id).cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.lock().notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn mark_all_read(&self) {
        for n in &mut self.state.lock().notifications {
            n.mark_read();
        }
    }

    /// The device a logistics dispatch is currently scheduled for.
    pub fn scheduled_dispatch(&self) -> Option<DeviceId> {
        self.state.lock().dispatch.as_ref().map(|p| p.device_id.clone())
    }

    /// Submit a device and award its green credits.
    pub fn submit(&self, submission: Submission) -> Result<SubmissionOutcome, WorkflowError> {
        let action = submission.action();
        let outcome = {
            let mut state = self.state.lock();
            let receipt = state.ledger.submit(submission, &self.owner)?;
            let award = self.award(&mut state, receipt.points);
            if action == SubmissionAction::Eol {
                state.notifications.push(Notification::new(
                    NotificationKind::Warning,
                    "EOL Node Dispatched",
                    "Hazardous-material logistics have been assigned to your device.",
                ));
            }
            SubmissionOutcome { receipt, award }
        };
        info!(
            device_id = %outcome.receipt.device_id,
            action = %action,
            status = %outcome.receipt.status,
            points = outcome.receipt.points,
            "device submitted"
        );
        self.schedule_dispatch();
        Ok(outcome)
    }

    /// Share a referral link.
    pub fn refer_friend(&self) -> Award {
        let mut state = self.state.lock();
        let award = self.award(&mut state, REFERRAL_BONUS);
        info!(points = REFERRAL_BONUS, "referral reward added");
        award
    }

    /// Look up recycling points near the consumer.
    ///
    /// On failure the advisory text is recorded and `LocationUnavailable`
    /// returned; calling again retries.
    pub async fn locate_nearby_recyclers(
        &self,
        provider: &dyn LocationProvider,
    ) -> Result<Vec<NearbyRecycler>, WorkflowError> {
        let _claim = self
            .busy
            .try_claim(LOCATE_KEY)
            .ok_or_else(|| WorkflowError::busy(LOCATE_KEY))?;
        self.state.lock().location_error = None;

        if let Err(e) = provider.current_position() {
            warn!(error = %e, "location lookup failed");
            self.state.lock().location_error = Some(e.to_string());
            return Err(e.into());
        }

        tokio::time::sleep(self.config.delay(self.config.timing.location_scan_ms)).await;
        let nearby = mock_nearby();
        self.state.lock().nearby = nearby.clone();
        debug!(count = nearby.len(), "nearby recyclers resolved");
        Ok(nearby)
    }

    pub fn nearby_recyclers(&self) -> Vec<NearbyRecycler> {
        self.state.lock().nearby.clone()
    }

    pub fn location_error(&self) -> Option<String> {
        self.state.lock().location_error.clone()
    }

    pub fn is_locating(&self) -> bool {
        self.busy.is_busy(LOCATE_KEY)
    }

    fn award(&self, state: &mut ConsumerState, amount: u64) -> Award {
        let award = award_points_with(&state.stats, amount, self.config.level_up_policy);
        state.stats = award.stats.clone();
        if award.leveled_up {
            info!(level = award.stats.level, rank = %award.stats.rank, "level up");
            state.notifications.push(Notification::new(
                NotificationKind::Success,
                "Rank Promoted!",
                format!("Level {} reached. Rank: {}.", award.stats.level, award.stats.rank),
            ));
        }
        award
    }

    /// Cancel any pending logistics dispatch and restart the timer for the
    /// first pending device in the current ledger.
    fn schedule_dispatch(&self) {
        let mut state = self.state.lock();
        if let Some(pending) = state.dispatch.take() {
            pending.handle.abort();
            debug!(device_id = %pending.device_id, "logistics dispatch reset");
        }
        let Some(device_id) = state.ledger.first_pending_pickup().cloned() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(device_id = %device_id, "no async runtime; logistics dispatch not scheduled");
            return;
        };
        state.dispatch_generation += 1;
        let generation = state.dispatch_generation;
        let delay = self.config.delay(self.config.timing.logistics_dispatch_ms);
        let desk = self.clone();
        let target = device_id.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            desk.run_dispatch(&target, generation);
        });
        debug!(device_id = %device_id, delay_ms = delay.as_millis() as u64, "logistics dispatch scheduled");
        state.dispatch = Some(PendingDispatch {
            device_id,
            generation,
            handle,
        });
    }

    fn run_dispatch(&self, device_id: &DeviceId, generation: u64) {
        {
            let mut state = self.state.lock();
            // A reset may land after the timer fired but before the lock.
            if state.dispatch.as_ref().map(|p| p.generation) != Some(generation) {
                return;
            }
            state.dispatch = None;
            match state.ledger.get_mut(device_id).map(|d| d.begin_repair()) {
                Ok(Ok(())) => info!(device_id = %device_id, "logistics dispatch: device in repair"),
                Ok(Err(e)) => debug!(device_id = %device_id, error = %e, "dispatch skipped"),
                Err(e) => debug!(device_id = %device_id, error = %e, "dispatch target gone"),
            }
        }
        self.schedule_dispatch();
    }
}
