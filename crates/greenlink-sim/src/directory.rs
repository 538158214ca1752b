//! Partner directory of the network view.
//!
//! Lists registered technician hubs and recycler plants. A nearby scan
//! asks the location provider for a fix, but the scan continues whether or
//! not one is available: after `location_scan_ms` the first three partners
//! are given a distance and an arrival estimate.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::busy::BusySet;
use crate::config::SimConfig;
use crate::error::WorkflowError;
use crate::geolocation::LocationProvider;

const SCAN_KEY: &str = "directory:scan";
const NEARBY_MATCHES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerKind {
    Technician,
    Recycler,
}

/// A registered node in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PartnerKind,
    pub location: String,
    pub rating: f64,
    pub active_jobs: u32,
    pub status: String,
    pub license: String,
    pub specialties: Vec<String>,
    pub impact: String,
    #[serde(default, rename = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_arrival: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectoryFilter {
    #[default]
    All,
    Technician,
    Recycler,
    Nearby,
}

impl DirectoryFilter {
    pub fn matches(&self, partner: &Partner) -> bool {
        match self {
            Self::All => true,
            Self::Technician => partner.kind == PartnerKind::Technician,
            Self::Recycler => partner.kind == PartnerKind::Recycler,
            Self::Nearby => partner.distance_km.is_some(),
        }
    }
}

#[derive(Debug)]
struct DirectoryState {
    partners: Vec<Partner>,
    filter: DirectoryFilter,
    scan_result: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PartnerDirectory {
    config: Arc<SimConfig>,
    state: Arc<Mutex<DirectoryState>>,
    busy: BusySet,
}

impl PartnerDirectory {
    pub fn new(config: Arc<SimConfig>, partners: Vec<Partner>) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(DirectoryState {
                partners,
                filter: DirectoryFilter::All,
                scan_result: None,
            })),
            busy: BusySet::new(),
        }
    }

    pub fn partners(&self) -> Vec<Partner> {
        self.state.lock().partners.clone()
    }

    pub fn filter(&self) -> DirectoryFilter {
        self.state.lock().filter
    }

    pub fn set_filter(&self, filter: DirectoryFilter) {
        self.state.lock().filter = filter;
    }

    /// Partners passing the active filter.
    pub fn visible(&self) -> Vec<Partner> {
        let state = self.state.lock();
        state
            .partners
            .iter()
            .filter(|p| state.filter.matches(p))
            .cloned()
            .collect()
    }

    pub fn scan_result(&self) -> Option<String> {
        self.state.lock().scan_result.clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.busy.is_busy(SCAN_KEY)
    }

    /// Locate nearby nodes and switch the view to the nearby filter.
    pub async fn scan_nearby(&self, location: &dyn LocationProvider) -> Result<String, WorkflowError> {
        let _claim = self
            .busy
            .try_claim(SCAN_KEY)
            .ok_or_else(|| WorkflowError::busy(SCAN_KEY))?;
        self.state.lock().scan_result = None;

        match location.current_position() {
            Ok(at) => info!(lat = at.latitude, lng = at.longitude, "scanning from position"),
            Err(err) => warn!(error = %err, "scanning without a position"),
        }

        tokio::time::sleep(self.config.delay(self.config.timing.location_scan_ms)).await;

        let message = format!(
            "Cluster match successful. {NEARBY_MATCHES} Certified Nodes are ready for immediate dispatch."
        );
        let mut rng = rand::thread_rng();
        let mut state = self.state.lock();
        for (idx, partner) in state.partners.iter_mut().enumerate() {
            if idx < NEARBY_MATCHES {
                let km: f64 = rng.gen_range(0.5..5.5);
                partner.distance_km = Some((km * 10.0).round() / 10.0);
                partner.est_arrival = Some(format!("{} mins", rng.gen_range(20..60)));
            } else {
                partner.distance_km = None;
                partner.est_arrival = None;
            }
        }
        state.filter = DirectoryFilter::Nearby;
        state.scan_result = Some(message.clone());
        info!(matched = NEARBY_MATCHES, "nearby scan complete");
        Ok(message)
    }

    /// Send a message to a partner. Blank messages are not sent.
    pub async fn send_message(&self, partner_id: &str, text: &str) -> Result<String, WorkflowError> {
        if text.trim().is_empty() {
            return Err(WorkflowError::ValidationBlocked("message is empty".to_string()));
        }
        let name = self
            .state
            .lock()
            .partners
            .iter()
            .find(|p| p.id == partner_id)
            .map(|p| p.name.clone())
            .ok_or_else(|| WorkflowError::not_found("partner", partner_id))?;
        let _claim = self
            .busy
            .try_claim(&format!("directory:message:{partner_id}"))
            .ok_or_else(|| WorkflowError::busy(partner_id))?;

        tokio::time::sleep(self.config.delay(self.config.timing.message_send_ms)).await;

        info!(partner = %name, "message transmitted");
        Ok(format!("Secure message transmitted to {name}."))
    }
}

#[cfg(test)]
mod tests {
    use crate::geolocation::{FixedLocation, LocationError, NoLocation, HYDERABAD};
    use crate::seed;

    use super::*;

    fn directory() -> PartnerDirectory {
        PartnerDirectory::new(Arc::new(SimConfig::default()), seed::partners())
    }

    #[test]
    fn filters_by_kind() {
        let d = directory();
        assert_eq!(d.visible().len(), 5);
        d.set_filter(DirectoryFilter::Recycler);
        assert!(d.visible().iter().all(|p| p.kind == PartnerKind::Recycler));
        assert_eq!(d.visible().len(), 2);
        d.set_filter(DirectoryFilter::Nearby);
        assert!(d.visible().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn scan_assigns_three_nearby_nodes() {
        let d = directory();
        let message = d.scan_nearby(&FixedLocation(HYDERABAD)).await.unwrap();
        assert!(message.starts_with("Cluster match successful. 3 Certified Nodes"));
        assert_eq!(d.filter(), DirectoryFilter::Nearby);
        let nearby = d.visible();
        assert_eq!(nearby.len(), 3);
        for p in &nearby {
            let km = p.distance_km.unwrap();
            assert!((0.5..=5.5).contains(&km));
            let eta: u32 = p.est_arrival.as_deref().unwrap().trim_end_matches(" mins").parse().unwrap();
            assert!((20..60).contains(&eta));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scan_continues_without_location() {
        let d = directory();
        d.scan_nearby(&NoLocation(LocationError::Unavailable)).await.unwrap();
        assert_eq!(d.visible().len(), 3);
        assert!(d.scan_result().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_message_is_not_sent() {
        let d = directory();
        assert!(matches!(
            d.send_message("1", "   ").await,
            Err(WorkflowError::ValidationBlocked(_))
        ));
        assert_eq!(
            d.send_message("1", "Need pickup").await.unwrap(),
            "Secure message transmitted to EcoFix Hub."
        );
        assert!(d.send_message("99", "hi").await.is_err());
    }
}
