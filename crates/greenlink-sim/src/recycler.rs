//! # Recovery Plant
//!
//! The recycler's pipeline: inbound shipments are accepted as batches,
//! batches are advanced one recovery step at a time, and finished batches
//! are audited into the warehouse.
//!
//! A recovery step holds a per-batch claim for `recovery_step_ms`; a second
//! step on the same batch during that window is ignored. Commodity sale and
//! compliance export share one plant-wide export claim.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use greenlink_core::{BatchId, ShipmentId, Timestamp};
use greenlink_state::{
    yields_for, AuditRecord, BatchError, BatchStatus, InboundShipment, MaterialStock,
    MaterialYield, ProcessingBatch, Warehouse,
};

use crate::busy::BusySet;
use crate::config::SimConfig;
use crate::error::WorkflowError;

const EXPORT_KEY: &str = "recycler:export";

/// Compliance certificate produced by a policy export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCertificate {
    pub generated_at: Timestamp,
    pub audited_batches: Vec<BatchId>,
    pub batches_in_pipeline: usize,
    pub utilization_percent: u32,
}

#[derive(Debug)]
struct PlantState {
    batches: Vec<ProcessingBatch>,
    inbound: Vec<InboundShipment>,
    warehouse: Warehouse,
}

impl PlantState {
    fn batch(&self, id: &BatchId) -> Result<&ProcessingBatch, WorkflowError> {
        self.batches
            .iter()
            .find(|b| &b.id == id)
            .ok_or_else(|| WorkflowError::not_found("batch", id))
    }

    fn batch_mut(&mut self, id: &BatchId) -> Result<&mut ProcessingBatch, WorkflowError> {
        self.batches
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| WorkflowError::not_found("batch", id))
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryPlant {
    config: Arc<SimConfig>,
    state: Arc<Mutex<PlantState>>,
    busy: BusySet,
}

impl RecoveryPlant {
    pub fn new(
        config: Arc<SimConfig>,
        batches: Vec<ProcessingBatch>,
        inbound: Vec<InboundShipment>,
        stocks: Vec<MaterialStock>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(PlantState {
                batches,
                inbound,
                warehouse: Warehouse::new(stocks),
            })),
            busy: BusySet::new(),
        }
    }

    /// Active batches, most recently accepted first.
    pub fn batches(&self) -> Vec<ProcessingBatch> {
        self.state.lock().batches.clone()
    }

    pub fn batch(&self, id: &BatchId) -> Result<ProcessingBatch, WorkflowError> {
        self.state.lock().batch(id).cloned()
    }

    pub fn inbound(&self) -> Vec<InboundShipment> {
        self.state.lock().inbound.clone()
    }

    pub fn stocks(&self) -> Vec<MaterialStock> {
        self.state.lock().warehouse.stocks().to_vec()
    }

    pub fn audits(&self) -> Vec<AuditRecord> {
        self.state.lock().warehouse.audits().to_vec()
    }

    pub fn utilization_percent(&self) -> u32 {
        self.state.lock().warehouse.utilization_percent()
    }

    pub fn is_processing(&self, id: &BatchId) -> bool {
        self.busy.is_busy(id.as_str())
    }

    pub fn is_exporting(&self) -> bool {
        self.busy.is_busy(EXPORT_KEY)
    }

    /// Move a shipment from the inbound queue into the pipeline.
    pub fn accept_load(&self, id: &ShipmentId) -> Result<ProcessingBatch, WorkflowError> {
        let mut state = self.state.lock();
        let pos = state
            .inbound
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| WorkflowError::not_found("shipment", id))?;
        let batch = state.inbound.remove(pos).accept(Timestamp::now());
        state.batches.insert(0, batch.clone());
        info!(batch_id = %batch.id, origin = %batch.origin, "shipment accepted");
        Ok(batch)
    }

    /// Execute one recovery step on a batch.
    pub async fn advance(&self, id: &BatchId) -> Result<BatchStatus, WorkflowError> {
        let _claim = match self.busy.try_claim(id.as_str()) {
            Some(claim) => claim,
            None => {
                warn!(batch_id = %id, "recovery step ignored: batch is processing");
                return Err(WorkflowError::busy(id.as_str()));
            }
        };
        {
            let state = self.state.lock();
            let batch = state.batch(id)?;
            if batch.ready_for_audit() {
                return Err(BatchError::RecoveryComplete(id.clone()).into());
            }
        }
        debug!(batch_id = %id, "recovery step started");

        tokio::time::sleep(self.config.delay(self.config.timing.recovery_step_ms)).await;

        let mut state = self.state.lock();
        let batch = state.batch_mut(id)?;
        let status = batch.advance()?;
        info!(batch_id = %id, progress = batch.progress(), status = %status, "recovery step complete");
        Ok(status)
    }

    /// Estimated yield shown before confirming an audit.
    pub fn audit_preview(&self, id: &BatchId) -> Result<Vec<MaterialYield>, WorkflowError> {
        let state = self.state.lock();
        let batch = state.batch(id)?;
        batch.require_audit_ready()?;
        Ok(yields_for(batch))
    }

    /// Stock a finished batch's yield and retire it from the pipeline.
    pub fn finalize_audit(&self, id: &BatchId) -> Result<AuditRecord, WorkflowError> {
        if self.is_processing(id) {
            return Err(WorkflowError::busy(id.as_str()));
        }
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let pos = state
            .batches
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| WorkflowError::not_found("batch", id))?;
        let record = state.warehouse.finalize_audit(&state.batches[pos])?;
        state.batches.remove(pos);
        info!(batch_id = %id, yields = record.yields.len(), "audit finalized");
        Ok(record)
    }

    /// Sell half of every material to an authorized foundry.
    pub async fn sell_commodities(&self) -> Result<(), WorkflowError> {
        let _claim = self
            .busy
            .try_claim(EXPORT_KEY)
            .ok_or_else(|| WorkflowError::busy(EXPORT_KEY))?;
        tokio::time::sleep(self.config.delay(self.config.timing.commodity_sale_ms)).await;
        let mut state = self.state.lock();
        state.warehouse.sell_commodities();
        info!(
            utilization = state.warehouse.utilization_percent(),
            "commodity load transferred to foundry"
        );
        Ok(())
    }

    /// Generate the digital compliance certificate.
    pub async fn export_compliance_certificate(&self) -> Result<ComplianceCertificate, WorkflowError> {
        let _claim = self
            .busy
            .try_claim(EXPORT_KEY)
            .ok_or_else(|| WorkflowError::busy(EXPORT_KEY))?;
        tokio::time::sleep(self.config.delay(self.config.timing.compliance_export_ms)).await;
        let state = self.state.lock();
        let cert = ComplianceCertificate {
            generated_at: Timestamp::now(),
            audited_batches: state.warehouse.audits().iter().map(|a| a.batch_id.clone()).collect(),
            batches_in_pipeline: state.batches.len(),
            utilization_percent: state.warehouse.utilization_percent(),
        };
        info!(audited = cert.audited_batches.len(), "compliance certificate generated");
        Ok(cert)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use greenlink_core::NodeId;
    use greenlink_state::StockUnit;

    use super::*;

    fn plant() -> RecoveryPlant {
        let batches = vec![ProcessingBatch::new(
            BatchId::new("BATCH-BNG-404"),
            "Gachibowli Node",
            "Mixed Logic Boards",
            "85kg",
            85,
            80,
        )
        .unwrap()];
        let inbound = vec![InboundShipment {
            id: ShipmentId::new("SHIP-8821"),
            node: NodeId::new("NODE-BNG-012"),
            category: "Industrial PCBs".to_string(),
            weight: "42kg".to_string(),
            weight_num: 42,
        }];
        let stocks = vec![
            MaterialStock::new("mat-2", "Gold (99%)", 128.5, StockUnit::Grams, 500.0),
            MaterialStock::new("mat-3", "Copper", 42.1, StockUnit::Kilograms, 200.0),
        ];
        RecoveryPlant::new(Arc::new(SimConfig::default()), batches, inbound, stocks)
    }

    #[tokio::test(start_paused = true)]
    async fn accept_load_moves_shipment_to_pipeline() {
        let p = plant();
        let batch = p.accept_load(&ShipmentId::new("SHIP-8821")).unwrap();
        assert_eq!(batch.id, BatchId::new("BATCH-8821"));
        assert!(p.inbound().is_empty());
        assert_eq!(p.batches()[0].id, batch.id);
        assert!(p.accept_load(&ShipmentId::new("SHIP-8821")).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn advance_takes_recovery_delay() {
        let p = plant();
        let id = BatchId::new("BATCH-BNG-404");
        let p2 = p.clone();
        let id2 = id.clone();
        let task = tokio::spawn(async move { p2.advance(&id2).await });
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(p.is_processing(&id));
        assert_eq!(p.batch(&id).unwrap().progress(), 80);

        assert!(matches!(
            p.advance(&id).await,
            Err(WorkflowError::ConcurrentActionIgnored { .. })
        ));
        assert_eq!(task.await.unwrap().unwrap(), BatchStatus::FinalAudit);
        assert_eq!(p.batch(&id).unwrap().progress(), 100);
        assert!(!p.is_processing(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn advance_past_complete_is_rejected() {
        let p = plant();
        let id = BatchId::new("BATCH-BNG-404");
        p.advance(&id).await.unwrap();
        assert!(matches!(
            p.advance(&id).await,
            Err(WorkflowError::Batch(BatchError::RecoveryComplete(_)))
        ));
        assert_eq!(p.batch(&id).unwrap().progress(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn audit_stocks_and_retires_batch() {
        let p = plant();
        let id = BatchId::new("BATCH-BNG-404");
        assert!(p.finalize_audit(&id).is_err());
        p.advance(&id).await.unwrap();

        let preview = p.audit_preview(&id).unwrap();
        let record = p.finalize_audit(&id).unwrap();
        assert_eq!(record.yields, preview);
        assert!(p.batches().is_empty());
        assert_eq!(p.audits().len(), 1);
        let gold = p.stocks().into_iter().find(|m| m.name.contains("Gold")).unwrap();
        assert!((gold.weight - 132.75).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn commodity_sale_is_guarded() {
        let p = plant();
        let p2 = p.clone();
        let sale = tokio::spawn(async move { p2.sell_commodities().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(p.is_exporting());
        assert!(matches!(
            p.sell_commodities().await,
            Err(WorkflowError::ConcurrentActionIgnored { .. })
        ));
        sale.await.unwrap().unwrap();
        let copper = p.stocks().into_iter().find(|m| m.name == "Copper").unwrap();
        assert!((copper.weight - 21.05).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn compliance_certificate_lists_audits() {
        let p = plant();
        let id = BatchId::new("BATCH-BNG-404");
        p.advance(&id).await.unwrap();
        p.finalize_audit(&id).unwrap();
        let cert = p.export_compliance_certificate().await.unwrap();
        assert_eq!(cert.audited_batches, vec![id]);
        assert_eq!(cert.batches_in_pipeline, 0);
    }
}
