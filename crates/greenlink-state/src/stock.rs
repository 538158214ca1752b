//! # Recovered Material Warehouse
//!
//! Stock is changed by exactly two operations: stocking the yield of an
//! audited batch, and a bulk commodity sale that halves every material.
//! Both take `&mut Warehouse`, so each read-modify-write is atomic with
//! respect to whoever holds the warehouse.

use serde::{Deserialize, Serialize};

use greenlink_core::{BatchId, Timestamp};

use crate::batch::{BatchError, ProcessingBatch};

/// Yield factors applied to a batch's weight number.
const YIELD_TABLE: &[YieldFactor] = &[
    YieldFactor { material: "Rare Earth", factor: 0.01, applies: Applies::BoardsOnly },
    YieldFactor { material: "Gold", factor: 0.05, applies: Applies::BoardsOnly },
    YieldFactor { material: "Plastics", factor: 0.30, applies: Applies::NonBoardsOnly },
    YieldFactor { material: "Copper", factor: 0.15, applies: Applies::Always },
    YieldFactor { material: "Aluminium", factor: 0.40, applies: Applies::Always },
];

/// Capacity given to a material created on first stocking.
const DEFAULT_NEW_CAPACITY_KG: f64 = 1000.0;

#[derive(Clone, Copy)]
enum Applies {
    Always,
    BoardsOnly,
    NonBoardsOnly,
}

struct YieldFactor {
    material: &'static str,
    factor: f64,
    applies: Applies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockUnit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "kg")]
    Kilograms,
}

impl StockUnit {
    /// Convert an amount in this unit to kilograms.
    pub fn to_kg(&self, amount: f64) -> f64 {
        match self {
            Self::Grams => amount / 1000.0,
            Self::Kilograms => amount,
        }
    }
}

impl std::fmt::Display for StockUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grams => f.write_str("g"),
            Self::Kilograms => f.write_str("kg"),
        }
    }
}

/// One recovered material held in the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialStock {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub unit: StockUnit,
    /// Storage capacity, in `unit`.
    pub capacity: f64,
}

impl MaterialStock {
    pub fn new(id: &str, name: &str, weight: f64, unit: StockUnit, capacity: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            weight,
            unit,
            capacity,
        }
    }

    /// Fill level of this material, clamped to 100.
    pub fn fill_percent(&self) -> u32 {
        if self.capacity <= 0.0 {
            return 0;
        }
        ((self.weight / self.capacity) * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// Amount of one material recovered from a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialYield {
    pub material: String,
    pub amount: f64,
}

/// Compute the yield of an audited batch.
pub fn yields_for(batch: &ProcessingBatch) -> Vec<MaterialYield> {
    let board = batch.is_board();
    let weight = f64::from(batch.weight_num);
    YIELD_TABLE
        .iter()
        .filter(|y| match y.applies {
            Applies::Always => true,
            Applies::BoardsOnly => board,
            Applies::NonBoardsOnly => !board,
        })
        .map(|y| MaterialYield {
            material: y.material.to_string(),
            amount: weight * y.factor,
        })
        .collect()
}

/// Archive entry written when a batch audit is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub batch_id: BatchId,
    pub origin: String,
    #[serde(rename = "type")]
    pub batch_type: String,
    pub weight_num: u32,
    pub toxins: Vec<String>,
    pub yields: Vec<MaterialYield>,
    pub audited_at: Timestamp,
}

/// The recycler's material stock and audit archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    stocks: Vec<MaterialStock>,
    #[serde(default)]
    audits: Vec<AuditRecord>,
}

impl Warehouse {
    pub fn new(stocks: Vec<MaterialStock>) -> Self {
        Self {
            stocks,
            audits: Vec::new(),
        }
    }

    pub fn stocks(&self) -> &[MaterialStock] {
        &self.stocks
    }

    /// Completed audits, oldest first.
    pub fn audits(&self) -> &[AuditRecord] {
        &self.audits
    }

    /// First material whose name contains `needle`.
    pub fn find(&self, needle: &str) -> Option<&MaterialStock> {
        self.stocks.iter().find(|m| m.name.contains(needle))
    }

    /// Stock the yield of a finished batch and archive the audit.
    ///
    /// Each yield is added to the first material whose name contains the
    /// yield's material key. A material with no stock entry yet is created
    /// in kilograms.
    pub fn finalize_audit(&mut self, batch: &ProcessingBatch) -> Result<AuditRecord, BatchError> {
        batch.require_audit_ready()?;
        let yields = yields_for(batch);
        for y in &yields {
            match self.stocks.iter_mut().find(|m| m.name.contains(y.material.as_str())) {
                Some(stock) => stock.weight += y.amount,
                None => self.stocks.push(MaterialStock::new(
                    &format!("mat-{}", self.stocks.len() + 1),
                    &y.material,
                    y.amount,
                    StockUnit::Kilograms,
                    DEFAULT_NEW_CAPACITY_KG,
                )),
            }
        }
        let record = AuditRecord {
            batch_id: batch.id.clone(),
            origin: batch.origin.clone(),
            batch_type: batch.batch_type.clone(),
            weight_num: batch.weight_num,
            toxins: batch.toxins.clone(),
            yields,
            audited_at: Timestamp::now(),
        };
        self.audits.push(record.clone());
        Ok(record)
    }

    /// Bulk commodity sale: every material is halved.
    pub fn sell_commodities(&mut self) {
        for stock in &mut self.stocks {
            stock.weight *= 0.5;
        }
    }

    /// Total stored weight over total capacity, both in kilograms, as a
    /// rounded percentage.
    pub fn utilization_percent(&self) -> u32 {
        let (weight, capacity) = self.stocks.iter().fold((0.0, 0.0), |(w, c), m| {
            (w + m.unit.to_kg(m.weight), c + m.unit.to_kg(m.capacity))
        });
        if capacity <= 0.0 {
            return 0;
        }
        ((weight / capacity) * 100.0).round().max(0.0) as u32
    }
}
