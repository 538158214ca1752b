//! Technician parts inventory.
//!
//! An item is low on stock once its count falls to its minimum threshold.
//! Low items can be flagged for restock once; the flag stays set until the
//! parts arrive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartGrade {
    #[serde(rename = "A+")]
    APlus,
    Refurbished,
}

impl std::fmt::Display for PartGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::APlus => f.write_str("A+"),
            Self::Refurbished => f.write_str("Refurbished"),
        }
    }
}

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("part {0} is not stocked")]
    UnknownPart(String),

    #[error("part {part} is above its restock threshold ({count} > {threshold})")]
    NotLow {
        part: String,
        count: u32,
        threshold: u32,
    },
}

/// One stocked part on a technician node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub part: String,
    pub count: u32,
    pub grade: PartGrade,
    pub min_threshold: u32,
    #[serde(default)]
    pub request_pending: bool,
}

impl InventoryItem {
    pub fn new(part: &str, count: u32, grade: PartGrade, min_threshold: u32) -> Self {
        Self {
            part: part.to_string(),
            count,
            grade,
            min_threshold,
            request_pending: false,
        }
    }

    pub fn is_low(&self) -> bool {
        self.count <= self.min_threshold
    }

    /// Flag the item for restock. Returns `true` if this call raised the
    /// flag and `false` if a request was already pending.
    pub fn request_restock(&mut self) -> Result<bool, InventoryError> {
        if !self.is_low() {
            return Err(InventoryError::NotLow {
                part: self.part.clone(),
                count: self.count,
                threshold: self.min_threshold,
            });
        }
        if self.request_pending {
            return Ok(false);
        }
        self.request_pending = true;
        Ok(true)
    }

    /// Receive a delivery and clear the pending flag.
    pub fn receive(&mut self, quantity: u32) {
        self.count = self.count.saturating_add(quantity);
        self.request_pending = false;
    }
}

/// Find an item by part name.
pub fn find_mut<'a>(
    items: &'a mut [InventoryItem],
    part: &str,
) -> Result<&'a mut InventoryItem, InventoryError> {
    items
        .iter_mut()
        .find(|i| i.part == part)
        .ok_or_else(|| InventoryError::UnknownPart(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let mut item = InventoryItem::new("ThinkPad Battery 57Wh", 5, PartGrade::APlus, 5);
        assert!(item.is_low());
        item.count = 6;
        assert!(!item.is_low());
    }

    #[test]
    fn restock_flag_is_raised_once() {
        let mut item = InventoryItem::new("OLED Controller IC", 2, PartGrade::Refurbished, 4);
        assert!(item.request_restock().unwrap());
        assert!(!item.request_restock().unwrap());
        assert!(item.request_pending);
        item.receive(50);
        assert!(!item.request_pending);
        assert_eq!(item.count, 52);
    }

    #[test]
    fn healthy_stock_cannot_be_flagged() {
        let mut item = InventoryItem::new("USB-C Charging Port", 22, PartGrade::APlus, 10);
        assert!(matches!(item.request_restock(), Err(InventoryError::NotLow { .. })));
        assert!(!item.request_pending);
    }

    #[test]
    fn find_by_part_name() {
        let mut items = vec![InventoryItem::new("LPDDR5 RAM 16GB", 14, PartGrade::APlus, 5)];
        assert!(find_mut(&mut items, "LPDDR5 RAM 16GB").is_ok());
        assert!(matches!(
            find_mut(&mut items, "Flux"),
            Err(InventoryError::UnknownPart(_))
        ));
    }

    #[test]
    fn grade_serializes_as_shown() {
        assert_eq!(serde_json::to_string(&PartGrade::APlus).unwrap(), r#""A+""#);
    }
}
