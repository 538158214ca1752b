//! Demo seed data.
//!
//! The fixed records every dashboard starts with, and [`DemoNetwork`], which
//! wires them into one desk per role.

use std::sync::Arc;

use greenlink_core::{BatchId, JobId, NodeId, RequestId, ShipmentId};
use greenlink_crypto::NodeKeyPair;
use greenlink_state::{
    AssetClass, BatchError, Device, DeviceCategory, DeviceStatus, InboundShipment, InventoryItem,
    MaterialStock, PartGrade, Priority, ProcessingBatch, RepairJob, RestockRequest, StockUnit,
    Urgency,
};

use crate::config::SimConfig;
use crate::consumer::ConsumerDesk;
use crate::directory::{Partner, PartnerDirectory, PartnerKind};
use crate::ngo::{Contributions, Contributor, NodeHealth, NodeStatus, RestockDesk};
use crate::recycler::RecoveryPlant;
use crate::technician::Workbench;

pub fn devices() -> Vec<Device> {
    vec![
        Device::seeded("991", DeviceCategory::Computing, "MacBook Pro", "5", "Display Flicker", DeviceStatus::InRepair),
        Device::seeded("992", DeviceCategory::Mobile, "iPhone 12", "3", "Software Errors", DeviceStatus::Repaired),
        Device::seeded("993", DeviceCategory::Entertainment, "Old Monitor", "8", "Damaged Panel", DeviceStatus::Recycled),
    ]
}

fn job(
    id: &str,
    device: &str,
    issue: &str,
    dist: &str,
    date: &str,
    asset_class: AssetClass,
    priority: Priority,
) -> RepairJob {
    let mut job = RepairJob::new(JobId::new(id), device, issue, asset_class, priority);
    job.dist = dist.to_string();
    job.date = date.to_string();
    job
}

pub fn repair_jobs() -> Vec<RepairJob> {
    let mut thinkpad = job(
        "ASSET-2026-001",
        "ThinkPad X1 Carbon Gen 9",
        "Intermittent Power Failure / Logic Board Shorts",
        "0.4 km",
        "12m ago",
        AssetClass::Government,
        Priority::High,
    );
    thinkpad.notes = vec![
        "Initial inspection: Exterior chassis shows slight oxidation.".to_string(),
        "Battery terminals test positive for voltage but fail load test.".to_string(),
    ];
    thinkpad.parts_to_replace = vec!["ThinkPad Battery 57Wh".to_string()];

    vec![
        thinkpad,
        job(
            "ASSET-2026-002",
            "Pixel 7 Pro",
            "Broken Digitizer & Rapid Battery Drain",
            "2.1 km",
            "1h ago",
            AssetClass::Consumer,
            Priority::Standard,
        ),
        job(
            "ASSET-2026-003",
            "Cisco Catalyst Switch",
            "Firmware Corruption & Fan Failure",
            "1.2 km",
            "2h ago",
            AssetClass::Enterprise,
            Priority::High,
        ),
    ]
}

pub fn inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::new("LPDDR5 RAM 16GB", 14, PartGrade::APlus, 5),
        InventoryItem::new("OLED Controller IC", 2, PartGrade::Refurbished, 4),
        InventoryItem::new("ThinkPad Battery 57Wh", 3, PartGrade::APlus, 5),
        InventoryItem::new("USB-C Charging Port", 22, PartGrade::APlus, 10),
        InventoryItem::new("M.2 NVMe SSD 512GB", 1, PartGrade::Refurbished, 3),
    ]
}

pub fn batches() -> Result<Vec<ProcessingBatch>, BatchError> {
    Ok(vec![
        ProcessingBatch::new(BatchId::new("BATCH-HYD-102"), "Miyapur Node", "Lithium-Ion Mix", "420kg", 420, 65)?
            .with_toxins(&["Cobalt", "Lithium"])
            .with_logs(&["Batch arrived", "Initial weighing complete", "Sorting initialized"]),
        ProcessingBatch::new(BatchId::new("BATCH-BNG-404"), "Gachibowli Node", "Mixed Logic Boards", "85kg", 85, 90)?
            .with_toxins(&["Lead", "Mercury"])
            .with_logs(&["Batch arrived", "Shredding complete", "Chemical leaching active"]),
    ])
}

pub fn materials() -> Vec<MaterialStock> {
    vec![
        MaterialStock::new("mat-1", "Rare Earth Elements", 4.2, StockUnit::Grams, 10.0),
        MaterialStock::new("mat-2", "Gold (99%)", 128.5, StockUnit::Grams, 500.0),
        MaterialStock::new("mat-3", "Copper", 42.1, StockUnit::Kilograms, 200.0),
        MaterialStock::new("mat-4", "Aluminium", 890.0, StockUnit::Kilograms, 2000.0),
    ]
}

fn shipment(id: &str, node: &str, category: &str, weight: &str, weight_num: u32) -> InboundShipment {
    InboundShipment {
        id: ShipmentId::new(id),
        node: NodeId::new(node),
        category: category.to_string(),
        weight: weight.to_string(),
        weight_num,
    }
}

pub fn inbound() -> Vec<InboundShipment> {
    vec![
        shipment("SHIP-9912", "NODE-HYD-042", "EOL Consumer Mix", "182kg", 182),
        shipment("SHIP-8821", "NODE-BNG-012", "Industrial PCBs", "42kg", 42),
        shipment("SHIP-7710", "NODE-CHE-005", "Server Components", "1.2 Tons", 1200),
    ]
}

#[allow(clippy::too_many_arguments)]
fn request(
    id: &str,
    node: &str,
    item: &str,
    current: u32,
    qty: u32,
    urgency: Urgency,
    logged_by: &str,
    date: &str,
) -> RestockRequest {
    let mut r = RestockRequest::new(RequestId::new(id), NodeId::new(node), item, current, qty, urgency, logged_by);
    r.request_date = date.to_string();
    r
}

pub fn restock_requests() -> Vec<RestockRequest> {
    vec![
        request("REQ-401", "NODE-HYD-042", "OLED Controller IC", 2, 50, Urgency::High, "Tech A. Varma", "2h ago"),
        request("REQ-402", "NODE-BNG-012", "M.2 NVMe SSD 512GB", 1, 25, Urgency::High, "Auto-Replenish System", "3h ago"),
        request("REQ-403", "NODE-CHE-005", "ThinkPad Battery 57Wh", 4, 100, Urgency::Standard, "Site Manager", "5h ago"),
    ]
}

fn node(id: &str, name: &str, status: NodeHealth, utilization: u32, last_sync: &str) -> NodeStatus {
    NodeStatus {
        id: NodeId::new(id),
        name: name.to_string(),
        status,
        utilization,
        last_sync: last_sync.to_string(),
    }
}

pub fn nodes() -> Vec<NodeStatus> {
    vec![
        node("NODE-HYD-042", "Hyderabad Central", NodeHealth::Online, 84, "2m ago"),
        node("NODE-BNG-012", "Bangalore East", NodeHealth::Online, 76, "5m ago"),
        node("NODE-CHE-005", "Chennai Hub", NodeHealth::Warning, 92, "1m ago"),
        node("NODE-DEL-099", "Delhi North", NodeHealth::Online, 64, "12m ago"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn contributor(
    id: &str,
    name: &str,
    points: u64,
    impact: &str,
    category: &str,
    badges: &[&str],
    (laptops, phones, misc): (u32, u32, u32),
    join_date: &str,
    last_action: &str,
    toxins_diverted: &str,
    regional_rank: u32,
) -> Contributor {
    Contributor {
        id: id.to_string(),
        name: name.to_string(),
        points,
        impact: impact.to_string(),
        category: category.to_string(),
        badges: badges.iter().map(|b| b.to_string()).collect(),
        contributions: Contributions { laptops, phones, misc },
        join_date: join_date.to_string(),
        last_action: last_action.to_string(),
        toxins_diverted: toxins_diverted.to_string(),
        regional_rank,
    }
}

pub fn contributors() -> Vec<Contributor> {
    vec![
        contributor("1", "Arjun Mehta", 14200, "142.5kg", "Platinum Hero", &["Trailblazer", "Recycling Pro"],
            (12, 45, 8), "Jan 2024", "2h ago", "0.82kg", 1),
        contributor("2", "Priya Sharma", 12800, "118.2kg", "Platinum Hero", &["Eco-Warrior"],
            (9, 38, 4), "Mar 2024", "4h ago", "0.64kg", 2),
        contributor("3", "Kiran Deep", 9500, "92.4kg", "Gold Guardian", &["Quick Responder"],
            (5, 22, 12), "Feb 2024", "1w ago", "0.45kg", 3),
    ]
}

#[allow(clippy::too_many_arguments)]
fn partner(
    id: &str,
    name: &str,
    kind: PartnerKind,
    location: &str,
    rating: f64,
    active_jobs: u32,
    status: &str,
    license: &str,
    specialties: [&str; 2],
    impact: &str,
) -> Partner {
    Partner {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        location: location.to_string(),
        rating,
        active_jobs,
        status: status.to_string(),
        license: license.to_string(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        impact: impact.to_string(),
        distance_km: None,
        est_arrival: None,
    }
}

pub fn partners() -> Vec<Partner> {
    use PartnerKind::{Recycler, Technician};
    vec![
        partner("1", "EcoFix Hub", Technician, "Hyderabad, TS", 4.9, 124, "Active", "TS-EW-TECH-882",
            ["Laptop Logic Boards", "Smartphone Recovery"], "1.2 Tons"),
        partner("2", "Zenith Recycling", Recycler, "Warangal, TS", 4.7, 842, "Active", "TS-EW-RECY-441",
            ["Lithium-Ion Neutralization", "Gold Reclamation"], "8.4 Tons"),
        partner("3", "SmartCare Labs", Technician, "Gachibowli, TS", 4.8, 315, "High Demand", "TS-EW-TECH-109",
            ["Data Sanitization", "Tablet Micro-soldering"], "0.9 Tons"),
        partner("4", "GreenCycle India", Recycler, "Cyberabad, TS", 5.0, 1204, "Active", "TS-EW-RECY-001",
            ["Industrial E-Waste", "Corporate Decommissioning"], "42.5 Tons"),
        partner("5", "Precision Tech", Technician, "Nizamabad, TS", 4.6, 95, "Active", "TS-EW-TECH-652",
            ["Audio Equipment", "Home Appliances"], "0.4 Tons"),
    ]
}

/// One desk per role, each loaded with its seed records and sharing one
/// configuration.
#[derive(Debug, Clone)]
pub struct DemoNetwork {
    pub config: Arc<SimConfig>,
    pub consumer: ConsumerDesk,
    pub workbench: Workbench,
    pub plant: RecoveryPlant,
    pub restock: RestockDesk,
    pub directory: PartnerDirectory,
}

impl DemoNetwork {
    /// Build the demo with a freshly generated technician node key.
    pub fn new(config: SimConfig) -> Result<Self, BatchError> {
        Self::with_key(config, NodeKeyPair::generate())
    }

    pub fn with_key(config: SimConfig, key: NodeKeyPair) -> Result<Self, BatchError> {
        let config = Arc::new(config);
        Ok(Self {
            consumer: ConsumerDesk::with_devices(Arc::clone(&config), devices()),
            workbench: Workbench::new(Arc::clone(&config), key, repair_jobs(), inventory()),
            plant: RecoveryPlant::new(Arc::clone(&config), batches()?, inbound(), materials()),
            restock: RestockDesk::new(Arc::clone(&config), restock_requests(), nodes())
                .with_contributors(contributors()),
            directory: PartnerDirectory::new(Arc::clone(&config), partners()),
            config,
        })
    }
}
