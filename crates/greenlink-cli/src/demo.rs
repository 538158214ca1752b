//! `greenlink demo`: drive one role's workflow over the seed data and
//! print what changed. Delays follow the loaded config, so
//! `--time-scale 0` runs instantly.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use greenlink_core::{BatchId, JobId, RequestId, ShipmentId};
use greenlink_sim::geolocation::HYDERABAD;
use greenlink_sim::{DemoNetwork, FixedLocation, SimConfig};
use greenlink_state::{DeviceCategory, DeviceIntake, JobOutcome, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoRole {
    Consumer,
    Technician,
    Recycler,
    Ngo,
    Network,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Which dashboard to exercise.
    #[arg(value_enum)]
    pub role: DemoRole,
}

pub fn run_demo(args: &DemoArgs, config: SimConfig) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let summary = runtime.block_on(async {
        let demo = DemoNetwork::new(config)?;
        run_scenario(args.role, &demo).await
    })?;
    crate::print_json(&summary)?;
    Ok(0)
}

pub async fn run_scenario(role: DemoRole, demo: &DemoNetwork) -> Result<Value> {
    tracing::info!(?role, "demo scenario started");
    match role {
        DemoRole::Consumer => consumer(demo).await,
        DemoRole::Technician => technician(demo).await,
        DemoRole::Recycler => recycler(demo).await,
        DemoRole::Ngo => ngo(demo).await,
        DemoRole::Network => network(demo).await,
    }
}

async fn consumer(demo: &DemoNetwork) -> Result<Value> {
    let desk = &demo.consumer;
    let repair = DeviceIntake {
        category: Some(DeviceCategory::Computing),
        device_type: "ThinkPad T480".to_string(),
        age: "4".to_string(),
        condition: "battery swelling".to_string(),
        image: None,
    };
    let feasibility = repair.feasibility();
    let first = desk.submit(Submission::Repair(repair))?;

    let eol = DeviceIntake {
        category: Some(DeviceCategory::Entertainment),
        device_type: "CRT Television".to_string(),
        age: "15".to_string(),
        condition: "no picture".to_string(),
        image: None,
    };
    let second = desk.submit(Submission::EndOfLife(eol.request_eol()?.confirm()))?;
    let referral = desk.refer_friend();

    // Only the repair pickup is auto-dispatched; EOL waits on hazmat logistics.
    let dispatch = demo.config.delay(demo.config.timing.logistics_dispatch_ms);
    tokio::time::sleep(dispatch + std::time::Duration::from_millis(1)).await;

    Ok(json!({
        "feasibility": feasibility,
        "submissions": [first, second],
        "referral": referral,
        "stats": desk.stats(),
        "devices": desk.devices(),
        "notifications": desk.notifications(),
    }))
}

async fn technician(demo: &DemoNetwork) -> Result<Value> {
    let bench = &demo.workbench;
    let id = JobId::new("ASSET-2026-002");
    bench.authorize().await?;
    bench.accept_job(&id)?;
    let mut stages = Vec::new();
    for _ in 0..4 {
        stages.push(bench.log_step(&id)?.title());
    }
    bench.add_note(&id, "Digitizer replaced; battery calibrated.")?;
    bench.toggle_part(&id, "OLED Controller IC")?;
    let review = bench.review(&id, JobOutcome::Repair)?;
    let signed = bench.finalize(review).await?;
    let restock = bench.request_restock("OLED Controller IC")?;
    let on_hand = bench.receive_parts("OLED Controller IC", 10)?;
    let sync = bench.sync_chain().await?;

    Ok(json!({
        "stages": stages,
        "signOff": signed,
        "restockRaised": restock,
        "oledOnHand": on_hand,
        "sync": sync,
        "history": bench.history()?,
    }))
}

async fn recycler(demo: &DemoNetwork) -> Result<Value> {
    let plant = &demo.plant;
    let accepted = plant.accept_load(&ShipmentId::new("SHIP-8821"))?;
    let id = BatchId::new("BATCH-BNG-404");
    let status = plant.advance(&id).await?;
    let preview = plant.audit_preview(&id)?;
    let audit = plant.finalize_audit(&id)?;
    plant.sell_commodities().await?;
    let certificate = plant.export_compliance_certificate().await?;

    Ok(json!({
        "accepted": accepted,
        "advancedTo": status,
        "preview": preview,
        "audit": audit,
        "stocks": plant.stocks(),
        "utilization": plant.utilization_percent(),
        "certificate": certificate,
    }))
}

async fn ngo(demo: &DemoNetwork) -> Result<Value> {
    let desk = &demo.restock;
    let dispatched = desk.verify(&RequestId::new("REQ-401")).await?;
    let index = desk.refresh_impact_index().await?;
    Ok(json!({
        "request": dispatched,
        "summary": desk.summary(),
        "nodes": desk.nodes(),
        "leaderboard": desk.leaderboard(),
        "impactIndex": index,
    }))
}

async fn network(demo: &DemoNetwork) -> Result<Value> {
    let directory = &demo.directory;
    let message = directory.scan_nearby(&FixedLocation(HYDERABAD)).await?;
    Ok(json!({
        "message": message,
        "nearby": directory.visible(),
    }))
}

#[cfg(test)]
mod tests {
    use greenlink_sim::SimConfig;

    use super::*;

    fn demo() -> DemoNetwork {
        DemoNetwork::new(SimConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn consumer_scenario_dispatches_repair_and_parks_eol() {
        let d = demo();
        let out = run_scenario(DemoRole::Consumer, &d).await.unwrap();
        assert_eq!(out["devices"].as_array().unwrap().len(), 5);
        assert_eq!(out["stats"]["points"], 1850 + 150 + 200 + 50);
        assert!(d.consumer.devices().iter().all(|dev| dev.status.to_string() != "Pickup-Requested"));
    }

    #[tokio::test(start_paused = true)]
    async fn technician_scenario_signs_off() {
        let d = demo();
        let out = run_scenario(DemoRole::Technician, &d).await.unwrap();
        assert_eq!(out["sync"]["verified"], 1);
        assert_eq!(out["restockRaised"], true);
        assert!(out["oledOnHand"].as_u64().unwrap() >= 10);
        assert_eq!(out["history"][0]["status"], "Verified-Repair");
        assert!(out["signOff"]["attestation"]["txHash"].as_str().unwrap().starts_with("0x"));
    }

    #[tokio::test(start_paused = true)]
    async fn recycler_scenario_audits_batch() {
        let d = demo();
        let out = run_scenario(DemoRole::Recycler, &d).await.unwrap();
        assert_eq!(out["advancedTo"], "Final-Audit");
        assert_eq!(out["audit"]["batchId"], "BATCH-BNG-404");
        assert_eq!(d.plant.batches().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn ngo_scenario_dispatches() {
        let out = run_scenario(DemoRole::Ngo, &demo()).await.unwrap();
        assert_eq!(out["request"]["status"], "Dispatched");
        assert_eq!(out["summary"]["dispatched"], 1);
        assert_eq!(out["leaderboard"][0]["name"], "Arjun Mehta");
        assert_eq!(out["impactIndex"].as_array().unwrap().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn network_scenario_finds_three() {
        let out = run_scenario(DemoRole::Network, &demo()).await.unwrap();
        assert_eq!(out["nearby"].as_array().unwrap().len(), 3);
    }
}
