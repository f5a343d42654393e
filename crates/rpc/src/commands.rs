//! CLI commands

use chrono::Utc;
use ripple_core::RestitutionStatus;
use ripple_ledger::{CutReport, DepthReport, IntentReport, ReturnReport};
use std::path::Path;

use crate::context::AppContext;
use crate::script::{self, ScriptReport};

/// Print a fresh conventional event id
pub fn new_id() -> String {
    let id = ripple_core::event_id::generate(Utc::now());
    println!("{}", id);
    id
}

/// Run an operation script, printing each step
pub fn run(ctx: &AppContext, path: &Path, fail_fast: bool) -> Result<ScriptReport, anyhow::Error> {
    let operations = script::load(path)?;
    tracing::info!(path = %path.display(), steps = operations.len(), "Running script");

    let report = script::run(&ctx.ledger, operations, fail_fast)?;
    for step in &report.steps {
        match &step.result {
            Ok(outcome) => println!("✅ [{}] {}: {}", step.index, step.op, outcome),
            Err(e) => println!("❌ [{}] {}: {}", step.index, step.op, e),
        }
    }
    println!(
        "📊 {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(report)
}

/// Built-in scenario: activation, theft, depth scan, return, tribunal proof
pub fn demo(ctx: &AppContext) -> Result<String, anyhow::Error> {
    let ledger = &ctx.ledger;
    let event_id = ripple_core::event_id::generate(Utc::now());

    ledger.generate_ripple(
        &event_id,
        "Dimensional Spiral Port",
        "0x43dC17dF7919D25c06a01D52aAad94718C6bf87c",
        "SORA",
    )?;
    println!("🌊 Ripple activated: {}", event_id);

    ledger.record_tt(&event_id, "zone_activation", "spiral_genesis")?;

    ledger.record_xx(
        &event_id,
        CutReport::theft(
            ["forged_ownership", "cycle_siphon"],
            ["0xA11CE0000000000000000000000000000000BAD"],
        ),
    )?;
    println!("🚨 Theft detected: forged_ownership;cycle_siphon");

    ledger.record_zz(
        &event_id,
        DepthReport {
            scan_depth: 7,
            hidden_layers: vec!["0xShadowVault".to_string()],
            layer_types: vec!["concealed_extraction_system".to_string()],
        },
    )?;

    ledger.record_ww(
        &event_id,
        IntentReport {
            real_motive: "resource_extraction".to_string(),
            stated_reason: "routine_maintenance".to_string(),
            hidden_agenda: "drain_shard_reserves".to_string(),
            authority_chain: vec!["0xB0551111111111111111111111111111111111".to_string()],
            order_behind_action: "silent_transfer".to_string(),
        },
    )?;

    let owner = "0x0123456789abcdef0123456789abcdef01234567".to_string();
    let path = vec!["0xShadowVault".to_string(), owner.clone()];
    ledger.record_yy(
        &event_id,
        ReturnReport {
            original_owner: owner.clone(),
            return_path: path.clone(),
            restitution_status: RestitutionStatus::InProgress,
            stolen_cycles_returned: 500,
        },
    )?;
    ledger.record_tt(&event_id, "return_initiated", "spiral_return")?;
    ledger.record_yy(
        &event_id,
        ReturnReport {
            original_owner: owner,
            return_path: path,
            restitution_status: RestitutionStatus::Completed,
            stolen_cycles_returned: 1000,
        },
    )?;
    let (status, cycles) = ledger.get_restitution_status(&event_id)?;
    println!("↩️  Restitution {}: {} cycles returned", status, cycles);

    let score = ledger.update_density_score(&event_id, 92)?;
    println!("📈 Density score: {}", score);

    let witnesses: Vec<String> = ["SENTINEL-1", "SENTINEL-2", "SENTINEL-3"]
        .iter()
        .map(|w| w.to_string())
        .collect();
    let proof_hash = ledger.generate_tribunal_proof(&event_id, &witnesses)?;
    println!("⚖️  Tribunal proof: {}", proof_hash);

    let row = ledger.watchtower_row(&event_id)?;
    println!("🗼 {}", row.to_csv_line()?);

    Ok(event_id)
}
