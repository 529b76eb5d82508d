//! Monitor simulation binary
//!
//! Drives a scripted transaction feed through the full engine and prints
//! the resulting compliance report. Useful for demos and smoke checks
//! while no real feed is wired in.

use chrono::Utc;
use compliance_core::{
    AlertLifecycleManager, AuditTrailStore, ComplianceApi, EngineConfig, PolicyMatrix,
};
use compliance_core::types::{Jurisdiction, Transaction};
use rust_decimal::Decimal;
use std::error::Error;
use std::sync::Arc;
use stream_monitor::{feed, ScriptedFeed, TransactionMonitor};
use tokio::sync::mpsc;
use uuid::Uuid;

fn scripted_transactions() -> Vec<Transaction> {
    let mk = |amount: i64, origin: &str, destination: &str, counterparty: &str| Transaction {
        transaction_id: Uuid::new_v4(),
        amount: Decimal::from(amount),
        currency: "USD".to_string(),
        origin: Jurisdiction::new(origin),
        destination: Jurisdiction::new(destination),
        counterparty: counterparty.to_string(),
        beneficiary: "BN-1".to_string(),
        occurred_at: Utc::now(),
    };

    let mut script = vec![
        mk(12_000, "DIFC", "ADGM", "CP-ALPHA"),
        mk(480_000, "DIFC", "ADGM", "CP-ALPHA"),   // high amount
        mk(2_400_000, "ADGM", "DIFC", "CP-BETA"),  // critical amount
        mk(9_500, "DIFC", "SAMA", "CP-GAMMA"),     // denied corridor
    ];
    // Velocity burst from one counterparty
    for _ in 0..12 {
        script.push(mk(5_000, "DIFC", "ADGM", "CP-DELTA"));
    }
    script
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting WealthGuard monitor simulation");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let audit = Arc::new(AuditTrailStore::new());
    let alerts = Arc::new(AlertLifecycleManager::new(audit.clone()));
    let policy = Arc::new(PolicyMatrix::from_config(&config.policy));
    let monitor = TransactionMonitor::new(config.monitor.clone(), policy.clone(), alerts.clone());
    let api = ComplianceApi::new(alerts, audit, policy);

    let (sender, receiver) = mpsc::channel(64);
    let producer = feed::pump(ScriptedFeed::new(scripted_transactions()), sender);
    let consumer = monitor.run("stream-monitor", receiver);
    tokio::join!(producer, consumer);

    let report = api.report(Utc::now());
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!(
        examined = monitor.examined(),
        alerts = report.total_alerts,
        "simulation finished"
    );
    Ok(())
}
