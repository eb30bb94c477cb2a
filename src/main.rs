use anyhow::{Context, Result, anyhow};
use etf_signal::chart::ChartData;
use etf_signal::config::SignalConfig;
use etf_signal::market_data::InputTables;
use etf_signal::signals::{SignalCoordinator, SignalLabel};
use log::info;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: etf-signal <config.json> <rates.json> <sentiment.json> <vix.json> [out_dir]";

fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting ETF light signal run");

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 4 {
        return Err(anyhow!(USAGE));
    }
    let out_dir = args.get(4).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    info!("Loading configuration from: {}", args[0]);
    let config = SignalConfig::load_from_file(&args[0])?;
    let inputs = InputTables::load(&args[1], &args[2], &args[3])?;

    let coordinator = SignalCoordinator::with_config(config)?;
    let report = coordinator.run(&inputs);
    let chart = ChartData::from_records(&report.records);

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    write_json(&out_dir.join("signals.json"), &report)?;
    write_json(&out_dir.join("chart.json"), &chart)?;

    for label in SignalLabel::ALL.into_iter().filter(|label| !label.is_neutral()) {
        info!("  {:<12} {} markers", label.as_str(), chart.markers_for(label).len());
    }
    info!(
        "Run complete: {} markers, {} labels suppressed",
        chart.markers.len(),
        report.summary.suppressed
    );
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
