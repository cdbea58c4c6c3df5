/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use satlink::config::SatLinkConfig;
use satlink::loader;
use satlink::report::{self, writer};
use satlink::resolver::{validate::validate, AllocationInput, FifoResolver};
use satlink::window::SkipReason;

// ── CLI argument definition ───────────────────────────────────────────────────

/// SatLink FIFO downlink allocator.
///
/// Example:
///   satlink -c satlink.yaml --time-step 500 --statistics out/stats
#[derive(Debug, Parser)]
#[command(
    name = "satlink",
    about = "SatLink – greedy FIFO downlink allocation over station/satellite windows",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML run configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Quantization step in milliseconds (overrides `time_step_ms`).
    #[arg(long = "time-step")]
    time_step: Option<i64>,

    /// Satellite cursor policy: last_downlink_entry | max_downlink_stop.
    #[arg(long = "satellite-cursor")]
    satellite_cursor: Option<String>,

    /// Directory for per-station schedule files (overrides `results_path`).
    #[arg(long = "results")]
    results: Option<PathBuf>,

    /// Directory for CSV statistics (overrides `statistics_path`).
    #[arg(long = "statistics")]
    statistics: Option<PathBuf>,

    /// Allocate and validate only; write no files.
    #[arg(long = "no-reports", default_value_t = false)]
    no_reports: bool,
}

impl Cli {
    fn apply(&self, config: &mut SatLinkConfig) {
        if let Some(step) = self.time_step {
            config.time_step_ms = step;
        }
        if let Some(cursor) = &self.satellite_cursor {
            config.satellite_cursor = cursor.clone();
        }
        if let Some(dir) = &self.results {
            config.results_path = dir.clone();
        }
        if let Some(dir) = &self.statistics {
            config.statistics_path = dir.clone();
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("SatLink starting up...");

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Configuration ─────────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => SatLinkConfig::load_from_file(path)?,
        None => {
            warn!("No configuration file provided, using default settings");
            SatLinkConfig::default()
        }
    };
    cli.apply(&mut config);
    config.validate().context("Invalid configuration after CLI overrides")?;

    info!(
        connections  = %config.connection_schedules_path.display(),
        flybys       = %config.flyby_schedules_path.display(),
        time_step_ms = config.time_step_ms,
        cursor       = %config.satellite_cursor,
        "Configuration"
    );

    // ── Load ──────────────────────────────────────────────────────────────────
    let schedules = loader::load(&config)?;
    let profiles = config.profiles_for(schedules.satellite_count());

    // ── Resolve ───────────────────────────────────────────────────────────────
    let resolver = FifoResolver::new(config.time_step_ms).with_cursor(config.cursor()?);
    let input = AllocationInput {
        station_count: schedules.station_count(),
        satellite_count: schedules.satellite_count(),
        connections: &schedules.connections,
        flybys: &schedules.flybys,
        profiles: &profiles,
    };
    let allocation = resolver
        .resolve(&input)
        .context("Schedules rejected by the resolver")?;

    // ── Validate ──────────────────────────────────────────────────────────────
    validate(&schedules.connections, &schedules.flybys, &allocation)
        .context("Allocation failed the consistency checks")?;

    // ── Aggregate ─────────────────────────────────────────────────────────────
    let run_report = report::aggregate(&schedules.connections, &allocation, &profiles);
    info!(
        transactions   = allocation.committed_count(),
        receive_time   = run_report.total_receive_time(),
        received_mb    = run_report.total_received_volume_mb(),
        station_busy   = run_report.skip_count(SkipReason::StationBusy),
        satellite_busy = run_report.skip_count(SkipReason::SatelliteBusy),
        buffer_empty   = run_report.skip_count(SkipReason::SatelliteBufferEmpty),
        "Schedule calculation complete"
    );

    // ── Write ─────────────────────────────────────────────────────────────────
    if cli.no_reports {
        info!("Report writing disabled (--no-reports)");
        return Ok(());
    }
    let inputs = writer::ReportInputs {
        schedules: &schedules,
        allocation: &allocation,
        report: &run_report,
        profiles: &profiles,
        schedule_pattern: &config.input_datetime_pattern,
        statistics_pattern: &config.report_datetime_pattern,
    };
    writer::write_all(&inputs, &config.results_path, &config.statistics_path)
}
