/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Report files.
//!
//! | File | Directory | Rows |
//! |---|---|---|
//! | `<station>-Schedule.txt` | results | committed transactions of one station |
//! | `StationStats.csv` | statistics | one per station |
//! | `StationsSchedules.csv` | statistics | input connection windows |
//! | `ShootingSchedules.csv` | statistics | input flyby windows |
//! | `StationTransactions.csv` | statistics | committed transactions, by station |
//! | `SatelliteTransactions.csv` | statistics | satellite ledger rows |
//! | `SkipWindowStats.csv` | statistics | skip records |
//! | `StationDataAmountReceived.csv` | statistics | received MB per station |
//!
//! Every writer is a function over `impl Write` so it can be checked against
//! an in-memory buffer; [`write_all`] binds them to files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::loader::Schedules;
use crate::resolver::Allocation;
use crate::window::{SatelliteProfile, SkipRecord};

use super::RunReport;

const STATION_RULE: &str = "-------------------------";
const STATION_HEADER: &str =
    "Start Time (UTCG) * Stop Time (UTCG) * Duration (sec) * Satname * Data (Mbytes)";

/// Everything the writers read.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub schedules: &'a Schedules,
    pub allocation: &'a Allocation,
    pub report: &'a RunReport,
    pub profiles: &'a [SatelliteProfile],
    /// Pattern for the per-station schedule files.
    pub schedule_pattern: &'a str,
    /// Pattern for the CSV statistics.
    pub statistics_pattern: &'a str,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Write every report file, creating both directories if needed.
pub fn write_all(inputs: &ReportInputs<'_>, results_dir: &Path, statistics_dir: &Path) -> Result<()> {
    write_file(statistics_dir, "StationStats.csv", |w| {
        write_station_stats(w, inputs.report)
    })?;
    write_file(statistics_dir, "StationsSchedules.csv", |w| {
        write_station_schedules(w, inputs)
    })?;
    write_file(statistics_dir, "ShootingSchedules.csv", |w| {
        write_shooting_schedules(w, inputs)
    })?;
    write_file(statistics_dir, "StationTransactions.csv", |w| {
        write_station_transactions(w, inputs)
    })?;
    write_file(statistics_dir, "SatelliteTransactions.csv", |w| {
        write_satellite_transactions(w, inputs)
    })?;
    write_file(statistics_dir, "SkipWindowStats.csv", |w| {
        write_skip_stats(w, &inputs.allocation.skips, inputs)
    })?;
    write_file(statistics_dir, "StationDataAmountReceived.csv", |w| {
        write_received_amounts(w, inputs)
    })?;

    for (station, name) in inputs.schedules.station_names.iter().enumerate() {
        write_file(results_dir, &format!("{name}-Schedule.txt"), |w| {
            write_station_schedule(w, station, inputs)
        })?;
    }

    info!(
        results = %results_dir.display(),
        statistics = %statistics_dir.display(),
        station_files = inputs.schedules.station_count(),
        "Reports written"
    );
    Ok(())
}

fn write_file<F>(dir: &Path, name: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory: {}", dir.display()))?;
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;

    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(file = %path.display(), "Report file written");
    Ok(())
}

// ── Writers ───────────────────────────────────────────────────────────────────

pub fn write_station_stats<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(out, "StationId, ReceiveTime, TimeLimit, SatellitesNumber")?;
    for s in &report.stations {
        writeln!(
            out,
            "{}, {}, {}, {}",
            s.station, s.receive_time, s.rx_limit, s.satellite_count
        )?;
    }
    Ok(())
}

pub fn write_station_schedules<W: Write>(out: &mut W, inputs: &ReportInputs<'_>) -> io::Result<()> {
    let epoch = inputs.schedules.epoch;
    let pattern = inputs.statistics_pattern;
    writeln!(out, "StationId, SatelliteId, StartTime(UTC), StopTime(UTC), Duration(ms)")?;
    for w in &inputs.schedules.connections {
        writeln!(
            out,
            "{}, {}, {}, {}, {}",
            w.station,
            w.satellite,
            epoch.format(w.start, pattern),
            epoch.format(w.stop, pattern),
            w.duration()
        )?;
    }
    Ok(())
}

pub fn write_shooting_schedules<W: Write>(out: &mut W, inputs: &ReportInputs<'_>) -> io::Result<()> {
    let epoch = inputs.schedules.epoch;
    let pattern = inputs.statistics_pattern;
    writeln!(out, "SatelliteId, StartTime(UTC), StopTime(UTC), Duration(ms)")?;
    for f in &inputs.schedules.flybys {
        writeln!(
            out,
            "{}, {}, {}, {}",
            f.satellite,
            epoch.format(f.start, pattern),
            epoch.format(f.stop, pattern),
            f.duration()
        )?;
    }
    Ok(())
}

pub fn write_station_transactions<W: Write>(
    out: &mut W,
    inputs: &ReportInputs<'_>,
) -> io::Result<()> {
    let epoch = inputs.schedules.epoch;
    let pattern = inputs.statistics_pattern;
    writeln!(out, "StationId, SatelliteId, StartTime(UTC), StopTime(UTC), Duration(ms)")?;
    for (station, timeline) in inputs.allocation.stations.iter().enumerate() {
        for tx in timeline {
            writeln!(
                out,
                "{}, {}, {}, {}, {}",
                station,
                tx.owner,
                epoch.format(tx.start, pattern),
                epoch.format(tx.stop, pattern),
                tx.duration()
            )?;
        }
    }
    Ok(())
}

pub fn write_satellite_transactions<W: Write>(
    out: &mut W,
    inputs: &ReportInputs<'_>,
) -> io::Result<()> {
    let epoch = inputs.schedules.epoch;
    let pattern = inputs.statistics_pattern;
    writeln!(
        out,
        "StationId, SatelliteId, StartTime(UTC), StopTime(UTC), Duration(ms), MemoryOnStart(ms), MemoryOnStop(ms), SentAmount(ms), IdleTime(ms)"
    )?;
    for stats in &inputs.report.satellites {
        for row in &stats.ledger {
            writeln!(
                out,
                "{}, {}, {}, {}, {}, {}, {}, {}, {}",
                row.owner,
                stats.satellite,
                epoch.format(row.start, pattern),
                epoch.format(row.stop, pattern),
                row.duration(),
                row.memory_on_start,
                row.memory_on_stop,
                row.sent,
                row.idle
            )?;
        }
    }
    Ok(())
}

pub fn write_skip_stats<W: Write>(
    out: &mut W,
    skips: &[SkipRecord],
    inputs: &ReportInputs<'_>,
) -> io::Result<()> {
    let epoch = inputs.schedules.epoch;
    let pattern = inputs.statistics_pattern;
    writeln!(out, "SkipType, StationId, SatelliteId, StartTime(UTC), StopTime(UTC), Duration(ms)")?;
    for s in skips {
        writeln!(
            out,
            "{}, {}, {}, {}, {}, {}",
            s.reason,
            s.station,
            s.satellite,
            epoch.format(s.start, pattern),
            epoch.format(s.stop, pattern),
            s.duration()
        )?;
    }
    Ok(())
}

pub fn write_received_amounts<W: Write>(out: &mut W, inputs: &ReportInputs<'_>) -> io::Result<()> {
    writeln!(out, "Station name, Received amount(MB)")?;
    for (name, stats) in inputs
        .schedules
        .station_names
        .iter()
        .zip(&inputs.report.stations)
    {
        writeln!(out, "{}, {:>10.3}", name, stats.received_volume_mb)?;
    }
    Ok(())
}

/// Human-readable schedule of one station.
pub fn write_station_schedule<W: Write>(
    out: &mut W,
    station: usize,
    inputs: &ReportInputs<'_>,
) -> io::Result<()> {
    let schedules = inputs.schedules;
    let pattern = inputs.schedule_pattern;

    writeln!(out, "{}", schedules.station_names[station])?;
    writeln!(out, "{STATION_RULE}")?;
    writeln!(out, "{STATION_HEADER}")?;

    let Some(timeline) = inputs.allocation.stations.get(station) else {
        return Ok(());
    };
    for tx in timeline {
        let Some(satellite) = tx.owner.counterpart() else {
            continue;
        };
        let duration_secs = tx.duration() as f64 * 0.001;
        let bandwidth = inputs.profiles.get(satellite).map_or(0, |p| p.bandwidth);
        let name = schedules
            .satellite_names
            .get(satellite)
            .map_or("?", String::as_str);
        writeln!(
            out,
            "{:>30}{:>30}{:>30.3}{:>30}{:>30.3}",
            schedules.epoch.format(tx.start, pattern),
            schedules.epoch.format(tx.stop, pattern),
            duration_secs,
            name,
            bandwidth as f64 * duration_secs
        )?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
