/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Schedule loading: directory scan, file parsing and id assembly.
//!
//! ```text
//! connection dir ─┐                      ┌─ station names    (sorted → id)
//!                 ├─ parser::records ──► ├─ satellite names  (sorted → id, union of both)
//! flyby dir ──────┘                      ├─ epoch            (midnight of earliest start)
//!                                        └─ windows          (offsets from the epoch)
//! ```

pub mod error;
pub mod parser;

pub use error::{LoadError, ParseError, RecordError};
pub use parser::{records, ParserState, RawRecord, Records};

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::SatLinkConfig;
use crate::epoch::Epoch;
use crate::window::{ConnectionWindow, FlybyWindow};

// ── Schedules ─────────────────────────────────────────────────────────────────

/// Both input schedules with names resolved to dense ids.
#[derive(Debug, Clone)]
pub struct Schedules {
    pub epoch: Epoch,
    /// Indexed by station id.
    pub station_names: Vec<String>,
    /// Indexed by satellite id.
    pub satellite_names: Vec<String>,
    /// In file order.
    pub connections: Vec<ConnectionWindow>,
    /// In file order.
    pub flybys: Vec<FlybyWindow>,
}

impl Schedules {
    pub fn station_count(&self) -> usize {
        self.station_names.len()
    }

    pub fn satellite_count(&self) -> usize {
        self.satellite_names.len()
    }

    /// Resolve names and convert timestamps to epoch offsets.
    ///
    /// In flyby records only the satellite part of the header is used.
    /// Returns `None` when both record sets are empty, since no epoch exists.
    pub fn assemble(connections: &[RawRecord], flybys: &[RawRecord]) -> Option<Self> {
        let epoch = Epoch::earliest(connections.iter().chain(flybys).map(|r| r.start))?;

        let station_ids = dense_ids(connections.iter().map(|r| r.origin.as_str()));
        let satellite_ids = dense_ids(
            connections
                .iter()
                .chain(flybys)
                .map(|r| r.satellite.as_str()),
        );

        let connection_windows = connections
            .iter()
            .map(|r| {
                ConnectionWindow::new(
                    station_ids[r.origin.as_str()],
                    satellite_ids[r.satellite.as_str()],
                    epoch.offset_of(r.start),
                    epoch.offset_of(r.stop),
                )
            })
            .collect();
        let flyby_windows = flybys
            .iter()
            .map(|r| {
                FlybyWindow::new(
                    satellite_ids[r.satellite.as_str()],
                    epoch.offset_of(r.start),
                    epoch.offset_of(r.stop),
                )
            })
            .collect();

        Some(Self {
            epoch,
            station_names: names_by_id(&station_ids),
            satellite_names: names_by_id(&satellite_ids),
            connections: connection_windows,
            flybys: flyby_windows,
        })
    }
}

/// Sorted unique names mapped to `0..n`.
fn dense_ids<'a>(names: impl Iterator<Item = &'a str>) -> BTreeMap<&'a str, usize> {
    names
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(id, name)| (name, id))
        .collect()
}

fn names_by_id(ids: &BTreeMap<&str, usize>) -> Vec<String> {
    // BTreeMap iteration order is the id order
    ids.keys().map(|name| name.to_string()).collect()
}

// ── File access ───────────────────────────────────────────────────────────────

/// Files directly in `dir` whose name starts with `prefix`, sorted by name.
pub fn scan_directory(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Cannot read schedule directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Cannot list schedule directory: {}", dir.display()))?;
        let is_file = entry
            .file_type()
            .with_context(|| format!("Cannot stat {}", entry.path().display()))?
            .is_file();
        if is_file && entry.file_name().to_string_lossy().starts_with(prefix) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every record in the file at `path`.
pub fn parse_file(path: &Path, pattern: &str) -> Result<Vec<RawRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    records(&text, pattern)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse every matching file in `dir`, concatenating records in file order.
pub fn load_directory(dir: &Path, prefix: &str, pattern: &str) -> Result<Vec<RawRecord>> {
    let files = scan_directory(dir, prefix)?;
    if files.is_empty() {
        warn!(dir = %dir.display(), prefix, "No schedule files found");
    }

    let mut all = Vec::new();
    for path in &files {
        let parsed = parse_file(path, pattern)?;
        debug!(file = %path.display(), records = parsed.len(), "Parsed schedule file");
        for record in &parsed {
            if let Some(drift_ms) = record.duration_drift_ms() {
                warn!(
                    file = %path.display(),
                    line = record.line,
                    access = record.access,
                    drift_ms,
                    "Reported duration disagrees with start and stop"
                );
            }
        }
        all.extend(parsed);
    }
    Ok(all)
}

/// Load both schedules named by `config`.
pub fn load(config: &SatLinkConfig) -> Result<Schedules> {
    let connections = load_directory(
        &config.connection_schedules_path,
        &config.connection_file_prefix,
        &config.input_datetime_pattern,
    )
    .context("Failed to load connection schedules")?;
    let flybys = load_directory(
        &config.flyby_schedules_path,
        &config.flyby_file_prefix,
        &config.input_datetime_pattern,
    )
    .context("Failed to load flyby schedules")?;

    let schedules = Schedules::assemble(&connections, &flybys).with_context(|| {
        format!(
            "No schedule records found in {} or {}",
            config.connection_schedules_path.display(),
            config.flyby_schedules_path.display()
        )
    })?;

    info!(
        epoch = %schedules.epoch.midnight(),
        stations = schedules.station_count(),
        satellites = schedules.satellite_count(),
        connection_windows = schedules.connections.len(),
        flyby_windows = schedules.flybys.len(),
        "Input schedules loaded"
    );
    Ok(schedules)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
