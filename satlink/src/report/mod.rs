/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Read-only aggregation of a finished [`Allocation`].
//!
//! Nothing here mutates resolver state; every figure is derived from the final
//! timelines, the original connection windows and the satellite profiles.
//! [`writer`] turns a [`RunReport`] into files.

pub mod writer;

use std::collections::{BTreeMap, BTreeSet};

use crate::resolver::buffer::{buffered_level, END_OF_TIME};
use crate::resolver::Allocation;
use crate::timeline::{Owner, Timeline};
use crate::window::{
    ConnectionWindow, SatelliteId, SatelliteProfile, SkipReason, StationId, TimeOffset,
};

// ── Station figures ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub station: StationId,
    /// Sum of committed `stop - start`.
    pub receive_time: TimeOffset,
    /// Time the station could have listened at all (see [`rx_limit`]).
    pub rx_limit: TimeOffset,
    /// Distinct satellites served.
    pub satellite_count: usize,
    pub received_volume_mb: f64,
}

/// Total length of the union of all connection windows of `station`.
///
/// Windows are sorted by start and merged into maximal spans: a window that
/// starts at or before the current span's stop extends it.  The result is the
/// sum of `stop - start` over the spans.
pub fn rx_limit(station: StationId, connections: &[ConnectionWindow]) -> TimeOffset {
    let mut windows: Vec<_> = connections
        .iter()
        .filter(|w| w.station == station)
        .map(|w| (w.start, w.stop))
        .collect();
    windows.sort_unstable();

    let mut total = 0;
    let mut span: Option<(TimeOffset, TimeOffset)> = None;
    for (start, stop) in windows {
        span = match span {
            Some((span_start, span_stop)) if start <= span_stop => {
                Some((span_start, span_stop.max(stop)))
            }
            Some((span_start, span_stop)) => {
                total += span_stop - span_start;
                Some((start, stop))
            }
            None => Some((start, stop)),
        };
    }
    if let Some((span_start, span_stop)) = span {
        total += span_stop - span_start;
    }
    total
}

fn station_stats(
    station: StationId,
    timeline: &Timeline,
    connections: &[ConnectionWindow],
    profiles: &[SatelliteProfile],
) -> StationStats {
    let mut satellites = BTreeSet::new();
    let mut receive_time = 0;
    let mut received_volume_mb = 0.0;
    for tx in timeline {
        let duration = tx.duration();
        receive_time += duration;
        if let Some(satellite) = tx.owner.counterpart() {
            satellites.insert(satellite);
            if let Some(profile) = profiles.get(satellite) {
                received_volume_mb += profile.volume_mb(duration);
            }
        }
    }

    StationStats {
        station,
        receive_time,
        rx_limit: rx_limit(station, connections),
        satellite_count: satellites.len(),
        received_volume_mb,
    }
}

// ── Satellite figures ─────────────────────────────────────────────────────────

/// One row of the satellite buffer ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerRow {
    pub owner: Owner,
    pub start: TimeOffset,
    pub stop: TimeOffset,
    pub memory_on_start: i64,
    pub memory_on_stop: i64,
    /// Buffered units cleared by this downlink (0 for accumulation).
    pub sent: i64,
    /// Acquired units that did not fit into the buffer.
    pub idle: i64,
}

impl LedgerRow {
    pub fn duration(&self) -> TimeOffset {
        self.stop - self.start
    }
}

/// Walk a satellite timeline and account for every interval.
///
/// Accumulation adds its duration; downlink subtracts `duration /
/// transmit_ratio`.  Whatever exceeds `buffer_capacity` is reported as idle
/// and the level is clamped.  A level of exactly `-1` after a step is
/// reset to `0`, which absorbs the off-by-one left by inclusive downlink
/// bounds.
pub fn satellite_ledger(timeline: &Timeline, profile: &SatelliteProfile) -> Vec<LedgerRow> {
    let mut rows = Vec::with_capacity(timeline.len());
    let mut memory = 0;
    for interval in timeline {
        let memory_on_start = memory;
        let duration = interval.duration();
        let sent = match interval.owner {
            Owner::Accumulation => {
                memory += duration;
                0
            }
            Owner::Downlink(_) => {
                let sent = duration / profile.transmit_ratio;
                memory -= sent;
                sent
            }
        };
        if memory == -1 {
            memory = 0;
        }
        let mut idle = 0;
        if memory > profile.buffer_capacity {
            idle = memory - profile.buffer_capacity;
            memory = profile.buffer_capacity;
        }
        rows.push(LedgerRow {
            owner: interval.owner,
            start: interval.start,
            stop: interval.stop,
            memory_on_start,
            memory_on_stop: memory,
            sent,
            idle,
        });
    }
    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteStats {
    pub satellite: SatelliteId,
    pub ledger: Vec<LedgerRow>,
    /// Buffered level after the whole timeline.
    pub final_level: i64,
    /// Sum of `duration / transmit_ratio` over downlinks.
    pub drained_units: i64,
    /// Downlink time converted with the satellite's bandwidth.
    pub drained_volume_mb: f64,
}

fn satellite_stats(
    satellite: SatelliteId,
    timeline: &Timeline,
    profile: &SatelliteProfile,
) -> SatelliteStats {
    let ledger = satellite_ledger(timeline, profile);
    let drained_units = ledger.iter().map(|row| row.sent).sum();
    let drained_volume_mb = timeline
        .iter()
        .filter(|i| i.owner.is_downlink())
        .map(|i| profile.volume_mb(i.duration()))
        .sum();

    SatelliteStats {
        satellite,
        ledger,
        final_level: buffered_level(timeline, END_OF_TIME, profile),
        drained_units,
        drained_volume_mb,
    }
}

// ── Run report ────────────────────────────────────────────────────────────────

/// Everything the writer needs besides names and the epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Indexed by station id.
    pub stations: Vec<StationStats>,
    /// Indexed by satellite id.
    pub satellites: Vec<SatelliteStats>,
    pub skip_counts: BTreeMap<SkipReason, usize>,
}

impl RunReport {
    pub fn skip_count(&self, reason: SkipReason) -> usize {
        self.skip_counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_receive_time(&self) -> TimeOffset {
        self.stations.iter().map(|s| s.receive_time).sum()
    }

    pub fn total_received_volume_mb(&self) -> f64 {
        self.stations.iter().map(|s| s.received_volume_mb).sum()
    }
}

/// Aggregate a validated allocation.
///
/// `profiles` must cover every satellite of `allocation`; satellites without
/// a profile are left out of the satellite figures.
pub fn aggregate(
    connections: &[ConnectionWindow],
    allocation: &Allocation,
    profiles: &[SatelliteProfile],
) -> RunReport {
    let stations = allocation
        .stations
        .iter()
        .enumerate()
        .map(|(id, tl)| station_stats(id, tl, connections, profiles))
        .collect();

    let satellites = allocation
        .satellites
        .iter()
        .zip(profiles)
        .enumerate()
        .map(|(id, (tl, profile))| satellite_stats(id, tl, profile))
        .collect();

    let skip_counts = SkipReason::ALL
        .iter()
        .map(|&reason| (reason, allocation.skip_count(reason)))
        .collect();

    RunReport {
        stations,
        satellites,
        skip_counts,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
