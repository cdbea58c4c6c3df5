/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures shared by the allocator pipeline.
//!
//! Three input types and one output type model the two sides of a run:
//!
//! ```text
//! schedule files ──(loader)──►  ConnectionWindow ─┐
//!                               FlybyWindow ──────┼──(resolver)──►  Timeline arenas + SkipRecord
//! configuration  ──(config)──►  SatelliteProfile ─┘
//! ```
//!
//! # Units
//! Every time value is a [`TimeOffset`]: signed milliseconds relative to the
//! run [`Epoch`](crate::epoch::Epoch).  Windows are closed ranges
//! `[start, stop]`, so a window with `start == stop` still covers one
//! instant.
//!
//! # Ownership model
//! Windows are loaded once and never mutated.  The resolver sorts its own
//! working copies; the originals stay available for validation and
//! reporting.

use std::fmt;

// ── Scalar aliases ────────────────────────────────────────────────────────────

/// Milliseconds since the run epoch.
pub type TimeOffset = i64;

/// Dense station index (position of the station name in sorted order).
pub type StationId = usize;

/// Dense satellite index (position of the satellite name in sorted order).
pub type SatelliteId = usize;

// ── Input windows ─────────────────────────────────────────────────────────────

/// A visibility window during which `station` could physically downlink from
/// `satellite`.
///
/// Field order matches the sort key used by the duplicate-input check, so the
/// derived `Ord` compares `(station, satellite, start, stop)` lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionWindow {
    pub station: StationId,
    pub satellite: SatelliteId,
    pub start: TimeOffset,
    pub stop: TimeOffset,
}

impl ConnectionWindow {
    pub fn new(
        station: StationId,
        satellite: SatelliteId,
        start: TimeOffset,
        stop: TimeOffset,
    ) -> Self {
        Self {
            station,
            satellite,
            start,
            stop,
        }
    }

    /// `stop - start` in milliseconds.
    pub fn duration(&self) -> TimeOffset {
        self.stop - self.start
    }

    /// Returns `true` if `[start, stop]` lies entirely inside this window.
    pub fn contains(&self, start: TimeOffset, stop: TimeOffset) -> bool {
        self.start <= start && self.stop >= stop
    }
}

/// Sort connection windows into allocation order: ascending `start`, ties
/// broken by ascending `stop` (the window that closes sooner goes first).
///
/// The sort is stable, so windows with identical bounds keep their input
/// order.
pub fn sort_for_allocation(windows: &mut [ConnectionWindow]) {
    windows.sort_by(|a, b| a.start.cmp(&b.start).then(a.stop.cmp(&b.stop)));
}

/// A period during which `satellite` is acquiring data and filling its
/// onboard buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlybyWindow {
    pub satellite: SatelliteId,
    pub start: TimeOffset,
    pub stop: TimeOffset,
}

impl FlybyWindow {
    pub fn new(satellite: SatelliteId, start: TimeOffset, stop: TimeOffset) -> Self {
        Self {
            satellite,
            start,
            stop,
        }
    }

    pub fn duration(&self) -> TimeOffset {
        self.stop - self.start
    }

    pub fn contains(&self, start: TimeOffset, stop: TimeOffset) -> bool {
        self.start <= start && self.stop >= stop
    }
}

// ── Satellite profile ─────────────────────────────────────────────────────────

/// Onboard storage and downlink characteristics of one satellite.
///
/// `buffer_capacity` is expressed in the same time units as accumulation:
/// acquiring data for `d` ms raises the buffered level by `d`, capped at the
/// capacity.  Downlinking for `d` ms drains `d / transmit_ratio` units
/// (integer division).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteProfile {
    /// Maximum buffered level, in accumulation milliseconds.
    pub buffer_capacity: TimeOffset,

    /// Downlink milliseconds required to clear one buffered unit.
    pub transmit_ratio: i64,

    /// Downlink rate in MB/s.  Only used to convert transmit time into a
    /// reported data volume.
    pub bandwidth: i64,
}

impl SatelliteProfile {
    pub fn new(buffer_capacity: TimeOffset, transmit_ratio: i64, bandwidth: i64) -> Self {
        Self {
            buffer_capacity,
            transmit_ratio,
            bandwidth,
        }
    }

    /// Data volume in MB moved by `transmit_ms` of downlink.
    pub fn volume_mb(&self, transmit_ms: TimeOffset) -> f64 {
        transmit_ms as f64 * 0.001 * self.bandwidth as f64
    }
}

// ── Skip records (resolver output) ────────────────────────────────────────────

/// Why a candidate window produced no transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// The station was still serving an earlier transaction past the window's
    /// end.
    StationBusy,
    /// The satellite was still downlinking to another station past the
    /// window's end.
    SatelliteBusy,
    /// The satellite had nothing buffered when the window opened.
    SatelliteBufferEmpty,
}

impl SkipReason {
    /// Every reason, in report order.
    pub const ALL: [SkipReason; 3] = [
        SkipReason::StationBusy,
        SkipReason::SatelliteBusy,
        SkipReason::SatelliteBufferEmpty,
    ];

    /// Upper snake-case label used in the skip statistics file.
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::StationBusy => "STATION_BUSY",
            SkipReason::SatelliteBusy => "SATELLITE_BUSY",
            SkipReason::SatelliteBufferEmpty => "SATELLITE_MEMORY_EMPTY",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected candidate window.  Produced by the resolver, never mutated.
///
/// `start` / `stop` are the bounds of the (quantized) candidate window, not
/// of any committed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRecord {
    pub reason: SkipReason,
    pub station: StationId,
    pub satellite: SatelliteId,
    pub start: TimeOffset,
    pub stop: TimeOffset,
}

impl SkipRecord {
    pub fn new(reason: SkipReason, window: &ConnectionWindow) -> Self {
        Self {
            reason,
            station: window.station,
            satellite: window.satellite,
            start: window.start,
            stop: window.stop,
        }
    }

    pub fn duration(&self) -> TimeOffset {
        self.stop - self.start
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_order_is_start_then_stop() {
        let mut windows = vec![
            ConnectionWindow::new(0, 0, 50, 150),
            ConnectionWindow::new(1, 0, 0, 200),
            ConnectionWindow::new(0, 1, 0, 100),
        ];
        sort_for_allocation(&mut windows);
        assert_eq!(windows[0], ConnectionWindow::new(0, 1, 0, 100));
        assert_eq!(windows[1], ConnectionWindow::new(1, 0, 0, 200));
        assert_eq!(windows[2], ConnectionWindow::new(0, 0, 50, 150));
    }

    #[test]
    fn allocation_order_is_stable_for_equal_bounds() {
        let mut windows = vec![
            ConnectionWindow::new(3, 0, 10, 20),
            ConnectionWindow::new(1, 0, 10, 20),
        ];
        sort_for_allocation(&mut windows);
        assert_eq!(windows[0].station, 3);
        assert_eq!(windows[1].station, 1);
    }

    #[test]
    fn derived_ord_compares_station_first() {
        let a = ConnectionWindow::new(0, 5, 900, 1000);
        let b = ConnectionWindow::new(1, 0, 0, 10);
        assert!(a < b);
    }

    #[test]
    fn window_containment_is_inclusive() {
        let w = ConnectionWindow::new(0, 0, 100, 200);
        assert!(w.contains(100, 200));
        assert!(w.contains(150, 150));
        assert!(!w.contains(99, 150));
        assert!(!w.contains(150, 201));

        let f = FlybyWindow::new(0, 0, 10);
        assert!(f.contains(0, 10));
        assert!(!f.contains(0, 11));
    }

    #[test]
    fn profile_volume_uses_seconds_times_bandwidth() {
        let p = SatelliteProfile::new(1_000, 4, 100);
        // 2.5 s at 100 MB/s
        assert!((p.volume_mb(2_500) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn skip_record_copies_window_bounds() {
        let w = ConnectionWindow::new(2, 7, 1_000, 1_500);
        let rec = SkipRecord::new(SkipReason::SatelliteBusy, &w);
        assert_eq!(rec.station, 2);
        assert_eq!(rec.satellite, 7);
        assert_eq!(rec.duration(), 500);
        assert_eq!(rec.reason.to_string(), "SATELLITE_BUSY");
    }
}
