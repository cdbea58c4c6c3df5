/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! FIFO downlink resolver.
//!
//! [`FifoResolver`] turns candidate station–satellite visibility windows into
//! committed, non-overlapping downlink transactions.  The result is an
//! [`Allocation`]: one [`Timeline`] per station, one per satellite, and the
//! [`SkipRecord`]s of every rejected window.
//!
//! # Algorithm
//! Windows are quantized (see [`quantize`]) and processed once, in ascending
//! `start` order with ties broken by ascending `stop`.  For each window:
//!
//! 1. `earliest_station`: the station's last `stop + 1`, or the window start.
//! 2. `earliest_satellite`: see [`SatelliteCursor`].
//! 3. `effective_start = max(window.start, earliest_station, earliest_satellite)`.
//! 4. If the window closes at or before `effective_start` it is skipped as
//!    `StationBusy` and/or `SatelliteBusy`.
//! 5. Otherwise the grant is `min(window.stop - effective_start,
//!    buffered_level × transmit_ratio)`; a non-positive grant is skipped as
//!    `SatelliteBufferEmpty`.
//! 6. The grant `[effective_start, effective_start + grant]` is appended to the
//!    station timeline and spliced into the satellite timeline.
//!
//! The loop is greedy: a dropped window is never reconsidered.
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | State | Stateless `resolve()`: both timeline arenas are built inside the call and returned by value |
//! | Entity state | `Vec<Timeline>` arenas indexed by station / satellite id |
//! | Rejections | Recorded as `SkipRecord`, never returned as errors |
//! | Bad input | `Result<Allocation, ResolverError>` with typed variants, checked before any allocation |
//! | Buffer level | Full replay per decision ([`buffer::buffered_level`]), no cached counter |
//!
//! # Example
//! ```rust
//! use satlink::resolver::{AllocationInput, FifoResolver};
//! use satlink::window::{ConnectionWindow, FlybyWindow, SatelliteProfile};
//!
//! let connections = [ConnectionWindow::new(0, 0, 100, 500)];
//! let flybys = [FlybyWindow::new(0, 0, 100)];
//! let profiles = [SatelliteProfile::new(100, 4, 100)];
//! let input = AllocationInput {
//!     station_count: 1,
//!     satellite_count: 1,
//!     connections: &connections,
//!     flybys: &flybys,
//!     profiles: &profiles,
//! };
//!
//! let allocation = FifoResolver::new(1_000).resolve(&input).unwrap();
//! assert_eq!(allocation.committed_count(), 1);
//! ```

pub mod buffer;
pub mod error;
pub mod quantize;
pub mod validate;

pub use error::{IntegrityError, ResolverError, TimelineKind};

use std::str::FromStr;

use tracing::{debug, info};

use crate::timeline::{Owner, Timeline};
use crate::window::{
    ConnectionWindow, FlybyWindow, SatelliteProfile, SkipReason, SkipRecord, TimeOffset,
};

use buffer::buffered_level;
use quantize::{quantize, MAX_TIME_STEP};

// ── Satellite cursor ──────────────────────────────────────────────────────────

/// How `earliest_satellite` is derived from a satellite timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SatelliteCursor {
    /// Scan backward from the end and take the first downlink entry's
    /// `stop + 1`.
    #[default]
    LastDownlinkEntry,

    /// Take the largest `stop + 1` among all downlink entries.
    MaxDownlinkStop,
}

impl SatelliteCursor {
    pub fn as_str(self) -> &'static str {
        match self {
            SatelliteCursor::LastDownlinkEntry => "last_downlink_entry",
            SatelliteCursor::MaxDownlinkStop => "max_downlink_stop",
        }
    }

    fn downlink_stop(self, timeline: &Timeline) -> Option<TimeOffset> {
        match self {
            SatelliteCursor::LastDownlinkEntry => timeline.last_downlink_stop(),
            SatelliteCursor::MaxDownlinkStop => timeline.max_downlink_stop(),
        }
    }
}

impl FromStr for SatelliteCursor {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_downlink_entry" => Ok(SatelliteCursor::LastDownlinkEntry),
            "max_downlink_stop" => Ok(SatelliteCursor::MaxDownlinkStop),
            other => Err(ResolverError::UnknownSatelliteCursor(other.to_string())),
        }
    }
}

// ── Input / output ────────────────────────────────────────────────────────────

/// Everything one run allocates over.  Borrowed; never mutated.
#[derive(Debug, Clone, Copy)]
pub struct AllocationInput<'a> {
    pub station_count: usize,
    pub satellite_count: usize,
    pub connections: &'a [ConnectionWindow],
    pub flybys: &'a [FlybyWindow],
    /// Indexed by satellite id; must cover `0..satellite_count`.
    pub profiles: &'a [SatelliteProfile],
}

/// Final resolver state, read-only once returned.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    /// Indexed by station id.  Downlink owners are satellite ids.
    pub stations: Vec<Timeline>,
    /// Indexed by satellite id.  Downlink owners are station ids.
    pub satellites: Vec<Timeline>,
    /// Rejected candidate windows in processing order.
    pub skips: Vec<SkipRecord>,
}

impl Allocation {
    /// Number of committed transactions.
    pub fn committed_count(&self) -> usize {
        self.stations.iter().map(Timeline::len).sum()
    }

    /// Number of skip records with `reason`.
    pub fn skip_count(&self, reason: SkipReason) -> usize {
        self.skips.iter().filter(|s| s.reason == reason).count()
    }
}

// ── FifoResolver ──────────────────────────────────────────────────────────────

/// Greedy first-come-first-served downlink allocator.
///
/// Holds only its parameters; all per-run state lives inside
/// [`resolve()`](Self::resolve).
#[derive(Debug, Clone)]
pub struct FifoResolver {
    time_step: TimeOffset,
    cursor: SatelliteCursor,
}

impl FifoResolver {
    /// Create a resolver that quantizes windows with `time_step` ms and uses
    /// the default [`SatelliteCursor`].
    pub fn new(time_step: TimeOffset) -> Self {
        Self {
            time_step,
            cursor: SatelliteCursor::default(),
        }
    }

    /// Replace the satellite cursor policy.
    pub fn with_cursor(mut self, cursor: SatelliteCursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn time_step(&self) -> TimeOffset {
        self.time_step
    }

    pub fn cursor(&self) -> SatelliteCursor {
        self.cursor
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Allocate downlink time for every candidate window in `input`.
    ///
    /// # Errors
    /// A [`ResolverError`] if the input breaks a precondition.  Rejected
    /// windows are not errors; they end up in [`Allocation::skips`].
    pub fn resolve(&self, input: &AllocationInput<'_>) -> Result<Allocation, ResolverError> {
        self.check_input(input)?;

        let mut satellites = Self::seed_satellites(input);
        let mut stations = vec![Timeline::new(); input.station_count];
        let mut skips = Vec::new();

        let candidates = quantize(input.connections, self.time_step);

        info!(
            time_step_ms = self.time_step,
            cursor = self.cursor.as_str(),
            windows = input.connections.len(),
            candidates = candidates.len(),
            stations = input.station_count,
            satellites = input.satellite_count,
            "=== FifoResolver::resolve() ==="
        );

        for window in &candidates {
            let station_tl = &mut stations[window.station];
            let satellite_tl = &mut satellites[window.satellite];
            let profile = &input.profiles[window.satellite];

            let earliest_station = station_tl.last().map_or(window.start, |last| last.stop + 1);
            let earliest_satellite = self
                .cursor
                .downlink_stop(satellite_tl)
                .map_or(window.start, |stop| stop + 1);
            let effective_start = window.start.max(earliest_station).max(earliest_satellite);

            if window.stop <= effective_start {
                if window.stop <= earliest_station {
                    Self::skip(&mut skips, SkipReason::StationBusy, window);
                }
                if window.stop <= earliest_satellite {
                    Self::skip(&mut skips, SkipReason::SatelliteBusy, window);
                }
                continue;
            }

            let level = buffered_level(satellite_tl, effective_start, profile);
            let available = level.saturating_mul(profile.transmit_ratio);
            let granted = (window.stop - effective_start).min(available);
            if granted <= 0 {
                Self::skip(&mut skips, SkipReason::SatelliteBufferEmpty, window);
                continue;
            }

            let stop = effective_start + granted;
            station_tl.append(Owner::Downlink(window.satellite), effective_start, stop);
            satellite_tl.commit(Owner::Downlink(window.station), effective_start, stop);

            debug!(
                station = window.station,
                satellite = window.satellite,
                start = effective_start,
                stop,
                buffered = level,
                "✓ committed"
            );
        }

        let allocation = Allocation {
            stations,
            satellites,
            skips,
        };

        info!(
            committed = allocation.committed_count(),
            station_busy = allocation.skip_count(SkipReason::StationBusy),
            satellite_busy = allocation.skip_count(SkipReason::SatelliteBusy),
            buffer_empty = allocation.skip_count(SkipReason::SatelliteBufferEmpty),
            "=== Allocation complete ==="
        );

        Ok(allocation)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn skip(skips: &mut Vec<SkipRecord>, reason: SkipReason, window: &ConnectionWindow) {
        debug!(
            station = window.station,
            satellite = window.satellite,
            start = window.start,
            stop = window.stop,
            reason = %reason,
            "✗ skipped"
        );
        skips.push(SkipRecord::new(reason, window));
    }

    /// One timeline per satellite, holding its flyby windows as accumulation
    /// intervals, sorted by `(satellite, start)`.
    fn seed_satellites(input: &AllocationInput<'_>) -> Vec<Timeline> {
        let mut flybys = input.flybys.to_vec();
        flybys.sort_by_key(|f| (f.satellite, f.start));

        let mut satellites = vec![Timeline::new(); input.satellite_count];
        for f in &flybys {
            satellites[f.satellite].seed(Owner::Accumulation, f.start, f.stop);
        }
        satellites
    }

    /// Precondition gate: everything `resolve()` indexes or divides by.
    fn check_input(&self, input: &AllocationInput<'_>) -> Result<(), ResolverError> {
        if !(1..=MAX_TIME_STEP).contains(&self.time_step) {
            return Err(ResolverError::InvalidTimeStep(self.time_step));
        }

        if input.profiles.len() < input.satellite_count {
            return Err(ResolverError::MissingProfile {
                satellite: input.profiles.len(),
                profiles: input.profiles.len(),
                satellites: input.satellite_count,
            });
        }
        for (satellite, profile) in input.profiles.iter().enumerate().take(input.satellite_count) {
            if profile.transmit_ratio <= 0 {
                return Err(ResolverError::InvalidTransmitRatio {
                    satellite,
                    ratio: profile.transmit_ratio,
                });
            }
        }

        for w in input.connections {
            if w.station >= input.station_count {
                return Err(ResolverError::UnknownStation {
                    station: w.station,
                    count: input.station_count,
                    start: w.start,
                    stop: w.stop,
                });
            }
            Self::check_window(w.satellite, w.start, w.stop, input.satellite_count)?;
        }
        for f in input.flybys {
            Self::check_window(f.satellite, f.start, f.stop, input.satellite_count)?;
        }
        Ok(())
    }

    fn check_window(
        satellite: usize,
        start: TimeOffset,
        stop: TimeOffset,
        count: usize,
    ) -> Result<(), ResolverError> {
        if satellite >= count {
            return Err(ResolverError::UnknownSatellite {
                satellite,
                count,
                start,
                stop,
            });
        }
        if start > stop {
            return Err(ResolverError::InvertedWindow {
                satellite,
                start,
                stop,
            });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::validate::validate;
    use proptest::prelude::*;

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn bounds(tl: &Timeline) -> Vec<(i64, i64, i64)> {
        tl.iter().map(|e| (e.owner.tag(), e.start, e.stop)).collect()
    }

    fn run(
        stations: usize,
        connections: &[ConnectionWindow],
        flybys: &[FlybyWindow],
        profiles: &[SatelliteProfile],
    ) -> Allocation {
        run_with(FifoResolver::new(1_000), stations, connections, flybys, profiles)
    }

    fn run_with(
        resolver: FifoResolver,
        stations: usize,
        connections: &[ConnectionWindow],
        flybys: &[FlybyWindow],
        profiles: &[SatelliteProfile],
    ) -> Allocation {
        let input = AllocationInput {
            station_count: stations,
            satellite_count: profiles.len(),
            connections,
            flybys,
            profiles,
        };
        let alloc = resolver.resolve(&input).unwrap();
        validate(connections, flybys, &alloc).unwrap();
        alloc
    }

    fn reasons(alloc: &Allocation) -> Vec<SkipReason> {
        alloc.skips.iter().map(|s| s.reason).collect()
    }

    /// Large buffer, one buffered unit cleared per downlink millisecond.
    fn roomy() -> SatelliteProfile {
        SatelliteProfile::new(1_000_000, 1, 100)
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn downlink_starting_at_buffer_full_gets_whole_window() {
        let alloc = run(
            1,
            &[ConnectionWindow::new(0, 0, 100, 500)],
            &[FlybyWindow::new(0, 0, 100)],
            &[SatelliteProfile::new(100, 4, 100)],
        );
        assert_eq!(bounds(&alloc.stations[0]), vec![(0, 100, 500)]);
        assert_eq!(bounds(&alloc.satellites[0]), vec![(-1, 0, 99), (0, 100, 500)]);
        assert!(alloc.skips.is_empty());
    }

    #[test]
    fn overlapping_windows_on_one_station_start_after_previous_stop() {
        let alloc = run(
            1,
            &[
                ConnectionWindow::new(0, 0, 1_000, 1_100),
                ConnectionWindow::new(0, 0, 1_050, 1_150),
            ],
            &[FlybyWindow::new(0, 0, 1_000)],
            &[roomy()],
        );
        // flyby clipped to [0, 999]; 999 - 100 still buffered at 1101
        assert_eq!(
            bounds(&alloc.stations[0]),
            vec![(0, 1_000, 1_100), (0, 1_101, 1_150)]
        );
        assert!(alloc.skips.is_empty());
    }

    #[test]
    fn overlapping_window_with_drained_buffer_is_skipped() {
        let alloc = run(
            1,
            &[
                ConnectionWindow::new(0, 0, 1_000, 1_100),
                ConnectionWindow::new(0, 0, 1_050, 1_150),
            ],
            &[FlybyWindow::new(0, 0, 1_000)],
            &[SatelliteProfile::new(100, 1, 100)],
        );
        assert_eq!(bounds(&alloc.stations[0]), vec![(0, 1_000, 1_100)]);
        assert_eq!(reasons(&alloc), vec![SkipReason::SatelliteBufferEmpty]);
        assert_eq!(alloc.skips[0].start, 1_050);
    }

    #[test]
    fn windows_without_any_flyby_are_all_buffer_empty() {
        let alloc = run(
            1,
            &[
                ConnectionWindow::new(0, 0, 0, 100),
                ConnectionWindow::new(0, 0, 50, 150),
            ],
            &[],
            &[roomy()],
        );
        assert!(alloc.stations[0].is_empty());
        assert_eq!(
            reasons(&alloc),
            vec![SkipReason::SatelliteBufferEmpty, SkipReason::SatelliteBufferEmpty]
        );
    }

    #[test]
    fn grant_is_limited_by_buffer_times_ratio() {
        let alloc = run(
            1,
            &[ConnectionWindow::new(0, 0, 200, 390)],
            &[FlybyWindow::new(0, 0, 10)],
            &[SatelliteProfile::new(1_000, 4, 100)],
        );
        // 10 buffered × 4 = 40ms of downlink
        assert_eq!(bounds(&alloc.stations[0]), vec![(0, 200, 240)]);
    }

    #[test]
    fn long_window_is_quantized_before_allocation() {
        let alloc = run(
            1,
            &[ConnectionWindow::new(0, 0, 10_000, 11_000)],
            &[FlybyWindow::new(0, 0, 10_000)],
            &[roomy()],
        );
        // chunks [10000, 10099], [10100, 10199], ...; each chunk after the
        // first starts at the previous grant's stop + 1
        let first = alloc.stations[0].as_slice()[0];
        assert_eq!((first.start, first.stop), (10_000, 10_099));
        assert!(alloc.stations[0].len() > 1);
        assert!(alloc.stations[0].iter().all(|tx| tx.stop <= 11_000));
    }

    // ── Skip reasons ──────────────────────────────────────────────────────────

    #[test]
    fn second_station_for_same_satellite_is_satellite_busy() {
        let alloc = run(
            2,
            &[
                ConnectionWindow::new(0, 0, 1_000, 1_100),
                ConnectionWindow::new(1, 0, 1_000, 1_100),
            ],
            &[FlybyWindow::new(0, 0, 1_000)],
            &[roomy()],
        );
        assert_eq!(alloc.stations[0].len(), 1);
        assert!(alloc.stations[1].is_empty());
        assert_eq!(reasons(&alloc), vec![SkipReason::SatelliteBusy]);
        assert_eq!(alloc.skips[0].station, 1);
    }

    #[test]
    fn second_satellite_for_same_station_is_station_busy() {
        let alloc = run(
            1,
            &[
                ConnectionWindow::new(0, 0, 1_000, 1_100),
                ConnectionWindow::new(0, 1, 1_000, 1_100),
            ],
            &[FlybyWindow::new(0, 0, 1_000), FlybyWindow::new(1, 0, 1_000)],
            &[roomy(), roomy()],
        );
        assert_eq!(bounds(&alloc.stations[0]), vec![(0, 1_000, 1_100)]);
        assert_eq!(reasons(&alloc), vec![SkipReason::StationBusy]);
        assert_eq!(alloc.skips[0].satellite, 1);
    }

    #[test]
    fn window_blocked_on_both_sides_records_both_reasons() {
        let alloc = run(
            1,
            &[
                ConnectionWindow::new(0, 0, 1_000, 1_100),
                ConnectionWindow::new(0, 0, 1_050, 1_100),
            ],
            &[FlybyWindow::new(0, 0, 1_000)],
            &[roomy()],
        );
        assert_eq!(
            reasons(&alloc),
            vec![SkipReason::StationBusy, SkipReason::SatelliteBusy]
        );
    }

    // ── Satellite timeline splicing ───────────────────────────────────────────

    #[test]
    fn downlink_during_flyby_splits_accumulation() {
        let alloc = run(
            1,
            &[ConnectionWindow::new(0, 0, 500, 600)],
            &[FlybyWindow::new(0, 0, 1_000)],
            &[roomy()],
        );
        assert_eq!(
            bounds(&alloc.satellites[0]),
            vec![(-1, 0, 499), (0, 500, 600), (-1, 601, 1_000)]
        );
    }

    #[test]
    fn cursors_agree_on_sorted_timelines() {
        let connections = [
            ConnectionWindow::new(0, 0, 500, 600),
            ConnectionWindow::new(1, 0, 550, 800),
            ConnectionWindow::new(1, 1, 700, 900),
            ConnectionWindow::new(0, 1, 650, 1_200),
        ];
        let flybys = [FlybyWindow::new(0, 0, 1_000), FlybyWindow::new(1, 100, 400)];
        let profiles = [roomy(), SatelliteProfile::new(200, 2, 25)];

        let last = run_with(FifoResolver::new(1_000), 2, &connections, &flybys, &profiles);
        let max = run_with(
            FifoResolver::new(1_000).with_cursor(SatelliteCursor::MaxDownlinkStop),
            2,
            &connections,
            &flybys,
            &profiles,
        );
        assert_eq!(last.stations, max.stations);
        assert_eq!(last.satellites, max.satellites);
        assert_eq!(last.skips, max.skips);
    }

    #[test]
    fn resolver_is_deterministic() {
        let connections = [
            ConnectionWindow::new(0, 0, 0, 2_000),
            ConnectionWindow::new(1, 0, 100, 900),
            ConnectionWindow::new(1, 1, 0, 700),
            ConnectionWindow::new(0, 1, 300, 400),
        ];
        let flybys = [FlybyWindow::new(0, 0, 300), FlybyWindow::new(1, 0, 300)];
        let profiles = [SatelliteProfile::new(250, 4, 100), SatelliteProfile::new(500, 16, 25)];

        let reference = run(2, &connections, &flybys, &profiles);
        for _ in 0..20 {
            let again = run(2, &connections, &flybys, &profiles);
            assert_eq!(again.stations, reference.stations);
            assert_eq!(again.satellites, reference.satellites);
            assert_eq!(again.skips, reference.skips);
        }
    }

    // ── Integrity ─────────────────────────────────────────────────────────────

    #[test]
    fn duplicate_input_window_fails_validation() {
        let connections = [
            ConnectionWindow::new(0, 0, 1_000, 1_100),
            ConnectionWindow::new(0, 0, 1_000, 1_100),
        ];
        let flybys = [FlybyWindow::new(0, 0, 1_000)];
        let profiles = [roomy()];
        let input = AllocationInput {
            station_count: 1,
            satellite_count: 1,
            connections: &connections,
            flybys: &flybys,
            profiles: &profiles,
        };
        let alloc = FifoResolver::new(100).resolve(&input).unwrap();
        let err = validate(&connections, &flybys, &alloc).unwrap_err();
        assert!(matches!(err, IntegrityError::DuplicateInput { .. }));
    }

    // ── Randomized runs ───────────────────────────────────────────────────────

    const RANDOM_STATIONS: usize = 3;
    const RANDOM_SATELLITES: usize = 3;

    /// Distinct connection windows over the fixed id space.
    fn connection_set() -> impl Strategy<Value = Vec<ConnectionWindow>> {
        prop::collection::vec(
            (0..RANDOM_STATIONS, 0..RANDOM_SATELLITES, 0i64..20_000, 0i64..3_000),
            0..40,
        )
        .prop_map(|raw| {
            let mut windows: Vec<_> = raw
                .into_iter()
                .map(|(station, satellite, start, len)| {
                    ConnectionWindow::new(station, satellite, start, start + len)
                })
                .collect();
            windows.sort_unstable();
            windows.dedup();
            windows
        })
    }

    /// Disjoint flybys per satellite, each starting after the previous stop.
    fn flyby_set() -> impl Strategy<Value = Vec<FlybyWindow>> {
        prop::collection::vec((0..RANDOM_SATELLITES, 1i64..2_000, 0i64..1_500), 0..20).prop_map(
            |raw| {
                let mut cursor = [-1i64; RANDOM_SATELLITES];
                raw.into_iter()
                    .map(|(satellite, gap, len)| {
                        let start = cursor[satellite] + gap;
                        cursor[satellite] = start + len;
                        FlybyWindow::new(satellite, start, start + len)
                    })
                    .collect()
            },
        )
    }

    fn profile_set() -> impl Strategy<Value = Vec<SatelliteProfile>> {
        prop::collection::vec(
            (1i64..5_000, 1i64..20, 1i64..100).prop_map(|(capacity, ratio, bandwidth)| {
                SatelliteProfile::new(capacity, ratio, bandwidth)
            }),
            RANDOM_SATELLITES,
        )
    }

    proptest! {
        #[test]
        fn every_run_passes_the_consistency_checks(
            connections in connection_set(),
            flybys in flyby_set(),
            profiles in profile_set(),
            time_step in 50i64..2_000,
            max_cursor in any::<bool>(),
        ) {
            let cursor = if max_cursor {
                SatelliteCursor::MaxDownlinkStop
            } else {
                SatelliteCursor::LastDownlinkEntry
            };
            let input = AllocationInput {
                station_count: RANDOM_STATIONS,
                satellite_count: RANDOM_SATELLITES,
                connections: &connections,
                flybys: &flybys,
                profiles: &profiles,
            };
            let alloc = FifoResolver::new(time_step)
                .with_cursor(cursor)
                .resolve(&input)
                .unwrap();

            prop_assert_eq!(validate(&connections, &flybys, &alloc), Ok(()));

            let satellite_downlinks: usize = alloc
                .satellites
                .iter()
                .map(|tl| tl.iter().filter(|i| i.owner.counterpart().is_some()).count())
                .sum();
            prop_assert_eq!(satellite_downlinks, alloc.committed_count());
        }
    }

    // ── Preconditions ─────────────────────────────────────────────────────────

    fn input_with<'a>(
        connections: &'a [ConnectionWindow],
        flybys: &'a [FlybyWindow],
        profiles: &'a [SatelliteProfile],
    ) -> AllocationInput<'a> {
        AllocationInput {
            station_count: 1,
            satellite_count: 1,
            connections,
            flybys,
            profiles,
        }
    }

    #[test]
    fn non_positive_time_step_is_rejected() {
        let profiles = [roomy()];
        let err = FifoResolver::new(0)
            .resolve(&input_with(&[], &[], &profiles))
            .unwrap_err();
        assert_eq!(err, ResolverError::InvalidTimeStep(0));
    }

    #[test]
    fn time_step_whose_double_overflows_is_rejected() {
        let profiles = [roomy()];
        let windows = [ConnectionWindow::new(0, 0, 0, 10)];
        let too_large = MAX_TIME_STEP + 1;
        let err = FifoResolver::new(too_large)
            .resolve(&input_with(&windows, &[], &profiles))
            .unwrap_err();
        assert_eq!(err, ResolverError::InvalidTimeStep(too_large));

        let alloc = FifoResolver::new(MAX_TIME_STEP)
            .resolve(&input_with(&windows, &[], &profiles))
            .unwrap();
        assert_eq!(reasons(&alloc), vec![SkipReason::SatelliteBufferEmpty]);
    }

    #[test]
    fn missing_profile_is_rejected() {
        let err = FifoResolver::new(100)
            .resolve(&input_with(&[], &[], &[]))
            .unwrap_err();
        assert!(matches!(err, ResolverError::MissingProfile { satellite: 0, .. }));
    }

    #[test]
    fn zero_transmit_ratio_is_rejected() {
        let profiles = [SatelliteProfile::new(100, 0, 1)];
        let err = FifoResolver::new(100)
            .resolve(&input_with(&[], &[], &profiles))
            .unwrap_err();
        assert!(matches!(err, ResolverError::InvalidTransmitRatio { .. }));
    }

    #[test]
    fn dangling_ids_are_rejected() {
        let profiles = [roomy()];
        let bad_station = [ConnectionWindow::new(3, 0, 0, 10)];
        assert!(matches!(
            FifoResolver::new(100).resolve(&input_with(&bad_station, &[], &profiles)),
            Err(ResolverError::UnknownStation { station: 3, .. })
        ));

        let bad_flyby = [FlybyWindow::new(1, 0, 10)];
        assert!(matches!(
            FifoResolver::new(100).resolve(&input_with(&[], &bad_flyby, &profiles)),
            Err(ResolverError::UnknownSatellite { satellite: 1, .. })
        ));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let profiles = [roomy()];
        let windows = [ConnectionWindow::new(0, 0, 10, 5)];
        assert!(matches!(
            FifoResolver::new(100).resolve(&input_with(&windows, &[], &profiles)),
            Err(ResolverError::InvertedWindow { start: 10, stop: 5, .. })
        ));
    }

    #[test]
    fn satellite_cursor_parses_known_names() {
        assert_eq!(
            "last_downlink_entry".parse::<SatelliteCursor>().unwrap(),
            SatelliteCursor::LastDownlinkEntry
        );
        assert_eq!(
            "max_downlink_stop".parse::<SatelliteCursor>().unwrap(),
            SatelliteCursor::MaxDownlinkStop
        );
        assert!(matches!(
            "newest".parse::<SatelliteCursor>(),
            Err(ResolverError::UnknownSatelliteCursor(_))
        ));
    }
}
