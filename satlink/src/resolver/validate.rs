/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Post-run consistency validation.
//!
//! Five checks prove that the final timelines agree with each other and with
//! the original schedules.  Unlike skip records these are hard gates: the
//! first failing check aborts the run with an [`IntegrityError`] naming the
//! check, the ids and the times.
//!
//! | Check | Proves |
//! |---|---|
//! | [`check_no_duplicate_input`] | no connection window is listed twice |
//! | [`check_schedule_membership`] | every station transaction sits inside an original window of its pair |
//! | [`check_continuity`] | every timeline is sorted and disjoint |
//! | [`check_accumulation_containment`] | every surviving accumulation interval sits inside an original flyby |
//! | [`check_mirror`] | station and satellite timelines hold the same transactions |
//!
//! All checks only read; they can run in any order without affecting each
//! other, but [`validate`] runs them in the order above.

use std::collections::BTreeMap;

use tracing::{error, info};

use crate::timeline::{Owner, Timeline};
use crate::window::{ConnectionWindow, FlybyWindow, SatelliteId, StationId, TimeOffset};

use super::error::{IntegrityError, TimelineKind};
use super::Allocation;

/// Run every check against the final allocation.
///
/// # Errors
/// The first [`IntegrityError`] encountered.  It is also logged at `error`
/// level before being returned.
pub fn validate(
    connections: &[ConnectionWindow],
    flybys: &[FlybyWindow],
    allocation: &Allocation,
) -> Result<(), IntegrityError> {
    let result = check_no_duplicate_input(connections)
        .and_then(|()| check_schedule_membership(connections, &allocation.stations))
        .and_then(|()| check_continuity(TimelineKind::Station, &allocation.stations))
        .and_then(|()| check_continuity(TimelineKind::Satellite, &allocation.satellites))
        .and_then(|()| check_accumulation_containment(flybys, &allocation.satellites))
        .and_then(|()| check_mirror(&allocation.stations, &allocation.satellites));

    match &result {
        Ok(()) => info!(
            stations = allocation.stations.len(),
            satellites = allocation.satellites.len(),
            "consistency checks passed"
        ),
        Err(e) => error!(error = %e, "consistency check failed"),
    }
    result
}

/// No two connection windows share `(station, satellite, start, stop)`.
///
/// Works on a sorted copy; the input slice is left untouched.
pub fn check_no_duplicate_input(connections: &[ConnectionWindow]) -> Result<(), IntegrityError> {
    let mut sorted = connections.to_vec();
    sorted.sort_unstable();

    match sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => {
            let w = pair[0];
            Err(IntegrityError::DuplicateInput {
                station: w.station,
                satellite: w.satellite,
                start: w.start,
                stop: w.stop,
            })
        }
        None => Ok(()),
    }
}

/// Every station transaction lies inside some original connection window of
/// the same `(station, satellite)` pair.
pub fn check_schedule_membership(
    connections: &[ConnectionWindow],
    stations: &[Timeline],
) -> Result<(), IntegrityError> {
    let mut by_pair: BTreeMap<(StationId, SatelliteId), Vec<&ConnectionWindow>> = BTreeMap::new();
    for w in connections {
        by_pair.entry((w.station, w.satellite)).or_default().push(w);
    }

    for (station, timeline) in stations.iter().enumerate() {
        for tx in timeline {
            let Some(satellite) = tx.owner.counterpart() else {
                return Err(IntegrityError::AccumulationOnStation {
                    station,
                    start: tx.start,
                    stop: tx.stop,
                });
            };
            let covered = by_pair
                .get(&(station, satellite))
                .is_some_and(|ws| ws.iter().any(|w| w.contains(tx.start, tx.stop)));
            if !covered {
                return Err(IntegrityError::TransactionOutsideSchedule {
                    station,
                    satellite,
                    start: tx.start,
                    stop: tx.stop,
                });
            }
        }
    }
    Ok(())
}

/// Every interval has `stop >= start` and starts strictly after the previous
/// interval's `stop`.
pub fn check_continuity(kind: TimelineKind, timelines: &[Timeline]) -> Result<(), IntegrityError> {
    for (id, timeline) in timelines.iter().enumerate() {
        if let Some(index) = timeline.first_discontinuity() {
            let intervals = timeline.as_slice();
            let bad = intervals[index];
            return Err(IntegrityError::Discontinuity {
                kind,
                id,
                index,
                start: bad.start,
                stop: bad.stop,
                previous_stop: index.checked_sub(1).map(|p| intervals[p].stop),
            });
        }
    }
    Ok(())
}

/// Every accumulation interval left on a satellite timeline lies inside some
/// original flyby window of that satellite.
pub fn check_accumulation_containment(
    flybys: &[FlybyWindow],
    satellites: &[Timeline],
) -> Result<(), IntegrityError> {
    let mut by_satellite: BTreeMap<SatelliteId, Vec<&FlybyWindow>> = BTreeMap::new();
    for f in flybys {
        by_satellite.entry(f.satellite).or_default().push(f);
    }

    for (satellite, timeline) in satellites.iter().enumerate() {
        for interval in timeline.iter().filter(|i| i.owner == Owner::Accumulation) {
            let covered = by_satellite
                .get(&satellite)
                .is_some_and(|fs| fs.iter().any(|f| f.contains(interval.start, interval.stop)));
            if !covered {
                return Err(IntegrityError::AccumulationOutsideFlyby {
                    satellite,
                    start: interval.start,
                    stop: interval.stop,
                });
            }
        }
    }
    Ok(())
}

/// Every downlink on a satellite timeline has an identical reciprocal on the
/// station timeline, and vice versa.  Both sides are compared as sorted
/// lists, so a transaction listed twice on one side needs two reciprocals.
pub fn check_mirror(stations: &[Timeline], satellites: &[Timeline]) -> Result<(), IntegrityError> {
    let mut station_side: Vec<Tx> = stations
        .iter()
        .enumerate()
        .flat_map(|(station, tl)| {
            tl.iter()
                .filter_map(move |i| i.owner.counterpart().map(|sat| (station, sat, i.start, i.stop)))
        })
        .collect();
    station_side.sort_unstable();

    let mut satellite_side: Vec<Tx> = satellites
        .iter()
        .enumerate()
        .flat_map(|(satellite, tl)| {
            tl.iter()
                .filter_map(move |i| i.owner.counterpart().map(|st| (st, satellite, i.start, i.stop)))
        })
        .collect();
    satellite_side.sort_unstable();

    let orphan = |found_on: TimelineKind, (station, satellite, start, stop): Tx| {
        IntegrityError::MirrorMissing {
            found_on,
            station,
            satellite,
            start,
            stop,
        }
    };

    if let Some(tx) = first_unmatched(&satellite_side, &station_side) {
        return Err(orphan(TimelineKind::Satellite, tx));
    }
    if let Some(tx) = first_unmatched(&station_side, &satellite_side) {
        return Err(orphan(TimelineKind::Station, tx));
    }
    Ok(())
}

type Tx = (StationId, SatelliteId, TimeOffset, TimeOffset);

/// Smallest entry of sorted `side` left over once each entry of sorted
/// `other` has cancelled at most one equal entry.
fn first_unmatched(side: &[Tx], other: &[Tx]) -> Option<Tx> {
    let mut other = other.iter().peekable();
    for tx in side {
        while other.next_if(|o| *o < tx).is_some() {}
        if other.next_if(|o| *o == tx).is_none() {
            return Some(*tx);
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
