/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the downlink resolver.
//!
//! Two error enums model the two failure layers:
//!
//! * [`ResolverError`]: the input handed to
//!   [`FifoResolver::resolve()`](super::FifoResolver::resolve) breaks a
//!   precondition (bad time step, dangling ids, missing profile).  Nothing is
//!   allocated.
//! * [`IntegrityError`]: the post-run consistency validator found that the
//!   final timelines disagree with each other or with the original schedules.
//!   This means the allocation or its input is inconsistent and the run must
//!   abort.
//!
//! Rejected candidate windows are **not** errors: they are recorded as
//! [`SkipRecord`](crate::window::SkipRecord)s and allocation continues.
//!
//! Every variant carries the ids and times involved so the caller can emit a
//! fully-qualified `tracing` event without re-deriving anything.

use std::fmt;

use thiserror::Error;

use super::quantize::MAX_TIME_STEP;
use crate::window::{SatelliteId, StationId, TimeOffset};

// ── Timeline kind ─────────────────────────────────────────────────────────────

/// Which arena a timeline belongs to, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    Station,
    Satellite,
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineKind::Station => f.write_str("station"),
            TimelineKind::Satellite => f.write_str("satellite"),
        }
    }
}

// ── Preconditions ─────────────────────────────────────────────────────────────

/// Input rejected before allocation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolverError {
    /// Quantization needs a positive step whose double fits in a
    /// [`TimeOffset`].
    #[error("time step must lie in 1..={}ms, got {0}ms", MAX_TIME_STEP)]
    InvalidTimeStep(TimeOffset),

    /// A window names a station outside `0..station_count`.
    #[error("window [{start}, {stop}] references unknown station {station} (station count {count})")]
    UnknownStation {
        station: StationId,
        count: usize,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// A window names a satellite outside `0..satellite_count`.
    #[error("window [{start}, {stop}] references unknown satellite {satellite} (satellite count {count})")]
    UnknownSatellite {
        satellite: SatelliteId,
        count: usize,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// A connection or flyby window ends before it starts.
    #[error("window for satellite {satellite} is inverted: start {start} > stop {stop}")]
    InvertedWindow {
        satellite: SatelliteId,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// Fewer profiles than satellites were supplied.
    #[error("satellite {satellite} has no profile ({profiles} profile(s) for {satellites} satellite(s))")]
    MissingProfile {
        satellite: SatelliteId,
        profiles: usize,
        satellites: usize,
    },

    /// A transmit ratio of zero or less would divide by zero in the buffer
    /// model.
    #[error("satellite {satellite} has non-positive transmit ratio {ratio}")]
    InvalidTransmitRatio { satellite: SatelliteId, ratio: i64 },

    /// The satellite cursor name is not recognised.
    #[error("unknown satellite cursor: '{0}' (valid: last_downlink_entry, max_downlink_stop)")]
    UnknownSatelliteCursor(String),
}

// ── Post-run integrity ────────────────────────────────────────────────────────

/// A consistency check failed after allocation.
///
/// | Variant | Check |
/// |---|---|
/// | `DuplicateInput` | no-duplicate-input |
/// | `TransactionOutsideSchedule`, `AccumulationOnStation` | schedule-membership |
/// | `Discontinuity` | continuity |
/// | `AccumulationOutsideFlyby` | shooting-containment |
/// | `MirrorMissing` | mirror |
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    /// The same connection window appears more than once in the input.
    #[error("found doubles in input schedule: station {station}, satellite {satellite}, [{start}, {stop}]")]
    DuplicateInput {
        station: StationId,
        satellite: SatelliteId,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// A committed station transaction is not inside any original window of
    /// its station/satellite pair.
    #[error("transaction mismatched schedule: station {station}, satellite {satellite}, [{start}, {stop}]")]
    TransactionOutsideSchedule {
        station: StationId,
        satellite: SatelliteId,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// A station timeline holds an accumulation interval, which only
    /// satellites can own.
    #[error("station {station} holds an accumulation interval [{start}, {stop}]")]
    AccumulationOnStation {
        station: StationId,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// Two consecutive intervals overlap, or an interval is inverted.
    #[error(
        "continuity check failed on {kind} {id} at index {index}: [{start}, {stop}] after previous stop {previous_stop:?}"
    )]
    Discontinuity {
        kind: TimelineKind,
        id: usize,
        index: usize,
        start: TimeOffset,
        stop: TimeOffset,
        previous_stop: Option<TimeOffset>,
    },

    /// A surviving accumulation interval is not inside any original flyby
    /// window of its satellite.
    #[error("shooting mismatched schedule: satellite {satellite}, [{start}, {stop}]")]
    AccumulationOutsideFlyby {
        satellite: SatelliteId,
        start: TimeOffset,
        stop: TimeOffset,
    },

    /// A transaction on one side has no exact reciprocal on the other.
    ///
    /// `found_on` names the timeline that holds the orphaned interval.
    #[error(
        "transaction present on {found_on} timeline has no mirror: station {station}, satellite {satellite}, [{start}, {stop}]"
    )]
    MirrorMissing {
        found_on: TimelineKind,
        station: StationId,
        satellite: SatelliteId,
        start: TimeOffset,
        stop: TimeOffset,
    },
}
