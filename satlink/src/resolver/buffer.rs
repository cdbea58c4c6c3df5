/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Satellite buffer accounting.
//!
//! The buffered level is never stored: it is recomputed by replaying the
//! satellite's timeline from the beginning up to the instant of interest.
//! The replay is a pure function of `(timeline, at, profile)`, so it stays
//! correct however the timeline was spliced in between calls.

use crate::timeline::{Owner, Timeline};
use crate::window::{SatelliteProfile, TimeOffset};

/// Replay horizon that includes every interval on the timeline.
pub const END_OF_TIME: TimeOffset = TimeOffset::MAX;

/// Buffered level of a satellite at instant `at`.
///
/// Intervals are replayed in order and the replay stops at the first interval
/// starting at or after `at`.  For every earlier interval the overlapping span
/// is `min(stop, at) - start`:
///
/// * accumulation adds the span, then clamps to `buffer_capacity`;
/// * downlink subtracts `span / transmit_ratio` (integer division).
///
/// There is no lower clamp.  A negative result can only come from a timeline
/// that granted more downlink than was buffered.
pub fn buffered_level(timeline: &Timeline, at: TimeOffset, profile: &SatelliteProfile) -> i64 {
    let mut level: i64 = 0;
    for interval in timeline {
        if interval.start >= at {
            break;
        }
        let span = interval.stop.min(at) - interval.start;
        match interval.owner {
            Owner::Accumulation => {
                level = (level + span).min(profile.buffer_capacity);
            }
            Owner::Downlink(_) => {
                level -= span / profile.transmit_ratio;
            }
        }
    }
    level
}

// ── Tests ─────────────────────────────────────────────────────────────────────
