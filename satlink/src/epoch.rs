/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Run epoch and timestamp ↔ offset conversion.
//!
//! Every window in a run is expressed as a [`TimeOffset`] in milliseconds from
//! one [`Epoch`]: midnight of the earliest start time observed across all
//! loaded schedules.  The epoch is computed once by the loader and then passed
//! explicitly to everything that needs to go back to calendar time (the report
//! writer), so there is no run-global state.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::window::TimeOffset;

/// Midnight of the earliest observed start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    midnight: NaiveDateTime,
}

impl Epoch {
    /// Epoch at midnight of the day containing `instant`.
    pub fn containing(instant: NaiveDateTime) -> Self {
        Self {
            midnight: instant.date().and_time(NaiveTime::MIN),
        }
    }

    /// Epoch for a set of start times: midnight of the earliest one.
    ///
    /// Returns `None` if `starts` is empty.
    pub fn earliest<I>(starts: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        starts.into_iter().min().map(Self::containing)
    }

    /// The epoch instant itself.
    pub fn midnight(&self) -> NaiveDateTime {
        self.midnight
    }

    /// Milliseconds from the epoch to `instant` (negative if earlier).
    pub fn offset_of(&self, instant: NaiveDateTime) -> TimeOffset {
        (instant - self.midnight).num_milliseconds()
    }

    /// Calendar instant `offset` milliseconds after the epoch.
    ///
    /// Returns `None` if the result falls outside chrono's representable
    /// range.
    pub fn instant_at(&self, offset: TimeOffset) -> Option<NaiveDateTime> {
        TimeDelta::try_milliseconds(offset).and_then(|d| self.midnight.checked_add_signed(d))
    }

    /// Render `offset` with a `strftime` pattern.
    ///
    /// Out-of-range offsets fall back to the raw millisecond value so a report
    /// line is never lost.  The pattern must already have been validated (see
    /// [`SatLinkConfig::validate`](crate::config::SatLinkConfig::validate)).
    pub fn format(&self, offset: TimeOffset, pattern: &str) -> String {
        match self.instant_at(offset) {
            Some(instant) => instant.format(pattern).to_string(),
            None => format!("{offset}ms"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
