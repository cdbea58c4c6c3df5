/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ordered, non-overlapping interval container.
//!
//! One [`Timeline`] exists per station and per satellite.  A satellite's
//! timeline interleaves accumulation intervals (seeded from flyby windows)
//! with the downlink transactions the resolver commits; a station's timeline
//! holds only downlink transactions, in strict append order.
//!
//! # Invariant
//! After every mutation the intervals are sorted ascending by `start` and
//! pairwise disjoint: `intervals[i].stop < intervals[i + 1].start`.
//! [`Timeline::commit`] restores this by clipping, dropping or splitting
//! whatever the new interval overlaps.
//!
//! The one exception is [`Timeline::seed`], which appends verbatim so that
//! overlapping flyby input stays visible to the continuity check instead of
//! being silently merged.

use std::fmt;

use crate::window::TimeOffset;

// ── Owner ─────────────────────────────────────────────────────────────────────

/// What an interval on a timeline represents.
///
/// Replaces the integer owner tag (`-1` = accumulation, `>= 0` = counterpart
/// id) with a typed value; [`Owner::tag`] converts back for raw dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Owner {
    /// The satellite is acquiring data (flyby).  Only appears on satellite
    /// timelines.
    Accumulation,

    /// A downlink transaction with the given counterpart: the station id on a
    /// satellite timeline, the satellite id on a station timeline.
    Downlink(usize),
}

impl Owner {
    /// Integer tag used in raw transaction dumps: `-1` for accumulation,
    /// otherwise the counterpart id.
    pub fn tag(self) -> i64 {
        match self {
            Owner::Accumulation => -1,
            Owner::Downlink(id) => id as i64,
        }
    }

    pub fn is_downlink(self) -> bool {
        matches!(self, Owner::Downlink(_))
    }

    /// Counterpart id for a downlink, `None` for accumulation.
    pub fn counterpart(self) -> Option<usize> {
        match self {
            Owner::Accumulation => None,
            Owner::Downlink(id) => Some(id),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ── Interval ──────────────────────────────────────────────────────────────────

/// Closed interval `[start, stop]` tagged with its [`Owner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub owner: Owner,
    pub start: TimeOffset,
    pub stop: TimeOffset,
}

impl Interval {
    pub fn new(owner: Owner, start: TimeOffset, stop: TimeOffset) -> Self {
        Self { owner, start, stop }
    }

    /// `stop - start` in milliseconds.
    pub fn duration(&self) -> TimeOffset {
        self.stop - self.start
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

/// Sorted, non-overlapping sequence of [`Interval`]s for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn last(&self) -> Option<&Interval> {
        self.intervals.last()
    }

    /// Append an interval without any splicing.
    ///
    /// Used to seed satellite timelines from flyby windows that the caller has
    /// already sorted.  Overlaps introduced here are left for the continuity
    /// check to report.
    pub fn seed(&mut self, owner: Owner, start: TimeOffset, stop: TimeOffset) {
        self.intervals.push(Interval::new(owner, start, stop));
    }

    /// Append an interval that starts after everything already on the
    /// timeline.
    ///
    /// Station timelines only ever grow this way: the resolver never commits
    /// before the station's previous `stop + 1`.
    pub fn append(&mut self, owner: Owner, start: TimeOffset, stop: TimeOffset) {
        debug_assert!(start <= stop, "append of inverted interval [{start}, {stop}]");
        debug_assert!(
            self.intervals.last().map_or(true, |last| last.stop < start),
            "append of [{start}, {stop}] overlaps the timeline tail"
        );
        self.intervals.push(Interval::new(owner, start, stop));
    }

    /// Insert `[start, stop]` tagged `owner`, clipping, dropping or splitting
    /// existing intervals so the invariant holds afterwards.
    ///
    /// 1. Intervals entirely inside `[start, stop]` are dropped.
    /// 2. An interval crossing `start` from the left is cut to end at
    ///    `start - 1`.
    /// 3. An interval crossing `stop` from the right is cut to begin at
    ///    `stop + 1`.
    /// 4. An interval covering `[start, stop]` on both sides is split; the
    ///    tail fragment `[stop + 1, old_stop]` keeps its owner and is placed
    ///    directly after the new interval.
    ///
    /// Requires `start <= stop`.
    pub fn commit(&mut self, owner: Owner, start: TimeOffset, stop: TimeOffset) {
        debug_assert!(start <= stop, "commit of inverted interval [{start}, {stop}]");

        self.intervals
            .retain(|e| !(e.start >= start && e.stop <= stop));

        let mut insert_at: Option<usize> = None;
        let mut fragment: Option<Interval> = None;

        for (i, e) in self.intervals.iter_mut().enumerate() {
            // crosses `start` from the left, ends inside
            if e.start < start && e.stop >= start && e.stop <= stop {
                e.stop = start - 1;
                insert_at = Some(i + 1);
            }
            // begins inside, crosses `stop` to the right
            if e.start >= start && e.start <= stop && e.stop > stop {
                e.start = stop + 1;
            }
            // covers both ends: split
            if e.start < start && e.stop > stop {
                fragment = Some(Interval::new(e.owner, stop + 1, e.stop));
                e.stop = start - 1;
                insert_at = Some(i + 1);
            }
            if e.start > stop {
                insert_at.get_or_insert(i);
                break;
            }
        }

        let at = insert_at.unwrap_or(self.intervals.len());
        self.intervals.insert(at, Interval::new(owner, start, stop));
        if let Some(tail) = fragment {
            self.intervals.insert(at + 1, tail);
        }
    }

    /// `stop` of the last downlink interval found scanning backward from the
    /// end of the timeline.
    ///
    /// This is the first match from the end, which is not necessarily the
    /// largest downlink `stop` if accumulation intervals were spliced after
    /// it.  See [`Timeline::max_downlink_stop`] for the alternative.
    pub fn last_downlink_stop(&self) -> Option<TimeOffset> {
        self.intervals
            .iter()
            .rev()
            .find(|e| e.owner.is_downlink())
            .map(|e| e.stop)
    }

    /// Largest `stop` among all downlink intervals.
    pub fn max_downlink_stop(&self) -> Option<TimeOffset> {
        self.intervals
            .iter()
            .filter(|e| e.owner.is_downlink())
            .map(|e| e.stop)
            .max()
    }

    /// Index of the first pair of intervals that violates the ordering
    /// invariant, if any.
    ///
    /// Returns `Some(i)` when `intervals[i]` is inverted (`stop < start`) or
    /// does not start strictly after `intervals[i - 1].stop`.
    pub fn first_discontinuity(&self) -> Option<usize> {
        let mut prev_stop: Option<TimeOffset> = None;
        for (i, e) in self.intervals.iter().enumerate() {
            if e.stop < e.start || prev_stop.is_some_and(|p| p >= e.start) {
                return Some(i);
            }
            prev_stop = Some(e.stop);
        }
        None
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ACC: Owner = Owner::Accumulation;

    fn bounds(tl: &Timeline) -> Vec<(i64, i64, i64)> {
        tl.iter().map(|e| (e.owner.tag(), e.start, e.stop)).collect()
    }

    fn seeded(spans: &[(TimeOffset, TimeOffset)]) -> Timeline {
        let mut tl = Timeline::new();
        for &(s, e) in spans {
            tl.seed(ACC, s, e);
        }
        tl
    }

    // ── Owner ─────────────────────────────────────────────────────────────────

    #[test]
    fn owner_tag_matches_integer_convention() {
        assert_eq!(Owner::Accumulation.tag(), -1);
        assert_eq!(Owner::Downlink(0).tag(), 0);
        assert_eq!(Owner::Downlink(12).tag(), 12);
        assert_eq!(Owner::Downlink(3).counterpart(), Some(3));
        assert_eq!(Owner::Accumulation.counterpart(), None);
    }

    // ── commit ────────────────────────────────────────────────────────────────

    #[test]
    fn commit_into_empty_timeline() {
        let mut tl = Timeline::new();
        tl.commit(Owner::Downlink(1), 10, 20);
        assert_eq!(bounds(&tl), vec![(1, 10, 20)]);
    }

    #[test]
    fn commit_drops_fully_covered_intervals() {
        let mut tl = seeded(&[(10, 20), (30, 40)]);
        tl.commit(Owner::Downlink(0), 5, 45);
        assert_eq!(bounds(&tl), vec![(0, 5, 45)]);
    }

    #[test]
    fn commit_clips_interval_crossing_start() {
        let mut tl = seeded(&[(0, 100)]);
        tl.commit(Owner::Downlink(2), 100, 500);
        assert_eq!(bounds(&tl), vec![(-1, 0, 99), (2, 100, 500)]);
    }

    #[test]
    fn commit_clips_interval_crossing_stop() {
        let mut tl = seeded(&[(50, 200)]);
        tl.commit(Owner::Downlink(2), 0, 100);
        assert_eq!(bounds(&tl), vec![(2, 0, 100), (-1, 101, 200)]);
    }

    #[test]
    fn commit_splits_spanning_interval() {
        let mut tl = seeded(&[(0, 1_000), (2_000, 3_000)]);
        tl.commit(Owner::Downlink(4), 400, 600);
        assert_eq!(
            bounds(&tl),
            vec![(-1, 0, 399), (4, 400, 600), (-1, 601, 1_000), (-1, 2_000, 3_000)]
        );
    }

    #[test]
    fn commit_between_intervals_keeps_order() {
        let mut tl = seeded(&[(0, 10), (100, 110)]);
        tl.commit(Owner::Downlink(0), 50, 60);
        assert_eq!(bounds(&tl), vec![(-1, 0, 10), (0, 50, 60), (-1, 100, 110)]);
    }

    #[test]
    fn commit_clips_both_neighbours_and_drops_middle() {
        let mut tl = seeded(&[(0, 20), (30, 40), (50, 80)]);
        tl.commit(Owner::Downlink(9), 15, 60);
        assert_eq!(bounds(&tl), vec![(-1, 0, 14), (9, 15, 60), (-1, 61, 80)]);
    }

    #[test]
    fn commit_single_instant_inside_interval() {
        let mut tl = seeded(&[(0, 10)]);
        tl.commit(Owner::Downlink(1), 5, 5);
        assert_eq!(bounds(&tl), vec![(-1, 0, 4), (1, 5, 5), (-1, 6, 10)]);
    }

    #[test]
    fn commit_never_leaves_inverted_intervals() {
        // interval [5, 5] clipped on its left edge by a commit starting at 5
        let mut tl = seeded(&[(0, 5), (6, 9)]);
        tl.commit(Owner::Downlink(0), 5, 6);
        assert_eq!(bounds(&tl), vec![(-1, 0, 4), (0, 5, 6), (-1, 7, 9)]);
        assert_eq!(tl.first_discontinuity(), None);
    }

    // ── append / scans ────────────────────────────────────────────────────────

    #[test]
    fn append_pushes_at_tail() {
        let mut tl = Timeline::new();
        tl.append(Owner::Downlink(3), 0, 100);
        tl.append(Owner::Downlink(1), 101, 150);
        assert_eq!(tl.len(), 2);
        assert_eq!(tl.last().map(|e| e.stop), Some(150));
    }

    #[test]
    fn last_downlink_stop_scans_from_the_end() {
        let mut tl = seeded(&[(0, 100), (500, 900)]);
        tl.commit(Owner::Downlink(0), 200, 300);
        // the trailing accumulation interval is skipped
        assert_eq!(tl.last_downlink_stop(), Some(300));
        assert_eq!(seeded(&[(0, 1)]).last_downlink_stop(), None);
    }

    #[test]
    fn last_downlink_stop_equals_max_on_sorted_timeline() {
        let mut tl = Timeline::new();
        tl.commit(Owner::Downlink(0), 600, 700);
        tl.commit(Owner::Downlink(1), 100, 150);
        assert_eq!(tl.last_downlink_stop(), Some(700));
        assert_eq!(tl.max_downlink_stop(), Some(700));
    }

    #[test]
    fn last_downlink_stop_differs_from_max_on_unsorted_seed() {
        let mut tl = Timeline::new();
        tl.seed(Owner::Downlink(0), 600, 700);
        tl.seed(Owner::Downlink(1), 100, 150);
        tl.seed(ACC, 800, 900);
        assert_eq!(tl.last_downlink_stop(), Some(150));
        assert_eq!(tl.max_downlink_stop(), Some(700));
    }

    #[test]
    fn first_discontinuity_detects_overlap_and_inversion() {
        assert_eq!(seeded(&[(0, 10), (11, 20)]).first_discontinuity(), None);
        assert_eq!(seeded(&[(0, 10), (10, 20)]).first_discontinuity(), Some(1));
        assert_eq!(seeded(&[(0, 10), (30, 20)]).first_discontinuity(), Some(1));
        assert_eq!(seeded(&[(5, 4)]).first_discontinuity(), Some(0));
    }

    // ── Properties ────────────────────────────────────────────────────────────

    fn span() -> impl Strategy<Value = (TimeOffset, TimeOffset)> {
        (0i64..2_000, 0i64..300).prop_map(|(s, len)| (s, s + len))
    }

    proptest! {
        #[test]
        fn commits_preserve_sorted_disjoint_invariant(
            flybys in prop::collection::vec(span(), 0..8),
            commits in prop::collection::vec((0usize..4, span()), 1..24),
        ) {
            // seed with a disjoint, sorted accumulation layout
            let mut seeds = flybys;
            seeds.sort();
            let mut tl = Timeline::new();
            let mut floor = i64::MIN;
            for (s, e) in seeds {
                if s > floor {
                    tl.seed(ACC, s, e);
                    floor = e;
                }
            }
            prop_assert_eq!(tl.first_discontinuity(), None);

            for (owner, (s, e)) in commits {
                tl.commit(Owner::Downlink(owner), s, e);
                prop_assert_eq!(tl.first_discontinuity(), None);
                // the committed interval is present verbatim
                prop_assert!(tl
                    .iter()
                    .any(|i| i.owner == Owner::Downlink(owner) && i.start == s && i.stop == e));
            }
        }
    }
}
