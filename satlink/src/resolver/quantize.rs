/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Splitting of overlong connection windows.
//!
//! A single greedy decision may claim at most one chunk, so a long pass
//! cannot starve a later window on the same station.
//!
//! For a window of duration `d = stop - start` and step `t`:
//!
//! * `d < 2t`: passed through unchanged.
//! * otherwise: chunks `[cur, cur + t - 1]` are emitted, advancing `cur` by
//!   `t`, while the remaining duration exceeds `2t`; the rest `[cur, stop]`
//!   becomes the last chunk, so its duration lies in `(t, 2t]`.
//!
//! Chunks tile the original window exactly: the first starts at `start`,
//! each next one starts at the previous `stop + 1`, the last ends at `stop`.

use crate::window::{sort_for_allocation, ConnectionWindow, TimeOffset};

/// Largest accepted step: `2 * MAX_TIME_STEP` still fits in a [`TimeOffset`].
pub const MAX_TIME_STEP: TimeOffset = TimeOffset::MAX / 2;

/// Quantize every window with `time_step` and return the chunks in
/// allocation order.
///
/// `time_step` must lie in `1..=MAX_TIME_STEP`; the resolver checks this
/// before calling.
pub fn quantize(windows: &[ConnectionWindow], time_step: TimeOffset) -> Vec<ConnectionWindow> {
    debug_assert!(
        (1..=MAX_TIME_STEP).contains(&time_step),
        "time step out of range"
    );

    let mut chunks = Vec::with_capacity(windows.len());
    for window in windows {
        split_window(window, time_step, &mut chunks);
    }
    sort_for_allocation(&mut chunks);
    chunks
}

/// Append the chunks of one window to `out` (unsorted).
fn split_window(window: &ConnectionWindow, time_step: TimeOffset, out: &mut Vec<ConnectionWindow>) {
    let mut remaining = window.duration();
    // No window is longer than i64::MAX, so an unrepresentable 2t never splits.
    let double_step = match time_step.checked_mul(2) {
        Some(double_step) if remaining >= double_step => double_step,
        _ => {
            out.push(*window);
            return;
        }
    };

    let mut cursor = window.start;
    while remaining > double_step {
        out.push(ConnectionWindow {
            start: cursor,
            stop: cursor + time_step - 1,
            ..*window
        });
        cursor += time_step;
        remaining -= time_step;
    }
    out.push(ConnectionWindow {
        start: cursor,
        ..*window
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds(chunks: &[ConnectionWindow]) -> Vec<(TimeOffset, TimeOffset)> {
        chunks.iter().map(|c| (c.start, c.stop)).collect()
    }

    #[test]
    fn short_window_passes_through() {
        let w = ConnectionWindow::new(0, 0, 0, 199);
        assert_eq!(quantize(&[w], 100), vec![w]);
    }

    #[test]
    fn long_window_yields_nine_chunks() {
        let chunks = quantize(&[ConnectionWindow::new(0, 0, 0, 1_000)], 100);
        assert_eq!(chunks.len(), 9);
        assert_eq!(chunks[0], ConnectionWindow::new(0, 0, 0, 99));
        assert_eq!(chunks[7], ConnectionWindow::new(0, 0, 700, 799));
        assert_eq!(chunks[8], ConnectionWindow::new(0, 0, 800, 1_000));
    }

    #[test]
    fn window_of_exactly_two_steps_stays_whole() {
        // d == 2t takes the splitting branch, but the loop body never runs
        let chunks = quantize(&[ConnectionWindow::new(1, 2, 50, 250)], 100);
        assert_eq!(bounds(&chunks), vec![(50, 250)]);
    }

    #[test]
    fn window_just_over_two_steps_gets_two_chunks() {
        let chunks = quantize(&[ConnectionWindow::new(1, 2, 0, 201)], 100);
        assert_eq!(bounds(&chunks), vec![(0, 99), (100, 201)]);
        assert!(chunks.iter().all(|c| c.station == 1 && c.satellite == 2));
    }

    #[test]
    fn output_is_in_allocation_order() {
        let chunks = quantize(
            &[
                ConnectionWindow::new(0, 0, 0, 500),
                ConnectionWindow::new(1, 0, 150, 170),
            ],
            100,
        );
        let starts: Vec<_> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 100, 150, 200, 300]);
    }

    #[test]
    fn step_at_upper_bound_splits_without_overflow() {
        let w = ConnectionWindow::new(0, 0, 0, 10);
        assert_eq!(quantize(&[w], MAX_TIME_STEP), vec![w]);

        let wide = ConnectionWindow::new(0, 0, 0, TimeOffset::MAX);
        let chunks = quantize(&[wide], MAX_TIME_STEP);
        assert_eq!(
            bounds(&chunks),
            vec![(0, MAX_TIME_STEP - 1), (MAX_TIME_STEP, TimeOffset::MAX)]
        );
    }

    proptest! {
        #[test]
        fn chunks_tile_the_original_window(
            start in -10_000i64..10_000,
            len in 0i64..5_000,
            step in 1i64..400,
        ) {
            let window = ConnectionWindow::new(3, 4, start, start + len);
            let chunks = quantize(&[window], step);

            prop_assert_eq!(chunks[0].start, window.start);
            prop_assert_eq!(chunks[chunks.len() - 1].stop, window.stop);
            for pair in chunks.windows(2) {
                prop_assert_eq!(pair[1].start, pair[0].stop + 1);
            }
            for c in &chunks {
                prop_assert!(c.start <= c.stop);
                prop_assert!(c.duration() <= 2 * step);
                prop_assert_eq!((c.station, c.satellite), (3, 4));
            }
        }
    }
}
