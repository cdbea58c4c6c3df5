/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fixed-column schedule report parser.
//!
//! A schedule file is a sequence of blocks.  Each block is introduced by a
//! header line of the form `<origin>-To-<satellite>` followed by a line of
//! dashes, then a column caption, another dashed rule, and one record per
//! line until the next blank line:
//!
//! ```text
//! Anadyr1-To-KinoSat_110101
//! -------------------------
//!                   Access           Start Time (UTCG)             Stop Time (UTCG)     Duration (sec)
//!                   ------    ------------------------    ------------------------     -------------
//!                        1    01 Jun 2027 00:00:00.000    01 Jun 2027 00:10:00.000           600.000
//! ```
//!
//! Records use fixed byte columns: access `[0, 24)`, start `[28, 52)`, stop
//! `[56, 80)` and duration `[85, 98)`, each trimmed before parsing.
//!
//! The parser is the state machine [`ParserState`] driven by [`Records`], a
//! lazy iterator over the lines of one text.  Parsing again means building a
//! new iterator over the same text.

use chrono::NaiveDateTime;

use super::error::{ParseError, RecordError};

const BLOCK_MARKER: &str = "-----";
const HEADER_SEPARATOR: &str = "-To-";

const ACCESS_COLUMN: (usize, usize) = (0, 24);
const START_COLUMN: (usize, usize) = (28, 52);
const STOP_COLUMN: (usize, usize) = (56, 80);
const DURATION_COLUMN: (usize, usize) = (85, 98);

/// The duration column is printed with millisecond precision.
const DURATION_TOLERANCE_MS: i64 = 1;

// ── Records ───────────────────────────────────────────────────────────────────

/// One parsed record with its block header.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Header part 0: the station (connection files) or target area (flyby
    /// files).
    pub origin: String,
    /// Header part 2.
    pub satellite: String,
    /// Access number within the block, as printed.
    pub access: i64,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    /// Reported duration; the allocator works from `start` and `stop`, this
    /// only cross-checks them (see [`RawRecord::duration_drift_ms`]).
    pub duration_secs: f64,
    /// 1-based line number in the source text.
    pub line: usize,
}

impl RawRecord {
    /// Reported duration minus `stop - start` in ms, if they disagree by more
    /// than the column's rounding.
    pub fn duration_drift_ms(&self) -> Option<i64> {
        let span = (self.stop - self.start).num_milliseconds();
        let reported = (self.duration_secs * 1_000.0).round() as i64;
        let drift = reported.saturating_sub(span);
        (drift.abs() > DURATION_TOLERANCE_MS).then_some(drift)
    }
}

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for a dashed rule directly below a `-To-` header.
    SeekingBlockHeader,
    /// Header seen; waiting for the dashed rule above the records.
    SeekingDataStart,
    /// Every non-blank line is a record.
    ParsingRecords,
}

/// Lazy record iterator over one schedule text.
///
/// Yields `Err` at most once; iteration ends after the first error.
#[derive(Debug)]
pub struct Records<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    pattern: &'a str,
    state: ParserState,
    prev_line: Option<&'a str>,
    origin: String,
    satellite: String,
    failed: bool,
}

/// Parse `text`, reading timestamps with the chrono `strftime` `pattern`.
pub fn records<'a>(text: &'a str, pattern: &'a str) -> Records<'a> {
    Records {
        lines: text.lines().enumerate(),
        pattern,
        state: ParserState::SeekingBlockHeader,
        prev_line: None,
        origin: String::new(),
        satellite: String::new(),
        failed: false,
    }
}

impl Records<'_> {
    /// Current parser state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    fn fail(&mut self, line: usize, kind: RecordError) -> Result<RawRecord, ParseError> {
        self.failed = true;
        Err(ParseError { line, kind })
    }

    fn parse_record(&self, text: &str, line: usize) -> Result<RawRecord, RecordError> {
        let access_raw = column(text, ACCESS_COLUMN, "access")?;
        let access = access_raw
            .parse::<i64>()
            .map_err(|_| RecordError::InvalidAccess {
                value: access_raw.to_string(),
            })?;

        let start = self.parse_time(column(text, START_COLUMN, "start")?, "start")?;
        let stop = self.parse_time(column(text, STOP_COLUMN, "stop")?, "stop")?;
        if start > stop {
            return Err(RecordError::InvertedRecord { start, stop });
        }

        let duration_raw = column(text, DURATION_COLUMN, "duration")?;
        let duration_secs = duration_raw
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidDuration {
                value: duration_raw.to_string(),
            })?;

        Ok(RawRecord {
            origin: self.origin.clone(),
            satellite: self.satellite.clone(),
            access,
            start,
            stop,
            duration_secs,
            line,
        })
    }

    fn parse_time(&self, value: &str, column: &'static str) -> Result<NaiveDateTime, RecordError> {
        NaiveDateTime::parse_from_str(value, self.pattern).map_err(|reason| {
            RecordError::InvalidTime {
                column,
                value: value.to_string(),
                pattern: self.pattern.to_string(),
                reason,
            }
        })
    }
}

impl Iterator for Records<'_> {
    type Item = Result<RawRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let (index, text) = self.lines.next()?;
            let line = index + 1;
            let prev = self.prev_line.replace(text);

            match self.state {
                ParserState::SeekingBlockHeader => {
                    let Some(header) = prev.filter(|p| p.contains(HEADER_SEPARATOR)) else {
                        continue;
                    };
                    if !text.starts_with(BLOCK_MARKER) {
                        continue;
                    }
                    match split_header(header) {
                        Some((origin, satellite)) => {
                            self.origin = origin.to_string();
                            self.satellite = satellite.to_string();
                            self.state = ParserState::SeekingDataStart;
                        }
                        None => {
                            let kind = RecordError::MalformedHeader {
                                header: header.trim().to_string(),
                            };
                            return Some(self.fail(line - 1, kind));
                        }
                    }
                }
                ParserState::SeekingDataStart => {
                    if text.trim().starts_with(BLOCK_MARKER) {
                        self.state = ParserState::ParsingRecords;
                    }
                }
                ParserState::ParsingRecords => {
                    if text.trim().is_empty() {
                        self.state = ParserState::SeekingBlockHeader;
                        continue;
                    }
                    return Some(match self.parse_record(text, line) {
                        Ok(record) => Ok(record),
                        Err(kind) => self.fail(line, kind),
                    });
                }
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `(part 0, part 2)` of a `-`-separated header line.  Both must be
/// non-empty.
fn split_header(header: &str) -> Option<(&str, &str)> {
    let mut parts = header.trim().split('-');
    let origin = parts.next().filter(|p| !p.is_empty())?;
    let _ = parts.next()?;
    let satellite = parts.next().filter(|p| !p.is_empty())?;
    Some((origin, satellite))
}

fn column<'t>(
    text: &'t str,
    (from, to): (usize, usize),
    name: &'static str,
) -> Result<&'t str, RecordError> {
    text.get(from..to)
        .map(str::trim)
        .ok_or(RecordError::MissingColumn {
            column: name,
            len: text.len(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
