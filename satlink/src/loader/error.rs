/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error types for schedule file loading.
//!
//! [`ParseError`] is what the line parser yields: a line number and a
//! [`RecordError`] kind, independent of where the text came from.
//! [`LoadError`] adds the file path once the text is known to come from disk.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// What was wrong with a single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The line is too short for a fixed column (or the column cuts through a
    /// multi-byte character).
    #[error("missing {column} column (line is {len} bytes long)")]
    MissingColumn { column: &'static str, len: usize },

    #[error("invalid access id '{value}'")]
    InvalidAccess { value: String },

    #[error("cannot parse {column} time '{value}' with pattern '{pattern}': {reason}")]
    InvalidTime {
        column: &'static str,
        value: String,
        pattern: String,
        reason: chrono::ParseError,
    },

    #[error("invalid duration '{value}'")]
    InvalidDuration { value: String },

    /// The line before a block marker mentions `-To-` but has an empty
    /// origin or satellite part.
    #[error("malformed block header '{header}'")]
    MalformedHeader { header: String },

    #[error("record starts at {start} after it stops at {stop}")]
    InvertedRecord {
        start: NaiveDateTime,
        stop: NaiveDateTime,
    },
}

/// A [`RecordError`] located at a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: RecordError,
}

/// A schedule file could not be loaded.  Fails the whole file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read schedule file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schedule file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// Line of the offending record, if the failure was a parse failure.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Io { .. } => None,
            LoadError::Parse { source, .. } => Some(source.line),
        }
    }
}
