/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! SatLink – FIFO downlink allocator for ground stations and satellites
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── window.rs       – connection / flyby windows, profiles, skip records
//! ├── epoch.rs        – run epoch and timestamp ↔ offset conversion
//! ├── timeline/       – non-overlapping interval container (commit / append)
//! ├── resolver/       – quantizer, buffer model, FIFO loop, integrity checks
//! ├── report/         – read-only aggregation and report files
//! ├── loader/         – fixed-column schedule parser and id assembly
//! └── config/         – YAML run configuration
//! ```

pub mod config;
pub mod epoch;
pub mod loader;
pub mod report;
pub mod resolver;
pub mod timeline;
pub mod window;
