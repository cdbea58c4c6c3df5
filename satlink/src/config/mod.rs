/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Run configuration loading and validation.
//!
//! The expected YAML structure is (every key is optional):
//! ```yaml
//! connection_schedules_path: "data/connections"
//! connection_file_prefix: "Facility-"
//! flyby_schedules_path: "data/flybys"
//! flyby_file_prefix: "AreaTarget-"
//! results_path: "results"
//! statistics_path: "statistics"
//! input_datetime_pattern: "%d %b %Y %H:%M:%S%.3f"
//! report_datetime_pattern: "%Y-%m-%d %H:%M:%S%.3f"
//! time_step_ms: 1000
//! satellite_cursor: "last_downlink_entry"
//! satellite_profiles:
//!   - count: 50
//!     buffer_capacity: 2500000
//!     transmit_ratio: 4
//!     bandwidth: 100
//!   - buffer_capacity: 1250000
//!     transmit_ratio: 16
//!     bandwidth: 25
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use tracing::{debug, info};

use crate::resolver::quantize::MAX_TIME_STEP;
use crate::resolver::SatelliteCursor;
use crate::window::SatelliteProfile;

// ── Profile tiers ─────────────────────────────────────────────────────────────

/// One tier of satellite profiles.
///
/// Satellites are assigned to tiers in id order.  A tier with `count` takes
/// that many satellites; a tier without one takes all remaining satellites
/// and must therefore be the last.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileTier {
    #[serde(default)]
    pub count: Option<usize>,
    pub buffer_capacity: i64,
    pub transmit_ratio: i64,
    pub bandwidth: i64,
}

impl ProfileTier {
    fn profile(&self) -> SatelliteProfile {
        SatelliteProfile::new(self.buffer_capacity, self.transmit_ratio, self.bandwidth)
    }
}

fn default_profile_tiers() -> Vec<ProfileTier> {
    vec![
        ProfileTier {
            count: Some(50),
            buffer_capacity: 2_500_000,
            transmit_ratio: 4,
            bandwidth: 100,
        },
        ProfileTier {
            count: None,
            buffer_capacity: 1_250_000,
            transmit_ratio: 16,
            bandwidth: 25,
        },
    ]
}

// ── SatLinkConfig ─────────────────────────────────────────────────────────────

/// Everything one run needs besides the schedule files themselves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SatLinkConfig {
    /// Directory scanned for connection schedule files.
    pub connection_schedules_path: PathBuf,
    /// Only files whose name starts with this prefix are read.
    pub connection_file_prefix: String,
    pub flyby_schedules_path: PathBuf,
    pub flyby_file_prefix: String,
    /// Directory for the per-station `<station>-Schedule.txt` files.
    pub results_path: PathBuf,
    /// Directory for the CSV statistics.
    pub statistics_path: PathBuf,
    /// chrono `strftime` pattern of the timestamps in schedule files.
    pub input_datetime_pattern: String,
    /// chrono `strftime` pattern used in the CSV statistics.
    pub report_datetime_pattern: String,
    /// Quantization step in milliseconds.
    pub time_step_ms: i64,
    /// Name of the [`SatelliteCursor`] policy.
    pub satellite_cursor: String,
    pub satellite_profiles: Vec<ProfileTier>,
}

impl Default for SatLinkConfig {
    fn default() -> Self {
        Self {
            connection_schedules_path: PathBuf::from("data/connections"),
            connection_file_prefix: String::from("Facility-"),
            flyby_schedules_path: PathBuf::from("data/flybys"),
            flyby_file_prefix: String::from("AreaTarget-"),
            results_path: PathBuf::from("results"),
            statistics_path: PathBuf::from("statistics"),
            input_datetime_pattern: String::from("%d %b %Y %H:%M:%S%.3f"),
            report_datetime_pattern: String::from("%Y-%m-%d %H:%M:%S%.3f"),
            time_step_ms: 1_000,
            satellite_cursor: String::from(SatelliteCursor::LastDownlinkEntry.as_str()),
            satellite_profiles: default_profile_tiers(),
        }
    }
}

impl SatLinkConfig {
    /// Parses `path` into a configuration and validates it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or [`validate`](Self::validate) rejects the values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config: SatLinkConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Checks every value the rest of the run relies on.
    pub fn validate(&self) -> Result<()> {
        if self.time_step_ms <= 0 {
            bail!("time_step_ms must be positive, got {}", self.time_step_ms);
        }
        if self.time_step_ms > MAX_TIME_STEP {
            bail!(
                "time_step_ms must not exceed {MAX_TIME_STEP}, got {}",
                self.time_step_ms
            );
        }

        self.cursor()?;

        check_pattern("input_datetime_pattern", &self.input_datetime_pattern)?;
        check_pattern("report_datetime_pattern", &self.report_datetime_pattern)?;

        if self.satellite_profiles.is_empty() {
            bail!("satellite_profiles must contain at least one tier");
        }
        let last = self.satellite_profiles.len() - 1;
        for (i, tier) in self.satellite_profiles.iter().enumerate() {
            if tier.count.is_none() && i != last {
                bail!("satellite_profiles[{i}] has no count but is not the last tier");
            }
            if tier.count == Some(0) {
                bail!("satellite_profiles[{i}] has count 0");
            }
            if tier.transmit_ratio <= 0 {
                bail!(
                    "satellite_profiles[{i}] transmit_ratio must be positive, got {}",
                    tier.transmit_ratio
                );
            }
            if tier.buffer_capacity < 0 {
                bail!(
                    "satellite_profiles[{i}] buffer_capacity must not be negative, got {}",
                    tier.buffer_capacity
                );
            }
            if tier.bandwidth < 0 {
                bail!(
                    "satellite_profiles[{i}] bandwidth must not be negative, got {}",
                    tier.bandwidth
                );
            }
        }
        Ok(())
    }

    /// The configured [`SatelliteCursor`].
    pub fn cursor(&self) -> Result<SatelliteCursor> {
        self.satellite_cursor
            .parse::<SatelliteCursor>()
            .context("Invalid satellite_cursor")
    }

    /// One profile per satellite id `0..satellite_count`.
    ///
    /// Satellites beyond the last counted tier reuse the last tier.  Returns
    /// an empty vector if no tiers are configured.
    pub fn profiles_for(&self, satellite_count: usize) -> Vec<SatelliteProfile> {
        let Some(last) = self.satellite_profiles.last() else {
            return Vec::new();
        };

        let mut profiles = Vec::with_capacity(satellite_count);
        for tier in &self.satellite_profiles {
            let remaining = satellite_count - profiles.len();
            let take = tier.count.map_or(remaining, |c| c.min(remaining));
            profiles.extend(std::iter::repeat(tier.profile()).take(take));
        }
        let remaining = satellite_count - profiles.len();
        profiles.extend(std::iter::repeat(last.profile()).take(remaining));
        profiles
    }
}

/// Rejects patterns chrono cannot interpret.
fn check_pattern(field: &str, pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        bail!("{field} must not be empty");
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        bail!("{field} is not a valid strftime pattern: '{pattern}'");
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
