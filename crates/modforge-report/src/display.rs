// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable rendering of versions and publish times.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use modforge_core::ForgeError;
use regex::Regex;

/// Trailing 12-hex-digit commit hash of a pseudo-version.
static PSEUDO_VERSION_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([a-f0-9]{12})$").unwrap());

const NOT_AVAILABLE: &str = "N/A";

/// Short form of a version for display.
///
/// Pseudo-versions (`v0.0.0-20231130002422-f53b62aa13cb`) render as
/// `Commit: f53b62a`; everything else verbatim.
pub fn version_display(version: &str) -> String {
    match PSEUDO_VERSION_HASH.captures(version) {
        Some(caps) => format!("Commit: {}", &caps[1][..7]),
        None => version.to_string(),
    }
}

/// Renders RFC 3339 timestamps in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct TimeFormatter {
    offset: FixedOffset,
}

impl TimeFormatter {
    pub fn new(offset_hours: i32) -> Result<Self, ForgeError> {
        let offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ForgeError::Config(format!("UTC offset of {offset_hours} hours is out of range"))
            })?;
        Ok(Self { offset })
    }

    /// Label such as `UTC+08:00`.
    pub fn label(&self) -> String {
        format!("UTC{}", self.offset)
    }

    /// `YYYY-MM-DD HH:MM:SS` in the configured offset.
    ///
    /// Missing input renders `N/A`; unparseable input is returned as-is.
    pub fn local_time(&self, raw: Option<&str>) -> String {
        match raw.filter(|s| !s.is_empty()) {
            None => NOT_AVAILABLE.to_string(),
            Some(s) => match self.parse(s) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => s.to_string(),
            },
        }
    }

    /// `YYYY-MM-DD` in the configured offset, `N/A` when missing or unparseable.
    pub fn local_date(&self, raw: Option<&str>) -> String {
        raw.filter(|s| !s.is_empty())
            .and_then(|s| self.parse(s))
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&self.offset))
    }
}

pub(crate) fn is_available(rendered: &str) -> bool {
    rendered != NOT_AVAILABLE
}
