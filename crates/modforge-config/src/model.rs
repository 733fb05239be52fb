// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Modforge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use modforge_core::{Constraint, ForgeError, PluginRef, Redirect, SelectionManifest};
use serde::{Deserialize, Serialize};

/// Top-level Modforge configuration.
///
/// Loaded from `modforge.toml` files following the XDG hierarchy, with
/// environment variable overrides. The `[host]`, `[[plugins]]` and
/// `[[redirects]]` sections together form the selection manifest.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForgeConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Host program the plugins are linked into.
    #[serde(default)]
    pub host: HostConfig,

    /// Selected plugin packages, in link order.
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    /// Source substitutions applied across the whole dependency graph.
    #[serde(default)]
    pub redirects: Vec<RedirectEntry>,

    /// Package index location.
    #[serde(default)]
    pub index: IndexConfig,

    /// Lockfile location.
    #[serde(default)]
    pub lock: LockConfig,

    /// Release report outputs.
    #[serde(default)]
    pub report: ReportConfig,
}

impl ForgeConfig {
    /// Convert the manifest sections into a validated [`SelectionManifest`].
    pub fn selection_manifest(&self) -> Result<SelectionManifest, ForgeError> {
        let host = PluginRef::new(self.host.id.as_str(), self.host.version.parse()?);
        let plugins = self
            .plugins
            .iter()
            .map(|p| -> Result<PluginRef, ForgeError> {
                Ok(PluginRef::new(p.id.as_str(), p.version.parse()?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let redirects = self
            .redirects
            .iter()
            .map(|r| -> Result<Redirect, ForgeError> {
                Ok(Redirect {
                    from: r.from.as_str().into(),
                    to: r.to.as_str().into(),
                    version: r.version.parse::<Constraint>()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        SelectionManifest::new(host, plugins, redirects)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Host program configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Import identifier of the host program.
    #[serde(default = "default_host_id")]
    pub id: String,

    /// Version constraint for the host program.
    #[serde(default = "default_constraint")]
    pub version: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            id: default_host_id(),
            version: default_constraint(),
        }
    }
}

fn default_host_id() -> String {
    "github.com/caddyserver/caddy/v2".to_string()
}

fn default_constraint() -> String {
    "*".to_string()
}

/// A `[[plugins]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginEntry {
    /// Import identifier, unique within the manifest.
    pub id: String,

    /// Version constraint (`*`, `^0.3`, `v2.8.4`, `rev:f53b62a`).
    #[serde(default = "default_constraint")]
    pub version: String,
}

/// A `[[redirects]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedirectEntry {
    /// Identifier being replaced.
    pub from: String,

    /// Replacement source (import identifier or local path).
    pub to: String,

    /// Pinned version or revision of the replacement.
    #[serde(default = "default_constraint")]
    pub version: String,
}

/// Package index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Path to the TOML package index.
    #[serde(default = "default_index_path")]
    pub path: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
        }
    }
}

fn default_index_path() -> String {
    "modforge-index.toml".to_string()
}

/// Lockfile configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Path of the generated lockfile.
    #[serde(default = "default_lock_path")]
    pub path: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            path: default_lock_path(),
        }
    }
}

fn default_lock_path() -> String {
    "modforge.lock".to_string()
}

/// Release report configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// JSON module manifest written for the next release to diff against.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Markdown release notes.
    #[serde(default = "default_notes_file")]
    pub notes_file: String,

    /// `KEY=value` step-output file. Falls back to `GITHUB_OUTPUT` when unset.
    #[serde(default)]
    pub output_file: Option<String>,

    /// Offset from UTC, in hours, used when rendering publish times.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Previous release's module manifest: a file path or an http(s) URL.
    #[serde(default)]
    pub previous: Option<String>,

    /// Timeout for fetching the previous manifest over HTTP.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            manifest_file: default_manifest_file(),
            notes_file: default_notes_file(),
            output_file: None,
            utc_offset_hours: default_utc_offset_hours(),
            previous: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_manifest_file() -> String {
    "manifest.json".to_string()
}

fn default_notes_file() -> String {
    "release_notes.md".to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}

fn default_fetch_timeout_secs() -> u64 {
    10
}
