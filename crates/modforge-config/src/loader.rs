// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./modforge.toml` > `~/.config/modforge/modforge.toml` >
//! `/etc/modforge/modforge.toml` with environment variable overrides via the
//! `MODFORGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ForgeConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/modforge/modforge.toml";

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "modforge.toml";

/// Path of the per-user config file, if a config directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("modforge").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/modforge/modforge.toml` (system-wide)
/// 3. `~/.config/modforge/modforge.toml` (user XDG config)
/// 4. `./modforge.toml` (local directory)
/// 5. `MODFORGE_*` environment variables
pub fn load_config() -> Result<ForgeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ForgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ForgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ForgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ForgeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ForgeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MODFORGE_REPORT_UTC_OFFSET_HOURS` must map to
/// `report.utc_offset_hours`, not `report.utc.offset.hours`. Plugin and
/// redirect arrays cannot be set from the environment.
fn env_provider() -> Env {
    Env::prefixed("MODFORGE_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("log_", "log.", 1)
            .replacen("host_", "host.", 1)
            .replacen("index_", "index.", 1)
            .replacen("lock_", "lock.", 1)
            .replacen("report_", "report.", 1);
        mapped.into()
    })
}
