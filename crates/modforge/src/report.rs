// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `modforge report` command implementation.

use std::path::Path;
use std::time::Duration;

use modforge_config::ForgeConfig;
use modforge_core::ForgeError;
use modforge_report::{HostInfo, Report, TimeFormatter, load_previous, output_target};

use tracing::info;

use crate::plan::locked_lockfile;

/// Write the module manifest and release notes, and append the build plan
/// to the step-output file when one is configured.
pub async fn run_report(config: &ForgeConfig, previous: Option<&str>) -> Result<(), ForgeError> {
    let lockfile = locked_lockfile(config)?;
    let times = TimeFormatter::new(config.report.utc_offset_hours)?;

    let source = previous.or(config.report.previous.as_deref());
    let timeout = Duration::from_secs(config.report.fetch_timeout_secs);
    let previous = load_previous(source, timeout).await;

    let report = Report::build(&lockfile, &previous, &times);
    info!(
        plugins = report.manifest.len(),
        previous = previous.len(),
        "release report built"
    );
    report.write(
        Path::new(&config.report.manifest_file),
        Path::new(&config.report.notes_file),
    )?;

    if let Some(path) = output_target(config.report.output_file.as_deref()) {
        report.plan.append_to(&path)?;
    }

    let host = HostInfo::from_lockfile(&lockfile)
        .map(|h| format!("{} {}", h.id, h.version))
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "host {host}; {} plugins; wrote {} and {}",
        report.manifest.len(),
        config.report.manifest_file,
        config.report.notes_file
    );
    Ok(())
}
