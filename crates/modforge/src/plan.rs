// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `modforge plan` command implementation.

use std::path::{Path, PathBuf};

use modforge_config::ForgeConfig;
use modforge_core::ForgeError;
use modforge_report::{BuildPlan, output_target};
use modforge_resolve::Lockfile;
use tracing::debug;

/// Print the builder arguments for the locked plugins.
///
/// Step outputs are appended to `--output`, else `report.output_file`, else
/// `GITHUB_OUTPUT` when set.
pub fn run_plan(config: &ForgeConfig, output: Option<&Path>) -> Result<(), ForgeError> {
    let lockfile = locked_lockfile(config)?;
    let plan = BuildPlan::from_lockfile(&lockfile);

    println!("{}", plan.args_line());

    let target = output
        .map(PathBuf::from)
        .or_else(|| output_target(config.report.output_file.as_deref()));
    if let Some(path) = target {
        plan.append_to(&path)?;
        debug!(path = %path.display(), "step outputs appended");
    }
    Ok(())
}

/// The lockfile, which must exist and match the current manifest.
pub fn locked_lockfile(config: &ForgeConfig) -> Result<Lockfile, ForgeError> {
    let (manifest, lock_path) = crate::manifest_and_lock_path(config)?;
    Lockfile::load_fresh(&lock_path, &manifest)
}
