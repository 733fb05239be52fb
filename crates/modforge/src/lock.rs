// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `modforge lock` command implementation.

use std::path::Path;

use modforge_config::ForgeConfig;
use modforge_core::ForgeError;
use modforge_resolve::{FileIndex, LockMode, LockOutcome, lock};
use tracing::debug;

/// Resolve the manifest against the package index and write the lockfile.
///
/// The index is only read when resolution actually runs.
pub fn run_lock(config: &ForgeConfig, mode: LockMode) -> Result<(), ForgeError> {
    let (manifest, lock_path) = crate::manifest_and_lock_path(config)?;
    let index_path = Path::new(&config.index.path);
    debug!(?mode, lock = %lock_path.display(), "locking selection manifest");

    let outcome = lock(&lock_path, &manifest, mode, || FileIndex::load(index_path))?;
    match outcome {
        LockOutcome::Reused(lockfile) => println!(
            "{} is up to date ({} packages)",
            lock_path.display(),
            lockfile.packages.len()
        ),
        LockOutcome::Resolved(lockfile) => println!(
            "wrote {} ({} packages, {} plugins)",
            lock_path.display(),
            lockfile.packages.len(),
            lockfile.plugins().count()
        ),
    }
    Ok(())
}
