// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Release tooling for Modforge builds.
//!
//! From a lockfile this crate produces the module manifest published with
//! each release, Markdown release notes diffed against the previous
//! release's manifest, and the builder arguments for the build step.

pub mod display;
pub mod modules;
pub mod notes;
pub mod plan;
pub mod previous;

use std::path::Path;

use modforge_core::ForgeError;
use modforge_resolve::Lockfile;
use tracing::info;

pub use display::{TimeFormatter, version_display};
pub use modules::{HostInfo, ModuleInfo, ModuleManifest};
pub use notes::render_release_notes;
pub use plan::{BuildPlan, CI_OUTPUT_ENV, output_target};
pub use previous::{fetch_previous, load_previous, read_previous};

/// Everything a release publishes for one build.
#[derive(Debug, Clone)]
pub struct Report {
    pub manifest: ModuleManifest,
    pub notes: String,
    pub plan: BuildPlan,
}

impl Report {
    pub fn build(lockfile: &Lockfile, previous: &ModuleManifest, times: &TimeFormatter) -> Self {
        let manifest = ModuleManifest::from_lockfile(lockfile);
        let notes = render_release_notes(&manifest, previous, times);
        Self {
            manifest,
            notes,
            plan: BuildPlan::from_lockfile(lockfile),
        }
    }

    /// Write the module manifest and release notes.
    pub fn write(&self, manifest_path: &Path, notes_path: &Path) -> Result<(), ForgeError> {
        self.manifest.write(manifest_path)?;
        std::fs::write(notes_path, &self.notes).map_err(|e| ForgeError::io(notes_path, e))?;
        info!(
            manifest = %manifest_path.display(),
            notes = %notes_path.display(),
            modules = self.manifest.len(),
            "release report written"
        );
        Ok(())
    }
}
