// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary build workspace for end-to-end tests.
//!
//! `TestWorkspace` writes a `modforge.toml` and a package index into a temp
//! directory, loads the config through the normal validation path, and
//! exposes the lock and bootstrap steps the CLI drives.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use modforge_config::ForgeConfig;
use modforge_core::{ForgeError, SelectionManifest};
use modforge_plugin::{BootReport, Bootstrap, Catalog, ModuleRegistry};
use modforge_resolve::{FileIndex, LockMode, LockOutcome, Lockfile, lock};
use tempfile::TempDir;

use crate::fixtures::{CATALOG_INDEX, HOST_ID};

/// Builder for [`TestWorkspace`].
pub struct TestWorkspaceBuilder {
    plugins: Vec<(String, String)>,
    redirects: Vec<(String, String, String)>,
    index: String,
}

impl TestWorkspaceBuilder {
    fn new() -> Self {
        Self {
            plugins: Vec::new(),
            redirects: Vec::new(),
            index: CATALOG_INDEX.to_string(),
        }
    }

    /// Select a plugin at any version.
    pub fn with_plugin(self, id: &str) -> Self {
        self.with_plugin_version(id, "*")
    }

    pub fn with_plugin_version(mut self, id: &str, version: &str) -> Self {
        self.plugins.push((id.to_string(), version.to_string()));
        self
    }

    pub fn with_redirect(mut self, from: &str, to: &str, version: &str) -> Self {
        self.redirects
            .push((from.to_string(), to.to_string(), version.to_string()));
        self
    }

    /// Replace the fixture package index.
    pub fn with_index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    pub fn build(self) -> Result<TestWorkspace, ForgeError> {
        let dir = TempDir::new().map_err(|e| ForgeError::io(std::env::temp_dir(), e))?;
        let workspace = TestWorkspace {
            config_path: dir.path().join("modforge.toml"),
            index_path: dir.path().join("modforge-index.toml"),
            lock_path: dir.path().join("modforge.lock"),
            dir,
        };
        std::fs::write(&workspace.index_path, &self.index)
            .map_err(|e| ForgeError::io(&workspace.index_path, e))?;
        workspace.write_config(&self.plugins, &self.redirects)?;
        Ok(workspace)
    }
}

/// Isolated on-disk build workspace.
pub struct TestWorkspace {
    dir: TempDir,
    pub config_path: PathBuf,
    pub index_path: PathBuf,
    pub lock_path: PathBuf,
}

impl TestWorkspace {
    pub fn builder() -> TestWorkspaceBuilder {
        TestWorkspaceBuilder::new()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Rewrite `modforge.toml` with a new selection, keeping every path.
    pub fn write_config(
        &self,
        plugins: &[(String, String)],
        redirects: &[(String, String, String)],
    ) -> Result<(), ForgeError> {
        let mut toml = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(toml, "[host]\nid = \"{HOST_ID}\"\n");
        let _ = writeln!(toml, "[index]\npath = \"{}\"\n", self.index_path.display());
        let _ = writeln!(toml, "[lock]\npath = \"{}\"\n", self.lock_path.display());
        let _ = writeln!(
            toml,
            "[report]\nmanifest_file = \"{}\"\nnotes_file = \"{}\"\noutput_file = \"{}\"\n",
            self.path().join("manifest.json").display(),
            self.path().join("release_notes.md").display(),
            self.path().join("step_output").display(),
        );
        for (id, version) in plugins {
            let _ = writeln!(toml, "[[plugins]]\nid = \"{id}\"\nversion = \"{version}\"\n");
        }
        for (from, to, version) in redirects {
            let _ = writeln!(
                toml,
                "[[redirects]]\nfrom = \"{from}\"\nto = \"{to}\"\nversion = \"{version}\"\n"
            );
        }
        std::fs::write(&self.config_path, toml).map_err(|e| ForgeError::io(&self.config_path, e))
    }

    /// Load and validate the workspace config.
    pub fn config(&self) -> Result<ForgeConfig, ForgeError> {
        modforge_config::load_and_validate_path(&self.config_path).map_err(|errors| {
            ForgeError::Config(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })
    }

    pub fn manifest(&self) -> Result<SelectionManifest, ForgeError> {
        self.config()?.selection_manifest()
    }

    pub fn lock(&self, mode: LockMode) -> Result<LockOutcome, ForgeError> {
        let manifest = self.manifest()?;
        lock(&self.lock_path, &manifest, mode, || FileIndex::load(&self.index_path))
    }

    pub fn read_lockfile(&self) -> Result<Lockfile, ForgeError> {
        Lockfile::load(&self.lock_path)?
            .ok_or_else(|| ForgeError::Lockfile("lockfile not written".to_string()))
    }

    /// Bootstrap the locked plugins into a fresh registry.
    pub fn bootstrap(&self, catalog: &Catalog) -> Result<(ModuleRegistry, BootReport), ForgeError> {
        let manifest = self.manifest()?;
        let lockfile = self.read_lockfile()?;

        let bootstrap =
            Bootstrap::for_linked(catalog, &manifest.host().id, lockfile.linked_plugins(&manifest)?)?;

        let mut registry = ModuleRegistry::new();
        let report = bootstrap.run(&mut registry)?;
        Ok((registry, report))
    }
}
