// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `modforge.lock` file.
//!
//! A lockfile pins one version per identifier in the resolved closure and
//! carries a digest of the selection manifest it was produced from. Output
//! is fully deterministic: packages sorted by name, dependency lists sorted,
//! fixed field order.

use std::path::Path;

use modforge_core::{ForgeError, LinkedPlugin, ModuleId, SelectionManifest, format_version};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::index::PackageIndex;
use crate::resolver::{Resolution, resolve};

/// Format version written to every lockfile.
pub const LOCKFILE_VERSION: u32 = 1;

const HEADER: &str = "# This file is generated by modforge. Do not edit.\n";

/// SHA-256 of the manifest's canonical form, hex encoded.
pub fn manifest_digest(manifest: &SelectionManifest) -> String {
    hex::encode(Sha256::digest(manifest.canonical().as_bytes()))
}

/// A pinned package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockedPackage {
    /// Identifier as requested; the redirect's `from` for redirected entries.
    pub name: ModuleId,
    /// `v`-prefixed version.
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    /// Redirect target supplying the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ModuleId>,
    #[serde(default)]
    pub direct: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub host: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ModuleId>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl LockedPackage {
    /// Identifier whose code is compiled in. Local-path sources compile under
    /// the original identifier.
    pub fn effective_id(&self) -> &ModuleId {
        match &self.source {
            Some(source) if !source.is_local_path() => source,
            _ => &self.name,
        }
    }

    pub fn is_redirected(&self) -> bool {
        self.source.is_some()
    }

    pub fn linked(&self) -> LinkedPlugin {
        LinkedPlugin {
            declared: self.name.clone(),
            source: self.effective_id().clone(),
        }
    }
}

/// Parsed or freshly generated lockfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Lockfile {
    pub version: u32,
    pub manifest_digest: String,
    #[serde(default, rename = "package")]
    pub packages: Vec<LockedPackage>,
}

impl Lockfile {
    /// Build a lockfile from a resolution of `manifest`.
    pub fn from_resolution(manifest: &SelectionManifest, resolution: &Resolution) -> Self {
        let packages = resolution
            .packages()
            .map(|p| LockedPackage {
                name: p.id.clone(),
                version: format_version(&p.release.version),
                revision: p.release.revision.clone(),
                published: p.release.published.clone(),
                source: p.source.clone(),
                direct: p.direct,
                host: p.host,
                dependencies: p.dependencies(),
            })
            .collect();
        let mut lockfile = Self {
            version: LOCKFILE_VERSION,
            manifest_digest: manifest_digest(manifest),
            packages,
        };
        lockfile.normalize();
        lockfile
    }

    fn normalize(&mut self) {
        self.packages.sort_by(|a, b| a.name.cmp(&b.name));
        for package in &mut self.packages {
            package.dependencies.sort();
            package.dependencies.dedup();
        }
    }

    /// Parse lockfile TOML.
    pub fn parse(content: &str) -> Result<Self, ForgeError> {
        let mut lockfile: Lockfile = toml::from_str(content)
            .map_err(|e| ForgeError::Lockfile(format!("invalid lockfile: {e}")))?;
        if lockfile.version != LOCKFILE_VERSION {
            return Err(ForgeError::Lockfile(format!(
                "unsupported lockfile version {} (expected {LOCKFILE_VERSION})",
                lockfile.version
            )));
        }
        lockfile.normalize();
        Ok(lockfile)
    }

    /// Read a lockfile; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ForgeError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ForgeError::io(path, e)),
        }
    }

    /// Read the lockfile at `path`, failing when it is missing or was
    /// produced from a different manifest.
    pub fn load_fresh(path: &Path, manifest: &SelectionManifest) -> Result<Self, ForgeError> {
        match Self::load(path)? {
            Some(lockfile) if lockfile.is_fresh(manifest) => Ok(lockfile),
            Some(_) => Err(ForgeError::Lockfile(format!(
                "{} is out of date with the selection manifest; run `modforge lock`",
                path.display()
            ))),
            None => Err(ForgeError::Lockfile(format!(
                "{} does not exist; run `modforge lock`",
                path.display()
            ))),
        }
    }

    /// Deterministic TOML rendering with the generated-file header.
    pub fn render(&self) -> Result<String, ForgeError> {
        let body = toml::to_string(self)
            .map_err(|e| ForgeError::Lockfile(format!("failed to serialize lockfile: {e}")))?;
        Ok(format!("{HEADER}{body}"))
    }

    pub fn write(&self, path: &Path) -> Result<(), ForgeError> {
        let rendered = self.render()?;
        std::fs::write(path, rendered).map_err(|e| ForgeError::io(path, e))?;
        debug!(path = %path.display(), packages = self.packages.len(), "lockfile written");
        Ok(())
    }

    /// True when the lockfile was produced from an equivalent manifest.
    pub fn is_fresh(&self, manifest: &SelectionManifest) -> bool {
        self.manifest_digest == manifest_digest(manifest)
    }

    pub fn get(&self, name: &ModuleId) -> Option<&LockedPackage> {
        self.packages.iter().find(|p| &p.name == name)
    }

    pub fn host(&self) -> Option<&LockedPackage> {
        self.packages.iter().find(|p| p.host)
    }

    /// Directly selected plugins, sorted by name.
    pub fn plugins(&self) -> impl Iterator<Item = &LockedPackage> {
        self.packages.iter().filter(|p| p.direct && !p.host)
    }

    /// Plugins of `manifest` in declaration order, as recorded in this lockfile.
    ///
    /// Fails when a selected plugin is missing from the lockfile.
    pub fn linked_plugins(&self, manifest: &SelectionManifest) -> Result<Vec<LinkedPlugin>, ForgeError> {
        manifest
            .plugins()
            .iter()
            .map(|p| {
                self.get(&p.id).map(LockedPackage::linked).ok_or_else(|| {
                    ForgeError::Lockfile(format!("`{}` is selected but not locked", p.id))
                })
            })
            .collect()
    }
}

/// How `lock` treats an existing lockfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockMode {
    /// Reuse a fresh lockfile, otherwise resolve and rewrite.
    #[default]
    Auto,
    /// Always resolve and rewrite.
    Force,
    /// Never resolve; fail when the lockfile is missing or stale.
    Locked,
}

/// Result of [`lock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    /// The existing lockfile matched the manifest and was left untouched.
    Reused(Lockfile),
    /// The manifest was resolved and the lockfile written.
    Resolved(Lockfile),
}

impl LockOutcome {
    pub fn lockfile(&self) -> &Lockfile {
        match self {
            LockOutcome::Reused(l) | LockOutcome::Resolved(l) => l,
        }
    }

    pub fn into_lockfile(self) -> Lockfile {
        match self {
            LockOutcome::Reused(l) | LockOutcome::Resolved(l) => l,
        }
    }
}

/// Bring the lockfile at `path` up to date with `manifest`.
///
/// `load_index` is only invoked when resolution actually runs, so a fresh
/// lockfile never touches the package index.
pub fn lock<I, F>(
    path: &Path,
    manifest: &SelectionManifest,
    mode: LockMode,
    load_index: F,
) -> Result<LockOutcome, ForgeError>
where
    I: PackageIndex,
    F: FnOnce() -> Result<I, ForgeError>,
{
    match mode {
        LockMode::Locked => {
            let existing = Lockfile::load_fresh(path, manifest)?;
            info!(path = %path.display(), "lockfile is up to date");
            return Ok(LockOutcome::Reused(existing));
        }
        LockMode::Auto => match Lockfile::load(path)? {
            Some(existing) if existing.is_fresh(manifest) => {
                info!(path = %path.display(), "lockfile is up to date");
                return Ok(LockOutcome::Reused(existing));
            }
            Some(_) => warn!(path = %path.display(), "lockfile is stale, re-resolving"),
            None => debug!(path = %path.display(), "no lockfile, resolving"),
        },
        LockMode::Force => {}
    }

    let index = load_index()?;
    let resolution = resolve(manifest, &index)?;
    let lockfile = Lockfile::from_resolution(manifest, &resolution);
    lockfile.write(path)?;
    info!(path = %path.display(), packages = lockfile.packages.len(), "lockfile written");
    Ok(LockOutcome::Resolved(lockfile))
}
