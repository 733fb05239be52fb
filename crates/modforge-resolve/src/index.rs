// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Package index: the releases available for each module identifier.
//!
//! The on-disk form is a TOML file of `[[package]]` tables, one per release:
//!
//! ```toml
//! [[package]]
//! name = "github.com/mholt/caddy-l4"
//! version = "v0.0.0-20240124150220-0f6e3ebc0fdc"
//! revision = "0f6e3ebc0fdc"
//! published = "2024-01-24T15:02:20Z"
//! capabilities = ["layer4"]
//!
//! [package.dependencies]
//! "github.com/caddyserver/caddy/v2" = "^2.7"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use modforge_core::{Constraint, ForgeError, ModuleId, parse_version};
use semver::Version;
use serde::Deserialize;
use tracing::debug;

/// One published release of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: ModuleId,
    pub version: Version,
    /// Source revision (commit hash) the release was cut from.
    pub revision: Option<String>,
    /// RFC 3339 publish timestamp.
    pub published: Option<String>,
    pub dependencies: BTreeMap<ModuleId, Constraint>,
    /// Capability names the release registers.
    pub capabilities: Vec<String>,
}

impl Release {
    pub fn new(id: impl Into<ModuleId>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            revision: None,
            published: None,
            dependencies: BTreeMap::new(),
            capabilities: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, id: impl Into<ModuleId>, constraint: Constraint) -> Self {
        self.dependencies.insert(id.into(), constraint);
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = Some(published.into());
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// True when the release satisfies `constraint`.
    pub fn satisfies(&self, constraint: &Constraint) -> bool {
        constraint.matches(&self.version, self.revision.as_deref())
    }
}

/// Source of release metadata for the resolver.
pub trait PackageIndex {
    /// All known releases of `id`. An unknown identifier yields an empty list.
    fn releases(&self, id: &ModuleId) -> Result<Vec<Release>, ForgeError>;
}

impl<T: PackageIndex + ?Sized> PackageIndex for &T {
    fn releases(&self, id: &ModuleId) -> Result<Vec<Release>, ForgeError> {
        (**self).releases(id)
    }
}

impl<T: PackageIndex + ?Sized> PackageIndex for Box<T> {
    fn releases(&self, id: &ModuleId) -> Result<Vec<Release>, ForgeError> {
        (**self).releases(id)
    }
}

/// In-memory index.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    packages: BTreeMap<ModuleId, Vec<Release>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a release. A release with the same version replaces the old one.
    pub fn add(&mut self, release: Release) {
        let releases = self.packages.entry(release.id.clone()).or_default();
        releases.retain(|r| r.version != release.version);
        releases.push(release);
    }

    pub fn with(mut self, release: Release) -> Self {
        self.add(release);
        self
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageIndex for MemoryIndex {
    fn releases(&self, id: &ModuleId) -> Result<Vec<Release>, ForgeError> {
        Ok(self.packages.get(id).cloned().unwrap_or_default())
    }
}

/// Index loaded from a TOML file.
#[derive(Debug, Clone)]
pub struct FileIndex {
    inner: MemoryIndex,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexFile {
    #[serde(default)]
    package: Vec<PackageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageEntry {
    name: String,
    version: String,
    revision: Option<String>,
    published: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    capabilities: Vec<String>,
}

impl FileIndex {
    /// Read and parse an index file.
    pub fn load(path: &Path) -> Result<Self, ForgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;
        let index = Self::parse(&content)?;
        debug!(path = %path.display(), packages = index.inner.len(), "package index loaded");
        Ok(index)
    }

    /// Parse index TOML.
    pub fn parse(content: &str) -> Result<Self, ForgeError> {
        let file: IndexFile = toml::from_str(content)
            .map_err(|e| ForgeError::Index(format!("invalid package index: {e}")))?;

        let mut inner = MemoryIndex::new();
        for entry in file.package {
            if entry.name.trim().is_empty() {
                return Err(ForgeError::Index(
                    "package entry with empty name".to_string(),
                ));
            }
            let version = parse_version(&entry.version).map_err(|_| {
                ForgeError::Index(format!(
                    "package `{}` has invalid version `{}`",
                    entry.name, entry.version
                ))
            })?;

            let mut dependencies = BTreeMap::new();
            for (dep, raw) in entry.dependencies {
                let constraint = raw.parse::<Constraint>().map_err(|e| {
                    ForgeError::Index(format!(
                        "package `{}` dependency `{dep}`: {e}",
                        entry.name
                    ))
                })?;
                dependencies.insert(ModuleId::new(dep), constraint);
            }

            inner.add(Release {
                id: ModuleId::new(entry.name),
                version,
                revision: entry.revision.map(|r| r.to_ascii_lowercase()),
                published: entry.published,
                dependencies,
                capabilities: entry.capabilities,
            });
        }
        Ok(Self { inner })
    }
}

impl PackageIndex for FileIndex {
    fn releases(&self, id: &ModuleId) -> Result<Vec<Release>, ForgeError> {
        self.inner.releases(id)
    }
}
