// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module manifest published alongside each release.
//!
//! Keyed by the identifier whose code is compiled in, so a redirected plugin
//! appears under its target. Field names keep the casing of manifests from
//! earlier releases, which the next release diffs against.

use std::collections::BTreeMap;
use std::path::Path;

use modforge_core::ForgeError;
use modforge_resolve::Lockfile;
use serde::{Deserialize, Serialize};

/// One plugin module in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModuleInfo {
    /// Identifier the plugin is imported under.
    pub original_path: String,
    pub version: String,
    /// RFC 3339 publish time, empty when unknown.
    pub time: String,
    pub is_replaced: bool,
    pub replace_path: Option<String>,
}

/// The host program's locked version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub id: String,
    pub version: String,
}

impl HostInfo {
    pub fn from_lockfile(lockfile: &Lockfile) -> Option<Self> {
        lockfile.host().map(|h| Self {
            id: h.name.to_string(),
            version: h.version.clone(),
        })
    }
}

/// Map of effective identifier to module info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleManifest {
    modules: BTreeMap<String, ModuleInfo>,
}

impl ModuleManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct plugin modules of a lockfile. The host and transitive
    /// dependencies are excluded.
    pub fn from_lockfile(lockfile: &Lockfile) -> Self {
        let modules = lockfile
            .plugins()
            .map(|p| {
                let effective = p.effective_id().to_string();
                let is_replaced = effective != p.name.as_str();
                let info = ModuleInfo {
                    original_path: p.name.to_string(),
                    version: p.version.clone(),
                    time: p.published.clone().unwrap_or_default(),
                    is_replaced,
                    replace_path: is_replaced.then(|| effective.clone()),
                };
                (effective, info)
            })
            .collect();
        Self { modules }
    }

    pub fn insert(&mut self, name: impl Into<String>, info: ModuleInfo) {
        self.modules.insert(name.into(), info);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.get(name)
    }

    /// Entries sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleInfo)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn from_json(content: &str) -> Result<Self, ForgeError> {
        serde_json::from_str(content)
            .map_err(|e| ForgeError::Internal(format!("invalid module manifest: {e}")))
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, ForgeError> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| ForgeError::Internal(format!("failed to serialize module manifest: {e}")))?;
        json.push('\n');
        Ok(json)
    }

    pub fn write(&self, path: &Path) -> Result<(), ForgeError> {
        std::fs::write(path, self.to_json()?).map_err(|e| ForgeError::io(path, e))
    }
}
