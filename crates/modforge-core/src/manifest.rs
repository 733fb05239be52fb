// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The selection manifest: which plugin packages a build links, and which
//! identifiers are redirected to alternate sources.
//!
//! A [`SelectionManifest`] can only be built through
//! [`SelectionManifest::new`], which rejects duplicate identifiers and
//! malformed redirect tables. Everything downstream can therefore assume
//! identifiers are unique.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ForgeError;
use crate::types::{Constraint, ModuleId};

/// A plugin package selected for inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRef {
    pub id: ModuleId,
    pub constraint: Constraint,
}

impl PluginRef {
    pub fn new(id: impl Into<ModuleId>, constraint: Constraint) -> Self {
        Self {
            id: id.into(),
            constraint,
        }
    }
}

/// Satisfy `from` with the source `to`, pinned at `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub from: ModuleId,
    pub to: ModuleId,
    pub version: Constraint,
}

/// A plugin as it will be linked: the identifier it was declared under and
/// the source whose code is actually compiled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedPlugin {
    pub declared: ModuleId,
    pub source: ModuleId,
}

impl LinkedPlugin {
    pub fn is_redirected(&self) -> bool {
        self.declared != self.source
    }
}

/// Validated selection manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionManifest {
    host: PluginRef,
    plugins: Vec<PluginRef>,
    redirects: BTreeMap<ModuleId, Redirect>,
}

impl SelectionManifest {
    /// Build a manifest, failing fast on the first uniqueness or redirect violation.
    pub fn new(
        host: PluginRef,
        plugins: Vec<PluginRef>,
        redirects: Vec<Redirect>,
    ) -> Result<Self, ForgeError> {
        let mut seen = HashSet::new();
        seen.insert(host.id.clone());
        for plugin in &plugins {
            if !seen.insert(plugin.id.clone()) {
                return Err(ForgeError::DuplicateIdentifier {
                    id: plugin.id.to_string(),
                });
            }
        }

        let mut table = BTreeMap::new();
        for redirect in redirects {
            if redirect.from == redirect.to {
                return Err(ForgeError::Config(format!(
                    "redirect for `{}` points at itself",
                    redirect.from
                )));
            }
            if table.contains_key(&redirect.from) {
                return Err(ForgeError::Config(format!(
                    "more than one redirect declared for `{}`",
                    redirect.from
                )));
            }
            table.insert(redirect.from.clone(), redirect);
        }
        // A target that is itself redirected would make substitution order-dependent.
        for redirect in table.values() {
            if table.contains_key(&redirect.to) {
                return Err(ForgeError::Config(format!(
                    "redirect target `{}` of `{}` is itself redirected",
                    redirect.to, redirect.from
                )));
            }
        }

        Ok(Self {
            host,
            plugins,
            redirects: table,
        })
    }

    pub fn host(&self) -> &PluginRef {
        &self.host
    }

    /// Plugins in declaration order.
    pub fn plugins(&self) -> &[PluginRef] {
        &self.plugins
    }

    /// Host first, then plugins in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &PluginRef> {
        std::iter::once(&self.host).chain(self.plugins.iter())
    }

    pub fn redirects(&self) -> impl Iterator<Item = &Redirect> {
        self.redirects.values()
    }

    pub fn redirect_for(&self, id: &ModuleId) -> Option<&Redirect> {
        self.redirects.get(id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.plugins.iter().any(|p| &p.id == id)
    }

    /// Plugins with their redirect applied, in declaration order.
    pub fn linked_plugins(&self) -> Vec<LinkedPlugin> {
        self.plugins
            .iter()
            .map(|p| LinkedPlugin {
                declared: p.id.clone(),
                source: self
                    .redirects
                    .get(&p.id)
                    .filter(|r| !r.to.is_local_path())
                    .map(|r| r.to.clone())
                    .unwrap_or_else(|| p.id.clone()),
            })
            .collect()
    }

    /// Order-independent canonical text used for lockfile freshness checks.
    pub fn canonical(&self) -> String {
        let mut plugins: Vec<String> = self
            .plugins
            .iter()
            .map(|p| format!("plugin {} {}", p.id, p.constraint))
            .collect();
        plugins.sort();

        let mut out = format!("host {} {}\n", self.host.id, self.host.constraint);
        for line in plugins {
            out.push_str(&line);
            out.push('\n');
        }
        for r in self.redirects.values() {
            out.push_str(&format!("redirect {} {} {}\n", r.from, r.to, r.version));
        }
        out
    }
}
