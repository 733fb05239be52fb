// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit bootstrap phase.
//!
//! A `Bootstrap` is an ordered list of initializers resolved from the
//! catalog: the host first, then each linked plugin in declaration order.
//! `run` fires every initializer exactly once against the registry it is
//! given and stops at the first failure.

use modforge_core::{ForgeError, LinkedPlugin, ModuleId, SelectionManifest};
use tracing::{debug, info};

use crate::catalog::{Catalog, PluginInitializer};
use crate::lifecycle::PluginLifecycle;
use crate::registry::{ModuleRegistry, Registrar};

#[derive(Debug, Clone)]
struct BootStep {
    declared: ModuleId,
    source: ModuleId,
    init: PluginInitializer,
}

/// Capabilities registered by one plugin during a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootRecord {
    /// Identifier the plugin was declared under.
    pub plugin: String,
    /// Identifier whose initializer actually ran.
    pub source: String,
    /// Capabilities registered, in registration order.
    pub capabilities: Vec<String>,
}

/// Outcome of a successful bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    /// Host built-ins, if a host step was configured.
    pub host: Option<BootRecord>,
    /// Plugins in the order they fired.
    pub plugins: Vec<BootRecord>,
}

impl BootReport {
    /// Number of capabilities registered by plugins, excluding host built-ins.
    pub fn plugin_capability_count(&self) -> usize {
        self.plugins.iter().map(|r| r.capabilities.len()).sum()
    }
}

/// Ordered, validated list of initializers.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    host: Option<BootStep>,
    steps: Vec<BootStep>,
}

impl Bootstrap {
    /// Empty bootstrap with no host step.
    pub fn new() -> Self {
        Self {
            host: None,
            steps: Vec::new(),
        }
    }

    /// Plan the bootstrap for a selection manifest: host built-ins, then
    /// every selected plugin (redirects applied) in declaration order.
    pub fn plan(catalog: &Catalog, manifest: &SelectionManifest) -> Result<Self, ForgeError> {
        Self::for_linked(catalog, &manifest.host().id, manifest.linked_plugins())
    }

    /// Plan from an already linked plugin list, e.g. one read back from a lockfile.
    pub fn for_linked(
        catalog: &Catalog,
        host: &ModuleId,
        plugins: impl IntoIterator<Item = LinkedPlugin>,
    ) -> Result<Self, ForgeError> {
        let mut bootstrap = Self::new();
        bootstrap.set_host(catalog, host)?;
        for linked in plugins {
            bootstrap.add(catalog, &linked)?;
        }
        Ok(bootstrap)
    }

    /// Register the host program's built-ins before any plugin.
    pub fn set_host(&mut self, catalog: &Catalog, host: &ModuleId) -> Result<(), ForgeError> {
        let entry = catalog.get(host.as_str()).ok_or_else(|| ForgeError::UnknownPlugin {
            id: host.to_string(),
        })?;
        self.host = Some(BootStep {
            declared: host.clone(),
            source: host.clone(),
            init: entry.init,
        });
        Ok(())
    }

    /// Append a linked plugin.
    ///
    /// The redirect target's initializer is used when the catalog has one;
    /// otherwise the declared identifier's. Missing both is a hard failure.
    pub fn add(&mut self, catalog: &Catalog, linked: &LinkedPlugin) -> Result<(), ForgeError> {
        if self.steps.iter().any(|s| s.declared == linked.declared) {
            return Err(ForgeError::DuplicateIdentifier {
                id: linked.declared.to_string(),
            });
        }

        let (source, entry) = match catalog.get(linked.source.as_str()) {
            Some(entry) => (linked.source.clone(), entry),
            None => {
                let entry = catalog.get(linked.declared.as_str()).ok_or_else(|| {
                    ForgeError::UnknownPlugin {
                        id: linked.source.to_string(),
                    }
                })?;
                (linked.declared.clone(), entry)
            }
        };

        self.steps.push(BootStep {
            declared: linked.declared.clone(),
            source,
            init: entry.init,
        });
        Ok(())
    }

    /// Declared identifiers in firing order, host excluded.
    pub fn order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.declared.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fire every initializer exactly once against `registry`.
    pub fn run(&self, registry: &mut ModuleRegistry) -> Result<BootReport, ForgeError> {
        let mut lifecycle = PluginLifecycle::new();
        for step in self.host.iter().chain(self.steps.iter()) {
            lifecycle.track(step.declared.as_str());
        }

        debug!(order = ?self.order(), "bootstrap order");

        let mut report = BootReport::default();
        if let Some(host) = &self.host {
            report.host = Some(fire(host, registry, &mut lifecycle)?);
        }
        for step in &self.steps {
            report.plugins.push(fire(step, registry, &mut lifecycle)?);
        }

        let pending = lifecycle.pending();
        if !pending.is_empty() {
            return Err(ForgeError::Internal(format!(
                "plugins never registered: {}",
                pending.join(", ")
            )));
        }

        info!(
            plugins = report.plugins.len(),
            capabilities = registry.len(),
            "bootstrap complete"
        );
        Ok(report)
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

fn fire(
    step: &BootStep,
    registry: &mut ModuleRegistry,
    lifecycle: &mut PluginLifecycle,
) -> Result<BootRecord, ForgeError> {
    lifecycle.mark_registered(step.declared.as_str())?;

    let mut registrar = Registrar::new(registry, step.declared.as_str());
    (step.init)(&mut registrar)?;
    let capabilities = registrar.into_registered();

    debug!(
        plugin = %step.declared,
        source = %step.source,
        count = capabilities.len(),
        "plugin registered"
    );
    Ok(BootRecord {
        plugin: step.declared.to_string(),
        source: step.source.to_string(),
        capabilities,
    })
}
