// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability registry populated during bootstrap.
//!
//! The `ModuleRegistry` maps capability names (`http.handlers.forward_proxy`,
//! `layer4`, ...) to the factory that constructs them and the plugin that
//! registered them. It is an ordinary value: callers construct one, hand it
//! to a bootstrap, and pass `&ModuleRegistry` to whatever performs lookups.

use std::collections::HashMap;
use std::fmt;

use modforge_core::{CapabilityKind, ForgeError};
use tracing::debug;

/// A constructed capability instance.
pub trait Capability: Send + Sync + fmt::Debug {
    /// Registered capability name.
    fn name(&self) -> &str;

    /// Kind of capability.
    fn kind(&self) -> CapabilityKind;
}

/// Factory trait for creating capability instances from runtime configuration.
pub trait CapabilityFactory: Send + Sync {
    /// The capability kind this factory produces.
    fn kind(&self) -> CapabilityKind;

    /// Create a new instance from the given runtime configuration fragment.
    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn Capability>, ForgeError>;
}

/// Instance produced by [`DescriptorFactory`]: the capability name, kind,
/// and the configuration it was instantiated with.
///
/// The plugin implementations themselves live in the host build; the
/// registry only needs to know what each capability is called and who owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredModule {
    pub name: String,
    pub kind: CapabilityKind,
    pub config: serde_json::Value,
}

impl Capability for ConfiguredModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> CapabilityKind {
        self.kind
    }
}

/// Factory that produces [`ConfiguredModule`] instances.
#[derive(Debug, Clone)]
pub struct DescriptorFactory {
    name: String,
    kind: CapabilityKind,
}

impl DescriptorFactory {
    pub fn new(name: impl Into<String>, kind: CapabilityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl CapabilityFactory for DescriptorFactory {
    fn kind(&self) -> CapabilityKind {
        self.kind
    }

    fn create(&self, config: &serde_json::Value) -> Result<Box<dyn Capability>, ForgeError> {
        if !(config.is_object() || config.is_null()) {
            return Err(ForgeError::Config(format!(
                "configuration for `{}` must be an object",
                self.name
            )));
        }
        Ok(Box::new(ConfiguredModule {
            name: self.name.clone(),
            kind: self.kind,
            config: config.clone(),
        }))
    }
}

/// A single entry in the module registry.
pub struct RegistryEntry {
    /// Capability name, unique across the registry.
    pub capability: String,
    /// Kind of capability.
    pub kind: CapabilityKind,
    /// Declared identifier of the plugin that registered it.
    pub owner: String,
    /// Constructor for instances.
    pub factory: Box<dyn CapabilityFactory>,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("capability", &self.capability)
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Registry of capabilities keyed by name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl ModuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability.
    ///
    /// A capability name can be registered once. A second registration fails
    /// with [`ForgeError::DuplicateCapability`] naming both owners and leaves
    /// the first registration untouched.
    pub fn register(
        &mut self,
        capability: impl Into<String>,
        owner: impl Into<String>,
        factory: Box<dyn CapabilityFactory>,
    ) -> Result<(), ForgeError> {
        let capability = capability.into();
        let owner = owner.into();

        if let Some(existing) = self.entries.get(&capability) {
            return Err(ForgeError::DuplicateCapability {
                capability,
                first: existing.owner.clone(),
                second: owner,
            });
        }

        debug!(capability = %capability, owner = %owner, kind = %factory.kind(), "capability registered");
        self.entries.insert(
            capability.clone(),
            RegistryEntry {
                capability,
                kind: factory.kind(),
                owner,
                factory,
            },
        );
        Ok(())
    }

    /// Get an entry by capability name.
    pub fn get(&self, capability: &str) -> Option<&RegistryEntry> {
        self.entries.get(capability)
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.entries.contains_key(capability)
    }

    /// Construct an instance of a registered capability.
    pub fn instantiate(
        &self,
        capability: &str,
        config: &serde_json::Value,
    ) -> Result<Box<dyn Capability>, ForgeError> {
        let entry = self
            .entries
            .get(capability)
            .ok_or_else(|| ForgeError::CapabilityNotFound(capability.to_string()))?;
        entry.factory.create(config)
    }

    /// All entries of the given kind, sorted by capability name.
    pub fn by_kind(&self, kind: CapabilityKind) -> Vec<&RegistryEntry> {
        let mut entries: Vec<&RegistryEntry> =
            self.entries.values().filter(|e| e.kind == kind).collect();
        entries.sort_by(|a, b| a.capability.cmp(&b.capability));
        entries
    }

    /// Capability names registered by the given owner, sorted.
    pub fn owned_by(&self, owner: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.owner == owner)
            .map(|e| e.capability.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// All entries, sorted by capability name.
    pub fn list_all(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<&RegistryEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.capability.cmp(&b.capability));
        entries
    }

    /// Returns the number of registered capabilities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registration handle given to a plugin initializer.
///
/// Every capability registered through a `Registrar` is attributed to the
/// plugin's declared identifier, even when its code comes from a redirect
/// target.
pub struct Registrar<'a> {
    registry: &'a mut ModuleRegistry,
    owner: &'a str,
    registered: Vec<String>,
}

impl<'a> Registrar<'a> {
    pub fn new(registry: &'a mut ModuleRegistry, owner: &'a str) -> Self {
        Self {
            registry,
            owner,
            registered: Vec::new(),
        }
    }

    /// Declared identifier capabilities are attributed to.
    pub fn owner(&self) -> &str {
        self.owner
    }

    /// Register a capability with an explicit factory.
    pub fn register(
        &mut self,
        capability: &str,
        factory: Box<dyn CapabilityFactory>,
    ) -> Result<(), ForgeError> {
        self.registry.register(capability, self.owner, factory)?;
        self.registered.push(capability.to_string());
        Ok(())
    }

    /// Register a capability backed by a [`DescriptorFactory`].
    pub fn provide(&mut self, capability: &str, kind: CapabilityKind) -> Result<(), ForgeError> {
        self.register(capability, Box::new(DescriptorFactory::new(capability, kind)))
    }

    /// Capability names registered through this handle, in order.
    pub fn into_registered(self) -> Vec<String> {
        self.registered
    }
}
