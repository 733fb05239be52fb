// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module registry, plugin catalog, and bootstrap.
//!
//! Plugin packages do not register themselves implicitly. Each compiled-in
//! package contributes an explicit initializer to the [`Catalog`]; a
//! [`Bootstrap`] built from the selection manifest runs the selected
//! initializers once each, in declaration order, against a caller-owned
//! [`ModuleRegistry`].

pub mod bootstrap;
pub mod catalog;
pub mod lifecycle;
pub mod registry;

pub use bootstrap::{BootRecord, BootReport, Bootstrap};
pub use catalog::{Catalog, CatalogEntry, PluginInitializer};
pub use lifecycle::{PluginLifecycle, RegistrationState};
pub use registry::{
    Capability, CapabilityFactory, ConfiguredModule, DescriptorFactory, ModuleRegistry,
    Registrar, RegistryEntry,
};
