// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration state tracking for linked plugins.

use std::collections::BTreeMap;
use std::fmt;

use modforge_core::ForgeError;

/// Registration state of one plugin.
///
/// `Unregistered -> Registered` is the only transition, and `Registered` is
/// terminal for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registered,
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationState::Unregistered => write!(f, "unregistered"),
            RegistrationState::Registered => write!(f, "registered"),
        }
    }
}

/// Tracks registration state per declared plugin identifier.
#[derive(Debug, Default)]
pub struct PluginLifecycle {
    states: BTreeMap<String, RegistrationState>,
}

impl PluginLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a plugin in the `Unregistered` state.
    pub fn track(&mut self, plugin: &str) {
        self.states
            .entry(plugin.to_string())
            .or_insert(RegistrationState::Unregistered);
    }

    /// Transition a plugin to `Registered`.
    ///
    /// Fails with [`ForgeError::AlreadyRegistered`] if it already fired.
    pub fn mark_registered(&mut self, plugin: &str) -> Result<(), ForgeError> {
        let state = self
            .states
            .entry(plugin.to_string())
            .or_insert(RegistrationState::Unregistered);
        if *state == RegistrationState::Registered {
            return Err(ForgeError::AlreadyRegistered(plugin.to_string()));
        }
        *state = RegistrationState::Registered;
        Ok(())
    }

    pub fn state(&self, plugin: &str) -> RegistrationState {
        self.states
            .get(plugin)
            .copied()
            .unwrap_or(RegistrationState::Unregistered)
    }

    /// Plugins that are tracked but have not fired.
    pub fn pending(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|(_, s)| **s == RegistrationState::Unregistered)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
