// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Modforge build assembler.
//!
//! This crate provides the error type, module identifiers, version
//! constraints, and the selection manifest shared by every other crate in
//! the workspace.

pub mod error;
pub mod manifest;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ForgeError;
pub use manifest::{LinkedPlugin, PluginRef, Redirect, SelectionManifest};
pub use types::{
    CapabilityKind, Constraint, ModuleId, format_version, parse_version, pseudo_version_hash,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forge_error_messages_name_the_offender() {
        let err = ForgeError::DuplicateIdentifier {
            id: "github.com/mholt/caddy-l4".into(),
        };
        assert!(err.to_string().contains("github.com/mholt/caddy-l4"));

        let err = ForgeError::DuplicateCapability {
            capability: "layer4".into(),
            first: "github.com/mholt/caddy-l4".into(),
            second: "github.com/example/l4-fork".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("layer4"));
        assert!(msg.contains("github.com/mholt/caddy-l4"));
        assert!(msg.contains("github.com/example/l4-fork"));
    }

    #[test]
    fn version_conflict_lists_every_requirement() {
        let err = ForgeError::VersionConflict {
            id: "github.com/lib/x".into(),
            requirements: vec![
                ("github.com/a@v1.0.0".into(), "^1".into()),
                ("github.com/b@v2.0.0".into(), "^2".into()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("github.com/a@v1.0.0 requires ^1"));
        assert!(msg.contains("github.com/b@v2.0.0 requires ^2"));
    }

    #[test]
    fn capability_kind_round_trips_through_strings() {
        use std::str::FromStr;

        for kind in [
            CapabilityKind::App,
            CapabilityKind::HttpHandler,
            CapabilityKind::HttpMatcher,
            CapabilityKind::IpSource,
            CapabilityKind::TlsIssuer,
            CapabilityKind::Listener,
            CapabilityKind::Layer4Handler,
            CapabilityKind::Layer4Matcher,
            CapabilityKind::Storage,
        ] {
            let parsed = CapabilityKind::from_str(&kind.to_string()).expect("should parse back");
            assert_eq!(kind, parsed);
        }
    }
}
