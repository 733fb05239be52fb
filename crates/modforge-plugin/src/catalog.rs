// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compiled-in plugin catalog.
//!
//! Each entry pairs an import identifier with the initializer that registers
//! its capabilities. Initializers are plain functions so the set that runs,
//! and the order it runs in, is decided by the bootstrap rather than by
//! link-time side effects.

use modforge_core::{CapabilityKind, ForgeError};

use crate::registry::{ModuleRegistry, Registrar};

/// Registration routine of a plugin package.
pub type PluginInitializer = fn(&mut Registrar<'_>) -> Result<(), ForgeError>;

/// A plugin package known to this build.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// Import identifier.
    pub id: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Registration routine.
    pub init: PluginInitializer,
}

impl CatalogEntry {
    /// Capability names this entry registers, in registration order.
    ///
    /// Runs the initializer against a scratch registry.
    pub fn capabilities(&self) -> Result<Vec<String>, ForgeError> {
        let mut scratch = ModuleRegistry::new();
        let mut registrar = Registrar::new(&mut scratch, self.id);
        (self.init)(&mut registrar)?;
        Ok(registrar.into_registered())
    }
}

/// Set of plugin packages that can be bootstrapped.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The host program and the extension modules compiled into Modforge.
    pub fn builtin() -> Self {
        Self::new(vec![
            CatalogEntry {
                id: "github.com/caddyserver/caddy/v2",
                description: "Caddy core: HTTP server, reverse proxy, file server, ACME",
                init: register_caddy_core,
            },
            CatalogEntry {
                id: "github.com/caddyserver/forwardproxy",
                description: "HTTP CONNECT forward proxy handler",
                init: register_forward_proxy,
            },
            CatalogEntry {
                id: "github.com/klzgrad/forwardproxy",
                description: "Forward proxy fork with NaiveProxy padding support",
                init: register_forward_proxy,
            },
            CatalogEntry {
                id: "github.com/imgk/caddy-trojan",
                description: "Trojan protocol app, handler, and listener wrapper",
                init: register_trojan,
            },
            CatalogEntry {
                id: "github.com/mholt/caddy-l4",
                description: "Layer 4 (TCP/UDP) app with protocol matchers and handlers",
                init: register_layer4,
            },
            CatalogEntry {
                id: "github.com/fvbommel/caddy-combine-ip-ranges",
                description: "Combine several trusted-proxy IP sources into one",
                init: register_combine_ip_ranges,
            },
            CatalogEntry {
                id: "github.com/LeenHawk/caddy-edgeone-ip",
                description: "Tencent EdgeOne edge node IP ranges",
                init: register_edgeone_ip,
            },
            CatalogEntry {
                id: "github.com/monobilisim/caddy-ip-list",
                description: "Trusted-proxy IP ranges fetched from URL lists",
                init: register_ip_list,
            },
            CatalogEntry {
                id: "github.com/WeidiDeng/caddy-cloudflare-ip",
                description: "Cloudflare edge IP ranges",
                init: register_cloudflare_ip,
            },
            CatalogEntry {
                id: "github.com/xcaddyplugins/caddy-trusted-cloudfront",
                description: "Amazon CloudFront edge IP ranges",
                init: register_cloudfront_ip,
            },
        ])
    }

    /// Look up an entry by import identifier.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries whose identifier or description contains `query` (case-insensitive).
    ///
    /// An empty query returns every entry.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                query.is_empty()
                    || e.id.to_lowercase().contains(&query)
                    || e.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// --- Initializers ---

fn register_caddy_core(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http", CapabilityKind::App)?;
    r.provide("tls", CapabilityKind::App)?;
    r.provide("http.handlers.reverse_proxy", CapabilityKind::HttpHandler)?;
    r.provide("http.handlers.file_server", CapabilityKind::HttpHandler)?;
    r.provide("http.handlers.static_response", CapabilityKind::HttpHandler)?;
    r.provide("http.matchers.host", CapabilityKind::HttpMatcher)?;
    r.provide("http.matchers.path", CapabilityKind::HttpMatcher)?;
    r.provide("http.ip_sources.static", CapabilityKind::IpSource)?;
    r.provide("tls.issuance.acme", CapabilityKind::TlsIssuer)?;
    r.provide("caddy.listeners.proxy_protocol", CapabilityKind::Listener)?;
    r.provide("caddy.storage.file_system", CapabilityKind::Storage)
}

fn register_forward_proxy(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http.handlers.forward_proxy", CapabilityKind::HttpHandler)
}

fn register_trojan(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("trojan", CapabilityKind::App)?;
    r.provide("http.handlers.trojan", CapabilityKind::HttpHandler)?;
    r.provide("caddy.listeners.trojan", CapabilityKind::Listener)
}

fn register_layer4(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("layer4", CapabilityKind::App)?;
    r.provide("caddy.listeners.layer4", CapabilityKind::Listener)?;
    r.provide("layer4.handlers.proxy", CapabilityKind::Layer4Handler)?;
    r.provide("layer4.handlers.tls", CapabilityKind::Layer4Handler)?;
    r.provide("layer4.matchers.tls", CapabilityKind::Layer4Matcher)?;
    r.provide("layer4.matchers.http", CapabilityKind::Layer4Matcher)
}

fn register_combine_ip_ranges(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http.ip_sources.combine", CapabilityKind::IpSource)
}

fn register_edgeone_ip(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http.ip_sources.edgeone", CapabilityKind::IpSource)
}

fn register_ip_list(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http.ip_sources.list", CapabilityKind::IpSource)
}

fn register_cloudflare_ip(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http.ip_sources.cloudflare", CapabilityKind::IpSource)
}

fn register_cloudfront_ip(r: &mut Registrar<'_>) -> Result<(), ForgeError> {
    r.provide("http.ip_sources.cloudfront", CapabilityKind::IpSource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_has_host_and_extensions() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.get("github.com/caddyserver/caddy/v2").is_some());
        assert!(catalog.get("github.com/mholt/caddy-l4").is_some());
    }

    #[test]
    fn builtin_identifiers_are_unique() {
        let catalog = Catalog::builtin();
        let ids: HashSet<&str> = catalog.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn every_initializer_registers_something() {
        for entry in Catalog::builtin().iter() {
            let caps = entry.capabilities().unwrap();
            assert!(!caps.is_empty(), "{} registers nothing", entry.id);
        }
    }

    #[test]
    fn forward_proxy_fork_registers_same_capability() {
        let catalog = Catalog::builtin();
        let upstream = catalog
            .get("github.com/caddyserver/forwardproxy")
            .unwrap()
            .capabilities()
            .unwrap();
        let fork = catalog
            .get("github.com/klzgrad/forwardproxy")
            .unwrap()
            .capabilities()
            .unwrap();
        assert_eq!(upstream, fork);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let results = catalog.search("CLOUDFLARE");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "github.com/WeidiDeng/caddy-cloudflare-ip");
    }

    #[test]
    fn search_by_description() {
        let catalog = Catalog::builtin();
        let results = catalog.search("layer 4");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "github.com/mholt/caddy-l4");
    }

    #[test]
    fn search_empty_returns_all() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search("").len(), catalog.len());
    }

    #[test]
    fn search_no_match() {
        assert!(Catalog::builtin().search("xyz_nonexistent").is_empty());
    }
}
