// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Modforge configuration system.

use modforge_config::diagnostic::ConfigError;
use modforge_config::model::ForgeConfig;
use modforge_config::{load_and_validate_str, load_config_from_str};

/// A full manifest with every section deserializes successfully.
#[test]
fn full_manifest_deserializes() {
    let toml = r#"
[log]
level = "debug"

[host]
id = "github.com/caddyserver/caddy/v2"
version = "^2.8"

[[plugins]]
id = "github.com/caddyserver/forwardproxy"

[[plugins]]
id = "github.com/mholt/caddy-l4"
version = "rev:3c6cc2c"

[[redirects]]
from = "github.com/caddyserver/forwardproxy"
to = "github.com/klzgrad/forwardproxy"
version = "v0.0.0-20240124014235-cb12a4d41e95"

[index]
path = "index/modules.toml"

[lock]
path = "build/modforge.lock"

[report]
manifest_file = "out/manifest.json"
notes_file = "out/notes.md"
utc_offset_hours = 0
previous = "https://example.com/manifest.json"
"#;

    let config = load_and_validate_str(toml).expect("valid manifest should load");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.host.version, "^2.8");
    assert_eq!(config.plugins.len(), 2);
    assert_eq!(config.redirects.len(), 1);
    assert_eq!(config.index.path, "index/modules.toml");
    assert_eq!(config.lock.path, "build/modforge.lock");
    assert_eq!(config.report.utc_offset_hours, 0);
    assert_eq!(
        config.report.previous.as_deref(),
        Some("https://example.com/manifest.json")
    );

    let manifest = config.selection_manifest().unwrap();
    assert_eq!(manifest.plugins().len(), 2);
    assert_eq!(manifest.linked_plugins()[0].source.as_str(), "github.com/klzgrad/forwardproxy");
}

/// Missing optional sections use defaults without error.
#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.log.level, "info");
    assert_eq!(config.host.id, "github.com/caddyserver/caddy/v2");
    assert_eq!(config.host.version, "*");
    assert!(config.plugins.is_empty());
    assert!(config.redirects.is_empty());
    assert_eq!(config.index.path, "modforge-index.toml");
    assert_eq!(config.lock.path, "modforge.lock");
    assert_eq!(config.report.manifest_file, "manifest.json");
    assert_eq!(config.report.notes_file, "release_notes.md");
    assert_eq!(config.report.utc_offset_hours, 8);
    assert_eq!(config.report.fetch_timeout_secs, 10);
    assert!(config.report.output_file.is_none());
}

/// Duplicate identifiers surface as a diagnostic, not a panic.
#[test]
fn duplicate_plugin_is_a_diagnostic() {
    let toml = r#"
[[plugins]]
id = "github.com/mholt/caddy-l4"

[[plugins]]
id = "github.com/mholt/caddy-l4"
"#;
    let errors = load_and_validate_str(toml).expect_err("duplicates must fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::DuplicatePlugin { id, count: 2 } if id == "github.com/mholt/caddy-l4"
    )));
}

/// Unknown key in a plugin entry gets a "did you mean" suggestion.
#[test]
fn unknown_plugin_key_suggests_correction() {
    let toml = r#"
[[plugins]]
id = "github.com/mholt/caddy-l4"
verison = "^1"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key must fail");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey { key, suggestion, .. } => {
            key == "verison" && suggestion.as_deref() == Some("version")
        }
        _ => false,
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn unknown_top_level_section_rejected() {
    let toml = r#"
[logging]
level = "debug"
"#;
    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A plugin entry without an id is a missing-key diagnostic.
#[test]
fn plugin_without_id_is_missing_key() {
    let toml = r#"
[[plugins]]
version = "^1"
"#;
    let errors = load_and_validate_str(toml).expect_err("missing id must fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "id")));
}

/// Wrong value type is reported with the key path.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[report]
utc_offset_hours = "eight"
"#;
    let errors = load_and_validate_str(toml).expect_err("wrong type must fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("utc_offset_hours")
    )));
}

/// Env-style dotted overrides land on the right field.
#[test]
fn dotted_override_sets_nested_field() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: ForgeConfig = Figment::new()
        .merge(Serialized::defaults(ForgeConfig::default()))
        .merge(Toml::string("[report]\nutc_offset_hours = 0\n"))
        .merge(("report.utc_offset_hours", 9))
        .merge(("lock.path", "from-env.lock"))
        .extract()
        .expect("should merge overrides");

    assert_eq!(config.report.utc_offset_hours, 9);
    assert_eq!(config.lock.path, "from-env.lock");
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    let config = modforge_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/path/modforge.toml",
    ))
    .expect("missing file should be silently skipped");
    assert_eq!(config.host.id, "github.com/caddyserver/caddy/v2");
}
