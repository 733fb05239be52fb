// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: unique plugin
//! identifiers, parseable version constraints, well-formed redirects, and
//! sane report settings. All errors are collected rather than stopping at
//! the first.

use std::collections::{BTreeMap, HashSet};

use modforge_core::Constraint;

use crate::diagnostic::ConfigError;
use crate::model::ForgeConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// every collected validation error.
pub fn validate_config(config: &ForgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.host.id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "host.id must not be empty".to_string(),
        });
    }
    check_constraint("host.version", &config.host.version, &mut errors);

    // Count occurrences so each duplicate is reported once, in first-seen order.
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut order = Vec::new();
    for (i, plugin) in config.plugins.iter().enumerate() {
        let id = plugin.id.trim();
        if id.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].id must not be empty"),
            });
            continue;
        }
        if id == config.host.id.trim() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].id `{id}` is the host program itself"),
            });
        }
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
        check_constraint(&format!("plugins[{i}].version"), &plugin.version, &mut errors);
    }
    for id in order {
        let count = counts[id];
        if count > 1 {
            errors.push(ConfigError::DuplicatePlugin {
                id: id.to_string(),
                count,
            });
        }
    }

    let mut redirect_sources = HashSet::new();
    for (i, redirect) in config.redirects.iter().enumerate() {
        if redirect.from.trim().is_empty() || redirect.to.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("redirects[{i}] must set both `from` and `to`"),
            });
            continue;
        }
        if redirect.from == redirect.to {
            errors.push(ConfigError::Validation {
                message: format!("redirects[{i}] redirects `{}` to itself", redirect.from),
            });
        }
        if !redirect_sources.insert(redirect.from.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("more than one redirect declared for `{}`", redirect.from),
            });
        }
        check_constraint(&format!("redirects[{i}].version"), &redirect.version, &mut errors);
    }
    for redirect in &config.redirects {
        if redirect_sources.contains(redirect.to.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "redirect target `{}` of `{}` is itself redirected",
                    redirect.to, redirect.from
                ),
            });
        }
    }

    for (key, value) in [
        ("index.path", &config.index.path),
        ("lock.path", &config.lock.path),
        ("report.manifest_file", &config.report.manifest_file),
        ("report.notes_file", &config.report.notes_file),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if !(-12..=14).contains(&config.report.utc_offset_hours) {
        errors.push(ConfigError::Validation {
            message: format!(
                "report.utc_offset_hours must be between -12 and 14, got {}",
                config.report.utc_offset_hours
            ),
        });
    }

    if config.report.fetch_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "report.fetch_timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_constraint(key: &str, value: &str, errors: &mut Vec<ConfigError>) {
    if let Err(e) = value.parse::<Constraint>() {
        errors.push(ConfigError::Validation {
            message: format!("{key}: {e}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PluginEntry, RedirectEntry};

    fn plugin(id: &str) -> PluginEntry {
        PluginEntry {
            id: id.to_string(),
            version: "*".to_string(),
        }
    }

    fn redirect(from: &str, to: &str) -> RedirectEntry {
        RedirectEntry {
            from: from.to_string(),
            to: to.to_string(),
            version: "*".to_string(),
        }
    }

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ForgeConfig::default()).is_ok());
    }

    #[test]
    fn duplicate_plugin_reported_once_with_count() {
        let mut config = ForgeConfig::default();
        config.plugins = vec![
            plugin("github.com/a/x"),
            plugin("github.com/b/y"),
            plugin("github.com/a/x"),
            plugin("github.com/a/x"),
        ];
        let errors = validate_config(&config).unwrap_err();
        let dups: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::DuplicatePlugin { id, count } => Some((id.as_str(), *count)),
                _ => None,
            })
            .collect();
        assert_eq!(dups, vec![("github.com/a/x", 3)]);
    }

    #[test]
    fn bad_constraint_is_reported_with_its_key() {
        let mut config = ForgeConfig::default();
        config.plugins = vec![PluginEntry {
            id: "github.com/a/x".into(),
            version: "rev:zz".into(),
        }];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "plugins[0].version"));
    }

    #[test]
    fn host_listed_as_plugin_fails() {
        let mut config = ForgeConfig::default();
        config.plugins = vec![plugin("github.com/caddyserver/caddy/v2")];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "host program itself"));
    }

    #[test]
    fn chained_redirect_fails() {
        let mut config = ForgeConfig::default();
        config.redirects = vec![
            redirect("github.com/a/x", "github.com/b/x"),
            redirect("github.com/b/x", "github.com/c/x"),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "itself redirected"));
    }

    #[test]
    fn duplicate_redirect_fails() {
        let mut config = ForgeConfig::default();
        config.redirects = vec![
            redirect("github.com/a/x", "github.com/b/x"),
            redirect("github.com/a/x", "github.com/c/x"),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "more than one redirect"));
    }

    #[test]
    fn out_of_range_utc_offset_fails() {
        let mut config = ForgeConfig::default();
        config.report.utc_offset_hours = 15;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "utc_offset_hours"));
    }

    #[test]
    fn unknown_log_level_fails() {
        let mut config = ForgeConfig::default();
        config.log.level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "log.level"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ForgeConfig::default();
        config.lock.path = " ".into();
        config.index.path = "".into();
        config.report.fetch_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
