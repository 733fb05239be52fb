// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `modforge bootstrap` command implementation.
//!
//! Runs the locked plugins' initializers against a fresh registry, the same
//! way the assembled server does at startup, and prints what each one
//! registered.

use modforge_config::ForgeConfig;
use modforge_core::ForgeError;
use modforge_plugin::{BootRecord, Bootstrap, Catalog, ModuleRegistry};

use crate::plan::locked_lockfile;

pub fn run_bootstrap(config: &ForgeConfig, use_color: bool) -> Result<(), ForgeError> {
    let manifest = config.selection_manifest()?;
    let lockfile = locked_lockfile(config)?;

    let bootstrap = Bootstrap::for_linked(
        &Catalog::builtin(),
        &manifest.host().id,
        lockfile.linked_plugins(&manifest)?,
    )?;
    let mut registry = ModuleRegistry::new();
    let report = bootstrap.run(&mut registry)?;

    println!();
    println!("  modforge bootstrap");
    println!("  {}", "-".repeat(50));
    if let Some(host) = &report.host {
        print_record(host, use_color);
    }
    for record in &report.plugins {
        print_record(record, use_color);
    }
    println!("  {}", "-".repeat(50));
    println!(
        "  {} capabilities registered ({} from plugins)",
        registry.len(),
        report.plugin_capability_count()
    );
    println!();
    Ok(())
}

fn print_record(record: &BootRecord, use_color: bool) {
    let via = if record.source != record.plugin {
        format!(" (via {})", record.source)
    } else {
        String::new()
    };
    if use_color {
        use colored::Colorize;
        println!("  {}{}", record.plugin.bold(), via.dimmed());
        for capability in &record.capabilities {
            println!("    {} {capability}", "+".green());
        }
    } else {
        println!("  {}{via}", record.plugin);
        for capability in &record.capabilities {
            println!("    + {capability}");
        }
    }
}
