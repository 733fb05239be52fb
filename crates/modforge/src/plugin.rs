// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `modforge plugin` subcommands.

use modforge_plugin::{Catalog, CatalogEntry};

use crate::PluginCommands;

pub fn run_plugin(action: &PluginCommands, use_color: bool) {
    let catalog = Catalog::builtin();
    let entries: Vec<&CatalogEntry> = match action {
        PluginCommands::List => catalog.iter().collect(),
        PluginCommands::Search { query } => catalog.search(query),
    };

    if entries.is_empty() {
        println!("no plugins match");
        return;
    }
    for entry in entries {
        print_entry(entry, use_color);
    }
}

fn print_entry(entry: &CatalogEntry, use_color: bool) {
    let capabilities = entry
        .capabilities()
        .map(|caps| caps.join(", "))
        .unwrap_or_else(|e| format!("<{e}>"));
    if use_color {
        use colored::Colorize;
        println!("{}", entry.id.bold());
        println!("    {}", entry.description);
        println!("    {}", capabilities.dimmed());
    } else {
        println!("{}", entry.id);
        println!("    {}", entry.description);
        println!("    {capabilities}");
    }
}
