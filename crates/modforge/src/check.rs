// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `modforge check` command implementation.

use modforge_config::ForgeConfig;
use modforge_core::ForgeError;
use modforge_plugin::{Bootstrap, Catalog};

/// Validate the selection manifest and confirm every plugin is compiled in.
pub fn run_check(config: &ForgeConfig, use_color: bool) -> Result<(), ForgeError> {
    let manifest = config.selection_manifest()?;
    Bootstrap::plan(&Catalog::builtin(), &manifest)?;

    let summary = format!(
        "configuration OK: host {}, {} plugins, {} redirects",
        manifest.host().id,
        manifest.plugins().len(),
        manifest.redirects().count()
    );
    if use_color {
        use colored::Colorize;
        println!("{}", summary.green());
    } else {
        println!("{summary}");
    }
    Ok(())
}
