// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modforge - assemble reproducible plugin builds.
//!
//! This is the binary entry point. Every subcommand loads and validates the
//! configuration first; diagnostics go to stderr and the process exits
//! non-zero on any error.

mod bootstrap;
mod check;
mod lock;
mod plan;
mod plugin;
mod report;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use modforge_config::ForgeConfig;
use modforge_core::ForgeError;

/// Modforge - assemble reproducible plugin builds.
#[derive(Parser, Debug)]
#[command(name = "modforge", version, about, long_about = None)]
struct Cli {
    /// Load only this config file (plus MODFORGE_* overrides).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the selection manifest and write the lockfile.
    Lock(LockArgs),
    /// Print the builder arguments for the locked plugins.
    Plan {
        /// Append `KEY=value` step outputs to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the module manifest and release notes.
    Report {
        /// Previous release's module manifest (path or http(s) URL).
        #[arg(long)]
        previous: Option<String>,
    },
    /// Run the bootstrap phase and list registered capabilities.
    Bootstrap,
    /// Inspect the compiled-in plugin catalog.
    Plugin {
        #[command(subcommand)]
        action: PluginCommands,
    },
    /// Validate the configuration and selection manifest.
    Check,
}

#[derive(Args, Debug)]
struct LockArgs {
    /// Re-resolve even when the lockfile is up to date.
    #[arg(long, conflicts_with = "locked")]
    force: bool,
    /// Fail instead of resolving when the lockfile is missing or stale.
    #[arg(long)]
    locked: bool,
}

#[derive(Subcommand, Debug)]
enum PluginCommands {
    /// List every plugin compiled into this build.
    List,
    /// Search plugins by identifier or description.
    Search {
        /// Case-insensitive search term.
        query: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let use_color = !cli.plain && std::io::stdout().is_terminal();

    // The catalog needs no configuration.
    if let Commands::Plugin { action } = &cli.command {
        plugin::run_plugin(action, use_color);
        return;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            modforge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log.level);

    let result = match cli.command {
        Commands::Lock(args) => lock::run_lock(&config, args.into_mode()),
        Commands::Plan { output } => plan::run_plan(&config, output.as_deref()),
        Commands::Report { previous } => report::run_report(&config, previous.as_deref()).await,
        Commands::Bootstrap => bootstrap::run_bootstrap(&config, use_color),
        Commands::Check => check::run_check(&config, use_color),
        Commands::Plugin { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::miette!("{e}"));
        std::process::exit(1);
    }
}

impl LockArgs {
    fn into_mode(self) -> modforge_resolve::LockMode {
        use modforge_resolve::LockMode;
        match (self.force, self.locked) {
            (true, _) => LockMode::Force,
            (_, true) => LockMode::Locked,
            _ => LockMode::Auto,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ForgeConfig, Vec<modforge_config::ConfigError>> {
    match path {
        Some(path) if !path.exists() => Err(vec![modforge_config::ConfigError::Validation {
            message: format!("config file {} does not exist", path.display()),
        }]),
        Some(path) => modforge_config::load_and_validate_path(path),
        None => modforge_config::load_and_validate(),
    }
}

/// Selection manifest from config, with the lockfile path.
fn manifest_and_lock_path(
    config: &ForgeConfig,
) -> Result<(modforge_core::SelectionManifest, PathBuf), ForgeError> {
    Ok((config.selection_manifest()?, PathBuf::from(&config.lock.path)))
}

/// Initialize the tracing subscriber. Logs go to stderr so stdout stays
/// machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("modforge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
