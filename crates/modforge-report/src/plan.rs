// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder arguments derived from a lockfile.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use modforge_core::ForgeError;
use modforge_resolve::{LockedPackage, Lockfile};
use tracing::debug;

/// Environment variable CI runners expose for step outputs.
pub const CI_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Arguments for an xcaddy-style builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Locked host version, if the host is in the lockfile.
    pub host_version: Option<String>,
    /// One `--with` argument per direct plugin, sorted by effective identifier.
    pub args: Vec<String>,
}

impl BuildPlan {
    pub fn from_lockfile(lockfile: &Lockfile) -> Self {
        let mut plugins: Vec<&LockedPackage> = lockfile.plugins().collect();
        plugins.sort_by(|a, b| a.effective_id().cmp(b.effective_id()));

        Self {
            host_version: lockfile.host().map(|h| h.version.clone()),
            args: plugins.into_iter().map(with_arg).collect(),
        }
    }

    /// All arguments joined by spaces.
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }

    /// `KEY=value` step-output lines.
    pub fn output_lines(&self) -> String {
        format!(
            "BUILD_ARGS={}\nHOST_VERSION={}\n",
            self.args_line(),
            self.host_version.as_deref().unwrap_or("unknown")
        )
    }

    /// Append the step-output lines to `path`, creating it if needed.
    pub fn append_to(&self, path: &Path) -> Result<(), ForgeError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ForgeError::io(path, e))?;
        file.write_all(self.output_lines().as_bytes())
            .map_err(|e| ForgeError::io(path, e))?;
        debug!(path = %path.display(), args = self.args.len(), "build plan appended");
        Ok(())
    }
}

fn with_arg(package: &LockedPackage) -> String {
    match &package.source {
        Some(source) if source.is_local_path() => {
            format!("--with {}={}", package.name, source)
        }
        Some(source) => format!("--with {}={}@{}", package.name, source, package.version),
        None => format!("--with {}@{}", package.name, package.version),
    }
}

/// Where step outputs go: the configured file, else `GITHUB_OUTPUT` when set.
pub fn output_target(configured: Option<&str>) -> Option<PathBuf> {
    configured
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CI_OUTPUT_ENV).map(PathBuf::from))
}
