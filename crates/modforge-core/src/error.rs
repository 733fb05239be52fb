// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Modforge build assembler.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across resolution, locking, bootstrap, and reporting.
///
/// Every variant is a hard stop: nothing in Modforge retries.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Configuration errors (invalid TOML, bad constraint syntax, invalid redirects).
    #[error("configuration error: {0}")]
    Config(String),

    /// The same plugin identifier appears more than once in the selection manifest.
    #[error("duplicate plugin identifier `{id}` in selection manifest")]
    DuplicateIdentifier { id: String },

    /// An identifier could not be located in the package index at the requested version.
    #[error("cannot resolve `{id}` at `{constraint}`: {reason}")]
    Unresolvable {
        id: String,
        constraint: String,
        reason: String,
    },

    /// Two or more requesters require incompatible versions of the same package.
    #[error("version conflict for `{id}`: {}", format_requirements(requirements))]
    VersionConflict {
        id: String,
        /// `(requester, constraint)` pairs that could not be satisfied together.
        requirements: Vec<(String, String)>,
    },

    /// Two plugins attempted to register the same capability name.
    #[error("capability `{capability}` registered by both `{first}` and `{second}`")]
    DuplicateCapability {
        capability: String,
        first: String,
        second: String,
    },

    /// A plugin's registration fired a second time.
    #[error("plugin `{0}` is already registered")]
    AlreadyRegistered(String),

    /// A selected plugin has no initializer compiled into this build.
    #[error("plugin `{id}` is not compiled into this build")]
    UnknownPlugin { id: String },

    /// A capability name was looked up but never registered.
    #[error("capability `{0}` is not registered")]
    CapabilityNotFound(String),

    /// Lockfile parse, staleness, or write errors.
    #[error("lockfile error: {0}")]
    Lockfile(String),

    /// Package index parse or lookup errors.
    #[error("package index error: {0}")]
    Index(String),

    /// Filesystem errors with the offending path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// HTTP errors while fetching remote build metadata.
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ForgeError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ForgeError::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_requirements(requirements: &[(String, String)]) -> String {
    requirements
        .iter()
        .map(|(requester, constraint)| format!("{requester} requires {constraint}"))
        .collect::<Vec<_>>()
        .join("; ")
}
