// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers, version constraints, and capability kinds.

use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ForgeError;

/// Import identifier of a module, e.g. `github.com/mholt/caddy-l4`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used for display (`caddy-l4`).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// True when the identifier points at a local directory rather than a
    /// fetchable source (`./fork`, `../fork`, `/abs/fork`).
    pub fn is_local_path(&self) -> bool {
        self.0.starts_with('.') || self.0.starts_with('/')
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of capability a plugin registers with the module registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum CapabilityKind {
    App,
    HttpHandler,
    HttpMatcher,
    IpSource,
    TlsIssuer,
    Listener,
    Layer4Handler,
    Layer4Matcher,
    Storage,
}

/// Parse a version string, accepting an optional leading `v`.
///
/// Go-style pseudo-versions such as `v0.0.0-20231130002422-f53b62aa13cb`
/// are valid semantic versions with a pre-release component.
pub fn parse_version(s: &str) -> Result<Version, ForgeError> {
    let trimmed = s.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).map_err(|e| ForgeError::Config(format!("invalid version `{s}`: {e}")))
}

/// Render a version in the `v`-prefixed form builders expect.
pub fn format_version(version: &Version) -> String {
    format!("v{version}")
}

/// Version constraint attached to a plugin reference or dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Any release; the highest available is chosen.
    Any,
    /// Semantic-version requirement (`^0.3`, `>=2.7, <3`).
    Req(VersionReq),
    /// Exact version pin (`v2.8.4`, or a pseudo-version).
    Exact(Version),
    /// Source revision pin (`rev:f53b62a`); matches by prefix.
    Revision(String),
}

impl Constraint {
    /// True when a release with the given version and revision satisfies this constraint.
    pub fn matches(&self, version: &Version, revision: Option<&str>) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Req(req) => req.matches(version),
            Constraint::Exact(exact) => exact == version,
            Constraint::Revision(pin) => {
                let by_revision = revision.is_some_and(|rev| rev.starts_with(pin.as_str()));
                let by_pseudo =
                    pseudo_version_hash(version).is_some_and(|hash| hash.starts_with(pin.as_str()));
                by_revision || by_pseudo
            }
        }
    }

    /// True for pins that select a single release.
    pub fn is_pin(&self) -> bool {
        matches!(self, Constraint::Exact(_) | Constraint::Revision(_))
    }
}

impl FromStr for Constraint {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(Constraint::Any);
        }
        if let Some(rev) = s.strip_prefix("rev:") {
            let rev = rev.trim();
            if rev.is_empty() || !rev.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ForgeError::Config(format!(
                    "invalid revision pin `{s}`: expected hexadecimal commit hash"
                )));
            }
            return Ok(Constraint::Revision(rev.to_ascii_lowercase()));
        }
        if s.starts_with('v') && s[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return parse_version(s).map(Constraint::Exact);
        }
        VersionReq::parse(s)
            .map(Constraint::Req)
            .map_err(|e| ForgeError::Config(format!("invalid version constraint `{s}`: {e}")))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => f.write_str("*"),
            Constraint::Req(req) => write!(f, "{req}"),
            Constraint::Exact(version) => write!(f, "v{version}"),
            Constraint::Revision(rev) => write!(f, "rev:{rev}"),
        }
    }
}

impl Serialize for Constraint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Commit hash of a Go-style pseudo-version, or `None` for ordinary releases
/// and pre-release tags.
///
/// Accepts the three pseudo-version shapes: `v0.0.0-TIMESTAMP-HASH`,
/// `vX.Y.Z-pre.0.TIMESTAMP-HASH` and `vX.Y.Z-0.TIMESTAMP-HASH`, where the
/// timestamp is 14 digits and the hash 12 lowercase hex characters.
pub fn pseudo_version_hash(version: &Version) -> Option<&str> {
    let (head, hash) = version.pre.as_str().rsplit_once('-')?;
    let timestamp = head.rsplit('.').next()?;
    let is_timestamp = timestamp.len() == 14 && timestamp.bytes().all(|b| b.is_ascii_digit());
    let is_hash = hash.len() == 12 && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    (is_timestamp && is_hash).then_some(hash)
}
