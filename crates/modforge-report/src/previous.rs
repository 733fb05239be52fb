// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading the previous release's module manifest.
//!
//! The previous manifest is best-effort: a missing file, an unreachable URL,
//! or a malformed body all degrade to an empty manifest, which the release
//! notes treat as a first release.

use std::path::Path;
use std::time::Duration;

use modforge_core::ForgeError;
use tracing::{debug, warn};

use crate::modules::ModuleManifest;

/// Fetch a module manifest over HTTP(S).
pub async fn fetch_previous(url: &str, timeout: Duration) -> Result<ModuleManifest, ForgeError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ForgeError::Http {
            message: format!("failed to create HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ForgeError::Http {
            message: format!("GET {url} failed: {e}"),
            source: Some(Box::new(e)),
        })?;

    let body = response.text().await.map_err(|e| ForgeError::Http {
        message: format!("failed to read body from {url}: {e}"),
        source: Some(Box::new(e)),
    })?;
    ModuleManifest::from_json(&body)
}

/// Read a module manifest from disk.
pub async fn read_previous(path: &Path) -> Result<ModuleManifest, ForgeError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ForgeError::io(path, e))?;
    ModuleManifest::from_json(&content)
}

/// Load the previous manifest from a file path or an `http(s)://` URL.
///
/// Never fails; any error is logged and yields an empty manifest.
pub async fn load_previous(source: Option<&str>, timeout: Duration) -> ModuleManifest {
    let Some(source) = source.filter(|s| !s.trim().is_empty()) else {
        debug!("no previous manifest configured");
        return ModuleManifest::new();
    };

    let result = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_previous(source, timeout).await
    } else {
        read_previous(Path::new(source)).await
    };

    match result {
        Ok(manifest) => {
            debug!(source, modules = manifest.len(), "previous manifest loaded");
            manifest
        }
        Err(e) => {
            warn!(source, error = %e, "previous manifest unavailable, treating as first release");
            ModuleManifest::new()
        }
    }
}
