// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown release notes.

use crate::display::{TimeFormatter, is_available, version_display};
use crate::modules::ModuleManifest;

/// Render the release notes for `current`, diffed against `previous`.
///
/// A plugin is listed as changed when its version differs from the previous
/// release (new plugins show `N/A` as the old version), or when only its
/// publish date moved and the previous date is known.
pub fn render_release_notes(
    current: &ModuleManifest,
    previous: &ModuleManifest,
    times: &TimeFormatter,
) -> String {
    let mut lines = vec!["### 📦 Plugin Changes\n".to_string()];

    let mut changed = false;
    for (name, info) in current.iter() {
        let short = short_name(name);
        let prev = previous.get(name);
        let prev_version = prev.map(|p| p.version.as_str()).unwrap_or("N/A");

        if info.version != prev_version {
            lines.push(format!(
                "- **{short}**: `{}` -> `{}`",
                version_display(prev_version),
                version_display(&info.version)
            ));
            changed = true;
            continue;
        }

        let curr_date = times.local_date(Some(&info.time));
        let prev_date = times.local_date(prev.map(|p| p.time.as_str()));
        if curr_date != prev_date && is_available(&prev_date) {
            lines.push(format!("- **{short}**: Update from {prev_date} to {curr_date}"));
            changed = true;
        }
    }
    if !changed {
        lines.push("- No plugin updates detected in this build.".to_string());
    }

    lines.push("\n### 🔌 Installed Plugins Status\n".to_string());
    lines.push(format!("| Plugin | Version | Last Commit ({}) |", times.label()));
    lines.push("| :--- | :--- | :--- |".to_string());
    for (name, info) in current.iter() {
        lines.push(format!(
            "| [{}](https://{name}) | `{}` | {} |",
            short_name(name),
            version_display(&info.version),
            times.local_time(Some(&info.time)),
        ));
    }

    lines.join("\n")
}

fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
