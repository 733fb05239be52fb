// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the lock -> bootstrap -> report pipeline.
//!
//! Each test builds an isolated TestWorkspace with its own config, package
//! index, and lockfile. Tests are independent and order-insensitive.

use std::time::Duration;

use modforge_core::ForgeError;
use modforge_plugin::Catalog;
use modforge_report::{BuildPlan, ModuleManifest, Report, TimeFormatter, load_previous};
use modforge_resolve::{LockMode, LockOutcome};
use modforge_test_utils::{HOST_ID, TestWorkspace};

const L4: &str = "github.com/mholt/caddy-l4";
const CLOUDFLARE: &str = "github.com/WeidiDeng/caddy-cloudflare-ip";
const FORWARDPROXY: &str = "github.com/caddyserver/forwardproxy";
const NAIVE_FORK: &str = "github.com/klzgrad/forwardproxy";

fn host_capabilities() -> usize {
    Catalog::builtin()
        .get(HOST_ID)
        .unwrap()
        .capabilities()
        .unwrap()
        .len()
}

// ---- Scenario: two plugins ----

#[test]
fn two_plugins_lock_and_register_exactly_their_capabilities() {
    let ws = TestWorkspace::builder()
        .with_plugin(L4)
        .with_plugin(CLOUDFLARE)
        .build()
        .unwrap();

    let outcome = ws.lock(LockMode::Auto).unwrap();
    assert!(matches!(outcome, LockOutcome::Resolved(_)));
    let lockfile = outcome.into_lockfile();

    // Single version per identifier, closure included.
    let names: Vec<&str> = lockfile.packages.iter().map(|p| p.name.as_str()).collect();
    let mut deduped = names.clone();
    deduped.dedup();
    assert_eq!(names, deduped);
    assert!(names.contains(&"golang.org/x/net"));
    assert!(names.contains(&"github.com/klauspost/compress"));
    // caddy-l4 needs x/net >= 0.26.
    assert_eq!(lockfile.get(&"golang.org/x/net".into()).unwrap().version, "v0.26.0");

    let (registry, report) = ws.bootstrap(&Catalog::builtin()).unwrap();
    assert_eq!(report.plugins.len(), 2);
    assert_eq!(registry.len(), host_capabilities() + report.plugin_capability_count());
    assert_eq!(registry.get("layer4").unwrap().owner, L4);
    assert_eq!(registry.get("http.ip_sources.cloudflare").unwrap().owner, CLOUDFLARE);
    assert_eq!(registry.get("http").unwrap().owner, HOST_ID);
}

// ---- Scenario: redirect ----

#[test]
fn redirect_locks_target_and_registers_under_original_identifier() {
    let ws = TestWorkspace::builder()
        .with_plugin(FORWARDPROXY)
        .with_redirect(FORWARDPROXY, NAIVE_FORK, "rev:1e1d1e2")
        .build()
        .unwrap();

    let lockfile = ws.lock(LockMode::Auto).unwrap().into_lockfile();
    let entry = lockfile.get(&FORWARDPROXY.into()).unwrap();
    assert_eq!(entry.source.as_ref().unwrap().as_str(), NAIVE_FORK);
    assert_eq!(entry.version, "v0.0.0-20240911154043-1e1d1e2e5d06");
    assert!(lockfile.get(&NAIVE_FORK.into()).is_none());

    let (registry, report) = ws.bootstrap(&Catalog::builtin()).unwrap();
    assert_eq!(report.plugins[0].source, NAIVE_FORK);
    assert_eq!(
        registry.get("http.handlers.forward_proxy").unwrap().owner,
        FORWARDPROXY
    );

    let plan = BuildPlan::from_lockfile(&lockfile);
    assert_eq!(
        plan.args,
        vec![format!(
            "--with {FORWARDPROXY}={NAIVE_FORK}@v0.0.0-20240911154043-1e1d1e2e5d06"
        )]
    );
}

// ---- Scenario: duplicate selection ----

#[test]
fn duplicate_selection_fails_fast() {
    let ws = TestWorkspace::builder()
        .with_plugin(L4)
        .with_plugin(L4)
        .build()
        .unwrap();

    let err = ws.lock(LockMode::Auto).unwrap_err();
    assert!(matches!(err, ForgeError::Config(msg) if msg.contains(L4)));
    assert!(!ws.lock_path.exists());
}

// ---- Determinism and removal ----

#[test]
fn relocking_unchanged_inputs_is_byte_identical() {
    let ws = TestWorkspace::builder()
        .with_plugin(CLOUDFLARE)
        .with_plugin(L4)
        .build()
        .unwrap();

    ws.lock(LockMode::Force).unwrap();
    let first = std::fs::read(&ws.lock_path).unwrap();
    ws.lock(LockMode::Force).unwrap();
    assert_eq!(first, std::fs::read(&ws.lock_path).unwrap());

    assert!(matches!(ws.lock(LockMode::Auto).unwrap(), LockOutcome::Reused(_)));
}

#[test]
fn removing_a_plugin_drops_its_registration_only() {
    let ws = TestWorkspace::builder()
        .with_plugin(L4)
        .with_plugin(CLOUDFLARE)
        .build()
        .unwrap();
    ws.lock(LockMode::Auto).unwrap();
    let (before, _) = ws.bootstrap(&Catalog::builtin()).unwrap();

    ws.write_config(&[(CLOUDFLARE.to_string(), "*".to_string())], &[])
        .unwrap();
    // The stale lockfile is refused until re-locked.
    assert!(ws.lock(LockMode::Locked).is_err());
    ws.lock(LockMode::Auto).unwrap();
    let (after, _) = ws.bootstrap(&Catalog::builtin()).unwrap();

    assert!(before.contains("layer4"));
    assert!(!after.contains("layer4"));
    assert!(after.owned_by(L4).is_empty());
    assert_eq!(before.owned_by(CLOUDFLARE), after.owned_by(CLOUDFLARE));
    assert_eq!(before.owned_by(HOST_ID), after.owned_by(HOST_ID));
}

#[test]
fn bootstrap_requires_a_lockfile() {
    let ws = TestWorkspace::builder().with_plugin(L4).build().unwrap();
    let err = ws.bootstrap(&Catalog::builtin()).unwrap_err();
    assert!(matches!(err, ForgeError::Lockfile(_)));
}

#[test]
fn plugin_missing_from_index_is_unresolvable() {
    let ws = TestWorkspace::builder()
        .with_plugin("github.com/nobody/not-published")
        .build()
        .unwrap();
    let err = ws.lock(LockMode::Auto).unwrap_err();
    assert!(matches!(err, ForgeError::Unresolvable { .. }));
}

#[test]
fn plugin_not_compiled_in_fails_bootstrap() {
    let index = format!(
        "{}\n[[package]]\nname = \"github.com/someone/uncatalogued\"\nversion = \"v1.0.0\"\n",
        modforge_test_utils::CATALOG_INDEX
    );
    let ws = TestWorkspace::builder()
        .with_index(&index)
        .with_plugin("github.com/someone/uncatalogued")
        .build()
        .unwrap();
    ws.lock(LockMode::Auto).unwrap();
    let err = ws.bootstrap(&Catalog::builtin()).unwrap_err();
    assert!(matches!(err, ForgeError::UnknownPlugin { .. }));
}

// ---- Report ----

#[tokio::test]
async fn report_diffs_against_previous_release() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let ws = TestWorkspace::builder()
        .with_plugin(L4)
        .with_plugin(CLOUDFLARE)
        .build()
        .unwrap();
    let lockfile = ws.lock(LockMode::Auto).unwrap().into_lockfile();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(previous_manifest_body()))
        .mount(&server)
        .await;
    let previous = load_previous(
        Some(&format!("{}/manifest.json", server.uri())),
        Duration::from_secs(5),
    )
    .await;

    let report = Report::build(&lockfile, &previous, &TimeFormatter::new(8).unwrap());
    assert!(report.notes.contains("- **caddy-l4**: `Commit: 0000000` -> `Commit: afa78d7`"));
    assert!(!report.notes.contains("**caddy-cloudflare-ip**: `"));

    let manifest_path = ws.path().join("manifest.json");
    let notes_path = ws.path().join("release_notes.md");
    report.write(&manifest_path, &notes_path).unwrap();

    let written =
        ModuleManifest::from_json(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(written, report.manifest);
    assert!(written.get(HOST_ID).is_none());
}

fn previous_manifest_body() -> String {
    format!(
        r#"{{
  "{L4}": {{
    "OriginalPath": "{L4}",
    "Version": "v0.0.0-20240101000000-000000000000",
    "Time": "2024-01-01T00:00:00Z",
    "IsReplaced": false,
    "ReplacePath": null
  }},
  "{CLOUDFLARE}": {{
    "OriginalPath": "{CLOUDFLARE}",
    "Version": "v0.0.0-20231130002422-f53b62aa13cb",
    "Time": "2023-11-30T00:24:22Z",
    "IsReplaced": false,
    "ReplacePath": null
  }}
}}"#
    )
}
