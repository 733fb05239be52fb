// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic dependency resolution.
//!
//! Resolution iterates to a fixpoint. Each round collects every requirement
//! reachable from the manifest roots through the current selection, then
//! picks, per identifier, the highest release satisfying all of them.
//! Redirected identifiers ignore their requesters' constraints and take the
//! redirect's pin against the redirect target's releases.
//!
//! A converged selection is rejected when a redirect target is also required
//! under its own identifier, or when two releases advertise one capability.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use modforge_core::{Constraint, ForgeError, ModuleId, Redirect, SelectionManifest};
use tracing::{debug, info};

use crate::index::{PackageIndex, Release};

/// Upper bound on resolution rounds before reporting non-convergence.
pub const MAX_ROUNDS: usize = 64;

const MANIFEST_REQUESTER: &str = "selection manifest";

/// One entry of the resolved dependency set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Identifier as requested (the redirect's `from` when redirected).
    pub id: ModuleId,
    /// Redirect target that supplies the code, if any.
    pub source: Option<ModuleId>,
    pub release: Release,
    /// Named in the selection manifest rather than pulled in transitively.
    pub direct: bool,
    /// The host program rather than a plugin.
    pub host: bool,
}

impl ResolvedPackage {
    /// Identifier whose code is compiled in.
    pub fn effective_id(&self) -> &ModuleId {
        self.source.as_ref().unwrap_or(&self.id)
    }

    /// Dependency identifiers, sorted.
    pub fn dependencies(&self) -> Vec<ModuleId> {
        self.release.dependencies.keys().cloned().collect()
    }
}

/// Resolved dependency set: exactly one release per identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    packages: BTreeMap<ModuleId, ResolvedPackage>,
}

impl Resolution {
    pub fn get(&self, id: &ModuleId) -> Option<&ResolvedPackage> {
        self.packages.get(id)
    }

    /// Packages sorted by identifier.
    pub fn packages(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.packages.values()
    }

    pub fn host(&self) -> Option<&ResolvedPackage> {
        self.packages.values().find(|p| p.host)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

type Requirements = BTreeMap<ModuleId, Vec<(String, Constraint)>>;

/// Resolves a selection manifest against a package index.
pub struct Resolver<'a, I: PackageIndex + ?Sized> {
    index: &'a I,
    max_rounds: usize,
}

impl<'a, I: PackageIndex + ?Sized> Resolver<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self {
            index,
            max_rounds: MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Compute the transitive closure of the manifest.
    pub fn resolve(&self, manifest: &SelectionManifest) -> Result<Resolution, ForgeError> {
        let mut selection: BTreeMap<ModuleId, Release> = BTreeMap::new();
        let mut requirements = Requirements::new();

        for round in 1..=self.max_rounds {
            requirements = collect_requirements(manifest, &selection);

            let mut next = BTreeMap::new();
            for (id, reqs) in &requirements {
                let release = self.select(manifest, id, reqs)?;
                next.insert(id.clone(), release);
            }

            if next == selection {
                check_redirect_targets(manifest, &requirements)?;
                check_capabilities(&selection)?;
                info!(rounds = round, packages = next.len(), "dependency resolution converged");
                return Ok(build_resolution(manifest, selection));
            }
            debug!(round, packages = next.len(), "resolution round");
            selection = next;
        }

        // Report the first identifier whose requirements did not settle.
        let (id, reqs) = requirements
            .iter()
            .find(|(_, reqs)| reqs.len() > 1)
            .or_else(|| requirements.iter().next())
            .ok_or_else(|| ForgeError::Internal("resolution did not converge".to_string()))?;
        Err(ForgeError::VersionConflict {
            id: id.to_string(),
            requirements: render(reqs),
        })
    }

    fn select(
        &self,
        manifest: &SelectionManifest,
        id: &ModuleId,
        reqs: &[(String, Constraint)],
    ) -> Result<Release, ForgeError> {
        match manifest.redirect_for(id) {
            Some(redirect) => self.select_redirected(id, redirect),
            None => self.select_plain(id, reqs),
        }
    }

    fn select_plain(
        &self,
        id: &ModuleId,
        reqs: &[(String, Constraint)],
    ) -> Result<Release, ForgeError> {
        let releases = self.index.releases(id)?;
        if releases.is_empty() {
            return Err(ForgeError::Unresolvable {
                id: id.to_string(),
                constraint: join_constraints(reqs),
                reason: "not found in package index".to_string(),
            });
        }

        let best = releases
            .into_iter()
            .filter(|r| reqs.iter().all(|(_, c)| r.satisfies(c)))
            .max_by(|a, b| a.version.cmp(&b.version));

        match best {
            Some(release) => Ok(release),
            None if reqs.len() == 1 => Err(ForgeError::Unresolvable {
                id: id.to_string(),
                constraint: reqs[0].1.to_string(),
                reason: "no release satisfies the constraint".to_string(),
            }),
            None => Err(ForgeError::VersionConflict {
                id: id.to_string(),
                requirements: render(reqs),
            }),
        }
    }

    fn select_redirected(&self, id: &ModuleId, redirect: &Redirect) -> Result<Release, ForgeError> {
        // A local directory stands in for the original module's own releases.
        let source = if redirect.to.is_local_path() {
            id
        } else {
            &redirect.to
        };
        let releases = self.index.releases(source)?;
        if releases.is_empty() {
            return Err(ForgeError::Unresolvable {
                id: source.to_string(),
                constraint: redirect.version.to_string(),
                reason: format!("redirect target for `{id}` not found in package index"),
            });
        }

        releases
            .into_iter()
            .filter(|r| r.satisfies(&redirect.version))
            .max_by(|a, b| a.version.cmp(&b.version))
            .ok_or_else(|| ForgeError::Unresolvable {
                id: source.to_string(),
                constraint: redirect.version.to_string(),
                reason: format!("no release of redirect target for `{id}` matches the pin"),
            })
    }
}

/// Resolve with the default round limit.
pub fn resolve<I: PackageIndex + ?Sized>(
    manifest: &SelectionManifest,
    index: &I,
) -> Result<Resolution, ForgeError> {
    Resolver::new(index).resolve(manifest)
}

/// Breadth-first walk from the manifest roots through the current selection.
fn collect_requirements(
    manifest: &SelectionManifest,
    selection: &BTreeMap<ModuleId, Release>,
) -> Requirements {
    let mut requirements = Requirements::new();
    let mut queue = VecDeque::new();
    let mut visited = BTreeSet::new();

    for root in manifest.roots() {
        requirements
            .entry(root.id.clone())
            .or_default()
            .push((MANIFEST_REQUESTER.to_string(), root.constraint.clone()));
        if visited.insert(root.id.clone()) {
            queue.push_back(root.id.clone());
        }
    }

    while let Some(id) = queue.pop_front() {
        let Some(release) = selection.get(&id) else {
            continue;
        };
        for (dep, constraint) in &release.dependencies {
            requirements
                .entry(dep.clone())
                .or_default()
                .push((id.to_string(), constraint.clone()));
            if visited.insert(dep.clone()) {
                queue.push_back(dep.clone());
            }
        }
    }
    requirements
}

/// A redirect target that is also required under its own identifier would
/// link the same module at two versions.
fn check_redirect_targets(
    manifest: &SelectionManifest,
    requirements: &Requirements,
) -> Result<(), ForgeError> {
    for redirect in manifest.redirects() {
        if redirect.to.is_local_path() || !requirements.contains_key(&redirect.from) {
            continue;
        }
        if let Some(direct) = requirements.get(&redirect.to) {
            let mut all = vec![(
                format!("redirect of {}", redirect.from),
                redirect.version.to_string(),
            )];
            all.extend(render(direct));
            return Err(ForgeError::VersionConflict {
                id: redirect.to.to_string(),
                requirements: all,
            });
        }
    }
    Ok(())
}

/// Two selected releases advertising the same capability would collide at
/// bootstrap; report it before anything is locked.
fn check_capabilities(selection: &BTreeMap<ModuleId, Release>) -> Result<(), ForgeError> {
    let mut owners: BTreeMap<&str, &ModuleId> = BTreeMap::new();
    for (id, release) in selection {
        for capability in &release.capabilities {
            if let Some(first) = owners.insert(capability.as_str(), id) {
                return Err(ForgeError::DuplicateCapability {
                    capability: capability.clone(),
                    first: first.to_string(),
                    second: id.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn build_resolution(
    manifest: &SelectionManifest,
    selection: BTreeMap<ModuleId, Release>,
) -> Resolution {
    let host = &manifest.host().id;
    let packages = selection
        .into_iter()
        .map(|(id, release)| {
            let source = manifest.redirect_for(&id).map(|r| r.to.clone());
            let is_host = &id == host;
            let direct = is_host || manifest.contains(&id);
            let package = ResolvedPackage {
                id: id.clone(),
                source,
                release,
                direct,
                host: is_host,
            };
            (id, package)
        })
        .collect();
    Resolution { packages }
}

fn render(reqs: &[(String, Constraint)]) -> Vec<(String, String)> {
    reqs.iter()
        .map(|(requester, c)| (requester.clone(), c.to_string()))
        .collect()
}

fn join_constraints(reqs: &[(String, Constraint)]) -> String {
    reqs.iter()
        .map(|(_, c)| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use modforge_core::{PluginRef, parse_version};

    const HOST: &str = "github.com/caddyserver/caddy/v2";

    fn c(s: &str) -> Constraint {
        s.parse().unwrap()
    }

    fn rel(id: &str, version: &str) -> Release {
        Release::new(id, parse_version(version).unwrap())
    }

    fn manifest(plugins: &[(&str, &str)], redirects: Vec<Redirect>) -> SelectionManifest {
        SelectionManifest::new(
            PluginRef::new(HOST, Constraint::Any),
            plugins.iter().map(|(id, v)| PluginRef::new(*id, c(v))).collect(),
            redirects,
        )
        .unwrap()
    }

    fn base_index() -> MemoryIndex {
        MemoryIndex::new()
            .with(rel(HOST, "v2.7.6"))
            .with(rel(HOST, "v2.8.4"))
    }

    #[test]
    fn picks_highest_release_for_any() {
        let resolution = resolve(&manifest(&[], vec![]), &base_index()).unwrap();
        let host = resolution.host().unwrap();
        assert_eq!(host.release.version, parse_version("v2.8.4").unwrap());
        assert!(host.direct);
    }

    #[test]
    fn transitive_dependencies_are_included_once() {
        let index = base_index()
            .with(rel("github.com/t/a", "v1.0.0").with_dependency("github.com/t/c", c("^1")))
            .with(rel("github.com/t/b", "v1.0.0").with_dependency("github.com/t/c", c(">=1.1")))
            .with(rel("github.com/t/c", "v1.0.0"))
            .with(rel("github.com/t/c", "v1.1.0"))
            .with(rel("github.com/t/c", "v2.0.0"));

        let resolution = resolve(
            &manifest(&[("github.com/t/a", "*"), ("github.com/t/b", "*")], vec![]),
            &index,
        )
        .unwrap();
        assert_eq!(resolution.len(), 4);
        let dep = resolution.get(&"github.com/t/c".into()).unwrap();
        assert_eq!(dep.release.version, parse_version("v1.1.0").unwrap());
        assert!(!dep.direct);
    }

    #[test]
    fn dependency_upgrade_pulls_in_new_edges() {
        let index = base_index()
            .with(rel("github.com/t/a", "v1.0.0"))
            .with(rel("github.com/t/a", "v1.1.0").with_dependency("github.com/t/d", c("*")))
            .with(rel("github.com/t/d", "v0.3.0").with_dependency("github.com/t/e", c("^0.1")))
            .with(rel("github.com/t/e", "v0.1.9"));

        let resolution = resolve(&manifest(&[("github.com/t/a", "*")], vec![]), &index).unwrap();
        assert!(resolution.get(&"github.com/t/e".into()).is_some());
    }

    #[test]
    fn unknown_identifier_is_unresolvable() {
        let err = resolve(&manifest(&[("github.com/t/missing", "*")], vec![]), &base_index())
            .unwrap_err();
        assert!(matches!(err, ForgeError::Unresolvable { id, .. } if id == "github.com/t/missing"));
    }

    #[test]
    fn unsatisfiable_pin_is_unresolvable() {
        let index = base_index().with(rel("github.com/t/a", "v1.0.0"));
        let err = resolve(&manifest(&[("github.com/t/a", "v1.2.0")], vec![]), &index).unwrap_err();
        assert!(matches!(err, ForgeError::Unresolvable { constraint, .. } if constraint == "v1.2.0"));
    }

    #[test]
    fn incompatible_requirements_name_every_requester() {
        let index = base_index()
            .with(rel("github.com/t/a", "v1.0.0").with_dependency("github.com/t/c", c("^1")))
            .with(rel("github.com/t/b", "v1.0.0").with_dependency("github.com/t/c", c("^2")))
            .with(rel("github.com/t/c", "v1.4.0"))
            .with(rel("github.com/t/c", "v2.1.0"));

        let err = resolve(
            &manifest(&[("github.com/t/a", "*"), ("github.com/t/b", "*")], vec![]),
            &index,
        )
        .unwrap_err();
        match err {
            ForgeError::VersionConflict { id, requirements } => {
                assert_eq!(id, "github.com/t/c");
                let requesters: Vec<&str> = requirements.iter().map(|(r, _)| r.as_str()).collect();
                assert_eq!(requesters, vec!["github.com/t/a", "github.com/t/b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn redirect_overrides_every_requester() {
        let index = base_index()
            .with(rel("github.com/up/proxy", "v1.0.0"))
            .with(rel("github.com/t/b", "v1.0.0").with_dependency("github.com/up/proxy", c("^1")))
            .with(
                rel("github.com/fork/proxy", "v0.0.0-20240124150220-abcdef012345")
                    .with_capability("http.handlers.forward_proxy"),
            );
        let redirect = Redirect {
            from: "github.com/up/proxy".into(),
            to: "github.com/fork/proxy".into(),
            version: c("rev:abcdef0"),
        };

        let resolution = resolve(
            &manifest(&[("github.com/up/proxy", "*"), ("github.com/t/b", "*")], vec![redirect]),
            &index,
        )
        .unwrap();
        let proxy = resolution.get(&"github.com/up/proxy".into()).unwrap();
        assert_eq!(proxy.source.as_ref().unwrap().as_str(), "github.com/fork/proxy");
        assert_eq!(proxy.effective_id().as_str(), "github.com/fork/proxy");
        assert_eq!(proxy.release.id.as_str(), "github.com/fork/proxy");
        assert!(resolution.get(&"github.com/fork/proxy".into()).is_none());
    }

    #[test]
    fn redirect_target_required_under_its_own_identifier_conflicts() {
        let index = base_index()
            .with(rel("github.com/up/a", "v1.0.0"))
            .with(rel("github.com/fork/a", "v0.5.0"))
            .with(rel("github.com/fork/a", "v1.2.0"))
            .with(rel("github.com/t/b", "v1.0.0").with_dependency("github.com/fork/a", c("^1")));
        let redirect = Redirect {
            from: "github.com/up/a".into(),
            to: "github.com/fork/a".into(),
            version: c("v0.5.0"),
        };

        let err = resolve(
            &manifest(&[("github.com/up/a", "*"), ("github.com/t/b", "*")], vec![redirect]),
            &index,
        )
        .unwrap_err();
        match err {
            ForgeError::VersionConflict { id, requirements } => {
                assert_eq!(id, "github.com/fork/a");
                assert_eq!(
                    requirements,
                    vec![
                        ("redirect of github.com/up/a".to_string(), "v0.5.0".to_string()),
                        ("github.com/t/b".to_string(), "^1".to_string()),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unused_redirect_does_not_conflict_with_its_target() {
        let index = base_index()
            .with(rel("github.com/fork/a", "v1.2.0"))
            .with(rel("github.com/t/b", "v1.0.0").with_dependency("github.com/fork/a", c("^1")));
        let redirect = Redirect {
            from: "github.com/up/a".into(),
            to: "github.com/fork/a".into(),
            version: c("v0.5.0"),
        };

        let resolution =
            resolve(&manifest(&[("github.com/t/b", "*")], vec![redirect]), &index).unwrap();
        let fork = resolution.get(&"github.com/fork/a".into()).unwrap();
        assert_eq!(fork.release.version, parse_version("v1.2.0").unwrap());
        assert!(resolution.get(&"github.com/up/a".into()).is_none());
    }

    #[test]
    fn advertised_capability_clash_is_reported() {
        let index = base_index()
            .with(rel("github.com/t/a", "v1.0.0").with_capability("http.handlers.forward_proxy"))
            .with(rel("github.com/t/b", "v1.0.0").with_capability("http.handlers.forward_proxy"));

        let err = resolve(
            &manifest(&[("github.com/t/b", "*"), ("github.com/t/a", "*")], vec![]),
            &index,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ForgeError::DuplicateCapability { capability, first, second }
                if capability == "http.handlers.forward_proxy"
                    && first == "github.com/t/a"
                    && second == "github.com/t/b"
        ));
    }

    #[test]
    fn local_path_redirect_uses_original_releases() {
        let index = base_index().with(rel("github.com/t/a", "v1.3.0"));
        let redirect = Redirect {
            from: "github.com/t/a".into(),
            to: "./forks/a".into(),
            version: Constraint::Any,
        };
        let resolution =
            resolve(&manifest(&[("github.com/t/a", "*")], vec![redirect]), &index).unwrap();
        let a = resolution.get(&"github.com/t/a".into()).unwrap();
        assert_eq!(a.source.as_ref().unwrap().as_str(), "./forks/a");
        assert_eq!(a.release.version, parse_version("v1.3.0").unwrap());
    }

    #[test]
    fn redirect_with_missing_target_is_unresolvable() {
        let index = base_index().with(rel("github.com/t/a", "v1.0.0"));
        let redirect = Redirect {
            from: "github.com/t/a".into(),
            to: "github.com/fork/a".into(),
            version: Constraint::Any,
        };
        let err = resolve(&manifest(&[("github.com/t/a", "*")], vec![redirect]), &index)
            .unwrap_err();
        assert!(matches!(err, ForgeError::Unresolvable { id, .. } if id == "github.com/fork/a"));
    }

    #[test]
    fn non_convergence_is_reported_as_conflict() {
        let index = base_index()
            .with(rel("github.com/t/a", "v1.0.0").with_dependency("github.com/t/b", c("*")))
            .with(rel("github.com/t/b", "v1.0.0"));
        let err = Resolver::new(&index)
            .with_max_rounds(1)
            .resolve(&manifest(&[("github.com/t/a", "*")], vec![]))
            .unwrap_err();
        assert!(matches!(err, ForgeError::VersionConflict { .. }));
    }
}
