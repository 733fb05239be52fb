// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dependency resolution for Modforge builds.
//!
//! Takes a [`SelectionManifest`](modforge_core::SelectionManifest), resolves
//! its transitive closure against a [`PackageIndex`], and records the result
//! in a deterministic [`Lockfile`].

pub mod index;
pub mod lockfile;
pub mod resolver;

pub use index::{FileIndex, MemoryIndex, PackageIndex, Release};
pub use lockfile::{
    LOCKFILE_VERSION, LockMode, LockOutcome, LockedPackage, Lockfile, lock, manifest_digest,
};
pub use resolver::{MAX_ROUNDS, Resolution, ResolvedPackage, Resolver, resolve};
