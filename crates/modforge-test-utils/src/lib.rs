// SPDX-FileCopyrightText: 2026 Modforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Modforge integration tests.
//!
//! # Components
//!
//! - [`fixtures`] - A package index covering the built-in plugin catalog
//! - [`TestWorkspace`] - Temp directory with config, index, and lockfile paths

pub mod fixtures;
pub mod workspace;

pub use fixtures::{CATALOG_INDEX, HOST_ID};
pub use workspace::{TestWorkspace, TestWorkspaceBuilder};
