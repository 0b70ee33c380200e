// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Persisting reconcile results against a concurrently modified store.
//!
//! - [`helper`] - the [`PatchHelper`] and its condition conflict-resolution loop
//! - [`serial`] - the [`SerialPatcher`] for several patches in one run
//! - [`options`] - [`PatchOptions`]
//! - [`store`] - the [`ResourceStore`] abstraction and its Kubernetes implementation
//! - [`merge_patch`] - JSON merge patch diff and apply

pub mod helper;
pub mod merge_patch;
pub mod options;
pub mod serial;
pub mod store;

pub use helper::PatchHelper;
pub use options::PatchOptions;
pub use serial::SerialPatcher;
pub use store::{KubeStore, PatchSection, ResourceStore};
