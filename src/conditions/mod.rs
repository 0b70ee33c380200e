// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The status-condition algebra.
//!
//! - [`getter`] - safe reads over a condition list, including the derived
//!   `is_ready`, `is_stalled` and `is_reconciling` checks
//! - [`setter`] - writes that keep transition times and ordering consistent
//! - [`merge`] - summary, aggregation and mirroring of conditions
//! - [`patch`] - condition diffs applied to the latest stored revision

pub mod getter;
pub mod merge;
pub mod options;
pub mod patch;
pub mod setter;

pub use getter::{
    get, get_last_transition_time, get_message, get_observed_generation, get_reason, has,
    has_any, has_any_reason, is_false, is_ready, is_reconciling, is_stalled, is_true,
    is_unknown,
};
pub use merge::{aggregate, mirror, summary};
pub use options::{MergeOptions, MirrorFallback, MirrorOptions};
pub use patch::{ApplyOptions, EntryOutcome, Patch, PatchEntry, PatchOperation};
pub use setter::{
    delete, mark_false, mark_reconciling, mark_stalled, mark_true, mark_unknown, set,
    set_aggregate, set_mirror, set_summary,
};
