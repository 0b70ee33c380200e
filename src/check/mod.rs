// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Conformance checks for status conditions.
//!
//! Controllers and their tests can validate that an object's status follows the
//! condition contract:
//!
//! - `Ready` is always present
//! - `Ready` is False while `Reconciling` or `Stalled` is True
//! - `Reconciling` and `Stalled` are never present together
//! - a ready object carries no True negative polarity condition
//! - observed generations are consistent with the object generation
//!
//! Checks are split into fail checks (`FAILxxxx`, contract violations) and warn
//! checks (`WARNxxxx`, valid but suspicious states).
//!
//! # Example
//!
//! ```rust,ignore
//! use reconcile_status::check::{CheckConditions, Checker};
//!
//! let context = CheckConditions::from_yaml("negativePolarity: [Stalled, Reconciling]")?;
//! Checker::new(context).check_err(&obj)?;
//! ```

pub mod checker;
pub mod conditions;
mod fail;
mod warn;

pub use checker::{Check, CheckReport, Checker};
pub use conditions::{highest_negative_priority_condition, CheckConditions};
