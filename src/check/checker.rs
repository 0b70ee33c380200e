// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The conformance checker.

use super::conditions::CheckConditions;
use super::{fail, warn};
use crate::errors::{AggregateError, CheckError};
use crate::object::{ConditionReader, StatusObject};
use tracing::warn as log_warn;

/// A single conformance check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    Fail0001,
    Fail0002,
    Fail0003,
    Fail0004,
    Fail0005,
    Fail0006,
    Fail0007,
    Fail0008,
    Fail0009,
    Fail0010,
    Warn0001,
    Warn0002,
    Warn0003,
    Warn0004,
    Warn0005,
}

impl Check {
    /// Identifier of the check, e.g. `FAIL0001`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Fail0001 => "FAIL0001",
            Self::Fail0002 => "FAIL0002",
            Self::Fail0003 => "FAIL0003",
            Self::Fail0004 => "FAIL0004",
            Self::Fail0005 => "FAIL0005",
            Self::Fail0006 => "FAIL0006",
            Self::Fail0007 => "FAIL0007",
            Self::Fail0008 => "FAIL0008",
            Self::Fail0009 => "FAIL0009",
            Self::Fail0010 => "FAIL0010",
            Self::Warn0001 => "WARN0001",
            Self::Warn0002 => "WARN0002",
            Self::Warn0003 => "WARN0003",
            Self::Warn0004 => "WARN0004",
            Self::Warn0005 => "WARN0005",
        }
    }

    /// Returns `true` if the check reads the condition polarity context.
    #[must_use]
    pub fn needs_context(self) -> bool {
        matches!(self, Self::Fail0001 | Self::Warn0001 | Self::Warn0002)
    }

    fn run<K: StatusObject + ?Sized>(self, obj: &K, context: &CheckConditions) -> Option<String> {
        let message = match self {
            Self::Fail0001 => fail::fail_0001(obj, context),
            Self::Fail0002 => fail::fail_0002(obj, context),
            Self::Fail0003 => fail::fail_0003(obj, context),
            Self::Fail0004 => fail::fail_0004(obj, context),
            Self::Fail0005 => fail::fail_0005(obj, context),
            Self::Fail0006 => fail::fail_0006(obj, context),
            Self::Fail0007 => fail::fail_0007(obj, context),
            Self::Fail0008 => fail::fail_0008(obj, context),
            Self::Fail0009 => fail::fail_0009(obj, context),
            Self::Fail0010 => fail::fail_0010(obj, context),
            Self::Warn0001 => warn::warn_0001(obj, context),
            Self::Warn0002 => warn::warn_0002(obj, context),
            Self::Warn0003 => warn::warn_0003(obj, context),
            Self::Warn0004 => warn::warn_0004(obj, context),
            Self::Warn0005 => warn::warn_0005(obj, context),
        };
        message.map(|m| format!("{}: {m}", self.code()))
    }
}

/// Outcome of a conformance check run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub failures: Option<AggregateError>,
    pub warnings: Option<AggregateError>,
}

impl CheckReport {
    /// Returns `true` if no check failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_none()
    }
}

/// Validates a status against the condition contract.
#[derive(Clone, Debug)]
pub struct Checker {
    conditions: Option<CheckConditions>,
    require_conditions: bool,
    fail_checks: Vec<Check>,
    warn_checks: Vec<Check>,
}

impl Checker {
    /// A checker for objects at rest, running every check except FAIL0010.
    ///
    /// The polarity context is required; [`check`](Self::check) fails with
    /// [`CheckError::MissingContext`] without it.
    #[must_use]
    pub fn new(conditions: impl Into<Option<CheckConditions>>) -> Self {
        Self {
            conditions: conditions.into(),
            require_conditions: true,
            fail_checks: vec![
                Check::Fail0001,
                Check::Fail0002,
                Check::Fail0003,
                Check::Fail0004,
                Check::Fail0005,
                Check::Fail0006,
                Check::Fail0007,
                Check::Fail0008,
                Check::Fail0009,
            ],
            warn_checks: vec![
                Check::Warn0001,
                Check::Warn0002,
                Check::Warn0003,
                Check::Warn0004,
                Check::Warn0005,
            ],
        }
    }

    /// A checker for objects in the middle of a reconcile run.
    #[must_use]
    pub fn in_progress() -> Self {
        Self {
            conditions: None,
            require_conditions: false,
            fail_checks: vec![
                Check::Fail0002,
                Check::Fail0004,
                Check::Fail0005,
                Check::Fail0006,
                Check::Fail0010,
            ],
            warn_checks: vec![Check::Warn0003, Check::Warn0004, Check::Warn0005],
        }
    }

    /// The fail checks this checker runs, in order.
    #[must_use]
    pub fn fail_checks(&self) -> &[Check] {
        &self.fail_checks
    }

    /// The warn checks this checker runs, in order.
    #[must_use]
    pub fn warn_checks(&self) -> &[Check] {
        &self.warn_checks
    }

    /// Run every check against `obj`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::MissingContext`] if the checker requires the polarity
    /// context and was built without it.
    pub fn check<K: StatusObject + ?Sized>(&self, obj: &K) -> Result<CheckReport, CheckError> {
        let empty = CheckConditions::default();
        let context = match &self.conditions {
            Some(conditions) => conditions,
            None if self.require_conditions => {
                let check = self
                    .fail_checks
                    .iter()
                    .chain(&self.warn_checks)
                    .find(|c| c.needs_context())
                    .map_or("checker", |c| c.code());
                return Err(CheckError::MissingContext {
                    check: check.to_string(),
                });
            }
            None => &empty,
        };

        let run = |checks: &[Check]| {
            AggregateError::from_errors(checks.iter().filter_map(|c| c.run(obj, context)))
        };

        Ok(CheckReport {
            warnings: run(&self.warn_checks),
            failures: run(&self.fail_checks),
        })
    }

    /// Run the checks, log the warnings and return the failures as an error.
    ///
    /// # Errors
    ///
    /// Returns the failures, or [`CheckError::MissingContext`] wrapped in
    /// [`anyhow::Error`].
    pub fn check_err<K: StatusObject + ?Sized>(&self, obj: &K) -> anyhow::Result<()> {
        let report = self.check(obj)?;

        if let Some(warnings) = &report.warnings {
            log_warn!(
                kind = %obj.object_kind(),
                name = %obj.object_name(),
                conditions = ?ConditionReader::conditions(obj),
                "Condition check warnings: {warnings}"
            );
        }

        match report.failures {
            Some(failures) => Err(failures.into()),
            None => Ok(()),
        }
    }
}
