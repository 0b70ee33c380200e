// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Condition polarity context for the conformance checks.

use crate::condition::Condition;
use crate::errors::CheckError;
use serde::{Deserialize, Serialize};

/// Polarity of the condition types a controller uses.
///
/// Can be loaded from YAML:
///
/// ```yaml
/// negativePolarity:
///   - Stalled
///   - Reconciling
///   - FetchFailed
/// positivePolarity:
///   - ArtifactInStorage
/// ```
///
/// Negative polarity types are listed in priority order, highest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConditions {
    pub negative_polarity: Vec<String>,
    pub positive_polarity: Vec<String>,
}

impl CheckConditions {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this structure.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    #[must_use]
    pub fn with_negative_polarity<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.negative_polarity = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_positive_polarity<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.positive_polarity = types.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn is_negative_polarity(&self, condition_type: &str) -> bool {
        self.negative_polarity.iter().any(|t| t == condition_type)
    }
}

/// The present condition whose type comes first in the negative polarity list.
///
/// # Errors
///
/// Returns [`CheckError::NoNegativePolarity`] if no negative polarity types are defined.
pub fn highest_negative_priority_condition<'a>(
    context: &CheckConditions,
    conditions: &'a [Condition],
) -> Result<Option<&'a Condition>, CheckError> {
    if context.negative_polarity.is_empty() {
        return Err(CheckError::NoNegativePolarity);
    }

    Ok(context.negative_polarity.iter().find_map(|negative| {
        conditions
            .iter()
            .find(|condition| &condition.r#type == negative)
    }))
}
