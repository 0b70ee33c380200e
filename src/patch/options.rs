// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Options for a [`PatchHelper`](crate::patch::PatchHelper) run.

use crate::conditions::ApplyOptions;
use serde::{Deserialize, Serialize};

/// Options for [`PatchHelper::patch`](crate::patch::PatchHelper::patch).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchOptions {
    /// Set `status.observedGeneration` to `metadata.generation` before patching.
    pub include_status_observed_generation: bool,

    /// Overwrite every conflicting condition. Only the controller managing the object
    /// should set this.
    pub force_overwrite_conditions: bool,

    /// Condition types owned by the caller; conflicts on them resolve in its favour.
    pub owned_conditions: Vec<String>,

    /// Field manager name sent with the object and status patches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_owner: Option<String>,
}

impl PatchOptions {
    #[must_use]
    pub fn with_status_observed_generation(mut self) -> Self {
        self.include_status_observed_generation = true;
        self
    }

    #[must_use]
    pub fn with_force_overwrite_conditions(mut self) -> Self {
        self.force_overwrite_conditions = true;
        self
    }

    #[must_use]
    pub fn with_owned_conditions<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owned_conditions = types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_field_owner(mut self, owner: impl Into<String>) -> Self {
        self.field_owner = Some(owner.into());
        self
    }

    /// Options for applying the condition diff to the latest revision.
    #[must_use]
    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions::default()
            .with_force_overwrite(self.force_overwrite_conditions)
            .with_owned_conditions(self.owned_conditions.iter().cloned())
    }
}
