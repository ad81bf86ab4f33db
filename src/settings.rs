//! Scenario-wide settings shared by every collaborator.
//!
//! [`ScenarioSettings`] is built once through [`ScenarioSettingsBuilder`] and
//! is immutable afterwards. Data pools take a `&ScenarioSettings` when they
//! are constructed, so the sampling flags are necessarily final before any
//! test data is drawn.

use std::sync::Arc;

use serde::Serialize;

use crate::{error::ScenarioError, validation::ValidationGoal};

/// Default `_lastUpdated` cutoff used by "last updated" exercises.
pub const DEFAULT_LAST_UPDATED: &str = "2022-06-29";

/// Table sampling switches, one per test-data domain.
///
/// When a flag is set the matching pool draws a random subset of its source
/// rows; when cleared the pool replays every row in source order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SamplingFlags {
    /// Sample beneficiary ids.
    pub bene_ids: bool,
    /// Sample contract data.
    pub contract_data: bool,
    /// Sample hashed MBIs.
    pub hashed_mbis: bool,
}

impl SamplingFlags {
    /// Every domain sampled.
    pub const ENABLED: Self = Self {
        bene_ids: true,
        contract_data: true,
        hashed_mbis: true,
    };

    /// No domain sampled.
    pub const DISABLED: Self = Self {
        bene_ids: false,
        contract_data: false,
        hashed_mbis: false,
    };
}

impl Default for SamplingFlags {
    fn default() -> Self { Self::ENABLED }
}

/// Frozen configuration for one scenario run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioSettings {
    sampling: SamplingFlags,
    validation_goal: ValidationGoal,
    last_updated: String,
    sampling_seed: Option<u64>,
}

impl ScenarioSettings {
    /// Start building settings.
    #[must_use]
    pub fn builder() -> ScenarioSettingsBuilder { ScenarioSettingsBuilder::default() }

    /// Table sampling flags.
    #[must_use]
    pub const fn sampling(&self) -> SamplingFlags { self.sampling }

    /// Active validation goal.
    #[must_use]
    pub const fn validation_goal(&self) -> ValidationGoal { self.validation_goal }

    /// Cutoff date used for `_lastUpdated=gt...` filters.
    #[must_use]
    pub fn last_updated(&self) -> &str { &self.last_updated }

    /// Seed applied when sampling is enabled, if any.
    #[must_use]
    pub const fn sampling_seed(&self) -> Option<u64> { self.sampling_seed }
}

/// Builder for [`ScenarioSettings`].
///
/// Sampling starts enabled for all domains and no validation goal is chosen;
/// scenarios override what they need before calling [`build`](Self::build).
///
/// ```
/// use bfd_load::{settings::ScenarioSettings, validation::ValidationGoal};
///
/// let settings = ScenarioSettings::builder()
///     .table_sample_bene_ids(false)
///     .validation_goal(ValidationGoal::SlaPatient)
///     .build()
///     .expect("goal is set");
/// assert!(!settings.sampling().bene_ids);
/// assert!(settings.sampling().hashed_mbis);
/// ```
#[derive(Clone, Debug)]
pub struct ScenarioSettingsBuilder {
    sampling: SamplingFlags,
    validation_goal: Option<ValidationGoal>,
    last_updated: String,
    sampling_seed: Option<u64>,
}

impl Default for ScenarioSettingsBuilder {
    fn default() -> Self {
        Self {
            sampling: SamplingFlags::default(),
            validation_goal: None,
            last_updated: DEFAULT_LAST_UPDATED.to_owned(),
            sampling_seed: None,
        }
    }
}

impl ScenarioSettingsBuilder {
    /// Toggle sampling of beneficiary ids.
    #[must_use]
    pub fn table_sample_bene_ids(mut self, enabled: bool) -> Self {
        self.sampling.bene_ids = enabled;
        self
    }

    /// Toggle sampling of contract data.
    #[must_use]
    pub fn table_sample_contract_data(mut self, enabled: bool) -> Self {
        self.sampling.contract_data = enabled;
        self
    }

    /// Toggle sampling of hashed MBIs.
    #[must_use]
    pub fn table_sample_hashed_mbis(mut self, enabled: bool) -> Self {
        self.sampling.hashed_mbis = enabled;
        self
    }

    /// Replace all sampling flags at once.
    #[must_use]
    pub fn sampling(mut self, flags: SamplingFlags) -> Self {
        self.sampling = flags;
        self
    }

    /// Select the validation goal.
    #[must_use]
    pub fn validation_goal(mut self, goal: ValidationGoal) -> Self {
        self.validation_goal = Some(goal);
        self
    }

    /// Set the `_lastUpdated` cutoff date.
    #[must_use]
    pub fn last_updated(mut self, date: impl Into<String>) -> Self {
        self.last_updated = date.into();
        self
    }

    /// Seed the random sampling of pools.
    #[must_use]
    pub fn sampling_seed(mut self, seed: Option<u64>) -> Self {
        self.sampling_seed = seed;
        self
    }

    /// Freeze the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingValidationGoal`] if no goal was chosen.
    pub fn build(self) -> Result<Arc<ScenarioSettings>, ScenarioError> {
        let validation_goal = self
            .validation_goal
            .ok_or(ScenarioError::MissingValidationGoal)?;
        Ok(Arc::new(ScenarioSettings {
            sampling: self.sampling,
            validation_goal,
            last_updated: self.last_updated,
            sampling_seed: self.sampling_seed,
        }))
    }
}
