//! Validation goals understood by downstream response checks.
//!
//! A [`ValidationGoal`] names the service-level baseline a run is measured
//! against. The goal is chosen once when settings are built and never changes
//! for the lifetime of a run.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::error::ScenarioError;

/// Named service-level baselines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationGoal {
    /// Coverage endpoint SLA.
    SlaCoverage,
    /// Patient endpoint SLA.
    SlaPatient,
    /// Explanation of Benefit SLA for requests carrying `_lastUpdated`.
    SlaEobWithSince,
    /// Explanation of Benefit SLA for requests without `_lastUpdated`.
    SlaEobWithoutSince,
    /// Regression baseline for the V1 endpoint mix.
    SlaV1Baseline,
    /// Regression baseline for the V2 endpoint mix.
    SlaV2Baseline,
}

impl ValidationGoal {
    /// Every goal, in declaration order.
    pub const ALL: [ValidationGoal; 6] = [
        Self::SlaCoverage,
        Self::SlaPatient,
        Self::SlaEobWithSince,
        Self::SlaEobWithoutSince,
        Self::SlaV1Baseline,
        Self::SlaV2Baseline,
    ];

    /// Canonical name of the goal.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SlaCoverage => "SLA_COVERAGE",
            Self::SlaPatient => "SLA_PATIENT",
            Self::SlaEobWithSince => "SLA_EOB_WITH_SINCE",
            Self::SlaEobWithoutSince => "SLA_EOB_WITHOUT_SINCE",
            Self::SlaV1Baseline => "SLA_V1_BASELINE",
            Self::SlaV2Baseline => "SLA_V2_BASELINE",
        }
    }
}

impl fmt::Display for ValidationGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for ValidationGoal {
    type Err = ScenarioError;

    /// Parse a goal from its canonical name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownValidationGoal`] for any other name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|goal| goal.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScenarioError::UnknownValidationGoal(s.to_owned()))
    }
}

impl Serialize for ValidationGoal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
