//! `rstest` fixtures shared by the integration tests.

use std::sync::Arc;

use bfd_load::{
    BeneId,
    ContractData,
    HashedMbi,
    SamplingFlags,
    ScenarioSettings,
    TestData,
    ValidationGoal,
};
use metrics_util::debugging::{DebuggingRecorder, Snapshotter};
use rstest::fixture;

use crate::{CallLog, RecordingClient};

/// Empty call log.
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn call_log() -> CallLog { CallLog::default() }

/// Client answering `200` to everything.
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn recording_client() -> RecordingClient { RecordingClient::new() }

/// Settings with sampling off and the V1 baseline goal.
///
/// # Panics
///
/// Never; the goal is always set.
#[fixture]
pub fn unsampled_settings() -> Arc<ScenarioSettings> {
    ScenarioSettings::builder()
        .sampling(SamplingFlags::DISABLED)
        .validation_goal(ValidationGoal::SlaV1Baseline)
        .build()
        .expect("settings with a goal always build")
}

/// A handful of rows for each data domain.
#[fixture]
pub fn sample_data() -> TestData {
    TestData {
        bene_ids: vec![BeneId::new("-88888888888888"), BeneId::new("-88888888888889")],
        hashed_mbis: vec![HashedMbi::new(
            "7e5f2c8a4f5a0ad1b5f3f4e0b7a1c9d2e6f8a0b1c2d3e4f5a6b7c8d9e0f1a2b3",
        )],
        contracts: vec![
            ContractData::new("Y9999", "01", "2020"),
            ContractData::new("Z0012", "07", "2021"),
        ],
    }
}

/// Creates a debugging recorder and snapshotter for metrics tests.
#[must_use]
pub fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}
