#![cfg(feature = "metrics")]
//! Tests for `bfd_load` metrics helpers.
//!
//! Counters and gauges are read back through
//! `metrics_util::debugging::DebuggingRecorder`.

use bfd_load::{
    TaskId,
    metrics::{self as load_metrics, Outcome},
};
use bfd_load_testing::debugging_recorder_setup;
use metrics_util::debugging::DebugValue;
use rstest::rstest;

#[rstest]
#[case(Outcome::Success, "success")]
#[case(Outcome::Failure, "failure")]
#[case(Outcome::NoData, "no_data")]
fn task_counter_is_labelled_by_task_and_outcome(#[case] outcome: Outcome, #[case] label: &str) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        load_metrics::record_task(TaskId::EobTestId, outcome);
    });

    let metrics = snapshotter.snapshot().into_vec();
    let found = metrics.iter().any(|(k, _, _, v)| {
        k.key().name() == load_metrics::TASKS_TOTAL
            && k.key()
                .labels()
                .any(|l| l.key() == "task" && l.value() == "eob_test_id")
            && k.key().labels().any(|l| l.key() == "outcome" && l.value() == label)
            && matches!(v, DebugValue::Counter(1))
    });
    assert!(found, "task counter not recorded for {label}");
}

#[test]
fn users_gauge_tracks_running_users() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        load_metrics::inc_users();
        load_metrics::inc_users();
        load_metrics::dec_users();
    });

    let metrics = snapshotter.snapshot().into_vec();
    let found = metrics.iter().any(|(k, _, _, v)| {
        k.key().name() == load_metrics::USERS_ACTIVE
            && matches!(v, DebugValue::Gauge(g) if (g.into_inner() - 1.0).abs() < f64::EPSILON)
    });
    assert!(found, "active users gauge not recorded");
}
