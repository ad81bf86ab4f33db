//! Tests for `LoadDriver` with stub users.

use std::time::Duration;

use async_trait::async_trait;
use bfd_load::{
    BfdUser,
    LoadDriver,
    LoadUser,
    RegressionSuiteV1,
    RunConfig,
    TaskId,
    TaskResult,
    TaskSet,
    TestData,
};
use bfd_load_testing::{
    CallLog,
    Fault,
    Level,
    LoggerHandle,
    RecordingClient,
    StubBehavior,
    call_log,
    logger,
    sample_data,
    stub_user,
};
use rstest::rstest;
use serial_test::serial;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

fn driver(users: usize, iterations: Option<u64>) -> LoadDriver {
    LoadDriver::new(RunConfig {
        users,
        iterations,
        seed: 11,
        rate: None,
    })
    .expect("valid config")
}

fn regression_tasks() -> TaskSet { TaskSet::uniform(&TaskId::ALL).expect("valid set") }

#[rstest]
#[tokio::test]
async fn every_iteration_is_counted(call_log: CallLog) {
    let summary = driver(3, Some(20))
        .run(&regression_tasks(), |_| stub_user(&call_log), CancellationToken::new())
        .await;

    assert_eq!(summary.users, 3);
    assert_eq!(summary.totals().successes, 60);
    assert_eq!(summary.totals().failures, 0);
    assert_eq!(call_log.len(), 60);
    assert!(summary.tasks.keys().all(|t| TaskId::ALL.contains(t)));
}

#[rstest]
#[tokio::test]
async fn only_registered_tasks_are_drawn(call_log: CallLog) {
    let tasks = TaskSet::uniform(&[TaskId::EobTestId, TaskId::PatientTestHashedMbi]).expect("valid set");
    let summary = driver(2, Some(50))
        .run(&tasks, |_| stub_user(&call_log), CancellationToken::new())
        .await;

    assert_eq!(summary.tasks.len(), 2);
    assert_eq!(
        summary.task(TaskId::EobTestId).total() + summary.task(TaskId::PatientTestHashedMbi).total(),
        100
    );
    assert!(call_log.calls().iter().all(|c| c == "bene.eob_test_id" || c == "mbi.patient_test_hashed_mbi"));
}

#[rstest]
#[tokio::test]
async fn same_seed_draws_the_same_tasks() {
    let first = CallLog::default();
    let second = CallLog::default();
    driver(1, Some(30))
        .run(&regression_tasks(), |_| stub_user(&first), CancellationToken::new())
        .await;
    driver(1, Some(30))
        .run(&regression_tasks(), |_| stub_user(&second), CancellationToken::new())
        .await;
    assert_eq!(first.calls(), second.calls());
}

#[rstest]
#[tokio::test]
async fn no_data_does_not_stop_regression_users(call_log: CallLog) {
    let tasks = TaskSet::uniform(&[TaskId::PatientTestHashedMbi]).expect("valid set");
    let summary = driver(1, Some(5))
        .run(
            &tasks,
            |_| {
                BfdUser::new(
                    StubBehavior::new("bene", &call_log),
                    StubBehavior::new("mbi", &call_log).with_fault("patient_test_hashed_mbi", Fault::NoData),
                    StubBehavior::new("contract", &call_log),
                )
            },
            CancellationToken::new(),
        )
        .await;

    assert_eq!(summary.task(TaskId::PatientTestHashedMbi).no_data, 5);
    assert_eq!(summary.stopped_on_no_data, 0);
}

/// User that asks to be stopped once data runs out.
struct Exhaustible {
    remaining: usize,
}

#[async_trait]
impl LoadUser for Exhaustible {
    async fn run_task(&mut self, _task: TaskId) -> TaskResult {
        if self.remaining == 0 {
            return Err(bfd_load::TaskError::NoData("bene_ids"));
        }
        self.remaining -= 1;
        Ok(())
    }

    fn end_on_no_data(&self) -> bool { true }
}

#[tokio::test]
async fn users_ending_on_no_data_stop_early() {
    let summary = driver(2, None)
        .run(&regression_tasks(), |_| Exhaustible { remaining: 3 }, CancellationToken::new())
        .await;

    assert_eq!(summary.stopped_on_no_data, 2);
    assert_eq!(summary.totals().successes, 6);
    assert_eq!(summary.totals().no_data, 2);
}

#[rstest]
#[tokio::test]
async fn cancellation_stops_unbounded_runs(call_log: CallLog) {
    let shutdown = CancellationToken::new();
    let canceller = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            shutdown.cancel();
        })
    };
    let unbounded = driver(2, None);
    let tasks = regression_tasks();
    let run = unbounded.run(&tasks, |_| stub_user(&call_log), shutdown);
    let summary = timeout(Duration::from_secs(5), run)
        .await
        .expect("run stops after cancellation");
    canceller.await.expect("canceller finished");

    assert_eq!(summary.panicked, 0);
    assert!(summary.totals().successes > 0);
}

#[rstest]
#[tokio::test]
async fn rate_limit_caps_task_starts(call_log: CallLog) {
    let shutdown = CancellationToken::new();
    let limited = LoadDriver::new(RunConfig {
        users: 4,
        iterations: None,
        seed: 1,
        rate: Some(5),
    })
    .expect("valid config");
    let canceller = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            shutdown.cancel();
        })
    };
    let summary = limited
        .run(&regression_tasks(), |_| stub_user(&call_log), shutdown)
        .await;
    canceller.await.expect("canceller finished");

    // The bucket starts full, so only the initial burst fits in the window.
    assert!(summary.totals().total() <= 5, "{summary:?}");
}

#[rstest]
#[serial(runner_logs)]
#[tokio::test]
async fn failures_are_logged_and_counted(call_log: CallLog, mut logger: LoggerHandle) {
    logger.clear();
    let tasks = TaskSet::uniform(&[TaskId::EobTestId]).expect("valid set");
    let summary = driver(1, Some(3))
        .run(
            &tasks,
            |_| {
                BfdUser::new(
                    StubBehavior::new("bene", &call_log).with_fault("eob_test_id", Fault::Status(502)),
                    StubBehavior::new("mbi", &call_log),
                    StubBehavior::new("contract", &call_log),
                )
            },
            CancellationToken::new(),
        )
        .await;

    assert_eq!(summary.task(TaskId::EobTestId).failures, 3);
    let warnings = logger.drain_at(Level::Warn);
    let failures: Vec<_> = warnings.iter().filter(|m| m.contains("task failed")).collect();
    assert_eq!(failures.len(), 3, "{warnings:?}");
    assert!(failures[0].contains("502"), "{warnings:?}");
}

#[rstest]
#[serial(runner_logs)]
#[tokio::test]
async fn panicking_user_is_contained(call_log: CallLog, mut logger: LoggerHandle) {
    logger.clear();
    let tasks = TaskSet::uniform(&[TaskId::PatientTestId]).expect("valid set");
    let summary = driver(2, Some(2))
        .run(
            &tasks,
            |index| {
                let bene = StubBehavior::new("bene", &call_log);
                let bene = if index == 0 {
                    bene.with_fault("patient_test_id", Fault::Panic)
                } else {
                    bene
                };
                BfdUser::new(
                    bene,
                    StubBehavior::new("mbi", &call_log),
                    StubBehavior::new("contract", &call_log),
                )
            },
            CancellationToken::new(),
        )
        .await;

    assert_eq!(summary.panicked, 1);
    assert_eq!(summary.task(TaskId::PatientTestId).successes, 2);
    let errors = logger.drain_at(Level::Error);
    assert!(
        errors.iter().any(|m| m.contains("user task panicked") && m.contains("stub bene panicked")),
        "{errors:?}"
    );
}

#[rstest]
#[tokio::test]
async fn scenario_users_run_against_recorded_client(sample_data: TestData) {
    let scenario = RegressionSuiteV1::load().expect("scenario loads");
    let pools = scenario.pools(sample_data);
    let client = RecordingClient::new();

    let summary = driver(2, Some(25))
        .run(
            scenario.tasks(),
            |_| scenario.user(client.clone(), &pools),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(summary.totals().successes, 50);
    assert_eq!(client.requests().len(), 50);
}

#[rstest]
#[tokio::test]
async fn json_summary_names_scenario_and_goal(sample_data: TestData) {
    let scenario = RegressionSuiteV1::load().expect("scenario loads");
    let pools = scenario.pools(sample_data);
    let client = RecordingClient::new();

    let summary = driver(1, Some(3))
        .run(
            scenario.tasks(),
            |_| scenario.user(client.clone(), &pools),
            CancellationToken::new(),
        )
        .await
        .with_scenario(&scenario);
    let json = serde_json::to_value(&summary).expect("summary serializes");

    assert_eq!(json["scenario"]["name"], RegressionSuiteV1::NAME);
    assert_eq!(json["scenario"]["settings"]["validation_goal"], "SLA_V1_BASELINE");
    assert_eq!(json["scenario"]["settings"]["sampling"]["bene_ids"], false);
    assert_eq!(json["scenario"]["settings"]["sampling"]["hashed_mbis"], false);
    assert_eq!(json["scenario"]["settings"]["sampling"]["contract_data"], false);
    assert_eq!(json["users"], 1);
}

#[rstest]
#[tokio::test]
async fn summary_without_scenario_omits_it(call_log: CallLog) {
    let summary = driver(1, Some(1))
        .run(&regression_tasks(), |_| stub_user(&call_log), CancellationToken::new())
        .await;
    let json = serde_json::to_value(&summary).expect("summary serializes");
    assert!(json.get("scenario").is_none());
}
