//! Delegation tests for `BfdUser` against stub collaborators.

use bfd_load::{BfdUser, END_ON_NO_DATA, LoadUser, TaskError, TaskId};
use bfd_load_testing::{CallLog, Fault, StubBehavior, call_log, stub_user};
use rstest::rstest;

/// Collaborator method each task must reach, as `role.method`.
fn expected_call(task: TaskId) -> String {
    let role = match task {
        TaskId::PatientTestHashedMbi => "mbi",
        TaskId::PatientTestCoverageContract => "contract",
        _ => "bene",
    };
    format!("{role}.{}", task.name())
}

#[rstest]
#[tokio::test]
async fn each_task_calls_exactly_one_collaborator_method(call_log: CallLog) {
    for task in TaskId::ALL {
        call_log.clear();
        let mut user = stub_user(&call_log);
        user.run_task(task).await.expect("stub succeeds");
        assert_eq!(call_log.calls(), [expected_call(task)], "task {task}");
    }
}

#[rstest]
#[tokio::test]
async fn running_every_task_once_calls_every_stub_once(call_log: CallLog) {
    let mut user = stub_user(&call_log);

    user.coverage_test_id_count().await.expect("task");
    user.coverage_test_id_last_updated().await.expect("task");
    user.eob_test_id_count_type_pde().await.expect("task");
    user.eob_test_id_last_updated_count().await.expect("task");
    user.eob_test_id_include_tax_number_last_updated().await.expect("task");
    user.eob_test_id_last_updated().await.expect("task");
    user.eob_test_id().await.expect("task");
    user.patient_test_coverage_contract().await.expect("task");
    user.patient_test_hashed_mbi().await.expect("task");
    user.patient_test_id_last_updated_include_mbi_include_address()
        .await
        .expect("task");
    user.patient_test_id().await.expect("task");

    assert_eq!(call_log.len(), TaskId::ALL.len());
    for task in TaskId::ALL {
        assert_eq!(call_log.count(&expected_call(task)), 1, "task {task}");
    }
}

#[rstest]
fn users_keep_running_when_data_runs_out(call_log: CallLog) {
    let user = stub_user(&call_log);
    assert!(!user.end_on_no_data());
    assert!(!END_ON_NO_DATA);
    assert!(call_log.is_empty());
}

#[rstest]
#[tokio::test]
async fn collaborator_errors_propagate_unchanged(call_log: CallLog) {
    let mut user = BfdUser::new(
        StubBehavior::new("bene", &call_log).with_fault("eob_test_id", Fault::Status(503)),
        StubBehavior::new("mbi", &call_log).with_fault("patient_test_hashed_mbi", Fault::NoData),
        StubBehavior::new("contract", &call_log),
    );

    let err = user.eob_test_id().await.expect_err("stub fails");
    assert!(matches!(
        err,
        TaskError::UnexpectedStatus { name: "eob_test_id", status: 503 }
    ));

    let err = user
        .run_task(TaskId::PatientTestHashedMbi)
        .await
        .expect_err("stub has no data");
    assert!(matches!(err, TaskError::NoData("mbi")));

    assert_eq!(call_log.len(), 2);
}

#[rstest]
#[tokio::test]
async fn a_failing_task_does_not_touch_other_collaborators(call_log: CallLog) {
    let mut user = BfdUser::new(
        StubBehavior::new("bene", &call_log),
        StubBehavior::new("mbi", &call_log),
        StubBehavior::new("contract", &call_log)
            .with_fault("patient_test_coverage_contract", Fault::Status(500)),
    );

    assert!(user.patient_test_coverage_contract().await.is_err());
    assert_eq!(call_log.calls(), ["contract.patient_test_coverage_contract"]);
}
