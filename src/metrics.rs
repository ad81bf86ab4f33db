//! Metric names and helpers for load runs.
//!
//! Helpers wrap the [`metrics`](https://docs.rs/metrics) crate and compile to
//! no-ops when the `metrics` feature is disabled. Install a recorder (for
//! example the Prometheus exporter in the binary) to collect them.

use crate::task::TaskId;

/// Name of the counter tracking completed tasks, labelled by task and outcome.
pub const TASKS_TOTAL: &str = "bfd_load_tasks_total";
/// Name of the gauge tracking running simulated users.
pub const USERS_ACTIVE: &str = "bfd_load_users_active";

/// How a single task ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The request sequence completed with 2xx responses.
    Success,
    /// A request failed or returned an unexpected status.
    Failure,
    /// The backing data pool was exhausted.
    NoData,
}

impl Outcome {
    /// Label value used for the `outcome` label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::NoData => "no_data",
        }
    }
}

/// Record one finished task.
pub fn record_task(task: TaskId, outcome: Outcome) {
    #[cfg(feature = "metrics")]
    metrics::counter!(TASKS_TOTAL, "task" => task.name(), "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = (task, outcome);
}

/// Increment the active users gauge.
pub fn inc_users() {
    #[cfg(feature = "metrics")]
    metrics::gauge!(USERS_ACTIVE).increment(1.0);
}

/// Decrement the active users gauge.
pub fn dec_users() {
    #[cfg(feature = "metrics")]
    metrics::gauge!(USERS_ACTIVE).decrement(1.0);
}
