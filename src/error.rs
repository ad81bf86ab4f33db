//! Canonical error and result types for the crate.
//!
//! Errors split along the line the scenario draws between load time and run
//! time. [`ScenarioError`] covers anything that must abort loading a
//! scenario; [`TaskError`] is what a single task reports back to the driver;
//! [`ClientError`] is raised by [`crate::client::ApiClient`] implementations.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::task::TaskId;

/// Fatal errors raised while loading or configuring a scenario.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScenarioError {
    /// The validation goal name does not match any known goal.
    #[error("unknown validation goal {0:?}")]
    UnknownValidationGoal(String),
    /// Settings were built without choosing a validation goal.
    #[error("no validation goal was selected")]
    MissingValidationGoal,
    /// The task set is empty, has a zero weight, or repeats a task.
    #[error("invalid task set: {0}")]
    InvalidTaskSet(TaskSetError),
    /// Test data could not be read.
    #[error("failed to load test data from {path}: {source}")]
    TestData {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The run configuration is unusable.
    #[error("invalid run configuration: {0}")]
    InvalidRunConfig(&'static str),
}

/// Reasons a [`crate::task::TaskSet`] is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TaskSetError {
    /// No tasks were supplied.
    #[error("no tasks registered")]
    Empty,
    /// A task carries a weight of zero.
    #[error("task {0} has zero weight")]
    ZeroWeight(TaskId),
    /// A task appears more than once.
    #[error("task {0} registered twice")]
    Duplicate(TaskId),
    /// The weights do not fit in a `u32` when summed.
    #[error("task weights overflow")]
    WeightOverflow,
}

impl From<TaskSetError> for ScenarioError {
    fn from(error: TaskSetError) -> Self { Self::InvalidTaskSet(error) }
}

/// Errors emitted by [`crate::client::ApiClient`] implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Transport failure while issuing the request.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of a failed task, owned and classified by the collaborator that
/// ran it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskError {
    /// The backing data pool and any pending page links are exhausted.
    #[error("no data left in {0} pool")]
    NoData(&'static str),
    /// The server answered with a non-success status.
    #[error("{name} returned HTTP {status}")]
    UnexpectedStatus {
        /// Request name used for grouping statistics.
        name: &'static str,
        /// Status code received.
        status: u16,
    },
    /// The request could not be issued.
    #[error("request failed: {0}")]
    Client(#[from] ClientError),
}

impl TaskError {
    /// Returns true if this error signals data exhaustion rather than a
    /// failed request.
    #[must_use]
    pub fn is_no_data(&self) -> bool { matches!(self, Self::NoData(_)) }
}

/// Result type returned by every task.
pub type TaskResult = std::result::Result<(), TaskError>;

/// Result type used for scenario loading.
pub type Result<T> = std::result::Result<T, ScenarioError>;
