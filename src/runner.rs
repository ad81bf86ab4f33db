//! Load driver running simulated users concurrently.
//!
//! [`LoadDriver`] spawns one actor per user on a [`TaskTracker`]. Each actor
//! repeatedly draws a task from its own [`TaskPicker`] and awaits it before
//! drawing the next, so a user never runs two tasks at once. Outcomes are
//! tallied per task and folded into a [`RunSummary`] once every actor has
//! stopped.

use std::{
    any::Any,
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use dashmap::DashMap;
use futures::FutureExt;
use leaky_bucket::RateLimiter;
use serde::Serialize;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, warn};

use crate::{
    error::{ScenarioError, TaskResult},
    metrics::{self, Outcome},
    scenario::{LoadedScenario, ScenarioInfo},
    task::{TaskId, TaskPicker, TaskSet},
    user::LoadUser,
};

/// Parameters of one load run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of concurrent simulated users.
    pub users: usize,
    /// Tasks each user runs before stopping; `None` runs until cancelled.
    pub iterations: Option<u64>,
    /// Base seed for task selection. User `n` uses `seed + n`.
    pub seed: u64,
    /// Global cap on tasks started per second.
    pub rate: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            users: 1,
            iterations: None,
            seed: 0,
            rate: None,
        }
    }
}

impl RunConfig {
    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidRunConfig`] if there are no users, a
    /// zero iteration count, or a zero rate.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.users == 0 {
            return Err(ScenarioError::InvalidRunConfig("at least one user is required"));
        }
        if self.iterations == Some(0) {
            return Err(ScenarioError::InvalidRunConfig("iterations must be positive"));
        }
        if self.rate == Some(0) {
            return Err(ScenarioError::InvalidRunConfig("rate must be positive"));
        }
        Ok(())
    }
}

/// Per-task outcome counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// Tasks that completed successfully.
    pub successes: u64,
    /// Tasks that failed.
    pub failures: u64,
    /// Tasks that found no data to work on.
    pub no_data: u64,
}

impl TaskStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.successes += 1,
            Outcome::Failure => self.failures += 1,
            Outcome::NoData => self.no_data += 1,
        }
    }

    /// Every task run, whatever its outcome.
    #[must_use]
    pub fn total(&self) -> u64 { self.successes + self.failures + self.no_data }
}

/// Result of a finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Scenario the run was measured against, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioInfo>,
    /// Users that were started.
    pub users: usize,
    /// Outcome counts keyed by task. Tasks never drawn are absent.
    pub tasks: BTreeMap<TaskId, TaskStats>,
    /// Users stopped because their data ran out.
    pub stopped_on_no_data: usize,
    /// Users stopped by a panic inside a task.
    pub panicked: usize,
}

impl RunSummary {
    /// Attach the name and settings of `scenario`.
    #[must_use]
    pub fn with_scenario(mut self, scenario: &LoadedScenario) -> Self {
        self.scenario = Some(scenario.info());
        self
    }

    /// Outcome counts summed across tasks.
    #[must_use]
    pub fn totals(&self) -> TaskStats {
        self.tasks.values().fold(TaskStats::default(), |acc, s| TaskStats {
            successes: acc.successes + s.successes,
            failures: acc.failures + s.failures,
            no_data: acc.no_data + s.no_data,
        })
    }

    /// Counts for `task`, zero if it never ran.
    #[must_use]
    pub fn task(&self, task: TaskId) -> TaskStats { self.tasks.get(&task).copied().unwrap_or_default() }
}

#[derive(Default)]
struct RunState {
    stats: DashMap<TaskId, TaskStats>,
    stopped_on_no_data: AtomicUsize,
    panicked: AtomicUsize,
}

impl RunState {
    fn record(&self, task: TaskId, outcome: Outcome) {
        self.stats.entry(task).or_default().record(outcome);
        metrics::record_task(task, outcome);
    }
}

/// Everything an actor needs besides its user.
struct Actor {
    index: usize,
    picker: TaskPicker,
    iterations: Option<u64>,
    limiter: Option<Arc<RateLimiter>>,
    shutdown: CancellationToken,
    state: Arc<RunState>,
}

/// Why an actor returned.
#[derive(Debug, PartialEq, Eq)]
enum Exit {
    Finished,
    Cancelled,
    NoData,
}

/// Runs simulated users against a [`TaskSet`].
#[derive(Debug, Clone, Copy)]
pub struct LoadDriver {
    config: RunConfig,
}

impl LoadDriver {
    /// Create a driver for `config`.
    ///
    /// # Errors
    ///
    /// Propagates [`RunConfig::validate`] failures.
    pub fn new(config: RunConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this driver runs with.
    #[must_use]
    pub fn config(&self) -> &RunConfig { &self.config }

    /// Run `config.users` users built by `factory` until each finishes its
    /// iterations, stops on exhausted data, panics, or `shutdown` fires.
    ///
    /// `factory` receives the zero-based user index.
    pub async fn run<U, F>(&self, tasks: &TaskSet, factory: F, shutdown: CancellationToken) -> RunSummary
    where
        U: LoadUser + 'static,
        F: Fn(usize) -> U,
    {
        let state = Arc::new(RunState::default());
        let tracker = TaskTracker::new();
        let limiter = self.config.rate.map(|r| {
            Arc::new(
                RateLimiter::builder()
                    .initial(r)
                    .refill(r)
                    .interval(Duration::from_secs(1))
                    .max(r)
                    .build(),
            )
        });
        info!(
            users = self.config.users,
            iterations = ?self.config.iterations,
            rate = ?self.config.rate,
            tasks = tasks.len(),
            "load run starting"
        );

        for index in 0..self.config.users {
            let user = factory(index);
            let actor = Actor {
                index,
                picker: TaskPicker::new(tasks, self.config.seed.wrapping_add(index as u64)),
                iterations: self.config.iterations,
                limiter: limiter.clone(),
                shutdown: shutdown.clone(),
                state: Arc::clone(&state),
            };
            tracker.spawn(supervise(user, actor));
        }
        tracker.close();
        tracker.wait().await;

        let summary = RunSummary {
            scenario: None,
            users: self.config.users,
            tasks: state.stats.iter().map(|e| (*e.key(), *e.value())).collect(),
            stopped_on_no_data: state.stopped_on_no_data.load(Ordering::Relaxed),
            panicked: state.panicked.load(Ordering::Relaxed),
        };
        let totals = summary.totals();
        info!(
            successes = totals.successes,
            failures = totals.failures,
            no_data = totals.no_data,
            stopped_on_no_data = summary.stopped_on_no_data,
            panicked = summary.panicked,
            "load run finished"
        );
        summary
    }
}

/// Run one actor, logging and counting any panic instead of propagating it.
async fn supervise<U: LoadUser>(mut user: U, actor: Actor) {
    let index = actor.index;
    let state = Arc::clone(&actor.state);
    metrics::inc_users();
    let fut = std::panic::AssertUnwindSafe(drive(&mut user, actor)).catch_unwind();
    match fut.await {
        Ok(Exit::NoData) => {
            state.stopped_on_no_data.fetch_add(1, Ordering::Relaxed);
            info!(user = index, "user stopped: no data left");
        }
        Ok(exit) => debug!(user = index, ?exit, "user stopped"),
        Err(panic) => {
            state.panicked.fetch_add(1, Ordering::Relaxed);
            error!(user = index, panic = %panic_message(panic.as_ref()), "user task panicked");
        }
    }
    metrics::dec_users();
}

async fn drive<U: LoadUser>(user: &mut U, mut actor: Actor) -> Exit {
    let mut done = 0u64;
    loop {
        if actor.iterations.is_some_and(|max| done >= max) {
            return Exit::Finished;
        }
        if let Some(limiter) = &actor.limiter {
            tokio::select! {
                biased;
                () = actor.shutdown.cancelled() => return Exit::Cancelled,
                () = limiter.acquire_one() => {}
            }
        }
        if actor.shutdown.is_cancelled() {
            return Exit::Cancelled;
        }

        let task = actor.picker.pick();
        let result = user.run_task(task).await;
        done += 1;
        let outcome = classify(actor.index, task, &result);
        actor.state.record(task, outcome);
        if outcome == Outcome::NoData && user.end_on_no_data() {
            return Exit::NoData;
        }
        // Tasks against an in-process client may never suspend.
        tokio::task::yield_now().await;
    }
}

fn classify(user: usize, task: TaskId, result: &TaskResult) -> Outcome {
    match result {
        Ok(()) => Outcome::Success,
        Err(e) if e.is_no_data() => {
            debug!(user, %task, error = %e, "task found no data");
            Outcome::NoData
        }
        Err(e) => {
            warn!(user, %task, error = %e, "task failed");
            Outcome::Failure
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic>")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(RunConfig { users: 0, ..RunConfig::default() })]
    #[case(RunConfig { iterations: Some(0), ..RunConfig::default() })]
    #[case(RunConfig { rate: Some(0), ..RunConfig::default() })]
    fn unusable_configs_are_rejected(#[case] config: RunConfig) {
        assert!(matches!(
            LoadDriver::new(config),
            Err(ScenarioError::InvalidRunConfig(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        let driver = LoadDriver::new(RunConfig::default()).expect("valid config");
        assert_eq!(driver.config().users, 1);
    }

    #[rstest]
    #[case(Box::new("boom"), "boom")]
    #[case(Box::new(String::from("bang")), "bang")]
    #[case(Box::new(5_u32), "<non-string panic>")]
    fn panic_payloads_are_described(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(panic_message(payload.as_ref()), expected);
    }

    #[test]
    fn summary_totals_sum_every_task() {
        let mut summary = RunSummary::default();
        summary.tasks.insert(
            TaskId::EobTestId,
            TaskStats { successes: 2, failures: 1, no_data: 0 },
        );
        summary.tasks.insert(
            TaskId::PatientTestId,
            TaskStats { successes: 1, failures: 0, no_data: 3 },
        );
        let totals = summary.totals();
        assert_eq!((totals.successes, totals.failures, totals.no_data), (3, 1, 3));
        assert_eq!(summary.task(TaskId::CoverageTestIdCount).total(), 0);
    }
}
