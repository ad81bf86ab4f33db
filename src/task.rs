//! Task identifiers, weighted task sets and task selection.
//!
//! The eleven V1 regression tasks are enumerated by [`TaskId`]. A [`TaskSet`]
//! pairs each task with an explicit weight; [`TaskPicker`] draws from a set
//! with probability proportional to weight.

use std::fmt;

use rand::{SeedableRng, distr::Distribution, distr::weighted::WeightedIndex};
use rand_chacha::ChaCha8Rng;
use serde::{Serialize, Serializer};

use crate::error::TaskSetError;

/// The regression tasks a [`crate::user::BfdUser`] can perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    /// Coverage search by ID, paginated.
    CoverageTestIdCount,
    /// Coverage search by ID, last updated.
    CoverageTestIdLastUpdated,
    /// Explanation of Benefit search by ID, type PDE, paginated.
    EobTestIdCountTypePde,
    /// Explanation of Benefit search by ID, last updated, paginated.
    EobTestIdLastUpdatedCount,
    /// Explanation of Benefit search by ID, last updated, include tax numbers.
    EobTestIdIncludeTaxNumberLastUpdated,
    /// Explanation of Benefit search by ID, last updated.
    EobTestIdLastUpdated,
    /// Explanation of Benefit search by ID.
    EobTestId,
    /// Patient search by coverage contract, following every page.
    PatientTestCoverageContract,
    /// Patient search by hashed MBI, last updated, include MBI.
    PatientTestHashedMbi,
    /// Patient search by ID, last updated, include MBI and address.
    PatientTestIdLastUpdatedIncludeMbiIncludeAddress,
    /// Patient search by ID.
    PatientTestId,
}

impl TaskId {
    /// Every task, in declaration order.
    pub const ALL: [TaskId; 11] = [
        Self::CoverageTestIdCount,
        Self::CoverageTestIdLastUpdated,
        Self::EobTestIdCountTypePde,
        Self::EobTestIdLastUpdatedCount,
        Self::EobTestIdIncludeTaxNumberLastUpdated,
        Self::EobTestIdLastUpdated,
        Self::EobTestId,
        Self::PatientTestCoverageContract,
        Self::PatientTestHashedMbi,
        Self::PatientTestIdLastUpdatedIncludeMbiIncludeAddress,
        Self::PatientTestId,
    ];

    /// Stable `snake_case` name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CoverageTestIdCount => "coverage_test_id_count",
            Self::CoverageTestIdLastUpdated => "coverage_test_id_last_updated",
            Self::EobTestIdCountTypePde => "eob_test_id_count_type_pde",
            Self::EobTestIdLastUpdatedCount => "eob_test_id_last_updated_count",
            Self::EobTestIdIncludeTaxNumberLastUpdated => "eob_test_id_include_tax_number_last_updated",
            Self::EobTestIdLastUpdated => "eob_test_id_last_updated",
            Self::EobTestId => "eob_test_id",
            Self::PatientTestCoverageContract => "patient_test_coverage_contract",
            Self::PatientTestHashedMbi => "patient_test_hashed_mbi",
            Self::PatientTestIdLastUpdatedIncludeMbiIncludeAddress => {
                "patient_test_id_last_updated_include_mbi_include_address"
            }
            Self::PatientTestId => "patient_test_id",
        }
    }

    /// One-line description of what the task exercises.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CoverageTestIdCount => "Coverage search by ID, Paginated",
            Self::CoverageTestIdLastUpdated => "Coverage search by ID, Last Updated",
            Self::EobTestIdCountTypePde => "Explanation of Benefit search by ID, type PDE, paginated",
            Self::EobTestIdLastUpdatedCount => {
                "Explanation of Benefit search by ID, last updated, paginated"
            }
            Self::EobTestIdIncludeTaxNumberLastUpdated => {
                "Explanation of Benefit search by ID, Last Updated, Include Tax Numbers"
            }
            Self::EobTestIdLastUpdated => "Explanation of Benefit search by ID, Last Updated",
            Self::EobTestId => "Explanation of Benefit search by ID",
            Self::PatientTestCoverageContract => "Patient search by coverage contract (all pages)",
            Self::PatientTestHashedMbi => "Patient search by hashed MBI, Last Updated, include MBI",
            Self::PatientTestIdLastUpdatedIncludeMbiIncludeAddress => {
                "Patient search by ID, Last Updated, include MBI, include Address"
            }
            Self::PatientTestId => "Patient search by ID",
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A task and its relative selection weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedTask {
    /// Task to run.
    pub task: TaskId,
    /// Relative weight; must be non-zero.
    pub weight: u32,
}

/// Validated list of weighted tasks.
#[derive(Clone, Debug)]
pub struct TaskSet {
    entries: Vec<WeightedTask>,
    index: WeightedIndex<u32>,
}

impl PartialEq for TaskSet {
    fn eq(&self, other: &Self) -> bool { self.entries == other.entries }
}

impl Eq for TaskSet {}

impl TaskSet {
    /// Build a task set from explicit `(task, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskSetError`] if `tasks` is empty, any weight is zero, a
    /// task appears twice, or the weights overflow when summed.
    pub fn new(tasks: Vec<WeightedTask>) -> Result<Self, TaskSetError> {
        if tasks.is_empty() {
            return Err(TaskSetError::Empty);
        }
        for (idx, entry) in tasks.iter().enumerate() {
            if entry.weight == 0 {
                return Err(TaskSetError::ZeroWeight(entry.task));
            }
            if tasks[..idx].iter().any(|prev| prev.task == entry.task) {
                return Err(TaskSetError::Duplicate(entry.task));
            }
        }
        let index = WeightedIndex::new(tasks.iter().map(|e| e.weight))
            .map_err(|_| TaskSetError::WeightOverflow)?;
        Ok(Self {
            entries: tasks,
            index,
        })
    }

    /// Give every task in `tasks` a weight of one.
    ///
    /// # Errors
    ///
    /// See [`TaskSet::new`].
    pub fn uniform(tasks: &[TaskId]) -> Result<Self, TaskSetError> {
        Self::new(
            tasks
                .iter()
                .map(|&task| WeightedTask { task, weight: 1 })
                .collect(),
        )
    }

    /// Weighted entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[WeightedTask] { &self.entries }

    /// Registered tasks in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ { self.entries.iter().map(|e| e.task) }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Always false; empty sets cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Returns true if every task carries the same weight.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].weight == w[1].weight)
    }
}

/// Draws tasks from a [`TaskSet`] in proportion to their weights.
#[derive(Debug, Clone)]
pub struct TaskPicker {
    tasks: Vec<TaskId>,
    index: WeightedIndex<u32>,
    rng: ChaCha8Rng,
}

impl TaskPicker {
    /// Create a picker seeded with `seed`.
    #[must_use]
    pub fn new(set: &TaskSet, seed: u64) -> Self {
        Self {
            tasks: set.tasks().collect(),
            index: set.index.clone(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick the next task.
    pub fn pick(&mut self) -> TaskId { self.tasks[self.index.sample(&mut self.rng)] }
}
