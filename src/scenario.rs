//! Regression suite for the V1 BFD Server endpoints.
//!
//! The suite hits the endpoints judged representative of typical V1 load.
//! Every task runs with equal weight. The suite needs consistent data across
//! runs, so table sampling is switched off for all three data domains before
//! any pool is built, and results are judged against the V1 baseline.

use std::{io, path::Path, sync::Arc};

use serde::Serialize;
use tracing::info;

use crate::{
    behavior::{V1BeneficiaryTests, V1ContractTests, V1MbiTests},
    client::ApiClient,
    data::{BeneId, ContractData, DataPool, Exhaustion, HashedMbi, source},
    error::ScenarioError,
    settings::{ScenarioSettings, ScenarioSettingsBuilder},
    task::{TaskId, TaskSet},
    user::{BfdUser, END_ON_NO_DATA},
    validation::ValidationGoal,
};

/// File holding beneficiary ids inside a test-data directory.
pub const BENE_IDS_FILE: &str = "bene_ids.csv";
/// File holding hashed MBIs inside a test-data directory.
pub const HASHED_MBIS_FILE: &str = "hashed_mbis.csv";
/// File holding contract rows inside a test-data directory.
pub const CONTRACTS_FILE: &str = "contracts.csv";

/// User type produced by [`LoadedScenario::user`].
pub type V1User<C> = BfdUser<V1BeneficiaryTests<C>, V1MbiTests<C>, V1ContractTests<C>>;

/// Raw test rows for the three data domains.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestData {
    /// Beneficiary ids.
    pub bene_ids: Vec<BeneId>,
    /// Hashed MBIs.
    pub hashed_mbis: Vec<HashedMbi>,
    /// Contract rows.
    pub contracts: Vec<ContractData>,
}

impl TestData {
    /// Load the three data files from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::TestData`] naming the first file that cannot
    /// be read or parsed.
    pub fn from_dir(dir: &Path) -> Result<Self, ScenarioError> {
        let load = |name: &str| {
            let path = dir.join(name);
            move |source: io::Error| ScenarioError::TestData { path, source }
        };
        Ok(Self {
            bene_ids: source::read_bene_ids(&dir.join(BENE_IDS_FILE)).map_err(load(BENE_IDS_FILE))?,
            hashed_mbis: source::read_hashed_mbis(&dir.join(HASHED_MBIS_FILE))
                .map_err(load(HASHED_MBIS_FILE))?,
            contracts: source::read_contracts(&dir.join(CONTRACTS_FILE)).map_err(load(CONTRACTS_FILE))?,
        })
    }
}

/// Pools shared by every user of one run.
#[derive(Clone, Debug)]
pub struct ScenarioPools {
    /// Beneficiary id pool.
    pub bene_ids: DataPool<BeneId>,
    /// Hashed MBI pool.
    pub hashed_mbis: DataPool<HashedMbi>,
    /// Contract pool.
    pub contracts: DataPool<ContractData>,
}

/// The V1 regression scenario definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegressionSuiteV1;

impl RegressionSuiteV1 {
    /// Name the suite is registered under.
    pub const NAME: &'static str = "regression_v1";

    /// Apply the suite's settings on top of `builder`.
    ///
    /// Sampling is disabled for every domain and the goal becomes
    /// [`ValidationGoal::SlaV1Baseline`], whatever the builder held before.
    #[must_use]
    pub fn configure(builder: ScenarioSettingsBuilder) -> ScenarioSettingsBuilder {
        builder
            .table_sample_bene_ids(false)
            .table_sample_contract_data(false)
            .table_sample_hashed_mbis(false)
            .validation_goal(ValidationGoal::SlaV1Baseline)
    }

    /// Load the suite with default settings.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScenarioError`] raised while building settings or
    /// the task set.
    pub fn load() -> Result<LoadedScenario, ScenarioError> { Self::load_with(ScenarioSettings::builder()) }

    /// Load the suite on top of caller-supplied settings.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScenarioError`] raised while building settings or
    /// the task set.
    pub fn load_with(builder: ScenarioSettingsBuilder) -> Result<LoadedScenario, ScenarioError> {
        let settings = Self::configure(builder).build()?;
        let tasks = TaskSet::uniform(&TaskId::ALL)?;
        info!(
            scenario = Self::NAME,
            goal = %settings.validation_goal(),
            tasks = tasks.len(),
            "scenario loaded"
        );
        Ok(LoadedScenario {
            name: Self::NAME,
            settings,
            tasks,
        })
    }
}

/// What a run was measured against, as reported in its summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioInfo {
    /// Registered scenario name.
    pub name: &'static str,
    /// Frozen settings, including the validation goal.
    pub settings: ScenarioSettings,
}

/// A scenario whose settings are frozen and ready to create users.
#[derive(Clone, Debug)]
pub struct LoadedScenario {
    name: &'static str,
    settings: Arc<ScenarioSettings>,
    tasks: TaskSet,
}

impl LoadedScenario {
    /// Name the scenario is registered under.
    #[must_use]
    pub fn name(&self) -> &'static str { self.name }

    /// Name and settings for run reports.
    #[must_use]
    pub fn info(&self) -> ScenarioInfo {
        ScenarioInfo {
            name: self.name,
            settings: ScenarioSettings::clone(&self.settings),
        }
    }

    /// Frozen settings.
    #[must_use]
    pub fn settings(&self) -> &Arc<ScenarioSettings> { &self.settings }

    /// Weighted tasks handed to the driver.
    #[must_use]
    pub fn tasks(&self) -> &TaskSet { &self.tasks }

    /// Build the shared pools for a run from `data`.
    ///
    /// Users keep running when data runs out, so every pool recycles.
    #[must_use]
    pub fn pools(&self, data: TestData) -> ScenarioPools {
        let exhaustion = Exhaustion::for_end_on_no_data(END_ON_NO_DATA);
        ScenarioPools {
            bene_ids: DataPool::bene_ids(&self.settings, data.bene_ids, exhaustion),
            hashed_mbis: DataPool::hashed_mbis(&self.settings, data.hashed_mbis, exhaustion),
            contracts: DataPool::contracts(&self.settings, data.contracts, exhaustion),
        }
    }

    /// Create one simulated user drawing from `pools`.
    #[must_use]
    pub fn user<C: ApiClient + Clone>(&self, client: C, pools: &ScenarioPools) -> V1User<C> {
        BfdUser::new(
            V1BeneficiaryTests::new(client.clone(), &self.settings, pools.bene_ids.clone()),
            V1MbiTests::new(client.clone(), &self.settings, pools.hashed_mbis.clone()),
            V1ContractTests::new(client, pools.contracts.clone()),
        )
    }
}
