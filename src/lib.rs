#![doc(html_root_url = "https://docs.rs/bfd_load/latest")]
//! Load-test scenario for the V1 endpoints of the BFD Server.
//!
//! The crate defines the V1 regression suite: frozen scenario settings,
//! shared test-data pools, the three capability sets a simulated user is
//! built from, and a driver that runs many users concurrently while picking
//! tasks by weight.

pub mod behavior;
pub mod client;
pub mod data;
pub mod error;
pub mod metrics;
pub mod runner;
pub mod scenario;
pub mod settings;
pub mod task;
pub mod user;
pub mod validation;

pub use behavior::{
    BeneficiaryBehavior,
    ContractBehavior,
    MbiBehavior,
    V1BeneficiaryTests,
    V1ContractTests,
    V1MbiTests,
};
pub use client::{ApiClient, ApiRequest, ApiResponse, DryRunClient};
pub use data::{BeneId, ContractData, DataPool, Exhaustion, HashedMbi, Sampling};
pub use error::{ClientError, Result, ScenarioError, TaskError, TaskResult, TaskSetError};
pub use runner::{LoadDriver, RunConfig, RunSummary, TaskStats};
pub use scenario::{LoadedScenario, RegressionSuiteV1, ScenarioInfo, ScenarioPools, TestData, V1User};
pub use settings::{SamplingFlags, ScenarioSettings, ScenarioSettingsBuilder};
pub use task::{TaskId, TaskPicker, TaskSet, WeightedTask};
pub use user::{BfdUser, END_ON_NO_DATA, LoadUser};
pub use validation::ValidationGoal;
