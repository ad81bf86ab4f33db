//! The composite simulated user.
//!
//! [`BfdUser`] combines the three capability sets by holding one collaborator
//! for each. Every task is a single forwarding call; outcomes, including
//! errors, are returned exactly as the collaborator produced them.

use async_trait::async_trait;

use crate::{
    behavior::{BeneficiaryBehavior, ContractBehavior, MbiBehavior},
    error::TaskResult,
    task::TaskId,
};

/// Whether a [`BfdUser`] stops when its data runs out. It does not: it keeps
/// issuing tasks and its pools recycle.
pub const END_ON_NO_DATA: bool = false;

/// A simulated user the driver can schedule tasks on.
#[async_trait]
pub trait LoadUser: Send {
    /// Run `task` to completion.
    async fn run_task(&mut self, task: TaskId) -> TaskResult;

    /// Whether the driver should stop this user once a task reports that its
    /// data is exhausted.
    fn end_on_no_data(&self) -> bool;
}

/// V1 regression user combining beneficiary, MBI and contract exercises.
///
/// Tasks carry no weights of their own; selection weights live in the
/// [`crate::task::TaskSet`] handed to the driver.
#[derive(Debug)]
pub struct BfdUser<B, M, C> {
    bene: B,
    mbi: M,
    contract: C,
    end_on_no_data: bool,
}

impl<B, M, C> BfdUser<B, M, C>
where
    B: BeneficiaryBehavior,
    M: MbiBehavior,
    C: ContractBehavior,
{
    /// Combine the three collaborators into one user.
    #[must_use]
    pub fn new(bene: B, mbi: M, contract: C) -> Self {
        Self {
            bene,
            mbi,
            contract,
            end_on_no_data: END_ON_NO_DATA,
        }
    }

    /// Coverage search by ID, Paginated
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn coverage_test_id_count(&mut self) -> TaskResult { self.bene.coverage_test_id_count().await }

    /// Coverage search by ID, Last Updated
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn coverage_test_id_last_updated(&mut self) -> TaskResult {
        self.bene.coverage_test_id_last_updated().await
    }

    /// Explanation of Benefit search by ID, type PDE, paginated
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn eob_test_id_count_type_pde(&mut self) -> TaskResult {
        self.bene.eob_test_id_count_type_pde().await
    }

    /// Explanation of Benefit search by ID, last updated, paginated
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn eob_test_id_last_updated_count(&mut self) -> TaskResult {
        self.bene.eob_test_id_last_updated_count().await
    }

    /// Explanation of Benefit search by ID, Last Updated, Include Tax Numbers
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn eob_test_id_include_tax_number_last_updated(&mut self) -> TaskResult {
        self.bene.eob_test_id_include_tax_number_last_updated().await
    }

    /// Explanation of Benefit search by ID, Last Updated
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn eob_test_id_last_updated(&mut self) -> TaskResult { self.bene.eob_test_id_last_updated().await }

    /// Explanation of Benefit search by ID
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn eob_test_id(&mut self) -> TaskResult { self.bene.eob_test_id().await }

    /// Patient search by coverage contract (all pages)
    ///
    /// # Errors
    ///
    /// Returns whatever the contract collaborator reports.
    pub async fn patient_test_coverage_contract(&mut self) -> TaskResult {
        self.contract.patient_test_coverage_contract().await
    }

    /// Patient search by hashed MBI, Last Updated, include MBI
    ///
    /// # Errors
    ///
    /// Returns whatever the MBI collaborator reports.
    pub async fn patient_test_hashed_mbi(&mut self) -> TaskResult { self.mbi.patient_test_hashed_mbi().await }

    /// Patient search by ID, Last Updated, include MBI, include Address
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn patient_test_id_last_updated_include_mbi_include_address(&mut self) -> TaskResult {
        self.bene
            .patient_test_id_last_updated_include_mbi_include_address()
            .await
    }

    /// Patient search by ID
    ///
    /// # Errors
    ///
    /// Returns whatever the beneficiary collaborator reports.
    pub async fn patient_test_id(&mut self) -> TaskResult { self.bene.patient_test_id().await }
}

#[async_trait]
impl<B, M, C> LoadUser for BfdUser<B, M, C>
where
    B: BeneficiaryBehavior,
    M: MbiBehavior,
    C: ContractBehavior,
{
    async fn run_task(&mut self, task: TaskId) -> TaskResult {
        match task {
            TaskId::CoverageTestIdCount => self.coverage_test_id_count().await,
            TaskId::CoverageTestIdLastUpdated => self.coverage_test_id_last_updated().await,
            TaskId::EobTestIdCountTypePde => self.eob_test_id_count_type_pde().await,
            TaskId::EobTestIdLastUpdatedCount => self.eob_test_id_last_updated_count().await,
            TaskId::EobTestIdIncludeTaxNumberLastUpdated => {
                self.eob_test_id_include_tax_number_last_updated().await
            }
            TaskId::EobTestIdLastUpdated => self.eob_test_id_last_updated().await,
            TaskId::EobTestId => self.eob_test_id().await,
            TaskId::PatientTestCoverageContract => self.patient_test_coverage_contract().await,
            TaskId::PatientTestHashedMbi => self.patient_test_hashed_mbi().await,
            TaskId::PatientTestIdLastUpdatedIncludeMbiIncludeAddress => {
                self.patient_test_id_last_updated_include_mbi_include_address()
                    .await
            }
            TaskId::PatientTestId => self.patient_test_id().await,
        }
    }

    fn end_on_no_data(&self) -> bool { self.end_on_no_data }
}
