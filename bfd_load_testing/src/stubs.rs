//! Stub collaborators recording into a shared call log.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use bfd_load::{
    BeneficiaryBehavior,
    BfdUser,
    ContractBehavior,
    MbiBehavior,
    TaskError,
    TaskResult,
};

/// Ordered record of collaborator calls, shared between stubs.
///
/// Entries read `role.method`, for example `bene.eob_test_id`.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, entry: String) { self.0.lock().unwrap_or_else(PoisonError::into_inner).push(entry); }

    /// Every call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<String> { self.0.lock().unwrap_or_else(PoisonError::into_inner).clone() }

    /// How many times `entry` was recorded.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize { self.calls().iter().filter(|c| *c == entry).count() }

    /// Total number of calls.
    #[must_use]
    pub fn len(&self) -> usize { self.0.lock().unwrap_or_else(PoisonError::into_inner).len() }

    /// Returns true if nothing was called.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Forget recorded calls.
    pub fn clear(&self) { self.0.lock().unwrap_or_else(PoisonError::into_inner).clear(); }
}

/// What a stubbed method does instead of succeeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Fail with [`TaskError::UnexpectedStatus`].
    Status(u16),
    /// Report [`TaskError::NoData`].
    NoData,
    /// Panic.
    Panic,
}

/// Stub implementing every capability trait.
#[derive(Clone, Debug)]
pub struct StubBehavior {
    role: &'static str,
    log: CallLog,
    faults: HashMap<&'static str, Fault>,
}

impl StubBehavior {
    /// Stub recording calls as `role.method` into `log`.
    #[must_use]
    pub fn new(role: &'static str, log: &CallLog) -> Self {
        Self {
            role,
            log: log.clone(),
            faults: HashMap::new(),
        }
    }

    /// Make `method` misbehave as described by `fault`.
    #[must_use]
    pub fn with_fault(mut self, method: &'static str, fault: Fault) -> Self {
        self.faults.insert(method, fault);
        self
    }

    fn call(&self, method: &'static str) -> TaskResult {
        self.log.push(format!("{}.{method}", self.role));
        match self.faults.get(method) {
            None => Ok(()),
            Some(Fault::Status(status)) => Err(TaskError::UnexpectedStatus {
                name: method,
                status: *status,
            }),
            Some(Fault::NoData) => Err(TaskError::NoData(self.role)),
            Some(Fault::Panic) => panic!("stub {} panicked in {method}", self.role),
        }
    }
}

#[async_trait]
impl BeneficiaryBehavior for StubBehavior {
    async fn coverage_test_id_count(&mut self) -> TaskResult { self.call("coverage_test_id_count") }

    async fn coverage_test_id_last_updated(&mut self) -> TaskResult {
        self.call("coverage_test_id_last_updated")
    }

    async fn eob_test_id_count_type_pde(&mut self) -> TaskResult { self.call("eob_test_id_count_type_pde") }

    async fn eob_test_id_last_updated_count(&mut self) -> TaskResult {
        self.call("eob_test_id_last_updated_count")
    }

    async fn eob_test_id_include_tax_number_last_updated(&mut self) -> TaskResult {
        self.call("eob_test_id_include_tax_number_last_updated")
    }

    async fn eob_test_id_last_updated(&mut self) -> TaskResult { self.call("eob_test_id_last_updated") }

    async fn eob_test_id(&mut self) -> TaskResult { self.call("eob_test_id") }

    async fn patient_test_id_last_updated_include_mbi_include_address(&mut self) -> TaskResult {
        self.call("patient_test_id_last_updated_include_mbi_include_address")
    }

    async fn patient_test_id(&mut self) -> TaskResult { self.call("patient_test_id") }
}

#[async_trait]
impl MbiBehavior for StubBehavior {
    async fn patient_test_hashed_mbi(&mut self) -> TaskResult { self.call("patient_test_hashed_mbi") }
}

#[async_trait]
impl ContractBehavior for StubBehavior {
    async fn patient_test_coverage_contract(&mut self) -> TaskResult {
        self.call("patient_test_coverage_contract")
    }
}

/// User built entirely from stubs.
pub type StubUser = BfdUser<StubBehavior, StubBehavior, StubBehavior>;

/// Build a user whose collaborators record into `log` under the roles
/// `bene`, `mbi` and `contract`.
#[must_use]
pub fn stub_user(log: &CallLog) -> StubUser {
    BfdUser::new(
        StubBehavior::new("bene", log),
        StubBehavior::new("mbi", log),
        StubBehavior::new("contract", log),
    )
}
