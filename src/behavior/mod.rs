//! Capability traits implemented by the collaborators of [`crate::user::BfdUser`].
//!
//! Each trait groups the exercises backed by one test-data domain:
//! beneficiary ids, hashed MBIs, and Part D contracts. The V1
//! implementations in the submodules turn the next pool row into an
//! [`ApiRequest`] and send it through an [`ApiClient`].

use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    client::{ApiClient, ApiRequest, ApiResponse},
    data::DataPool,
    error::{TaskError, TaskResult},
};

mod bene;
mod contract;
mod mbi;

pub use bene::V1BeneficiaryTests;
pub use contract::V1ContractTests;
pub use mbi::V1MbiTests;

/// Exercises keyed by beneficiary id.
#[async_trait]
pub trait BeneficiaryBehavior: Send {
    /// Coverage search by ID, paginated.
    async fn coverage_test_id_count(&mut self) -> TaskResult;
    /// Coverage search by ID, last updated.
    async fn coverage_test_id_last_updated(&mut self) -> TaskResult;
    /// Explanation of Benefit search by ID, type PDE, paginated.
    async fn eob_test_id_count_type_pde(&mut self) -> TaskResult;
    /// Explanation of Benefit search by ID, last updated, paginated.
    async fn eob_test_id_last_updated_count(&mut self) -> TaskResult;
    /// Explanation of Benefit search by ID, last updated, include tax numbers.
    async fn eob_test_id_include_tax_number_last_updated(&mut self) -> TaskResult;
    /// Explanation of Benefit search by ID, last updated.
    async fn eob_test_id_last_updated(&mut self) -> TaskResult;
    /// Explanation of Benefit search by ID.
    async fn eob_test_id(&mut self) -> TaskResult;
    /// Patient search by ID, last updated, include MBI, include address.
    async fn patient_test_id_last_updated_include_mbi_include_address(&mut self) -> TaskResult;
    /// Patient search by ID.
    async fn patient_test_id(&mut self) -> TaskResult;
}

/// Exercises keyed by hashed MBI.
#[async_trait]
pub trait MbiBehavior: Send {
    /// Patient search by hashed MBI.
    async fn patient_test_hashed_mbi(&mut self) -> TaskResult;
}

/// Exercises keyed by Part D contract.
#[async_trait]
pub trait ContractBehavior: Send {
    /// Patient search by coverage contract, following every page.
    async fn patient_test_coverage_contract(&mut self) -> TaskResult;
}

/// Next-page requests waiting to be issued by one paginated exercise.
#[derive(Debug, Default)]
pub(crate) struct PageQueue(VecDeque<ApiRequest>);

impl PageQueue {
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize { self.0.len() }
}

/// Send `request`, treating non-2xx responses as failures.
async fn send<C: ApiClient + ?Sized>(client: &C, request: &ApiRequest) -> Result<ApiResponse, TaskError> {
    debug!(name = request.name(), uri = %request.uri(), "issuing request");
    let response = client.get(request).await?;
    if response.is_success() {
        Ok(response)
    } else {
        Err(TaskError::UnexpectedStatus {
            name: request.name(),
            status: response.status,
        })
    }
}

/// Run a single-page exercise against the next row of `pool`.
async fn single<C, T, F>(client: &C, pool: &DataPool<T>, build: F) -> TaskResult
where
    C: ApiClient + ?Sized,
    T: Clone,
    F: FnOnce(T) -> ApiRequest,
{
    let row = pool.next_row().ok_or(TaskError::NoData(pool.name()))?;
    send(client, &build(row)).await.map(drop)
}

/// Run a paginated exercise.
///
/// Pending next-page links are drained before a new row is drawn. A response
/// carrying another link queues it for the next invocation.
async fn paginated<C, T, F>(client: &C, pages: &mut PageQueue, pool: &DataPool<T>, build: F) -> TaskResult
where
    C: ApiClient + ?Sized,
    T: Clone,
    F: FnOnce(T) -> ApiRequest,
{
    let request = match pages.0.pop_front() {
        Some(request) => request,
        None => build(pool.next_row().ok_or(TaskError::NoData(pool.name()))?),
    };
    let response = send(client, &request).await?;
    if let Some(link) = response.next_page {
        pages.0.push_back(request.follow(link));
    }
    Ok(())
}
