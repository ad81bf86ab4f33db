//! V1 exercises keyed by Part D contract.

use async_trait::async_trait;

use super::{ContractBehavior, PageQueue, paginated};
use crate::{
    client::{ApiClient, ApiRequest},
    data::{ContractData, DataPool},
    error::TaskResult,
};

const CONTRACT_VARIABLE: &str = "https://bluebutton.cms.gov/resources/variables/ptdcntrct";
const REFERENCE_YEAR_VARIABLE: &str = "https://bluebutton.cms.gov/resources/variables/rfrnc_yr";

/// Contract exercises against the V1 endpoints.
pub struct V1ContractTests<C> {
    client: C,
    contracts: DataPool<ContractData>,
    pages: PageQueue,
}

impl<C: ApiClient> V1ContractTests<C> {
    /// Create the exercises over `contracts`.
    #[must_use]
    pub fn new(client: C, contracts: DataPool<ContractData>) -> Self {
        Self {
            client,
            contracts,
            pages: PageQueue::default(),
        }
    }
}

#[async_trait]
impl<C: ApiClient> ContractBehavior for V1ContractTests<C> {
    async fn patient_test_coverage_contract(&mut self) -> TaskResult {
        paginated(&self.client, &mut self.pages, &self.contracts, |contract| {
            ApiRequest::get("/v1/fhir/Patient search by coverage contract (all pages)", "/v1/fhir/Patient/")
                .query(
                    "_has:Coverage.extension",
                    format!("{CONTRACT_VARIABLE}{}|{}", contract.month, contract.id),
                )
                .query(
                    "_has:Coverage.rfrncyr",
                    format!("{REFERENCE_YEAR_VARIABLE}|{}", contract.year),
                )
                .query("_count", "25")
                .query("_format", "json")
                .header("IncludeIdentifiers", "mbi")
        })
        .await
    }
}
