//! V1 exercises keyed by beneficiary id.

use async_trait::async_trait;

use super::{BeneficiaryBehavior, PageQueue, paginated, single};
use crate::{
    client::{ApiClient, ApiRequest},
    data::{BeneId, DataPool},
    error::TaskResult,
    settings::ScenarioSettings,
};

const COVERAGE: &str = "/v1/fhir/Coverage/";
const EOB: &str = "/v1/fhir/ExplanationOfBenefit/";
const PATIENT: &str = "/v1/fhir/Patient/";

/// Beneficiary exercises against the V1 endpoints.
pub struct V1BeneficiaryTests<C> {
    client: C,
    ids: DataPool<BeneId>,
    last_updated: String,
    coverage_pages: PageQueue,
    eob_pde_pages: PageQueue,
    eob_last_updated_pages: PageQueue,
}

impl<C: ApiClient> V1BeneficiaryTests<C> {
    /// Create the exercises over `ids`, using the `_lastUpdated` cutoff from
    /// `settings`.
    #[must_use]
    pub fn new(client: C, settings: &ScenarioSettings, ids: DataPool<BeneId>) -> Self {
        Self {
            client,
            ids,
            last_updated: settings.last_updated().to_owned(),
            coverage_pages: PageQueue::default(),
            eob_pde_pages: PageQueue::default(),
            eob_last_updated_pages: PageQueue::default(),
        }
    }

    fn since(&self) -> String { format!("gt{}", self.last_updated) }
}

#[async_trait]
impl<C: ApiClient> BeneficiaryBehavior for V1BeneficiaryTests<C> {
    async fn coverage_test_id_count(&mut self) -> TaskResult {
        paginated(&self.client, &mut self.coverage_pages, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/Coverage search by id / count=10", COVERAGE)
                .query("beneficiary", id.to_string())
                .query("_count", "10")
        })
        .await
    }

    async fn coverage_test_id_last_updated(&mut self) -> TaskResult {
        let since = self.since();
        single(&self.client, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/Coverage search by id / lastUpdated", COVERAGE)
                .query("_lastUpdated", since)
                .query("beneficiary", id.to_string())
        })
        .await
    }

    async fn eob_test_id_count_type_pde(&mut self) -> TaskResult {
        paginated(&self.client, &mut self.eob_pde_pages, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/ExplanationOfBenefit search by id / type = PDE / count = 50", EOB)
                .query("_count", "50")
                .query("_format", "json")
                .query("_types", "PDE")
                .query("patient", id.to_string())
        })
        .await
    }

    async fn eob_test_id_last_updated_count(&mut self) -> TaskResult {
        let since = self.since();
        paginated(&self.client, &mut self.eob_last_updated_pages, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/ExplanationOfBenefit search by id / lastUpdated / count = 100", EOB)
                .query("_count", "100")
                .query("_format", "json")
                .query("_lastUpdated", since)
                .query("patient", id.to_string())
        })
        .await
    }

    async fn eob_test_id_include_tax_number_last_updated(&mut self) -> TaskResult {
        let since = self.since();
        single(&self.client, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/ExplanationOfBenefit search by id / lastUpdated / includeTaxNumbers", EOB)
                .query("_format", "json")
                .query("_lastUpdated", since)
                .query("excludeSAMHSA", "true")
                .query("patient", id.to_string())
                .header("IncludeTaxNumbers", "true")
        })
        .await
    }

    async fn eob_test_id_last_updated(&mut self) -> TaskResult {
        let since = self.since();
        single(&self.client, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/ExplanationOfBenefit search by id / lastUpdated", EOB)
                .query("_format", "json")
                .query("_lastUpdated", since)
                .query("excludeSAMHSA", "true")
                .query("patient", id.to_string())
        })
        .await
    }

    async fn eob_test_id(&mut self) -> TaskResult {
        single(&self.client, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/ExplanationOfBenefit search by id", EOB)
                .query("_format", "json")
                .query("patient", id.to_string())
        })
        .await
    }

    async fn patient_test_id_last_updated_include_mbi_include_address(&mut self) -> TaskResult {
        let since = self.since();
        single(&self.client, &self.ids, |id| {
            ApiRequest::get(
                "/v1/fhir/Patient search by id / lastUpdated / includeMbi / includeAddress",
                PATIENT,
            )
            .query("_id", id.to_string())
            .query("_lastUpdated", since)
            .query("_format", "json")
            .header("IncludeIdentifiers", "mbi")
            .header("IncludeAddressFields", "true")
        })
        .await
    }

    async fn patient_test_id(&mut self) -> TaskResult {
        single(&self.client, &self.ids, |id| {
            ApiRequest::get("/v1/fhir/Patient/id", format!("{PATIENT}{id}")).query("_format", "json")
        })
        .await
    }
}
