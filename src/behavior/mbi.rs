//! V1 exercises keyed by hashed MBI.

use async_trait::async_trait;

use super::{MbiBehavior, single};
use crate::{
    client::{ApiClient, ApiRequest},
    data::{DataPool, HashedMbi},
    error::TaskResult,
    settings::ScenarioSettings,
};

/// Identifier system for hashed MBIs.
pub const MBI_HASH_SYSTEM: &str = "https://bluebutton.cms.gov/resources/identifier/mbi-hash";

/// Hashed-MBI exercises against the V1 endpoints.
pub struct V1MbiTests<C> {
    client: C,
    mbis: DataPool<HashedMbi>,
    last_updated: String,
}

impl<C: ApiClient> V1MbiTests<C> {
    /// Create the exercises over `mbis`.
    #[must_use]
    pub fn new(client: C, settings: &ScenarioSettings, mbis: DataPool<HashedMbi>) -> Self {
        Self {
            client,
            mbis,
            last_updated: settings.last_updated().to_owned(),
        }
    }
}

#[async_trait]
impl<C: ApiClient> MbiBehavior for V1MbiTests<C> {
    async fn patient_test_hashed_mbi(&mut self) -> TaskResult {
        let since = format!("gt{}", self.last_updated);
        single(&self.client, &self.mbis, |hash| {
            ApiRequest::get("/v1/fhir/Patient search by hashed mbi / includeIdentifiers = mbi", "/v1/fhir/Patient/")
                .query("identifier", format!("{MBI_HASH_SYSTEM}|{hash}"))
                .query("_lastUpdated", since)
                .query("_format", "json")
                .header("IncludeIdentifiers", "mbi")
        })
        .await
    }
}
