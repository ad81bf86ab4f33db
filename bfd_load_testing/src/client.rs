//! An [`ApiClient`] that records requests and replays scripted responses.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use bfd_load::{ApiClient, ApiRequest, ApiResponse, ClientError};

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<ApiRequest>,
    script: VecDeque<ApiResponse>,
}

/// Records every request. Answers from its script in order, then `200`.
#[derive(Clone, Debug, Default)]
pub struct RecordingClient(Arc<Mutex<Inner>>);

impl RecordingClient {
    /// Client answering `200` to everything.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Client answering with `responses` before falling back to `200`.
    #[must_use]
    pub fn scripted(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
        let client = Self::default();
        client.push_responses(responses);
        client
    }

    /// Append responses to the script.
    pub fn push_responses(&self, responses: impl IntoIterator<Item = ApiResponse>) {
        self.lock().script.extend(responses);
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> { self.lock().requests.clone() }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<ApiRequest> { self.lock().requests.last().cloned() }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ApiClient for RecordingClient {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut inner = self.lock();
        inner.requests.push(request.clone());
        Ok(inner.script.pop_front().unwrap_or_else(ApiResponse::ok))
    }
}
