//! Request model and the client seam used by the V1 behaviors.
//!
//! Behaviors describe what to ask the BFD Server as an [`ApiRequest`] and hand
//! it to an [`ApiClient`]. How the request travels (HTTP stack, TLS, URL
//! encoding) is the client's concern. [`DryRunClient`] answers every request
//! with `200` and logs it, which is enough to exercise a scenario end to end.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::ClientError;

/// A single GET against the BFD Server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    name: &'static str,
    path: String,
    query: Vec<(&'static str, String)>,
    headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// Start a request against `path`, reported under `name`.
    #[must_use]
    pub fn get(name: &'static str, path: impl Into<String>) -> Self {
        Self {
            name,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter. Parameters keep insertion order.
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Append a request header.
    #[must_use]
    pub fn header(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((key, value.into()));
        self
    }

    /// Request for a next-page `link`, keeping this request's name and
    /// headers.
    #[must_use]
    pub fn follow(&self, link: impl Into<String>) -> Self {
        Self {
            name: self.name,
            path: link.into(),
            query: Vec::new(),
            headers: self.headers.clone(),
        }
    }

    /// Name used to group statistics for this request.
    #[must_use]
    pub fn name(&self) -> &'static str { self.name }

    /// Path component, or the full link for a followed page.
    #[must_use]
    pub fn path(&self) -> &str { &self.path }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(&'static str, String)] { &self.query }

    /// Request headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(&'static str, String)] { &self.headers }

    /// Look up a query parameter by key.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name, ignoring ASCII case.
    #[must_use]
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Render path and query as `path?k=v&...` without percent-encoding.
    #[must_use]
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path)
    }
}

/// The parts of a response the behaviors act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Link to the next page of a paginated bundle.
    pub next_page: Option<String>,
}

impl ApiResponse {
    /// A `200` response without further pages.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: 200,
            next_page: None,
        }
    }

    /// A response with the given status and no further pages.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            next_page: None,
        }
    }

    /// A `200` response pointing at another page.
    #[must_use]
    pub fn with_next(link: impl Into<String>) -> Self {
        Self {
            status: 200,
            next_page: Some(link.into()),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// Issues requests against the BFD Server.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Perform `request` and return the response summary.
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError>;
}

#[async_trait]
impl<C: ApiClient + ?Sized> ApiClient for Arc<C> {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        (**self).get(request).await
    }
}

/// Client that logs each request and answers `200`.
#[derive(Clone, Debug)]
pub struct DryRunClient {
    host: String,
}

impl DryRunClient {
    /// Create a client reporting requests against `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl ApiClient for DryRunClient {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        info!(
            name = request.name(),
            uri = %format_args!("{}{}", self.host, request.uri()),
            headers = ?request.headers(),
            "dry-run request"
        );
        Ok(ApiResponse::ok())
    }
}
