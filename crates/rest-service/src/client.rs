//! REST client instance and request dispatch

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use crate::error::{OperationalError, RequestError};
use crate::headers::Headers;
use crate::options::{Method, RequestOptions, DEFAULT_TIMEOUT_MS};
use crate::transport::Transport;

/// Successful response of a dispatched request
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    /// HTTP status code, always below 400
    pub status_code: u16,
    /// Response body
    pub body: Value,
}

/// Client bound to one base URL and one header set
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    headers: Option<Headers>,
    timeout: u64,
    transport: Arc<dyn Transport>,
}

impl RestClient {
    /// Create a client
    ///
    /// Most callers obtain clients from a [`RestRegistry`](crate::RestRegistry) instead.
    pub fn new(
        base_url: impl Into<String>,
        headers: Option<Headers>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            headers,
            timeout: DEFAULT_TIMEOUT_MS,
            transport,
        }
    }

    /// Override the request timeout, in milliseconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL prepended to request paths
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request, if any
    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Request timeout in milliseconds
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Build the options a request for `path` would be sent with
    ///
    /// `body` is sent as JSON, unless it is an object with a `formData` key, in
    /// which case that value becomes the multipart fields.
    pub fn get_options(&self, path: &str, method: Method, body: Option<Value>) -> RequestOptions {
        RequestOptions::build(
            &self.base_url,
            path,
            method,
            body,
            self.headers.clone(),
            self.timeout,
        )
    }

    /// GET `path`
    pub async fn get(&self, path: &str) -> Result<RestResponse, RequestError> {
        self.request(Method::Get, path, None).await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> Result<RestResponse, RequestError> {
        self.request(Method::Delete, path, None).await
    }

    /// POST `body` to `path`
    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<RestResponse, RequestError> {
        self.request(Method::Post, path, body).await
    }

    /// PUT `body` to `path`
    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<RestResponse, RequestError> {
        self.request(Method::Put, path, body).await
    }

    /// PATCH `body` to `path`
    pub async fn patch(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> Result<RestResponse, RequestError> {
        self.request(Method::Patch, path, body).await
    }

    /// Send one request and normalize the outcome
    ///
    /// A status of 400 or above is returned as [`RequestError::Operational`];
    /// transport failures are passed through as [`RequestError::Transport`].
    #[instrument(skip(self, body), fields(base_url = %self.base_url))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<RestResponse, RequestError> {
        let options = self.get_options(path, method, body);
        tracing::debug!("Sending {} request to {}", options.method, options.url);

        let response = self.transport.request(&options).await?;

        if response.is_error() {
            tracing::warn!(
                "Request {} {} failed with status {}",
                options.method,
                options.url,
                response.status_code
            );
            return Err(OperationalError {
                status_code: response.status_code,
                body: response.body,
            }
            .into());
        }

        Ok(RestResponse {
            status_code: response.status_code,
            body: response.body,
        })
    }
}
