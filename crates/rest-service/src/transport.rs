//! Transport performing the actual HTTP call

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde_json::Value;

use crate::error::HttpError;
use crate::options::RequestOptions;

/// Status and decoded body returned by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response body; JSON when it parses as JSON, otherwise a string
    pub body: Value,
}

impl TransportResponse {
    /// Create a new response
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }

    /// Whether the status code marks an operational error
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// Async HTTP call primitive
///
/// Implementations perform exactly one request per call and enforce
/// [`RequestOptions::timeout`]. Any status code is a successful call.
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// Perform the request described by `options`
    async fn request(&self, options: &RequestOptions) -> Result<TransportResponse, HttpError>;
}

/// reqwest-based transport
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default reqwest client
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Create a transport from a configured reqwest client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    fn build(&self, options: &RequestOptions) -> Result<reqwest::RequestBuilder, HttpError> {
        let mut builder = self
            .inner
            .request(options.method.into(), &options.url)
            .timeout(Duration::from_millis(options.timeout));

        if let Some(headers) = &options.headers {
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        if let Some(form_data) = &options.form_data {
            builder = builder.multipart(multipart_form(form_data)?);
        } else if let Some(body) = &options.body {
            if options.json == Some(true) {
                builder = builder.json(body);
            } else {
                builder = builder.body(body_text(body));
            }
        }

        Ok(builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, options: &RequestOptions) -> Result<TransportResponse, HttpError> {
        let response = self.build(options)?.send().await?;
        let status_code = response.status().as_u16();
        let text = response.text().await?;

        Ok(TransportResponse::new(status_code, decode_body(text)))
    }
}

/// Decode a response body as JSON, falling back to the raw text
fn decode_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

/// Text form of a value, without quotes around strings
fn body_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Turn an object of fields into multipart text parts
fn multipart_form(form_data: &Value) -> Result<Form, HttpError> {
    let fields = form_data
        .as_object()
        .ok_or_else(|| HttpError::Build("formData must be an object".to_string()))?;

    Ok(fields
        .iter()
        .fold(Form::new(), |form, (name, value)| {
            form.text(name.clone(), body_text(value))
        }))
}
