//! Request options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::headers::Headers;

/// Timeout applied to every request unless a client overrides it, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Key marking a body as multipart form data
pub const FORM_DATA_KEY: &str = "formData";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl Method {
    /// Lowercase method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "delete" => Ok(Method::Delete),
            "head" => Ok(Method::Head),
            "options" => Ok(Method::Options),
            _ => Err(format!("Unknown HTTP method: {}", s)),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// Everything the transport needs to perform one request
///
/// Serializes to `{url, method, json?, timeout, body?, formData?, headers?}`, with
/// absent fields omitted rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Absolute request URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Whether the body is sent and the response read as JSON; unset for multipart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Request timeout in milliseconds
    pub timeout: u64,
    /// JSON request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Multipart form fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<Value>,
    /// Outgoing headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
}

impl RequestOptions {
    /// Build options for `method` on `base_url` + `path`
    ///
    /// A `body` that is an object carrying a `formData` key produces a multipart request
    /// with that nested value as its fields; any other body is sent as JSON.
    pub fn build(
        base_url: &str,
        path: &str,
        method: Method,
        body: Option<Value>,
        headers: Option<Headers>,
        timeout: u64,
    ) -> Self {
        let mut options = Self {
            url: format!("{}{}", base_url, path),
            method,
            json: None,
            timeout,
            body: None,
            form_data: None,
            headers,
        };

        match body {
            Some(Value::Object(mut fields)) if fields.contains_key(FORM_DATA_KEY) => {
                options.form_data = fields.remove(FORM_DATA_KEY);
            }
            body => {
                options.json = Some(true);
                options.body = body;
            }
        }

        options
    }

    /// Whether this is a multipart request
    pub fn is_multipart(&self) -> bool {
        self.form_data.is_some()
    }
}
