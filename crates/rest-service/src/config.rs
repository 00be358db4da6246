//! Client configuration

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Prefix of environment variables overlaid on file configuration
pub const ENV_PREFIX: &str = "RESTSVC";

/// Registry configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Header names every client forwards from caller headers
    #[serde(default, alias = "defaultHeaders")]
    pub default_headers: Vec<String>,
    /// Client definitions
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
}

/// Definition of one named client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Unique client type name
    #[serde(rename = "type")]
    pub client_type: String,
    /// Base URL prepended to every request path
    pub url: String,
    /// Whitelisted header names and static header values
    #[serde(default, alias = "headerCfg")]
    pub headers: Vec<HeaderEntry>,
}

impl ClientConfig {
    /// Client without header configuration
    pub fn new(client_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client_type: client_type.into(),
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a header entry
    pub fn with_header(mut self, entry: HeaderEntry) -> Self {
        self.headers.push(entry);
        self
    }
}

/// One item of a client's header configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    /// Header name allowed through from caller headers
    Name(String),
    /// Headers set on every request
    Values(BTreeMap<String, HeaderValue>),
}

/// Static header value as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Text value
    String(String),
    /// Numeric value
    Number(serde_json::Number),
    /// Boolean value
    Bool(bool),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::String(value) => write!(f, "{}", value),
            HeaderValue::Number(value) => write!(f, "{}", value),
            HeaderValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl RestConfig {
    /// Load configuration from a TOML or JSON file, chosen by extension
    ///
    /// Variables named `RESTSVC__<KEY>` override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
