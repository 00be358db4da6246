//! Named REST clients
//!
//! A [`RestRegistry`] maps client type names to factories carrying a base URL and
//! header rules. Clients created from it build [`RequestOptions`] for each call and
//! dispatch them through a [`Transport`], turning responses with status >= 400 into
//! [`OperationalError`]s.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rest_service::{ReqwestTransport, RestConfig, RestRegistry};
//! use serde_json::json;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RestConfig::from_json(
//!         r#"{ "clients": [{ "type": "wongnai", "url": "http://example.com" }] }"#,
//!     )?;
//!     let registry = RestRegistry::from_config(Arc::new(ReqwestTransport::new()), config)?;
//!
//!     let client = registry.client("wongnai", None)?;
//!     let response = client.post("/reviews", Some(json!({ "rating": 5 }))).await?;
//!     println!("{}", response.body);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod headers;
mod options;
mod registry;
mod transport;

pub use client::{RestClient, RestResponse};
pub use crate::config::{ClientConfig, HeaderEntry, HeaderValue, RestConfig, ENV_PREFIX};
pub use error::{Error, HttpError, OperationalError, RequestError, Result};
pub use headers::{HeaderPolicy, Headers};
pub use options::{Method, RequestOptions, DEFAULT_TIMEOUT_MS, FORM_DATA_KEY};
pub use registry::{ClientFactory, RestRegistry};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
