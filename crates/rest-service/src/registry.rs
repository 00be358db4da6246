//! Registry of named client factories

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::client::RestClient;
use crate::config::{ClientConfig, RestConfig};
use crate::error::{Error, Result};
use crate::headers::{HeaderPolicy, Headers};
use crate::transport::Transport;

/// Creates clients of one configured type
#[derive(Debug, Clone)]
pub struct ClientFactory {
    client_type: String,
    base_url: String,
    policy: HeaderPolicy,
    transport: Arc<dyn Transport>,
}

impl ClientFactory {
    /// Client type name
    pub fn client_type(&self) -> &str {
        &self.client_type
    }

    /// Base URL of created clients
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Header rules applied to created clients
    pub fn header_policy(&self) -> &HeaderPolicy {
        &self.policy
    }

    /// Create a client, keeping only the caller headers this type allows
    pub fn create(&self, headers: Option<&Headers>) -> RestClient {
        RestClient::new(
            self.base_url.clone(),
            self.policy.merge(headers),
            Arc::clone(&self.transport),
        )
    }
}

/// Client type name to factory mapping
///
/// Populated by [`RestRegistry::init`] and emptied by [`RestRegistry::reset`]; each
/// `init` starts a new generation with no entries carried over.
#[derive(Debug)]
pub struct RestRegistry {
    transport: Arc<dyn Transport>,
    default_headers: Vec<String>,
    factories: BTreeMap<String, ClientFactory>,
}

impl RestRegistry {
    /// Create an empty registry whose clients share `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            default_headers: Vec::new(),
            factories: BTreeMap::new(),
        }
    }

    /// Create a registry and initialize it from `config`
    pub fn from_config(transport: Arc<dyn Transport>, config: RestConfig) -> Result<Self> {
        let mut registry = Self::new(transport);
        registry.init(config)?;
        Ok(registry)
    }

    /// Register one factory per configured client, replacing all previous entries
    ///
    /// Fails without modifying the registry when two clients share a type name or a
    /// client has an empty type name or URL.
    pub fn init(&mut self, config: RestConfig) -> Result<()> {
        validate(&config.clients)?;

        let factories = config
            .clients
            .iter()
            .map(|client| {
                let factory = ClientFactory {
                    client_type: client.client_type.clone(),
                    base_url: client.url.clone(),
                    policy: HeaderPolicy::new(&config.default_headers, &client.headers),
                    transport: Arc::clone(&self.transport),
                };
                (client.client_type.clone(), factory)
            })
            .collect();

        self.factories = factories;
        self.default_headers = config.default_headers;

        tracing::debug!(
            "Registered REST clients: {:?}",
            self.factories.keys().collect::<Vec<_>>()
        );

        Ok(())
    }

    /// Remove every registered client
    pub fn reset(&mut self) {
        self.factories.clear();
        self.default_headers.clear();
    }

    /// Factory registered under `client_type`
    pub fn get(&self, client_type: &str) -> Option<&ClientFactory> {
        self.factories.get(client_type)
    }

    /// Create a client of `client_type` with the given caller headers
    pub fn client(&self, client_type: &str, headers: Option<&Headers>) -> Result<RestClient> {
        self.get(client_type)
            .map(|factory| factory.create(headers))
            .ok_or_else(|| Error::UnknownClient(client_type.to_string()))
    }

    /// Whether a client type is registered
    pub fn contains(&self, client_type: &str) -> bool {
        self.factories.contains_key(client_type)
    }

    /// Registered client type names, sorted
    pub fn client_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Header names forwarded by every client
    pub fn default_headers(&self) -> &[String] {
        &self.default_headers
    }

    /// Number of registered client types
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no client type is registered
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

fn validate(clients: &[ClientConfig]) -> Result<()> {
    let mut seen = HashSet::new();

    for client in clients {
        if client.client_type.is_empty() {
            return Err(Error::InvalidConfig("client type must not be empty".to_string()));
        }
        if client.url.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "client {} has no url",
                client.client_type
            )));
        }
        if !seen.insert(client.client_type.as_str()) {
            return Err(Error::DuplicateClient(client.client_type.clone()));
        }
    }

    Ok(())
}
