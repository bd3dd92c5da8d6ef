//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{FacetSearchClient, ProductClient};
use crate::error::TransportResult;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;

/// Open Food Facts API client
///
/// Holds the configuration and one shared transport. Cloning is cheap and
/// clones share the transport's connection pool.
#[derive(Clone)]
pub struct OpenFoodClient {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

impl OpenFoodClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> TransportResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> TransportResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a caller-provided transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Default user-agent tag for barcode lookups
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    /// Default comment for submissions
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.config.comment
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access facet search endpoints
    #[must_use]
    pub fn facets(&self) -> FacetSearchClient {
        FacetSearchClient::new(Arc::clone(&self.transport))
    }

    /// Access product lookup and submission endpoints
    #[must_use]
    pub fn products(&self) -> ProductClient {
        ProductClient::new(Arc::clone(&self.transport))
    }
}
