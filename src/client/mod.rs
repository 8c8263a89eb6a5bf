//! Client interface and implementation for the Perplexity service.

use crate::auth::PerplexityAuth;
use crate::config::PerplexityConfig;
use crate::errors::PerplexityResult;
use crate::services::ask::{AskService, AskServiceImpl};
use crate::stealth::HeaderGenerator;
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;

/// Trait defining the main Perplexity client interface
pub trait PerplexityClient: Send + Sync {
    /// Access the conversational search service
    fn ask(&self) -> Arc<dyn AskService>;
}

/// Implementation of the Perplexity client
pub struct PerplexityClientImpl {
    config: Arc<PerplexityConfig>,
    transport: Arc<dyn HttpTransport>,
    ask_service: Arc<dyn AskService>,
}

impl PerplexityClientImpl {
    /// Create a new client from configuration and credentials
    pub fn new(config: PerplexityConfig, auth: PerplexityAuth) -> PerplexityResult<Self> {
        let config = Arc::new(config);
        let base_url = config.parsed_base_url()?;

        let transport =
            Arc::new(ReqwestTransport::new(config.timeout)?) as Arc<dyn HttpTransport>;

        let header_gen = HeaderGenerator::new(config.device_id.clone(), config.language.clone());

        let ask_service = Arc::new(AskServiceImpl::new(
            transport.clone(),
            auth,
            header_gen,
            base_url,
            config.language.clone(),
            config.timezone.clone(),
        )) as Arc<dyn AskService>;

        Ok(Self {
            config,
            transport,
            ask_service,
        })
    }

    /// Create a new client with a custom transport (for testing)
    pub fn with_transport(
        config: PerplexityConfig,
        auth: PerplexityAuth,
        transport: Arc<dyn HttpTransport>,
    ) -> PerplexityResult<Self> {
        let config = Arc::new(config);
        let base_url = config.parsed_base_url()?;

        let header_gen = HeaderGenerator::new(config.device_id.clone(), config.language.clone());

        let ask_service = Arc::new(AskServiceImpl::new(
            transport.clone(),
            auth,
            header_gen,
            base_url,
            config.language.clone(),
            config.timezone.clone(),
        )) as Arc<dyn AskService>;

        Ok(Self {
            config,
            transport,
            ask_service,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &PerplexityConfig {
        &self.config
    }

    /// Get the transport
    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        self.transport.clone()
    }
}

impl PerplexityClient for PerplexityClientImpl {
    fn ask(&self) -> Arc<dyn AskService> {
        self.ask_service.clone()
    }
}

/// Create a new Perplexity client from configuration with anonymous credentials
pub fn create_client(config: PerplexityConfig) -> PerplexityResult<PerplexityClientImpl> {
    PerplexityClientImpl::new(config, PerplexityAuth::anonymous())
}

/// Create a new Perplexity client from environment variables
pub fn create_client_from_env() -> PerplexityResult<PerplexityClientImpl> {
    let config = PerplexityConfig::from_env()?;
    create_client(config)
}
