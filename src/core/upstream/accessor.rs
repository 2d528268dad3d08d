//! Client accessor.
//!
//! Owns the shared upstream handle used in single-tenant deployments and
//! builds request-scoped handles for multi-tenant ones. The shared handle is
//! created lazily from configuration and only replaced through an explicit
//! [`ClientAccessor::rebind`] or [`ClientAccessor::invalidate`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::client::{Credentials, HttpSalesBuildrClient, SalesBuildrApi};
use super::error::{ClientError, UpstreamError};
use crate::core::config::{API_KEY_ENV, CredentialsConfig};

/// Builds API handles from credentials.
pub trait ClientFactory: Send + Sync {
    fn build(&self, credentials: &Credentials) -> Result<Arc<dyn SalesBuildrApi>, UpstreamError>;
}

/// Factory producing [`HttpSalesBuildrClient`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn build(&self, credentials: &Credentials) -> Result<Arc<dyn SalesBuildrApi>, UpstreamError> {
        Ok(Arc::new(HttpSalesBuildrClient::new(credentials)?))
    }
}

/// Which credentials a single tool call runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientScope {
    /// The process-wide handle built from configuration.
    Shared,

    /// A handle bound to one request's tenant key, read from `header`.
    Tenant {
        header: String,
        api_key: Option<String>,
    },
}

/// Lazily built, explicitly rebindable access to the SalesBuildr API.
pub struct ClientAccessor {
    settings: CredentialsConfig,
    factory: Arc<dyn ClientFactory>,
    shared: RwLock<Option<Arc<dyn SalesBuildrApi>>>,
}

impl ClientAccessor {
    /// Create an accessor producing HTTP clients.
    pub fn new(settings: CredentialsConfig) -> Self {
        Self::with_factory(settings, Arc::new(HttpClientFactory))
    }

    /// Create an accessor with a custom client factory.
    pub fn with_factory(settings: CredentialsConfig, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            settings,
            factory,
            shared: RwLock::new(None),
        }
    }

    /// Credentials for `api_key` using the configured endpoint.
    pub fn credentials_for(&self, api_key: impl Into<String>) -> Credentials {
        Credentials {
            api_key: api_key.into(),
            base_url: self.settings.base_url.clone(),
            timeout: Duration::from_secs(self.settings.timeout_secs),
        }
    }

    /// The shared handle, built from configuration on first use.
    pub async fn client(&self) -> Result<Arc<dyn SalesBuildrApi>, ClientError> {
        if let Some(client) = self.shared.read().await.as_ref() {
            return Ok(client.clone());
        }

        let mut shared = self.shared.write().await;
        if let Some(client) = shared.as_ref() {
            return Ok(client.clone());
        }

        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClientError::missing_credential(format!("set {}", API_KEY_ENV)))?;

        let client = self.factory.build(&self.credentials_for(api_key))?;
        info!("SalesBuildr client initialized");
        *shared = Some(client.clone());
        Ok(client)
    }

    /// Replace the shared handle with one built from `credentials`.
    pub async fn rebind(&self, credentials: Credentials) -> Result<(), ClientError> {
        let client = self.factory.build(&credentials)?;
        *self.shared.write().await = Some(client);
        info!("SalesBuildr client rebound");
        Ok(())
    }

    /// Drop the shared handle; the next call re-derives it from configuration.
    pub async fn invalidate(&self) {
        if self.shared.write().await.take().is_some() {
            debug!("SalesBuildr client invalidated");
        }
    }

    /// Build a handle for one request without touching the shared one.
    pub fn scoped(&self, header: &str, api_key: Option<&str>) -> Result<Arc<dyn SalesBuildrApi>, ClientError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClientError::missing_credential(format!("send the '{}' request header", header)))?;
        Ok(self.factory.build(&self.credentials_for(api_key))?)
    }

    /// Resolve the handle a call should use.
    pub async fn resolve(&self, scope: &ClientScope) -> Result<Arc<dyn SalesBuildrApi>, ClientError> {
        match scope {
            ClientScope::Shared => self.client().await,
            ClientScope::Tenant { header, api_key } => self.scoped(header, api_key.as_deref()),
        }
    }
}
