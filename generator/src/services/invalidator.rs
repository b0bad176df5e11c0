//! Cache invalidation services

use async_trait::async_trait;
use url::Url;

use shared::{component_info, ComponentId, InvalidationNotice, ScopeKey};

use crate::error::{GeneratorError, GeneratorResult, InvalidationError};
use crate::traits::CacheInvalidator;

/// Invalidator that only records the scope keys in the log
#[derive(Debug, Default, Clone)]
pub struct LoggingCacheInvalidator;

#[async_trait]
impl CacheInvalidator for LoggingCacheInvalidator {
    async fn invalidate(&self, scope_keys: &[ScopeKey]) -> Result<(), InvalidationError> {
        let keys: Vec<String> = scope_keys.iter().map(ToString::to_string).collect();
        component_info!(ComponentId::Invalidator, "🧹 Invalidate scopes: {}", keys.join(", "));
        Ok(())
    }
}

/// Invalidator posting an `InvalidationNotice` to a cache service endpoint
#[derive(Debug, Clone)]
pub struct HttpCacheInvalidator {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpCacheInvalidator {
    pub fn new(endpoint: &str) -> GeneratorResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| GeneratorError::config(format!("invalid invalidation URL '{endpoint}': {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(GeneratorError::config(format!(
                "invalidation URL must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CacheInvalidator for HttpCacheInvalidator {
    async fn invalidate(&self, scope_keys: &[ScopeKey]) -> Result<(), InvalidationError> {
        let notice = InvalidationNotice::new(scope_keys.to_vec());

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&notice)
            .send()
            .await
            .map_err(|e| InvalidationError::Transport { message: e.to_string() })?;

        if !response.status().is_success() {
            return Err(InvalidationError::Rejected {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

/// Invalidator chosen at startup from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredInvalidator {
    Logging(LoggingCacheInvalidator),
    Http(HttpCacheInvalidator),
}

impl ConfiguredInvalidator {
    /// HTTP when an endpoint is configured, logging otherwise
    pub fn from_endpoint(endpoint: Option<&str>) -> GeneratorResult<Self> {
        match endpoint {
            Some(url) => Ok(ConfiguredInvalidator::Http(HttpCacheInvalidator::new(url)?)),
            None => Ok(ConfiguredInvalidator::Logging(LoggingCacheInvalidator)),
        }
    }
}

#[async_trait]
impl CacheInvalidator for ConfiguredInvalidator {
    async fn invalidate(&self, scope_keys: &[ScopeKey]) -> Result<(), InvalidationError> {
        match self {
            ConfiguredInvalidator::Logging(inner) => inner.invalidate(scope_keys).await,
            ConfiguredInvalidator::Http(inner) => inner.invalidate(scope_keys).await,
        }
    }
}
