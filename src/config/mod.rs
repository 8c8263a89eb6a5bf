//! Configuration types for the Perplexity API client.

use crate::errors::{PerplexityError, PerplexityResult};
use crate::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_SECS, DEFAULT_TIMEZONE};
use std::time::Duration;

/// Configuration for the Perplexity API client.
#[derive(Debug, Clone)]
pub struct PerplexityConfig {
    /// Base URL for the Perplexity service
    pub base_url: String,
    /// Timeout bounding one whole ask exchange
    pub timeout: Duration,
    /// Accept-Language value sent with every request
    pub language: String,
    /// IANA timezone echoed in request parameters
    pub timezone: String,
    /// Device identifier; a fresh one is generated when absent
    pub device_id: Option<String>,
}

impl PerplexityConfig {
    /// Creates a new configuration builder
    pub fn builder() -> PerplexityConfigBuilder {
        PerplexityConfigBuilder::default()
    }

    /// Creates a configuration from environment variables
    pub fn from_env() -> PerplexityResult<Self> {
        let base_url =
            std::env::var("PERPLEXITY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("PERPLEXITY_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let language =
            std::env::var("PERPLEXITY_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

        let timezone =
            std::env::var("PERPLEXITY_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());

        let device_id = std::env::var("PERPLEXITY_DEVICE_ID").ok();

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            language,
            timezone,
            device_id,
        })
    }

    /// Validates the configuration, returning the parsed base URL.
    pub fn parsed_base_url(&self) -> PerplexityResult<url::Url> {
        url::Url::parse(&self.base_url).map_err(|e| PerplexityError::Configuration {
            message: format!("Invalid base URL '{}': {}", self.base_url, e),
        })
    }
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            language: DEFAULT_LANGUAGE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            device_id: None,
        }
    }
}

/// Builder for PerplexityConfig
#[derive(Default)]
pub struct PerplexityConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    language: Option<String>,
    timezone: Option<String>,
    device_id: Option<String>,
}

impl PerplexityConfigBuilder {
    /// Sets the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the exchange timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the Accept-Language value
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the timezone
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Sets the device identifier
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Builds the configuration
    pub fn build(self) -> PerplexityResult<PerplexityConfig> {
        let config = PerplexityConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timezone: self.timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            device_id: self.device_id,
        };

        config.parsed_base_url()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = PerplexityConfig::builder().build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert!(config.device_id.is_none());
    }

    #[test]
    fn test_config_builder_custom() {
        let config = PerplexityConfig::builder()
            .base_url("https://staging.example.com")
            .timeout(Duration::from_secs(120))
            .language("en-US")
            .timezone("America/New_York")
            .device_id("ios:test-device")
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.language, "en-US");
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.device_id.as_deref(), Some("ios:test-device"));
    }

    #[test]
    fn test_config_builder_rejects_bad_url() {
        let result = PerplexityConfig::builder().base_url("not a url").build();
        assert!(result.is_err());
    }
}
