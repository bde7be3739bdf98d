//! Configuration for the analysis pipeline
//!
//! All configuration is read once at startup into an explicit
//! `AdvisorConfig` struct and passed down; nothing below the entry points
//! touches the environment.

use crate::error::{AdvisorError, Result};
use advisor_llm::providers::{
    AzureOpenAIConfig, AzureOpenAIProvider, OpenAIConfig, OpenAIProvider,
};
use advisor_llm::LlmProvider;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AZURE_MODEL: &str = "gpt-4o";

/// LLM backend selection
///
/// Azure OpenAI takes priority over plain OpenAI when both are configured.
#[derive(Debug, Clone)]
pub enum LlmBackend {
    /// OpenAI chat completions (or an OpenAI-compatible endpoint)
    OpenAI(OpenAIConfig),
    /// Azure OpenAI deployment
    Azure(AzureOpenAIConfig),
}

impl LlmBackend {
    /// Select a backend from environment variables
    ///
    /// Prefers a complete `AZURE_OPENAI_*` configuration, falls back to
    /// `OPENAI_API_KEY`, and errors when neither is present.
    pub fn from_env() -> Result<Self> {
        if let Ok(config) = AzureOpenAIConfig::from_env() {
            return Ok(LlmBackend::Azure(config));
        }

        if let Ok(config) = OpenAIConfig::from_env() {
            return Ok(LlmBackend::OpenAI(config));
        }

        Err(AdvisorError::ConfigError(
            "No valid LLM configuration found. Set either \
             AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_API_KEY, AZURE_OPENAI_DEPLOYMENT and \
             AZURE_OPENAI_API_VERSION, or OPENAI_API_KEY"
                .to_string(),
        ))
    }

    /// Build the provider for this backend
    pub fn build_provider(&self) -> Result<Arc<dyn LlmProvider>> {
        match self {
            LlmBackend::OpenAI(config) => {
                let provider = OpenAIProvider::with_config(config.clone())?;
                Ok(Arc::new(provider))
            }
            LlmBackend::Azure(config) => {
                let provider = AzureOpenAIProvider::with_config(config.clone())?;
                Ok(Arc::new(provider))
            }
        }
    }

    /// Default model name for this backend
    fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::OpenAI(_) => DEFAULT_OPENAI_MODEL,
            LlmBackend::Azure(_) => DEFAULT_AZURE_MODEL,
        }
    }
}

/// Configuration for the analysis pipeline
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Alpha Vantage API key
    pub alpha_vantage_api_key: String,

    /// Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,

    /// LLM backend to use for narration
    pub llm: LlmBackend,

    /// Model name passed to the provider (Azure ignores this; the
    /// deployment determines the model)
    pub model: String,

    /// Maximum tokens per narration
    pub max_tokens: usize,

    /// Sampling temperature for narration
    pub temperature: f32,

    /// Cache TTL for price data
    pub cache_ttl_price: Duration,

    /// Cache TTL for fundamental data
    pub cache_ttl_fundamental: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,
}

impl AdvisorConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Load the full configuration from environment variables
    ///
    /// Requires `ALPHA_VANTAGE_API_KEY` plus one complete LLM backend
    /// configuration. The model name comes from `AZURE_OPENAI_MODEL` or
    /// `OPENAI_MODEL` depending on the selected backend.
    pub fn from_env() -> Result<Self> {
        let alpha_vantage_api_key = std::env::var("ALPHA_VANTAGE_API_KEY").map_err(|_| {
            AdvisorError::ConfigError(
                "ALPHA_VANTAGE_API_KEY environment variable not set".to_string(),
            )
        })?;

        let llm = LlmBackend::from_env()?;

        let model_var = match llm {
            LlmBackend::Azure(_) => "AZURE_OPENAI_MODEL",
            LlmBackend::OpenAI(_) => "OPENAI_MODEL",
        };
        let model =
            std::env::var(model_var).unwrap_or_else(|_| llm.default_model().to_string());

        Self::builder()
            .alpha_vantage_api_key(alpha_vantage_api_key)
            .llm(llm)
            .model(model)
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.alpha_vantage_api_key.is_empty() {
            return Err(AdvisorError::ConfigError(
                "Alpha Vantage API key must not be empty".to_string(),
            ));
        }

        if self.alpha_vantage_rate_limit == 0 {
            return Err(AdvisorError::ConfigError(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(AdvisorError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AdvisorConfig
#[derive(Debug, Default)]
pub struct AdvisorConfigBuilder {
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
    llm: Option<LlmBackend>,
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    cache_ttl_price: Option<Duration>,
    cache_ttl_fundamental: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl AdvisorConfigBuilder {
    /// Set the Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set the Alpha Vantage rate limit (requests per minute)
    pub fn alpha_vantage_rate_limit(mut self, limit: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(limit);
        self
    }

    /// Set the LLM backend
    pub fn llm(mut self, backend: LlmBackend) -> Self {
        self.llm = Some(backend);
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum tokens per narration
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set cache TTL for price data
    pub fn cache_ttl_price(mut self, duration: Duration) -> Self {
        self.cache_ttl_price = Some(duration);
        self
    }

    /// Set cache TTL for fundamental data
    pub fn cache_ttl_fundamental(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamental = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AdvisorConfig> {
        let alpha_vantage_api_key = self.alpha_vantage_api_key.ok_or_else(|| {
            AdvisorError::ConfigError("Alpha Vantage API key not set".to_string())
        })?;
        let llm = self
            .llm
            .ok_or_else(|| AdvisorError::ConfigError("LLM backend not set".to_string()))?;

        let model = self
            .model
            .unwrap_or_else(|| llm.default_model().to_string());

        let config = AdvisorConfig {
            alpha_vantage_api_key,
            alpha_vantage_rate_limit: self.alpha_vantage_rate_limit.unwrap_or(5),
            llm,
            model,
            max_tokens: self.max_tokens.unwrap_or(1024),
            temperature: self.temperature.unwrap_or(0.7),
            cache_ttl_price: self.cache_ttl_price.unwrap_or(Duration::from_secs(300)),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(Duration::from_secs(3600)),
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_backend() -> LlmBackend {
        LlmBackend::OpenAI(OpenAIConfig::new("sk-test"))
    }

    #[test]
    fn test_builder_defaults() {
        let config = AdvisorConfig::builder()
            .alpha_vantage_api_key("av-key")
            .llm(test_backend())
            .build()
            .unwrap();

        assert_eq!(config.alpha_vantage_rate_limit, 5);
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.cache_ttl_fundamental, Duration::from_secs(3600));
    }

    #[test]
    fn test_builder_overrides() {
        let config = AdvisorConfig::builder()
            .alpha_vantage_api_key("av-key")
            .llm(test_backend())
            .model("gpt-4o")
            .max_tokens(2048)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = AdvisorConfig::builder().llm(test_backend()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = AdvisorConfig::builder()
            .alpha_vantage_api_key("")
            .llm(test_backend())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_azure_default_model() {
        let backend = LlmBackend::Azure(AzureOpenAIConfig::new(
            "https://x.openai.azure.com",
            "key",
            "deployment",
            "2024-06-01",
        ));
        let config = AdvisorConfig::builder()
            .alpha_vantage_api_key("av-key")
            .llm(backend)
            .build()
            .unwrap();
        assert_eq!(config.model, DEFAULT_AZURE_MODEL);
    }
}
