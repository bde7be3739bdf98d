//! Azure OpenAI provider implementation
//!
//! Azure OpenAI speaks the same chat completions protocol as OpenAI but is
//! addressed by resource endpoint + deployment name + api-version, and
//! authenticates with an `api-key` header instead of a bearer token.
//! See: https://learn.microsoft.com/azure/ai-services/openai/reference

use crate::{CompletionRequest, CompletionResponse, LlmProvider, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use super::openai::{build_chat_request, map_error_status, parse_chat_response, ChatResponse};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for Azure OpenAI provider
#[derive(Debug, Clone)]
pub struct AzureOpenAIConfig {
    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com"
    pub endpoint: String,

    /// API key for authentication
    pub api_key: String,

    /// Deployment name (determines the model)
    pub deployment: String,

    /// API version query parameter, e.g. "2024-06-01"
    pub api_version: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl AzureOpenAIConfig {
    /// Create a new config
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Requires `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`,
    /// `AZURE_OPENAI_DEPLOYMENT`, and `AZURE_OPENAI_API_VERSION`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| {
                crate::LlmError::ConfigurationError(format!(
                    "{name} environment variable not set"
                ))
            })
        };

        Ok(Self {
            endpoint: var("AZURE_OPENAI_ENDPOINT")?,
            api_key: var("AZURE_OPENAI_API_KEY")?,
            deployment: var("AZURE_OPENAI_DEPLOYMENT")?,
            api_version: var("AZURE_OPENAI_API_VERSION")?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full chat completions URL for this deployment
    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Azure OpenAI provider
pub struct AzureOpenAIProvider {
    client: Client,
    config: AzureOpenAIConfig,
}

impl AzureOpenAIProvider {
    /// Create a new Azure OpenAI provider with custom configuration
    pub fn with_config(config: AzureOpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from the `AZURE_OPENAI_*` environment variables
    pub fn from_env() -> Result<Self> {
        let config = AzureOpenAIConfig::from_env()?;
        Self::with_config(config)
    }

    /// Get the current configuration
    pub fn config(&self) -> &AzureOpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAIProvider {
    #[instrument(skip(self, request), fields(deployment = %self.config.deployment))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!(
            "Sending request to Azure OpenAI deployment {}",
            self.config.deployment
        );

        // The deployment determines the model on Azure
        let mut chat_request = build_chat_request(&request);
        chat_request.model = None;

        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(map_error_status(
                status.as_u16(),
                error_text,
                self.config.deployment.clone(),
            ));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            crate::LlmError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_chat_response(chat_response)
    }

    fn name(&self) -> &'static str {
        "azure-openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let config = AzureOpenAIConfig::new(
            "https://my-resource.openai.azure.com/",
            "key",
            "gpt-4o",
            "2024-06-01",
        );
        assert_eq!(
            config.completions_url(),
            "https://my-resource.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_provider_name() {
        let config = AzureOpenAIConfig::new("https://x.openai.azure.com", "k", "d", "v");
        let provider = AzureOpenAIProvider::with_config(config).unwrap();
        assert_eq!(provider.name(), "azure-openai");
    }
}
