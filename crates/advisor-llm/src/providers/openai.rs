//! OpenAI provider implementation
//!
//! This module implements the LlmProvider trait for OpenAI's chat models.
//! See: https://platform.openai.com/docs/api-reference/chat
//!
//! # Examples
//!
//! ```no_run
//! use advisor_llm::{CompletionRequest, Message, LlmProvider};
//! use advisor_llm::providers::OpenAIProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create provider from OPENAI_API_KEY environment variable
//!     let provider = OpenAIProvider::from_env()?;
//!
//!     let request = CompletionRequest::builder("gpt-4o-mini")
//!         .add_message(Message::user("Hello!"))
//!         .max_tokens(100)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.text());
//!
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, Result, Role, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for OpenAI provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the OpenAI API (default: "https://api.openai.com/v1")
    /// Can be customized for OpenAI-compatible APIs and local deployments.
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variable
    ///
    /// Reads the API key from `OPENAI_API_KEY`.
    /// Optionally reads base URL from `OPENAI_API_BASE` if set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            crate::LlmError::ConfigurationError(
                "OPENAI_API_KEY environment variable not set".to_string(),
            )
        })?;

        let api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_OPENAI_API_BASE.to_string());

        Ok(Self {
            api_key,
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI provider
///
/// Supports GPT chat models (gpt-4o, gpt-4o-mini, gpt-4-turbo, ...) and
/// OpenAI-compatible APIs through custom configuration.
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new OpenAI provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig::from_env()?;
        Self::with_config(config)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to OpenAI API at {}", self.config.api_base);

        let model = request.model.clone();
        let chat_request = build_chat_request(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(map_error_status(status.as_u16(), error_text, model));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            crate::LlmError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_chat_response(chat_response)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ============================================================================
// Chat completions wire types (shared with the Azure provider)
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    /// Omitted for Azure, where the deployment determines the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) model: Option<String>,
    pub(crate) messages: Vec<ChatMessage>,
    pub(crate) max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub(crate) role: String,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub(crate) choices: Vec<ChatChoice>,
    pub(crate) usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatResponseMessage,
    pub(crate) finish_reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseMessage {
    #[allow(dead_code)]
    pub(crate) role: String,
    pub(crate) content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatUsage {
    pub(crate) prompt_tokens: usize,
    pub(crate) completion_tokens: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// Build a chat completions request from our generic format
///
/// The system prompt goes into the messages array for this API family.
pub(crate) fn build_chat_request(request: &CompletionRequest) -> ChatRequest {
    let mut messages = Vec::new();

    if let Some(sys) = &request.system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: sys.clone(),
        });
    }

    for msg in &request.messages {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        messages.push(ChatMessage {
            role: role.to_string(),
            content: msg.content.clone(),
        });
    }

    ChatRequest {
        model: Some(request.model.clone()),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        stop: request.stop_sequences.clone(),
    }
}

/// Parse a chat completions response into our format
pub(crate) fn parse_chat_response(response: ChatResponse) -> Result<CompletionResponse> {
    // OpenAI can return multiple choices but we use the first
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        crate::LlmError::UnexpectedResponse("No choices in response".to_string())
    })?;

    debug!(
        "Received response - stop_reason: {}, tokens: {}/{}",
        choice.finish_reason, response.usage.prompt_tokens, response.usage.completion_tokens
    );

    let text = choice.message.content.unwrap_or_default();
    let stop_reason = map_stop_reason(&choice.finish_reason);

    Ok(CompletionResponse {
        message: Message::assistant(text),
        stop_reason,
        usage: TokenUsage {
            input_tokens: response.usage.prompt_tokens,
            output_tokens: response.usage.completion_tokens,
        },
    })
}

/// Map an HTTP error status to a typed error
pub(crate) fn map_error_status(status: u16, error_text: String, model: String) -> crate::LlmError {
    match status {
        401 => crate::LlmError::AuthenticationFailed,
        429 => crate::LlmError::RateLimitExceeded(error_text),
        400 => crate::LlmError::InvalidRequest(error_text),
        404 => crate::LlmError::ModelNotFound(model),
        _ => crate::LlmError::RequestFailed(format!("HTTP {status}: {error_text}")),
    }
}

/// Map an API stop reason to our format
pub(crate) fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::EndTurn,
        "length" => StopReason::MaxTokens,
        "content_filter" => {
            debug!("Content filtered by provider safety systems");
            StopReason::EndTurn
        }
        _ => {
            debug!("Unknown stop reason: {}", reason);
            StopReason::EndTurn
        }
    }
}
