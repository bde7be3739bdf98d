//! Single-completion narrator agent
//!
//! A narrator is the simplest possible agent: one system prompt, one user
//! message, one completion. The pipeline supplies all market data in the
//! input; narrators never fetch anything and never decide the
//! recommendation label.

use advisor_core::{Agent, Context, Result};
use advisor_llm::{CompletionRequest, LlmProvider, Message};
use async_trait::async_trait;
use std::sync::Arc;

/// Configuration for a narrator agent
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

/// An agent that produces commentary through a single LLM completion
pub struct Narrator {
    provider: Arc<dyn LlmProvider>,
    config: NarratorConfig,
    name: String,
}

impl Narrator {
    /// Create a new narrator
    pub fn new(provider: Arc<dyn LlmProvider>, config: NarratorConfig, name: String) -> Self {
        Self {
            provider,
            config,
            name,
        }
    }

    /// Get the narrator's configuration
    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Run one completion, keeping the provider's typed error
    pub async fn complete(&self, input: String) -> advisor_llm::Result<String> {
        let request = CompletionRequest::builder(&self.config.model)
            .messages(vec![Message::user(input)])
            .system(self.config.system_prompt.clone())
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        Ok(response.message.text().to_string())
    }
}

#[async_trait]
impl Agent for Narrator {
    async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
        self.complete(input)
            .await
            .map_err(|e| advisor_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
