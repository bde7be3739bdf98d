//! LLM provider abstraction for advisor-rs
//!
//! Defines the provider-neutral chat types (`Message`, `CompletionRequest`,
//! `CompletionResponse`) and the `LlmProvider` trait, plus concrete
//! providers behind feature flags:
//!
//! - `openai` - OpenAI chat completions (also works with OpenAI-compatible
//!   endpoints via a custom base URL)
//! - `azure` - Azure OpenAI deployments (endpoint + deployment + api-version)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, StopReason, TokenUsage,
};
pub use error::{LlmError, Result};
pub use messages::{Message, Role};
pub use provider::LlmProvider;
