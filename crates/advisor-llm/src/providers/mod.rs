//! LLM provider implementations

#[cfg(feature = "azure")]
pub mod azure;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "azure")]
pub use azure::{AzureOpenAIConfig, AzureOpenAIProvider};
#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};
