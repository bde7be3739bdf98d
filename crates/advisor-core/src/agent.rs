//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait implemented by every LLM-backed analysis agent
///
/// Input and output are intentionally kept as String for maximum
/// flexibility; concrete implementations parse/format as needed. The
/// pipeline is responsible for assembling the input (the agent never
/// fetches data itself).
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
