//! Technical narration agent

use advisor_core::{Agent, Context, Result};
use advisor_llm::LlmProvider;
use async_trait::async_trait;
use std::sync::Arc;

use super::narrator::{Narrator, NarratorConfig};
use crate::config::AdvisorConfig;
use crate::snapshot::MarketSnapshot;

const SYSTEM_PROMPT: &str = r#"You are an equity technical analyst.

You will be given a stock's current price, its 50-day and 200-day moving
averages, 14-day RSI, and Bollinger Bands. Describe the trend and momentum
the indicators show.

Guidelines:
1. Reference the specific figures you were given
2. Say explicitly when an indicator is unavailable; never invent a value
3. Keep the commentary to a few concise sentences
4. Stay within what the indicators support - do not issue a buy or sell call
"#;

/// Agent that narrates the technical picture of a snapshot
pub struct TechnicalNarrator {
    agent: Narrator,
}

impl TechnicalNarrator {
    /// Create a new technical narrator
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AdvisorConfig) -> Self {
        let narrator_config = NarratorConfig {
            model: config.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        Self {
            agent: Narrator::new(provider, narrator_config, "technical-narrator".to_string()),
        }
    }

    /// Produce technical commentary for a snapshot
    pub async fn narrate(&self, snapshot: &MarketSnapshot) -> crate::error::Result<String> {
        self.agent
            .complete(format_input(snapshot))
            .await
            .map_err(crate::error::AdvisorError::from)
    }
}

/// Format the technical indicators into the narrator input
fn format_input(snapshot: &MarketSnapshot) -> String {
    format!(
        "Technical data for {} as of {}:\n\
         - Current price: ${:.2}\n\
         - 50-day MA: {}\n\
         - 200-day MA: {}\n\
         - 14-day RSI: {}\n\
         - Bollinger upper band: {}\n\
         - Bollinger lower band: {}",
        snapshot.symbol,
        snapshot.as_of,
        snapshot.current_price,
        super::format_number(snapshot.ma50),
        super::format_number(snapshot.ma200),
        super::format_number(snapshot.rsi14),
        super::format_number(snapshot.bollinger_upper),
        super::format_number(snapshot.bollinger_lower),
    )
}

#[async_trait]
impl Agent for TechnicalNarrator {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        "TechnicalNarrator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::synthetic_bars;

    #[test]
    fn test_format_input_with_full_history() {
        let bars = synthetic_bars(250, |i| 100.0 + i as f64 * 0.5);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, None).unwrap();

        let input = format_input(&snapshot);
        assert!(input.contains("TEST"));
        assert!(input.contains("50-day MA:"));
        assert!(!input.contains("50-day MA: unavailable"));
    }

    #[test]
    fn test_format_input_short_history() {
        let bars = synthetic_bars(10, |i| 100.0 + i as f64);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, None).unwrap();

        let input = format_input(&snapshot);
        assert!(input.contains("200-day MA: unavailable"));
        assert!(input.contains("14-day RSI: unavailable"));
    }
}
