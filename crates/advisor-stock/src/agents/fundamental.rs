//! Fundamental narration agent

use advisor_core::{Agent, Context, Result};
use advisor_llm::LlmProvider;
use async_trait::async_trait;
use std::sync::Arc;

use super::narrator::{Narrator, NarratorConfig};
use crate::config::AdvisorConfig;
use crate::snapshot::MarketSnapshot;

const SYSTEM_PROMPT: &str = r#"You are an equity fundamental analyst.

You will be given a company's valuation metrics: market capitalization,
P/E ratio, and EPS. Assess whether the stock looks undervalued, fairly
valued, or overvalued based on those numbers.

Guidelines:
1. Reference the specific figures you were given
2. Say explicitly when a metric is unavailable; never invent a figure
3. Keep the commentary to a few concise sentences
4. Describe valuation only - do not issue a buy or sell call
"#;

/// Agent that narrates the fundamental picture of a snapshot
pub struct FundamentalNarrator {
    agent: Narrator,
}

impl FundamentalNarrator {
    /// Create a new fundamental narrator
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AdvisorConfig) -> Self {
        let narrator_config = NarratorConfig {
            model: config.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        Self {
            agent: Narrator::new(provider, narrator_config, "fundamental-narrator".to_string()),
        }
    }

    /// Produce fundamental commentary for a snapshot
    pub async fn narrate(&self, snapshot: &MarketSnapshot) -> crate::error::Result<String> {
        self.agent
            .complete(format_input(snapshot))
            .await
            .map_err(crate::error::AdvisorError::from)
    }
}

/// Format the fundamental metrics into the narrator input
fn format_input(snapshot: &MarketSnapshot) -> String {
    format!(
        "Fundamental data for {} as of {}:\n\
         - Current price: {}\n\
         - Market cap: {}\n\
         - P/E ratio: {}\n\
         - EPS: {}",
        snapshot.symbol,
        snapshot.as_of,
        super::format_money(Some(snapshot.current_price)),
        super::format_market_cap(snapshot.market_cap),
        super::format_number(snapshot.pe_ratio),
        super::format_number(snapshot.eps),
    )
}

#[async_trait]
impl Agent for FundamentalNarrator {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        "FundamentalNarrator"
    }
}
