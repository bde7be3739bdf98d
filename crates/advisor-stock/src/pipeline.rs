//! The analysis pipeline: fetch, classify, recommend, narrate
//!
//! The original multi-agent conversation is replaced by a plain function
//! pipeline. Data fetching and the recommendation are deterministic Rust;
//! the LLM contributes commentary only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::agents::{format_market_cap, format_number, FundamentalNarrator, TechnicalNarrator};
use crate::api::AlphaVantageClient;
use crate::cache::{CacheKey, CacheManager};
use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};
use crate::snapshot::MarketSnapshot;
use advisor_llm::LlmProvider;
use advisor_signals::{recommend, Verdict};

/// End-to-end analysis pipeline for one configured advisor instance
pub struct AnalysisPipeline {
    client: AlphaVantageClient,
    caches: CacheManager,
    fundamental: FundamentalNarrator,
    technical: TechnicalNarrator,
}

impl AnalysisPipeline {
    /// Create a pipeline, building the LLM provider from the configuration
    pub fn new(config: Arc<AdvisorConfig>) -> Result<Self> {
        let provider = config.llm.build_provider()?;
        Self::with_provider(config, provider)
    }

    /// Create a pipeline with an externally supplied provider
    ///
    /// This is the seam tests use to substitute a mock provider.
    pub fn with_provider(
        config: Arc<AdvisorConfig>,
        provider: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let client = AlphaVantageClient::new(
            &config.alpha_vantage_api_key,
            config.alpha_vantage_rate_limit,
            config.request_timeout,
        )?;
        let caches = CacheManager::new(config.cache_ttl_price, config.cache_ttl_fundamental);
        let fundamental = FundamentalNarrator::new(Arc::clone(&provider), &config);
        let technical = TechnicalNarrator::new(provider, &config);

        Ok(Self {
            client,
            caches,
            fundamental,
            technical,
        })
    }

    /// Run the full analysis for one symbol
    #[instrument(skip(self))]
    pub async fn analyze(&self, symbol: &str) -> Result<AnalysisReport> {
        let symbol = normalize_symbol(symbol)?;

        let snapshot = self.snapshot(&symbol).await?;
        let verdict = recommend(&snapshot.signals());

        tracing::info!(
            symbol = %symbol,
            recommendation = verdict.recommendation.label(),
            "Derived recommendation, requesting narration"
        );

        // Narration failures are request failures; the report is never
        // padded with fabricated commentary.
        let (fundamental, technical) = tokio::join!(
            self.fundamental.narrate(&snapshot),
            self.technical.narrate(&snapshot),
        );
        let fundamental_commentary = fundamental?;
        let technical_commentary = technical?;

        Ok(AnalysisReport {
            symbol,
            verdict,
            fundamental_commentary,
            technical_commentary,
            snapshot,
            generated_at: Utc::now(),
        })
    }

    /// Fetch the market snapshot for one symbol (cache-aware)
    ///
    /// Price history is required; a failed overview fetch degrades to
    /// missing fundamentals, which classify as Neutral downstream.
    pub async fn snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        let symbol = normalize_symbol(symbol)?;

        let bars = self
            .caches
            .price
            .get_or_fetch(CacheKey::new(&symbol, "daily"), || {
                self.client.get_daily(&symbol)
            })
            .await?;

        let overview = match self
            .caches
            .fundamental
            .get_or_fetch(CacheKey::new(&symbol, "overview"), || {
                self.client.get_company_overview(&symbol)
            })
            .await
        {
            Ok(overview) => Some(overview),
            Err(err) => {
                tracing::warn!(symbol = %symbol, error = %err, "Company overview unavailable");
                None
            }
        };

        MarketSnapshot::from_parts(symbol, bars, overview.as_ref())
    }
}

/// Normalize and validate a ticker symbol
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AdvisorError::InvalidSymbol("(empty)".to_string()));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(AdvisorError::InvalidSymbol(raw.to_string()));
    }
    Ok(symbol)
}

/// Result of one analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Normalized ticker symbol
    pub symbol: String,
    /// Recommendation with its contributing signals
    pub verdict: Verdict,
    /// LLM commentary on the fundamental picture
    pub fundamental_commentary: String,
    /// LLM commentary on the technical picture
    pub technical_commentary: String,
    /// The data the analysis was derived from
    pub snapshot: MarketSnapshot,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Render the report as Markdown
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "# {} Analysis: {}\n\n",
            self.symbol,
            self.verdict.recommendation.label()
        ));
        report.push_str(&format!(
            "Generated {} (data as of {})\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
            self.snapshot.as_of
        ));

        report.push_str("## Recommendation\n\n");
        report.push_str(&format!(
            "**{}** (fundamental outlook: {}, technical outlook: {})\n\n",
            self.verdict.recommendation.label(),
            self.verdict.fundamental_outlook.label(),
            self.verdict.technical_outlook.label()
        ));
        for signal in &self.verdict.signals {
            match &signal.detail {
                Some(detail) => report.push_str(&format!(
                    "- {}: {} ({})\n",
                    signal.kind.label(),
                    signal.polarity.label(),
                    detail
                )),
                None => report.push_str(&format!(
                    "- {}: {}\n",
                    signal.kind.label(),
                    signal.polarity.label()
                )),
            }
        }
        report.push('\n');

        report.push_str("## Fundamental Analysis\n\n");
        report.push_str(&self.fundamental_commentary);
        report.push_str("\n\n");

        report.push_str("## Technical Analysis\n\n");
        report.push_str(&self.technical_commentary);
        report.push_str("\n\n");

        report.push_str("## Key Metrics\n\n");
        report.push_str(&format!(
            "- Current price: ${:.2}\n",
            self.snapshot.current_price
        ));
        report.push_str(&format!(
            "- Market cap: {}\n",
            format_market_cap(self.snapshot.market_cap)
        ));
        report.push_str(&format!(
            "- P/E ratio: {}\n",
            format_number(self.snapshot.pe_ratio)
        ));
        report.push_str(&format!("- EPS: {}\n", format_number(self.snapshot.eps)));
        report.push_str(&format!(
            "- 50-day MA: {}\n",
            format_number(self.snapshot.ma50)
        ));
        report.push_str(&format!(
            "- 200-day MA: {}\n",
            format_number(self.snapshot.ma200)
        ));
        report.push_str(&format!(
            "- 14-day RSI: {}\n",
            format_number(self.snapshot.rsi14)
        ));
        report.push_str(&format!(
            "- Bollinger bands: {} / {}\n",
            format_number(self.snapshot.bollinger_upper),
            format_number(self.snapshot.bollinger_lower)
        ));

        report
    }
}
