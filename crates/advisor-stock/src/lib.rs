//! Stock analysis pipeline for advisor-rs
//!
//! This crate assembles the full analysis flow as a plain function
//! pipeline:
//!
//! 1. Fetch daily prices and company fundamentals from Alpha Vantage
//!    (rate-limited, cached)
//! 2. Build a `MarketSnapshot` with computed indicators (50/200-day MA,
//!    14-day RSI, Bollinger Bands)
//! 3. Derive deterministic signals and apply the recommendation rule
//!    (`advisor-signals`)
//! 4. Ask the fundamental and technical narrators for LLM commentary
//! 5. Assemble an `AnalysisReport` and render the price chart
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_stock::{AdvisorConfig, AnalysisPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(AdvisorConfig::from_env()?);
//!     let pipeline = AnalysisPipeline::new(config)?;
//!
//!     let report = pipeline.analyze("AAPL").await?;
//!     println!("{}", report.format_report());
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod snapshot;

// Re-export main types for convenience
pub use agents::{FundamentalNarrator, TechnicalNarrator};
pub use config::{AdvisorConfig, LlmBackend};
pub use error::{AdvisorError, Result};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use snapshot::MarketSnapshot;
