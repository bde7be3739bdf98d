//! LLM narrator agents for the analysis pipeline

mod fundamental;
mod narrator;
mod technical;

pub use fundamental::FundamentalNarrator;
pub use narrator::{Narrator, NarratorConfig};
pub use technical::TechnicalNarrator;

/// Format an optional dollar amount, "unavailable" when missing
pub(crate) fn format_money(value: Option<f64>) -> String {
    value.map_or_else(|| "unavailable".to_string(), |v| format!("${v:.2}"))
}

/// Format an optional plain number, "unavailable" when missing
pub(crate) fn format_number(value: Option<f64>) -> String {
    value.map_or_else(|| "unavailable".to_string(), |v| format!("{v:.2}"))
}

/// Format an optional market cap with a T/B/M suffix
pub(crate) fn format_market_cap(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 1.0e12 => format!("${:.2}T", v / 1.0e12),
        Some(v) if v >= 1.0e9 => format!("${:.2}B", v / 1.0e9),
        Some(v) if v >= 1.0e6 => format!("${:.2}M", v / 1.0e6),
        Some(v) => format!("${v:.0}"),
        None => "unavailable".to_string(),
    }
}
