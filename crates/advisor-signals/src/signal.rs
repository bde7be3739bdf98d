//! Signal types: polarity, kind, category

use serde::{Deserialize, Serialize};

/// Three-valued sentiment of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Supports buying
    Positive,
    /// No directional information
    Neutral,
    /// Supports selling
    Negative,
}

impl Polarity {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Neutral => "neutral",
            Polarity::Negative => "negative",
        }
    }
}

/// Analysis side a signal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    /// Company valuation and financials
    Fundamental,
    /// Price action and indicators
    Technical,
}

/// Tracked indicator a signal is derived from
///
/// The set is extensible: adding a kind only requires assigning it a
/// category, the aggregation policy does not change shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// P/E ratio and EPS relative to a heuristic threshold
    Valuation,
    /// 50-day vs 200-day moving average
    Trend,
    /// 14-day RSI relative to overbought/oversold thresholds
    Momentum,
}

impl SignalKind {
    /// Category this kind contributes to
    pub fn category(&self) -> SignalCategory {
        match self {
            SignalKind::Valuation => SignalCategory::Fundamental,
            SignalKind::Trend | SignalKind::Momentum => SignalCategory::Technical,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Valuation => "Valuation",
            SignalKind::Trend => "Trend",
            SignalKind::Momentum => "Momentum",
        }
    }
}

/// A categorized directional observation derived from one indicator
///
/// The optional detail string is opaque to the decision rule; it is
/// carried through for human-readable reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Indicator this signal is derived from
    pub kind: SignalKind,
    /// Direction of the observation
    pub polarity: Polarity,
    /// Human-readable justification, passed through to reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Signal {
    /// Create a new signal
    pub fn new(kind: SignalKind, polarity: Polarity) -> Self {
        Self {
            kind,
            polarity,
            detail: None,
        }
    }

    /// Attach a human-readable detail string
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Signal for an indicator whose underlying data is unavailable
    ///
    /// Unavailable data is Neutral for aggregation purposes. It still
    /// participates in the outlook so the rule stays total over all
    /// reachable inputs.
    pub fn unavailable(kind: SignalKind) -> Self {
        Self::new(kind, Polarity::Neutral).with_detail("data unavailable")
    }

    /// Category this signal contributes to
    pub fn category(&self) -> SignalCategory {
        self.kind.category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        assert_eq!(SignalKind::Valuation.category(), SignalCategory::Fundamental);
        assert_eq!(SignalKind::Trend.category(), SignalCategory::Technical);
        assert_eq!(SignalKind::Momentum.category(), SignalCategory::Technical);
    }

    #[test]
    fn test_unavailable_is_neutral() {
        let signal = Signal::unavailable(SignalKind::Valuation);
        assert_eq!(signal.polarity, Polarity::Neutral);
        assert_eq!(signal.detail.as_deref(), Some("data unavailable"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let signal = Signal::new(SignalKind::Trend, Polarity::Positive)
            .with_detail("50-day MA above 200-day MA");
        let json = serde_json::to_string(&signal).unwrap();
        assert!(json.contains("\"trend\""));
        assert!(json.contains("\"positive\""));

        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signal);
    }
}
