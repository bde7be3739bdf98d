//! Recommendation decision table

use serde::{Deserialize, Serialize};

use crate::outlook::outlook;
use crate::signal::{Polarity, Signal, SignalCategory};

/// Final closed-set output label of the decision rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Fundamental and technical outlooks are both positive
    StrongBuy,
    /// Mixed, neutral, or undetermined outlooks
    Hold,
    /// Fundamental and technical outlooks are both negative
    Sell,
}

impl Recommendation {
    /// Combine the two category outlooks with the fixed decision table
    pub fn from_outlooks(fundamental: Polarity, technical: Polarity) -> Self {
        match (fundamental, technical) {
            (Polarity::Positive, Polarity::Positive) => Recommendation::StrongBuy,
            (Polarity::Negative, Polarity::Negative) => Recommendation::Sell,
            _ => Recommendation::Hold,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
        }
    }
}

/// Outcome of the rule for one request: the label plus the inputs that
/// produced it, for human-readable reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Final label
    pub recommendation: Recommendation,
    /// Aggregated polarity across fundamental signals
    pub fundamental_outlook: Polarity,
    /// Aggregated polarity across technical signals
    pub technical_outlook: Polarity,
    /// The signals that determined the outcome, details included
    pub signals: Vec<Signal>,
}

/// Apply the recommendation rule to a set of signals
///
/// Splits signals by category, aggregates each side independently, and
/// combines the outlooks with the decision table. Total over all inputs:
/// an empty slice and all-neutral inputs yield Hold.
pub fn recommend(signals: &[Signal]) -> Verdict {
    let fundamental_outlook = outlook(
        signals
            .iter()
            .filter(|s| s.category() == SignalCategory::Fundamental),
    );
    let technical_outlook = outlook(
        signals
            .iter()
            .filter(|s| s.category() == SignalCategory::Technical),
    );

    Verdict {
        recommendation: Recommendation::from_outlooks(fundamental_outlook, technical_outlook),
        fundamental_outlook,
        technical_outlook,
        signals: signals.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalKind;

    fn signal(kind: SignalKind, polarity: Polarity) -> Signal {
        Signal::new(kind, polarity)
    }

    #[test]
    fn test_decision_table() {
        use Polarity::{Negative, Neutral, Positive};
        use Recommendation::{Hold, Sell, StrongBuy};

        assert_eq!(Recommendation::from_outlooks(Positive, Positive), StrongBuy);
        assert_eq!(Recommendation::from_outlooks(Negative, Negative), Sell);

        // Every other combination holds
        for fundamental in [Positive, Neutral, Negative] {
            for technical in [Positive, Neutral, Negative] {
                let expected = match (fundamental, technical) {
                    (Positive, Positive) => StrongBuy,
                    (Negative, Negative) => Sell,
                    _ => Hold,
                };
                assert_eq!(
                    Recommendation::from_outlooks(fundamental, technical),
                    expected
                );
            }
        }
    }

    #[test]
    fn test_all_positive_is_strong_buy() {
        let signals = vec![
            signal(SignalKind::Valuation, Polarity::Positive),
            signal(SignalKind::Trend, Polarity::Positive),
            signal(SignalKind::Momentum, Polarity::Positive),
        ];
        let verdict = recommend(&signals);
        assert_eq!(verdict.recommendation, Recommendation::StrongBuy);
        assert_eq!(verdict.fundamental_outlook, Polarity::Positive);
        assert_eq!(verdict.technical_outlook, Polarity::Positive);
    }

    #[test]
    fn test_negative_lean_is_sell() {
        // Technical side leans negative by majority despite a neutral
        // momentum reading; fundamental side is negative outright.
        let signals = vec![
            signal(SignalKind::Valuation, Polarity::Negative),
            signal(SignalKind::Trend, Polarity::Negative),
            signal(SignalKind::Momentum, Polarity::Neutral),
        ];
        let verdict = recommend(&signals);
        assert_eq!(verdict.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_mixed_is_hold() {
        let signals = vec![
            signal(SignalKind::Valuation, Polarity::Positive),
            signal(SignalKind::Trend, Polarity::Negative),
            signal(SignalKind::Momentum, Polarity::Neutral),
        ];
        let verdict = recommend(&signals);
        assert_eq!(verdict.recommendation, Recommendation::Hold);
    }

    #[test]
    fn test_empty_input_is_hold() {
        let verdict = recommend(&[]);
        assert_eq!(verdict.recommendation, Recommendation::Hold);
        assert_eq!(verdict.fundamental_outlook, Polarity::Neutral);
        assert_eq!(verdict.technical_outlook, Polarity::Neutral);
    }

    #[test]
    fn test_idempotent() {
        let signals = vec![
            signal(SignalKind::Valuation, Polarity::Positive),
            signal(SignalKind::Trend, Polarity::Positive),
            signal(SignalKind::Momentum, Polarity::Negative),
        ];
        assert_eq!(recommend(&signals), recommend(&signals));
    }

    #[test]
    fn test_unavailable_equivalent_to_neutral() {
        let with_unavailable = vec![
            signal(SignalKind::Valuation, Polarity::Negative),
            signal(SignalKind::Trend, Polarity::Negative),
            Signal::unavailable(SignalKind::Momentum),
        ];
        let with_neutral = vec![
            signal(SignalKind::Valuation, Polarity::Negative),
            signal(SignalKind::Trend, Polarity::Negative),
            signal(SignalKind::Momentum, Polarity::Neutral),
        ];
        assert_eq!(
            recommend(&with_unavailable).recommendation,
            recommend(&with_neutral).recommendation
        );
    }

    #[test]
    fn test_signals_passed_through() {
        let signals = vec![
            signal(SignalKind::Valuation, Polarity::Positive).with_detail("P/E 18.0"),
        ];
        let verdict = recommend(&signals);
        assert_eq!(verdict.signals.len(), 1);
        assert_eq!(verdict.signals[0].detail.as_deref(), Some("P/E 18.0"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Recommendation::StrongBuy.label(), "Strong Buy");
        assert_eq!(Recommendation::Hold.label(), "Hold");
        assert_eq!(Recommendation::Sell.label(), "Sell");
    }
}
