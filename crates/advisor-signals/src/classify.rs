//! Threshold classifiers that normalize raw indicator values into signals
//!
//! The thresholds are fixed, documented constants so the classification is
//! deterministic and explainable. A missing input produces an unavailable
//! (Neutral) signal, never an error.

use crate::signal::{Polarity, Signal, SignalKind};

/// P/E at or below this (with positive EPS) reads as reasonably valued
pub const PE_VALUE_BAND_MAX: f64 = 25.0;

/// P/E above this reads as stretched regardless of EPS
pub const PE_STRETCHED_MIN: f64 = 40.0;

/// RSI above this reads as overbought
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// RSI below this reads as oversold
pub const RSI_OVERSOLD: f64 = 30.0;

/// Classify the valuation signal from P/E ratio and EPS
///
/// Positive when EPS is positive and P/E sits in (0, 25]; Negative when
/// EPS is negative or P/E exceeds 40; Neutral in between or when the data
/// needed for a call is missing.
pub fn valuation(pe_ratio: Option<f64>, eps: Option<f64>) -> Signal {
    if let Some(e) = eps {
        if e < 0.0 {
            return Signal::new(SignalKind::Valuation, Polarity::Negative)
                .with_detail(format!("EPS {e:.2} is negative"));
        }
    }

    match pe_ratio {
        Some(pe) if pe > PE_STRETCHED_MIN => {
            Signal::new(SignalKind::Valuation, Polarity::Negative)
                .with_detail(format!("P/E {pe:.1} exceeds the {PE_STRETCHED_MIN:.0}x ceiling"))
        }
        Some(pe) if pe > 0.0 && pe <= PE_VALUE_BAND_MAX => match eps {
            Some(e) if e > 0.0 => Signal::new(SignalKind::Valuation, Polarity::Positive)
                .with_detail(format!("P/E {pe:.1} with EPS {e:.2} is within the value band")),
            _ => Signal::new(SignalKind::Valuation, Polarity::Neutral)
                .with_detail(format!("P/E {pe:.1} but EPS unavailable")),
        },
        Some(pe) => Signal::new(SignalKind::Valuation, Polarity::Neutral)
            .with_detail(format!("P/E {pe:.1} is neither cheap nor stretched")),
        None => Signal::unavailable(SignalKind::Valuation),
    }
}

/// Classify the trend signal from the 50-day and 200-day moving averages
///
/// Positive when the short average is above the long one, Negative when
/// below, Neutral when equal or when either window lacks history.
pub fn trend(ma50: Option<f64>, ma200: Option<f64>) -> Signal {
    match (ma50, ma200) {
        (Some(short), Some(long)) => {
            if short > long {
                Signal::new(SignalKind::Trend, Polarity::Positive).with_detail(format!(
                    "50-day MA {short:.2} above 200-day MA {long:.2}"
                ))
            } else if short < long {
                Signal::new(SignalKind::Trend, Polarity::Negative).with_detail(format!(
                    "50-day MA {short:.2} below 200-day MA {long:.2}"
                ))
            } else {
                Signal::new(SignalKind::Trend, Polarity::Neutral)
                    .with_detail(format!("50-day and 200-day MA both at {short:.2}"))
            }
        }
        _ => Signal::unavailable(SignalKind::Trend),
    }
}

/// Classify the momentum signal from the 14-day RSI
///
/// Below 30 is oversold (a mean-reversion entry, Positive), above 70 is
/// overbought (Negative), in between is Neutral.
pub fn momentum(rsi: Option<f64>) -> Signal {
    match rsi {
        Some(value) if value > RSI_OVERBOUGHT => {
            Signal::new(SignalKind::Momentum, Polarity::Negative)
                .with_detail(format!("RSI {value:.1} is overbought"))
        }
        Some(value) if value < RSI_OVERSOLD => {
            Signal::new(SignalKind::Momentum, Polarity::Positive)
                .with_detail(format!("RSI {value:.1} is oversold"))
        }
        Some(value) => Signal::new(SignalKind::Momentum, Polarity::Neutral)
            .with_detail(format!("RSI {value:.1} is in the neutral range")),
        None => Signal::unavailable(SignalKind::Momentum),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation_value_band() {
        let signal = valuation(Some(18.0), Some(6.1));
        assert_eq!(signal.polarity, Polarity::Positive);
        assert!(signal.detail.as_deref().unwrap_or_default().contains("18.0"));
    }

    #[test]
    fn test_valuation_stretched() {
        let signal = valuation(Some(55.0), Some(2.0));
        assert_eq!(signal.polarity, Polarity::Negative);
    }

    #[test]
    fn test_valuation_negative_eps_dominates() {
        // Negative earnings flag the valuation regardless of P/E
        let signal = valuation(Some(12.0), Some(-1.5));
        assert_eq!(signal.polarity, Polarity::Negative);

        let signal = valuation(None, Some(-0.3));
        assert_eq!(signal.polarity, Polarity::Negative);
    }

    #[test]
    fn test_valuation_middle_band_neutral() {
        let signal = valuation(Some(32.0), Some(4.0));
        assert_eq!(signal.polarity, Polarity::Neutral);
    }

    #[test]
    fn test_valuation_cheap_pe_without_eps_is_neutral() {
        let signal = valuation(Some(15.0), None);
        assert_eq!(signal.polarity, Polarity::Neutral);
    }

    #[test]
    fn test_valuation_missing_is_neutral() {
        let signal = valuation(None, None);
        assert_eq!(signal.polarity, Polarity::Neutral);
        assert_eq!(signal.detail.as_deref(), Some("data unavailable"));
    }

    #[test]
    fn test_trend_crosses() {
        assert_eq!(
            trend(Some(192.0), Some(175.0)).polarity,
            Polarity::Positive
        );
        assert_eq!(
            trend(Some(150.0), Some(175.0)).polarity,
            Polarity::Negative
        );
        assert_eq!(trend(Some(175.0), Some(175.0)).polarity, Polarity::Neutral);
    }

    #[test]
    fn test_trend_short_history_is_neutral() {
        assert_eq!(trend(Some(192.0), None).polarity, Polarity::Neutral);
        assert_eq!(trend(None, None).polarity, Polarity::Neutral);
    }

    #[test]
    fn test_momentum_thresholds() {
        assert_eq!(momentum(Some(75.0)).polarity, Polarity::Negative);
        assert_eq!(momentum(Some(25.0)).polarity, Polarity::Positive);
        assert_eq!(momentum(Some(50.0)).polarity, Polarity::Neutral);
        // Boundary values are not yet over/oversold
        assert_eq!(momentum(Some(70.0)).polarity, Polarity::Neutral);
        assert_eq!(momentum(Some(30.0)).polarity, Polarity::Neutral);
    }

    #[test]
    fn test_momentum_missing_is_neutral() {
        assert_eq!(momentum(None).polarity, Polarity::Neutral);
    }
}
