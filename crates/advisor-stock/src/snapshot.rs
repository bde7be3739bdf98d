//! Market snapshot with computed technical indicators

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ta::indicators::{BollingerBands, RelativeStrengthIndex, SimpleMovingAverage};
use ta::Next;

use crate::api::{CompanyOverview, DailyBar};
use crate::error::{AdvisorError, Result};
use advisor_signals::{classify, Signal};

/// Moving average windows used for the trend signal
pub const MA_SHORT_WINDOW: usize = 50;
pub const MA_LONG_WINDOW: usize = 200;

/// RSI window used for the momentum signal
pub const RSI_WINDOW: usize = 14;

/// Bollinger band parameters
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;

/// A point-in-time view of one stock: latest price, fundamentals, and the
/// technical indicators computed from the daily close history
///
/// Indicator fields are `None` when the history is shorter than their
/// window; downstream classification treats that as a Neutral signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    /// Date of the most recent bar
    pub as_of: NaiveDate,
    /// Most recent close price
    pub current_price: f64,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    /// 50-day simple moving average
    pub ma50: Option<f64>,
    /// 200-day simple moving average
    pub ma200: Option<f64>,
    /// 14-day relative strength index
    pub rsi14: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    /// Ascending daily history used for indicators and charting
    pub history: Vec<DailyBar>,
}

impl MarketSnapshot {
    /// Build a snapshot from a daily series and optional fundamentals
    ///
    /// The bars must be sorted ascending by date. An empty series is an
    /// error; missing fundamentals are not (they surface as `None`).
    pub fn from_parts(
        symbol: impl Into<String>,
        bars: Vec<DailyBar>,
        overview: Option<&CompanyOverview>,
    ) -> Result<Self> {
        let symbol = symbol.into();
        let last = bars.last().ok_or_else(|| AdvisorError::DataUnavailable {
            symbol: symbol.clone(),
            reason: "No price history available".to_string(),
        })?;

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();

        let ma50 = sma(&closes, MA_SHORT_WINDOW)?;
        let ma200 = sma(&closes, MA_LONG_WINDOW)?;
        let rsi14 = rsi(&closes, RSI_WINDOW)?;
        let bollinger = bollinger(&closes, BOLLINGER_WINDOW, BOLLINGER_MULTIPLIER)?;

        Ok(Self {
            symbol,
            as_of: last.date,
            current_price: last.close,
            market_cap: overview.and_then(|o| o.market_cap),
            pe_ratio: overview.and_then(|o| o.pe_ratio),
            eps: overview.and_then(|o| o.eps),
            ma50,
            ma200,
            rsi14,
            bollinger_upper: bollinger.map(|(upper, _)| upper),
            bollinger_lower: bollinger.map(|(_, lower)| lower),
            history: bars,
        })
    }

    /// Derive the decision signals from this snapshot
    ///
    /// One signal per tracked indicator; fields without data produce
    /// Neutral signals so the rule input is always complete.
    pub fn signals(&self) -> Vec<Signal> {
        vec![
            classify::valuation(self.pe_ratio, self.eps),
            classify::trend(self.ma50, self.ma200),
            classify::momentum(self.rsi14),
        ]
    }
}

/// Final value of a simple moving average, or None without enough history
fn sma(closes: &[f64], period: usize) -> Result<Option<f64>> {
    if closes.len() < period {
        return Ok(None);
    }

    let mut indicator = SimpleMovingAverage::new(period)
        .map_err(|e| AdvisorError::IndicatorError(e.to_string()))?;
    let mut current = None;
    for &close in closes {
        current = Some(indicator.next(close));
    }
    Ok(current)
}

/// Final value of the relative strength index, or None without enough history
fn rsi(closes: &[f64], period: usize) -> Result<Option<f64>> {
    // RSI needs at least one price change beyond the smoothing window
    if closes.len() <= period {
        return Ok(None);
    }

    let mut indicator = RelativeStrengthIndex::new(period)
        .map_err(|e| AdvisorError::IndicatorError(e.to_string()))?;
    let mut current = None;
    for &close in closes {
        current = Some(indicator.next(close));
    }
    Ok(current)
}

/// Final Bollinger band pair (upper, lower), or None without enough history
fn bollinger(closes: &[f64], period: usize, multiplier: f64) -> Result<Option<(f64, f64)>> {
    if closes.len() < period {
        return Ok(None);
    }

    let mut indicator = BollingerBands::new(period, multiplier)
        .map_err(|e| AdvisorError::IndicatorError(e.to_string()))?;
    let mut current = None;
    for &close in closes {
        let output = indicator.next(close);
        current = Some((output.upper, output.lower));
    }
    Ok(current)
}

/// Bars with closes produced by a function of the day index (test data)
#[cfg(test)]
pub(crate) fn synthetic_bars(count: usize, close_fn: impl Fn(usize) -> f64) -> Vec<DailyBar> {
    use chrono::Days;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    (0..count)
        .map(|i| {
            let close = close_fn(i);
            DailyBar {
                date: start + Days::new(i as u64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_signals::{Polarity, SignalKind};

    fn overview() -> CompanyOverview {
        CompanyOverview {
            symbol: "TEST".to_string(),
            name: "Test Corp".to_string(),
            market_cap: Some(1.0e12),
            pe_ratio: Some(18.0),
            eps: Some(6.1),
        }
    }

    #[test]
    fn test_empty_history_is_error() {
        let result = MarketSnapshot::from_parts("TEST", Vec::new(), None);
        assert!(matches!(
            result,
            Err(AdvisorError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_uptrend_snapshot() {
        // Steadily rising closes put the short average above the long one
        let bars = synthetic_bars(250, |i| 100.0 + i as f64 * 0.5);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, Some(&overview())).unwrap();

        assert_eq!(snapshot.current_price, 100.0 + 249.0 * 0.5);
        let ma50 = snapshot.ma50.unwrap();
        let ma200 = snapshot.ma200.unwrap();
        assert!(ma50 > ma200);
        assert!(snapshot.rsi14.unwrap() > 50.0);

        let upper = snapshot.bollinger_upper.unwrap();
        let lower = snapshot.bollinger_lower.unwrap();
        assert!(upper > lower);
    }

    #[test]
    fn test_short_history_yields_none() {
        let bars = synthetic_bars(30, |i| 100.0 + i as f64);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, None).unwrap();

        assert!(snapshot.ma50.is_none());
        assert!(snapshot.ma200.is_none());
        assert!(snapshot.rsi14.is_some());
        assert!(snapshot.bollinger_upper.is_some());
    }

    #[test]
    fn test_signals_from_uptrend() {
        let bars = synthetic_bars(250, |i| 100.0 + i as f64 * 0.5);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, Some(&overview())).unwrap();

        let signals = snapshot.signals();
        assert_eq!(signals.len(), 3);

        let trend = signals
            .iter()
            .find(|s| s.kind == SignalKind::Trend)
            .unwrap();
        assert_eq!(trend.polarity, Polarity::Positive);

        let valuation = signals
            .iter()
            .find(|s| s.kind == SignalKind::Valuation)
            .unwrap();
        assert_eq!(valuation.polarity, Polarity::Positive);
    }

    #[test]
    fn test_signals_without_fundamentals_are_neutral_valuation() {
        let bars = synthetic_bars(250, |i| 100.0 + i as f64 * 0.5);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, None).unwrap();

        let signals = snapshot.signals();
        let valuation = signals
            .iter()
            .find(|s| s.kind == SignalKind::Valuation)
            .unwrap();
        assert_eq!(valuation.polarity, Polarity::Neutral);
    }

    #[test]
    fn test_flat_series_indicators() {
        let bars = synthetic_bars(250, |_| 100.0);
        let snapshot = MarketSnapshot::from_parts("TEST", bars, None).unwrap();

        // A flat series has equal averages and zero-width bands
        let ma50 = snapshot.ma50.unwrap();
        let ma200 = snapshot.ma200.unwrap();
        assert!((ma50 - ma200).abs() < 1e-9);
        assert!((snapshot.bollinger_upper.unwrap() - snapshot.bollinger_lower.unwrap()).abs() < 1e-9);
    }
}
