//! Alpha Vantage API client

use crate::error::{AdvisorError, Result};
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Company overview with the fundamentals this system uses
///
/// Alpha Vantage returns every field as a string ("None" for missing);
/// numeric fields are parsed into options here so downstream code never
/// sees the provider's string encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
}

/// Raw overview payload as Alpha Vantage returns it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawOverview {
    symbol: String,
    name: String,
    #[serde(rename = "MarketCapitalization")]
    market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "EPS")]
    eps: Option<String>,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (free tier: 5)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(5).expect("5 is non-zero")));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Get the full daily time series, sorted ascending by date
    pub async fn get_daily(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("function", "TIME_SERIES_DAILY");
        params.insert("symbol", symbol);
        params.insert("outputsize", "full");
        params.insert("apikey", &self.api_key);

        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(AdvisorError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await?;
        check_api_errors(&data)?;

        let series = data.get("Time Series (Daily)").ok_or_else(|| {
            AdvisorError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "No daily time series in response".to_string(),
            }
        })?;

        let mut bars = parse_daily_series(series);
        if bars.is_empty() {
            return Err(AdvisorError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "Daily time series was empty".to_string(),
            });
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }

    /// Get company overview and fundamental data
    pub async fn get_company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("function", "OVERVIEW");
        params.insert("symbol", symbol);
        params.insert("apikey", &self.api_key);

        let response = self.client.get(BASE_URL).query(&params).send().await?;

        let data: serde_json::Value = response.json().await?;
        check_api_errors(&data)?;

        // An empty object means the symbol was not found
        if data.as_object().map(|o| o.is_empty()).unwrap_or(true) {
            return Err(AdvisorError::InvalidSymbol(symbol.to_string()));
        }

        let raw: RawOverview = serde_json::from_value(data)?;
        Ok(CompanyOverview {
            symbol: raw.symbol,
            name: raw.name,
            market_cap: parse_metric(raw.market_cap.as_deref()),
            pe_ratio: parse_metric(raw.pe_ratio.as_deref()),
            eps: parse_metric(raw.eps.as_deref()),
        })
    }
}

/// Check for the provider's in-band error payloads
fn check_api_errors(data: &serde_json::Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(AdvisorError::AlphaVantageError(error.to_string()));
    }

    // "Note" and "Information" both signal request throttling
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(AdvisorError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    Ok(())
}

/// Parse the daily time series object into bars, skipping malformed rows
fn parse_daily_series(series: &serde_json::Value) -> Vec<DailyBar> {
    let Some(obj) = series.as_object() else {
        return Vec::new();
    };

    let mut bars = Vec::with_capacity(obj.len());
    for (timestamp, values) in obj {
        let Ok(date) = NaiveDate::parse_from_str(timestamp, "%Y-%m-%d") else {
            tracing::warn!("Skipping bar with unparseable date: {}", timestamp);
            continue;
        };

        let field = |key: &str| -> Option<f64> {
            values.get(key)?.as_str()?.parse().ok()
        };

        let (Some(open), Some(high), Some(low), Some(close)) = (
            field("1. open"),
            field("2. high"),
            field("3. low"),
            field("4. close"),
        ) else {
            tracing::warn!("Skipping malformed bar for {}", timestamp);
            continue;
        };

        let volume = values
            .get("5. volume")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars
}

/// Parse a numeric overview field; "None", "-", and empty become None
fn parse_metric(value: Option<&str>) -> Option<f64> {
    match value {
        Some("None") | Some("-") | Some("") | None => None,
        Some(s) => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client =
            AlphaVantageClient::new("test_key", 5, Duration::from_secs(30)).unwrap();
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric(Some("28.5")), Some(28.5));
        assert_eq!(parse_metric(Some("None")), None);
        assert_eq!(parse_metric(Some("-")), None);
        assert_eq!(parse_metric(Some("")), None);
        assert_eq!(parse_metric(Some("not-a-number")), None);
        assert_eq!(parse_metric(None), None);
    }

    #[test]
    fn test_parse_daily_series() {
        let series = json!({
            "2024-01-03": {
                "1. open": "184.22", "2. high": "185.88",
                "3. low": "183.43", "4. close": "184.25", "5. volume": "58414500"
            },
            "2024-01-02": {
                "1. open": "187.15", "2. high": "188.44",
                "3. low": "183.89", "4. close": "185.64", "5. volume": "82488700"
            }
        });

        let mut bars = parse_daily_series(&series);
        bars.sort_by_key(|bar| bar.date);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 185.64);
        assert_eq!(bars[1].volume, 58_414_500);
    }

    #[test]
    fn test_parse_daily_series_skips_malformed() {
        let series = json!({
            "2024-01-02": {
                "1. open": "187.15", "2. high": "188.44",
                "3. low": "183.89", "4. close": "185.64", "5. volume": "82488700"
            },
            "not-a-date": {
                "1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "1"
            },
            "2024-01-03": {
                "1. open": "bad", "4. close": "184.25"
            }
        });

        let bars = parse_daily_series(&series);
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_check_api_errors() {
        assert!(check_api_errors(&json!({"Error Message": "Invalid API call"})).is_err());
        assert!(matches!(
            check_api_errors(&json!({"Note": "Thank you for using Alpha Vantage!"})),
            Err(AdvisorError::RateLimitExceeded { .. })
        ));
        assert!(matches!(
            check_api_errors(&json!({"Information": "premium endpoint"})),
            Err(AdvisorError::RateLimitExceeded { .. })
        ));
        assert!(check_api_errors(&json!({"Meta Data": {}})).is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_get_company_overview() {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY").expect("API key for ignored test");
        let client = AlphaVantageClient::new(api_key, 5, Duration::from_secs(30)).unwrap();
        let overview = client.get_company_overview("AAPL").await.unwrap();

        assert_eq!(overview.symbol, "AAPL");
        assert!(overview.name.contains("Apple"));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_get_daily() {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY").expect("API key for ignored test");
        let client = AlphaVantageClient::new(api_key, 5, Duration::from_secs(30)).unwrap();
        let bars = client.get_daily("AAPL").await.unwrap();

        assert!(bars.len() > 200);
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }
}
