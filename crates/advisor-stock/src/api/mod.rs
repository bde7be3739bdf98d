//! External market-data API clients

pub mod alpha_vantage;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview, DailyBar};
