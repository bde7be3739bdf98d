//! Route handlers and request/response types

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;
use advisor_signals::Signal;
use advisor_stock::chart::render_price_chart;
use advisor_stock::MarketSnapshot;

/// Request body for `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Ticker symbol to analyze
    pub ticker: String,
}

/// Response body for `POST /analyze`
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Normalized ticker symbol
    pub ticker: String,
    /// Final recommendation label
    pub recommendation: String,
    /// Aggregated fundamental outlook
    pub fundamental_outlook: String,
    /// Aggregated technical outlook
    pub technical_outlook: String,
    /// The signals that determined the outcome
    pub signals: Vec<Signal>,
    /// Rendered Markdown report (recommendation + commentary)
    pub analysis: String,
    /// Numeric data the analysis was derived from
    pub data: SnapshotData,
    /// SVG price chart
    pub chart_svg: String,
}

/// Numeric snapshot fields exposed over the API
#[derive(Debug, Serialize)]
pub struct SnapshotData {
    pub current_price: f64,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    #[serde(rename = "50d_ma")]
    pub ma50: Option<f64>,
    #[serde(rename = "200d_ma")]
    pub ma200: Option<f64>,
    pub rsi: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

impl From<&MarketSnapshot> for SnapshotData {
    fn from(snapshot: &MarketSnapshot) -> Self {
        Self {
            current_price: snapshot.current_price,
            market_cap: snapshot.market_cap,
            pe_ratio: snapshot.pe_ratio,
            eps: snapshot.eps,
            ma50: snapshot.ma50,
            ma200: snapshot.ma200,
            rsi: snapshot.rsi14,
            bollinger_upper: snapshot.bollinger_upper,
            bollinger_lower: snapshot.bollinger_lower,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// `GET /` - API information
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Financial Advisor API",
        "description": "Stock analysis with deterministic signals and LLM commentary",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "analyze": "/analyze",
        }
    }))
}

/// `GET /health` - readiness probe
///
/// Credentials are validated when the pipeline is built, so a serving
/// instance is by construction fully configured.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Financial Advisor API is running".to_string(),
    })
}

/// `POST /analyze` - run the analysis pipeline for one ticker
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, ticker = %request.ticker, "Analysis requested");

    let report = state.pipeline.analyze(&request.ticker).await?;
    let chart_svg = render_price_chart(&report.snapshot)?;

    tracing::info!(
        %request_id,
        ticker = %report.symbol,
        recommendation = report.verdict.recommendation.label(),
        "Analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        ticker: report.symbol.clone(),
        recommendation: report.verdict.recommendation.label().to_string(),
        fundamental_outlook: report.verdict.fundamental_outlook.label().to_string(),
        technical_outlook: report.verdict.technical_outlook.label().to_string(),
        signals: report.verdict.signals.clone(),
        analysis: report.format_report(),
        data: SnapshotData::from(&report.snapshot),
        chart_svg,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use advisor_llm::providers::OpenAIConfig;
    use advisor_llm::{
        CompletionRequest, CompletionResponse, LlmProvider, Message, StopReason, TokenUsage,
    };
    use advisor_stock::{AdvisorConfig, AnalysisPipeline, LlmBackend};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StaticProvider;

    #[async_trait]
    impl LlmProvider for StaticProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> advisor_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                message: Message::assistant("canned commentary"),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 0,
                    output_tokens: 0,
                },
            })
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn test_router() -> axum::Router {
        let config = Arc::new(
            AdvisorConfig::builder()
                .alpha_vantage_api_key("test-key")
                .llm(LlmBackend::OpenAI(OpenAIConfig::new("sk-test")))
                .build()
                .expect("valid test config"),
        );
        let pipeline =
            AnalysisPipeline::with_provider(config, Arc::new(StaticProvider)).expect("pipeline");
        build_router(Arc::new(pipeline))
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Financial Advisor API");
        assert_eq!(json["endpoints"]["analyze"], "/analyze");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_analyze_rejects_blank_ticker() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"ticker": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Invalid symbol"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_ticker() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"ticker": "AAPL;DROP"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
