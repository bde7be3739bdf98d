//! API error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use advisor_stock::AdvisorError;

/// Error wrapper that maps pipeline failures to HTTP responses
#[derive(Debug)]
pub struct ApiError(pub AdvisorError);

impl ApiError {
    /// Status code for the wrapped error
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AdvisorError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            AdvisorError::DataUnavailable { .. } => StatusCode::NOT_FOUND,
            AdvisorError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AdvisorError::NetworkError(_)
            | AdvisorError::AlphaVantageError(_)
            | AdvisorError::LlmError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdvisorError> for ApiError {
    fn from(err: AdvisorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, "Request failed: {}", message);
        } else {
            tracing::debug!(status = %status, "Request rejected: {}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError(AdvisorError::InvalidSymbol("x".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError(AdvisorError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "gone".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = ApiError(AdvisorError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);

        let err = ApiError(AdvisorError::AlphaVantageError("upstream".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = ApiError(AdvisorError::Other("boom".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
