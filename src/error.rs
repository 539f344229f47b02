use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure modes of forecast resolution, mapped onto the HTTP contract.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("{0}")]
    Validation(String),

    #[error("No forecast found for {0}")]
    NotFound(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        match self {
            ForecastError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            err @ ForecastError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
            err @ (ForecastError::Upstream(_) | ForecastError::Store(_)) => {
                tracing::error!(error = %err, "forecast resolution failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to fetch weather data",
                        "details": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_is_the_user_visible_message() {
        let err = ForecastError::NotFound("2024-01-01T10:00:00+07:00".into());
        assert_eq!(
            err.to_string(),
            "No forecast found for 2024-01-01T10:00:00+07:00"
        );
    }
}
