use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

pub const COUNTRY_NOT_FOUND: &str = "Country not found";
pub const SUMMARY_NOT_FOUND: &str = "Summary image not found";

#[derive(Debug, ThisError)]
pub enum CountrydexError {
    /// Either upstream fetch failed, timed out, or returned an unusable payload.
    /// `endpoint` is the URL that failed.
    #[error("Upstream {endpoint} unavailable: {cause}")]
    UpstreamUnavailable { endpoint: String, cause: String },

    /// A write failed while committing a refresh; the transaction was rolled back.
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),

    #[error("Country already exists: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Ractor error: {0}")]
    Ractor(String),
}

impl CountrydexError {
    pub fn country_not_found() -> Self {
        Self::NotFound(COUNTRY_NOT_FOUND)
    }

    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation(BTreeMap::from([(field.to_string(), message.to_string())]))
    }
}

impl IntoResponse for CountrydexError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            CountrydexError::UpstreamUnavailable { endpoint, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody {
                    error: "External data source unavailable".to_string(),
                    details: Some(Value::String(format!(
                        "Could not fetch data from {endpoint}"
                    ))),
                },
            ),

            CountrydexError::RefreshFailed(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody {
                    error: "Refresh failed".to_string(),
                    details: Some(Value::String("Failed during refresh".to_string())),
                },
            ),

            CountrydexError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    error: what.to_string(),
                    details: None,
                },
            ),

            CountrydexError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    error: "Validation failed".to_string(),
                    details: Some(Value::Object(
                        fields
                            .into_iter()
                            .map(|(k, v)| (k, Value::String(v)))
                            .collect(),
                    )),
                },
            ),

            CountrydexError::Conflict(name) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    error: "Country already exists".to_string(),
                    details: Some(Value::String(name)),
                },
            ),

            CountrydexError::Database(_)
            | CountrydexError::Io(_)
            | CountrydexError::Render(_)
            | CountrydexError::Ractor(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    error: "Internal server error".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Error payload shared by every failing route: `{"error": "...", "details": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
