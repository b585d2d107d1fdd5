use crate::db::StoreStatus;
use crate::error::CountrydexError;
use crate::server::router::AppState;
use axum::{Json, Router, extract::State, routing::get};

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(status_handler))
}

/// GET /status and GET /countries/status
pub(crate) async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StoreStatus>, CountrydexError> {
    Ok(Json(state.countries.status().await?))
}
