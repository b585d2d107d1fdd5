use super::status::status_handler;
use crate::db::DbCountry;
use crate::error::CountrydexError;
use crate::refresh::RefreshOutcome;
use crate::server::router::AppState;
use crate::service::{CountryListItem, CreateCountryInput};
use axum::extract::rejection::JsonRejection;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries).post(create_country))
        .route("/countries/refresh", post(refresh_countries))
        .route("/countries/status", get(status_handler))
        .route("/countries/image", get(summary_image))
        .route(
            "/countries/{name}",
            get(get_country).delete(delete_country),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub region: Option<String>,
    #[serde(alias = "currency_code")]
    pub currency: Option<String>,
    pub sort: Option<String>,
}

/// POST /countries
async fn create_country(
    State(state): State<AppState>,
    payload: Result<Json<CreateCountryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DbCountry>), CountrydexError> {
    let Json(input) = payload.map_err(|e| CountrydexError::validation("body", &e.body_text()))?;
    let row = state.countries.create_country(input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /countries/refresh
async fn refresh_countries(
    State(state): State<AppState>,
) -> Result<Json<RefreshOutcome>, CountrydexError> {
    let outcome = state.countries.refresh().await?;
    debug!(
        count = outcome.countries_processed,
        summary_rendered = outcome.summary_rendered,
        "Refresh request served"
    );
    Ok(Json(outcome))
}

/// GET /countries?region=&currency=&sort=
async fn list_countries(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CountryListItem>>, CountrydexError> {
    let rows = state
        .countries
        .list_countries(query.region, query.currency, query.sort.as_deref())
        .await?;
    Ok(Json(rows))
}

/// GET /countries/image
async fn summary_image(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CountrydexError> {
    let path = state.countries.summary_artifact_path().await?;
    let bytes = tokio::fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// GET /countries/{name}
async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DbCountry>, CountrydexError> {
    Ok(Json(state.countries.get_country(&name).await?))
}

/// DELETE /countries/{name}
async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, CountrydexError> {
    state.countries.delete_country(&name).await?;
    Ok(Json(json!({ "message": "Country deleted successfully" })))
}
