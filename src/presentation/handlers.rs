// HTTP request handlers
use crate::application::dashboard_service::WindowRequest;
use crate::domain::summary::HeatingFlags;
use crate::domain::telemetry::MachineId;
use crate::domain::timestamp::Instant;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: Option<Instant>,
    pub end: Option<Instant>,
}

impl From<RangeQuery> for WindowRequest {
    fn from(query: RangeQuery) -> Self {
        WindowRequest {
            start: query.start,
            end: query.end,
        }
    }
}

#[derive(Deserialize)]
pub struct TablesUpload {
    pub tables: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesUpdate {
    pub diesel_price: Option<f64>,
    pub diesel_consumption: Option<f64>,
}

async fn respond<T: Serialize>(headers: &HeaderMap, data: &T) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List machines that have data
pub async fn list_machines(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let machines = state.dashboard_service.list_machines().await?;
    Ok(respond(&headers, &machines).await)
}

/// Series, metrics and summary for one window
pub async fn get_dashboard(
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let dashboard = state.dashboard_service.get_dashboard(query.into()).await?;
    Ok(respond(&headers, &dashboard).await)
}

pub async fn machine_metrics(
    Path(id): Path<MachineId>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let metrics = state
        .dashboard_service
        .machine_metrics(id, query.into())
        .await?;
    Ok(respond(&headers, &metrics).await)
}

pub async fn get_summary(
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let summary = state.dashboard_service.summary(query.into()).await?;
    Ok(respond(&headers, &summary).await)
}

/// Replace all raw tables and re-ingest them
pub async fn put_tables(
    State(state): State<Arc<AppState>>,
    Json(upload): Json<TablesUpload>,
) -> Result<Response, ApiError> {
    let report = state.pipeline.replace_tables(&upload.tables).await?;
    Ok(Json(report).into_response())
}

pub async fn put_heating(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HashMap<String, bool>>,
) -> Result<Response, ApiError> {
    let updates = parse_flag_updates(body)?;
    let flags = state.settings_service.update_heating_flags(updates).await?;
    let keyed: HashMap<String, bool> = flags.iter().map(|(id, on)| (id.to_string(), *on)).collect();
    Ok(Json(keyed).into_response())
}

pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RatesUpdate>,
) -> Result<Response, ApiError> {
    for (name, value) in [
        ("dieselPrice", body.diesel_price),
        ("dieselConsumption", body.diesel_consumption),
    ] {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(ApiError::BadRequest(format!("{} must be a non-negative number", name)));
        }
    }

    let rates = state
        .settings_service
        .update_fuel_rates(body.diesel_price, body.diesel_consumption)
        .await?;
    Ok(Json(rates).into_response())
}

fn parse_flag_updates(body: HashMap<String, bool>) -> Result<HeatingFlags, ApiError> {
    body.into_iter()
        .map(|(key, on)| match key.trim().parse::<MachineId>() {
            Ok(id) if id > 0 => Ok((id, on)),
            _ => Err(ApiError::BadRequest(format!("invalid machine id '{}'", key))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_updates() {
        let body = HashMap::from([("3".to_string(), true), (" 12 ".to_string(), false)]);
        let flags = parse_flag_updates(body).unwrap();
        assert_eq!(flags, HeatingFlags::from([(3, true), (12, false)]));

        let body = HashMap::from([("0".to_string(), true)]);
        assert!(parse_flag_updates(body).is_err());

        let body = HashMap::from([("pump".to_string(), true)]);
        assert!(matches!(parse_flag_updates(body), Err(ApiError::BadRequest(_))));
    }
}
