//! API route handlers.
//!
//! Thin layer: validate parameters, delegate to the resolver, shape
//! the JSON response. State is shared via `Arc<ApiState>`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::resolver::ForecastResolver;
use crate::types::{CurrentConditions, ForecastRecord, TemperatureRange, WeatherError};
use crate::validate;

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub resolver: ForecastResolver,
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

// Fields are optional so that missing parameters produce our own 400
// messages instead of the framework's rejection.

#[derive(Debug, Deserialize)]
pub struct CurrentParams {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    city: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastSubmission {
    city: Option<String>,
    date: Option<String>,
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /weather/current/?city=<name>
pub async fn get_current(
    State(state): State<AppState>,
    Query(params): Query<CurrentParams>,
) -> Result<Json<CurrentConditions>, WeatherError> {
    let city = validate::validate_city(params.city.as_deref())?;
    let conditions = state.resolver.current(city).await?;
    Ok(Json(conditions))
}

/// GET /weather/forecast/?city=<name>&date=<YYYY-MM-DD>
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
) -> Result<Json<TemperatureRange>, WeatherError> {
    let city = validate::validate_city(params.city.as_deref())?;
    let date = validate::parse_date(params.date.as_deref())?;
    validate::validate_date(date, Utc::now().date_naive())?;

    let range = state.resolver.forecast(city, date).await?;
    Ok(Json(range))
}

/// POST /weather/forecast/
///
/// Upserts a forecast record: 201 when the (city, date) pair is new,
/// 200 when an existing record's temperatures were overwritten.
pub async fn post_forecast(
    State(state): State<AppState>,
    Json(body): Json<ForecastSubmission>,
) -> Result<(StatusCode, Json<ForecastRecord>), WeatherError> {
    let city = validate::validate_city(body.city.as_deref())?.to_string();
    let date = validate::parse_date(body.date.as_deref())?;
    validate::validate_date(date, Utc::now().date_naive())?;
    let min_temperature = validate::validate_temperature(body.min_temperature, "min_temperature")?;
    let max_temperature = validate::validate_temperature(body.max_temperature, "max_temperature")?;

    let record = ForecastRecord {
        city,
        date,
        min_temperature,
        max_temperature,
    };
    let (record, created) = state.resolver.submit(record).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(record)))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
