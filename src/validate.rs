//! Request validation rules.
//!
//! Pure functions over request parameters. Each returns
//! `WeatherError::Validation` with a human-readable message on
//! violation and never mutates state. Date bounds and temperature
//! bounds live here as the single source of truth for both the GET
//! query path and the POST write path.

use chrono::{Duration, NaiveDate};

use crate::types::WeatherError;

/// A forecast may be requested at most this many days ahead of today.
pub const MAX_FORECAST_DAYS_AHEAD: i64 = 10;

/// Physical bounds on accepted temperatures, in °C.
pub const MIN_TEMPERATURE: f64 = -100.0;
pub const MAX_TEMPERATURE: f64 = 100.0;

/// Wire format for dates: ISO 8601 date only.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Require a non-blank city parameter. Returns the trimmed name.
pub fn validate_city(city: Option<&str>) -> Result<&str, WeatherError> {
    match city.map(str::trim) {
        Some(city) if !city.is_empty() => Ok(city),
        _ => Err(WeatherError::Validation(
            "The required parameter city was not passed".into(),
        )),
    }
}

/// Require and parse a `YYYY-MM-DD` date parameter.
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, WeatherError> {
    let raw = match date.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return Err(WeatherError::Validation(
                "The required parameter date was not passed".into(),
            ))
        }
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| WeatherError::Validation("Date must be in YYYY-MM-DD format".into()))
}

/// Check a requested date is within `[today, today + 10 days]` inclusive.
pub fn validate_date(date: NaiveDate, today: NaiveDate) -> Result<(), WeatherError> {
    if date < today {
        return Err(WeatherError::Validation(
            "The date cannot be in the past.".into(),
        ));
    }
    if date - today > Duration::days(MAX_FORECAST_DAYS_AHEAD) {
        return Err(WeatherError::Validation(
            "The date cannot be more than 10 days in the future.".into(),
        ));
    }
    Ok(())
}

/// Require a temperature field and check it against physical bounds.
pub fn validate_temperature(value: Option<f64>, field: &str) -> Result<f64, WeatherError> {
    let value = value.ok_or_else(|| {
        WeatherError::Validation(format!("The required parameter {field} was not passed"))
    })?;
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        return Err(WeatherError::Validation(format!(
            "{field} must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}"
        )));
    }
    Ok(value)
}

/// Reject records where the minimum exceeds the maximum.
pub fn validate_temperature_order(min: f64, max: f64) -> Result<(), WeatherError> {
    if min > max {
        return Err(WeatherError::Validation(
            "min_temperature cannot be greater than max_temperature.".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
