//! Shared types for the weathervane service.
//!
//! The single record type persisted by the store, the wire shapes the
//! API returns, and the service-wide error enum. Kept free of HTTP
//! framework types so the resolver and store can depend on them
//! without pulling in axum.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Forecast record
// ---------------------------------------------------------------------------

/// A cached forecast for one city on one calendar date.
///
/// The (city, date) pair is unique in the store — writes for an
/// existing pair overwrite the temperatures rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ForecastRecord {
    pub city: String,
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Latitude/longitude pair produced by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response body for forecast lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_temperature: f64,
    pub max_temperature: f64,
}

/// Response body for the current-weather endpoint.
///
/// `local_time` is the `HH:MM` clock time at the queried location,
/// taken from the provider's local ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub local_time: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Service-wide error type. Every fallible operation returns this;
/// the API layer maps each variant onto an HTTP status and a JSON
/// body with a `message` field.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// A request parameter failed validation (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// The geocoder could not resolve the city (HTTP 404).
    #[error("Location not found.")]
    LocationNotFound,

    /// The weather provider answered with a non-success status. The
    /// status and body are passed through to the caller verbatim.
    #[error("Weather provider returned status {status}")]
    Provider {
        status: u16,
        body: serde_json::Value,
    },

    /// The provider answered 2xx but the body was not the expected
    /// shape (HTTP 500).
    #[error("Error parsing provider response: {0}")]
    Parsing(String),

    /// Database failure (HTTP 500).
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// The outbound request never produced a provider status —
    /// connection refused, timeout, DNS failure (HTTP 502).
    #[error("Outbound request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
