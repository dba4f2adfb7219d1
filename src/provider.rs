//! Weather data provider.
//!
//! Uses the free Open-Meteo API (no key required) for daily min/max
//! forecasts and current conditions. Daily arrays are indexed from
//! today = 0, one entry per forecast day.
//!
//! API: `https://api.open-meteo.com/v1/forecast`
//! Auth: None required.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::types::{Coordinates, WeatherError};

/// Abstraction over the forecast provider, so the resolver can be
/// exercised against a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch `days` days of daily min/max temperatures for the given
    /// coordinates, optionally including the current conditions block.
    ///
    /// # Errors
    /// `Provider` carries the upstream status and body verbatim on a
    /// non-success response; `Parsing` when a 2xx body is not the
    /// expected shape; `Transport` when the request itself fails.
    async fn fetch(
        &self,
        coords: Coordinates,
        days: u32,
        include_current: bool,
    ) -> Result<ForecastPayload, WeatherError>;
}

// ---------------------------------------------------------------------------
// Open-Meteo response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    /// Local ISO-8601 timestamp, e.g. "2026-08-30T14:45".
    pub time: String,
}

/// Day-indexed forecast arrays. Index 0 is today.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("weathervane/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build weather HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Interpret an upstream error body: JSON is passed through as-is,
    /// anything else is wrapped in a `message` object.
    fn error_body(text: &str) -> serde_json::Value {
        serde_json::from_str(text)
            .unwrap_or_else(|_| serde_json::json!({ "message": text }))
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch(
        &self,
        coords: Coordinates,
        days: u32,
        include_current: bool,
    ) -> Result<ForecastPayload, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("daily", "temperature_2m_min,temperature_2m_max".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", days.to_string()),
                ("current_weather", include_current.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            debug!(%status, "provider returned non-success");
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                body: Self::error_body(&text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| WeatherError::Parsing(format!("forecast response: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
