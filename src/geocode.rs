//! City geocoding via Nominatim (OpenStreetMap).
//!
//! Resolves a free-text city name to coordinates. Free, no API key;
//! the usage policy requires a descriptive user agent on every
//! request.
//!
//! API: `https://nominatim.openstreetmap.org/search`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::GeocodingConfig;
use crate::types::{Coordinates, WeatherError};

/// Abstraction over the geocoding provider, so the resolver can be
/// exercised against a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a city name to coordinates.
    ///
    /// # Errors
    /// `LocationNotFound` when the provider has no match;
    /// `Transport` when the request itself fails.
    async fn locate(&self, city: &str) -> Result<Coordinates, WeatherError>;
}

// ---------------------------------------------------------------------------
// Nominatim response types
// ---------------------------------------------------------------------------

/// One search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct NominatimClient {
    http: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(cfg: &GeocodingConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("Failed to build geocoding HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn parse_place(place: &NominatimPlace) -> Result<Coordinates, WeatherError> {
        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|_| WeatherError::Parsing(format!("bad latitude: {}", place.lat)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|_| WeatherError::Parsing(format!("bad longitude: {}", place.lon)))?;
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn locate(&self, city: &str) -> Result<Coordinates, WeatherError> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !resp.status().is_success() {
            debug!(status = %resp.status(), city, "geocoder returned non-success");
            return Err(WeatherError::LocationNotFound);
        }

        let places: Vec<NominatimPlace> = resp
            .json()
            .await
            .map_err(|e| WeatherError::Parsing(format!("geocoder response: {e}")))?;

        let place = places.first().ok_or(WeatherError::LocationNotFound)?;
        let coords = Self::parse_place(place)?;
        debug!(
            city,
            lat = coords.latitude,
            lon = coords.longitude,
            "city geocoded"
        );
        Ok(coords)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
