//! Forecast resolution.
//!
//! The orchestration core: given a city and a validated date, decide
//! between serving the persisted record and fetching from the weather
//! provider, and map the calendar date onto an offset into the
//! provider's day-indexed arrays (today = index 0).
//!
//! The geocoder and provider sit behind traits so handlers receive a
//! resolver value by plain composition and tests can substitute mocks.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::geocode::Geocoder;
use crate::provider::ForecastProvider;
use crate::store::ForecastStore;
use crate::types::{CurrentConditions, ForecastRecord, TemperatureRange, WeatherError};
use crate::validate;

pub struct ForecastResolver {
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn ForecastProvider>,
    store: ForecastStore,
}

impl ForecastResolver {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        provider: Box<dyn ForecastProvider>,
        store: ForecastStore,
    ) -> Self {
        Self {
            geocoder,
            provider,
            store,
        }
    }

    /// Resolve the min/max forecast for a city on a date.
    ///
    /// A persisted record wins outright — no provider call is made.
    /// On a miss the provider is asked for `offset + 1` days and the
    /// daily arrays are indexed at `offset`. The date is validated
    /// upstream, so the offset is always in `0..=10`.
    pub async fn forecast(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<TemperatureRange, WeatherError> {
        self.forecast_as_of(city, date, Utc::now().date_naive())
            .await
    }

    async fn forecast_as_of(
        &self,
        city: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<TemperatureRange, WeatherError> {
        if let Some(record) = self.store.get(city, date).await? {
            debug!(city, %date, "forecast served from store");
            return Ok(TemperatureRange {
                min_temperature: record.min_temperature,
                max_temperature: record.max_temperature,
            });
        }

        let offset = usize::try_from((date - today).num_days()).map_err(|_| {
            WeatherError::Validation("The date cannot be in the past.".into())
        })?;

        let coords = self.geocoder.locate(city).await?;
        let payload = self.provider.fetch(coords, offset as u32 + 1, false).await?;

        let daily = payload.daily.ok_or_else(|| {
            WeatherError::Parsing("daily block missing from forecast response".into())
        })?;
        let min_temperature = daily
            .temperature_2m_min
            .get(offset)
            .copied()
            .ok_or_else(|| {
                WeatherError::Parsing(format!("no min temperature for day offset {offset}"))
            })?;
        let max_temperature = daily
            .temperature_2m_max
            .get(offset)
            .copied()
            .ok_or_else(|| {
                WeatherError::Parsing(format!("no max temperature for day offset {offset}"))
            })?;

        debug!(city, %date, offset, "forecast fetched from provider");
        Ok(TemperatureRange {
            min_temperature,
            max_temperature,
        })
    }

    /// Current conditions for a city: temperature and local clock time.
    pub async fn current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let coords = self.geocoder.locate(city).await?;
        let payload = self.provider.fetch(coords, 1, true).await?;

        let current = payload.current_weather.ok_or_else(|| {
            WeatherError::Parsing("current_weather block missing from response".into())
        })?;

        Ok(CurrentConditions {
            temperature: current.temperature,
            local_time: clock_time(&current.time),
        })
    }

    /// Persist a user-submitted record, overwriting any existing
    /// (city, date) entry. Returns the record and whether it was newly
    /// created, for the 201-vs-200 distinction.
    pub async fn submit(
        &self,
        record: ForecastRecord,
    ) -> Result<(ForecastRecord, bool), WeatherError> {
        validate::validate_temperature_order(record.min_temperature, record.max_temperature)?;
        let created = self.store.upsert(&record).await?;
        Ok((record, created))
    }
}

/// Extract the `HH:MM` tail of a local ISO-8601 timestamp like
/// "2026-08-30T14:45".
fn clock_time(iso: &str) -> String {
    iso.get(iso.len().saturating_sub(5)..)
        .unwrap_or(iso)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
