//! Persistence layer.
//!
//! SQLite-backed cache of forecast records, unique on (city, date).
//! Upsert atomicity relies on the unique index rather than any
//! in-process locking; handlers share the pool and nothing else.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use crate::types::{ForecastRecord, WeatherError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS forecasts (
        city            TEXT NOT NULL,
        date            TEXT NOT NULL,
        min_temperature REAL NOT NULL,
        max_temperature REAL NOT NULL,
        UNIQUE (city, date)
    )
";

#[derive(Clone)]
pub struct ForecastStore {
    pool: SqlitePool,
}

impl ForecastStore {
    /// Open (creating if missing) the database at `url` and ensure the
    /// schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {url}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {url}"))?;
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to create forecasts table")?;
        info!(url, "forecast store ready");
        Ok(Self { pool })
    }

    /// Ephemeral in-memory store. A single connection keeps every
    /// query on the same in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .context("Failed to create forecasts table")?;
        Ok(Self { pool })
    }

    /// Look up the cached record for (city, date).
    pub async fn get(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Option<ForecastRecord>, WeatherError> {
        let record = sqlx::query_as::<_, ForecastRecord>(
            "SELECT city, date, min_temperature, max_temperature
             FROM forecasts WHERE city = ?1 AND date = ?2",
        )
        .bind(city)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Create or overwrite the record for its (city, date) pair.
    /// Returns `true` when a new row was created, `false` when an
    /// existing row's temperatures were overwritten.
    pub async fn upsert(&self, record: &ForecastRecord) -> Result<bool, WeatherError> {
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO forecasts (city, date, min_temperature, max_temperature)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&record.city)
        .bind(record.date)
        .bind(record.min_temperature)
        .bind(record.max_temperature)
        .execute(&self.pool)
        .await?
        .rows_affected()
            == 1;

        if !inserted {
            sqlx::query(
                "UPDATE forecasts SET min_temperature = ?3, max_temperature = ?4
                 WHERE city = ?1 AND date = ?2",
            )
            .bind(&record.city)
            .bind(record.date)
            .bind(record.min_temperature)
            .bind(record.max_temperature)
            .execute(&self.pool)
            .await?;
        }

        debug!(
            city = %record.city,
            date = %record.date,
            created = inserted,
            "forecast upserted"
        );
        Ok(inserted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
