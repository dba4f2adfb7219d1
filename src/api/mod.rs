//! HTTP API — Axum router and error mapping.
//!
//! All endpoints return JSON. Handlers hold a `ForecastResolver` via
//! shared state and return `Result<_, WeatherError>`; the error's
//! `IntoResponse` impl maps each variant onto a status code and a
//! `{"message": ...}` body. CORS enabled for local development.

pub mod routes;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::types::WeatherError;
use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/weather/current/", get(routes::get_current))
        .route(
            "/weather/forecast/",
            get(routes::get_forecast).post(routes::post_forecast),
        )
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            WeatherError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "message": message }),
            ),
            WeatherError::LocationNotFound => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "message": "Location not found." }),
            ),
            // The provider's own error surfaces verbatim, status and all.
            WeatherError::Provider {
                status,
                body,
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            ),
            WeatherError::Parsing(detail) => {
                error!(detail, "failed to parse provider response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "message": "Error parsing data with weather API" }),
                )
            }
            WeatherError::Storage(e) => {
                error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "message": "Internal storage error" }),
                )
            }
            WeatherError::Transport(e) => {
                warn!(error = %e, "outbound request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    serde_json::json!({ "message": "Weather provider is unreachable" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
