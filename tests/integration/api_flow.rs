//! End-to-end API flows against the full router: real resolver and
//! in-memory store, stub geocoding/forecast backends.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::ServiceExt;

use weathervane::api::routes::ApiState;
use weathervane::api::build_router;
use weathervane::geocode::Geocoder;
use weathervane::provider::ForecastProvider;
use weathervane::resolver::ForecastResolver;
use weathervane::store::ForecastStore;

use crate::stub_backends::{StubGeocoder, StubProvider};

async fn app_with(
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn ForecastProvider>,
) -> axum::Router {
    let store = ForecastStore::in_memory().await.unwrap();
    let resolver = ForecastResolver::new(geocoder, provider, store);
    build_router(Arc::new(ApiState { resolver }))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn date_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn forecast_fetches_then_serves_posted_overwrite() {
    let provider = StubProvider::new();
    let provider_calls = provider.calls.clone();
    let app = app_with(Box::new(StubGeocoder::new()), Box::new(provider)).await;
    let date = date_from_today(4);
    let uri = format!("/weather/forecast/?city=Paris&date={date}");

    // First read misses the store and hits the provider: offset 4.
    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert!((json["min_temperature"].as_f64().unwrap() - 4.0).abs() < 1e-9);
    assert!((json["max_temperature"].as_f64().unwrap() - 14.0).abs() < 1e-9);
    assert_eq!(provider_calls.load(Ordering::SeqCst), 1);

    // A posted record takes precedence over the provider.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/weather/forecast/",
            serde_json::json!({
                "city": "Paris",
                "date": date,
                "min_temperature": -1.0,
                "max_temperature": 3.0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert!((json["min_temperature"].as_f64().unwrap() + 1.0).abs() < 1e-9);
    // The second read was served from the store.
    assert_eq!(provider_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_post_reports_update_and_overwrites() {
    let app = app_with(Box::new(StubGeocoder::new()), Box::new(StubProvider::new())).await;
    let date = date_from_today(1);
    let body = |min: f64, max: f64| {
        serde_json::json!({
            "city": "Lyon",
            "date": date,
            "min_temperature": min,
            "max_temperature": max
        })
    };

    let resp = app
        .clone()
        .oneshot(post_json("/weather/forecast/", body(6.0, 14.0)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(post_json("/weather/forecast/", body(2.0, 9.0)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let uri = format!("/weather/forecast/?city=Lyon&date={date}");
    let resp = app.oneshot(get(&uri)).await.unwrap();
    let json = body_json(resp).await;
    assert!((json["min_temperature"].as_f64().unwrap() - 2.0).abs() < 1e-9);
    assert!((json["max_temperature"].as_f64().unwrap() - 9.0).abs() < 1e-9);
}

#[tokio::test]
async fn current_weather_round_trip() {
    let app = app_with(Box::new(StubGeocoder::new()), Box::new(StubProvider::new())).await;
    let resp = app
        .oneshot(get("/weather/current/?city=Paris"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert!((json["temperature"].as_f64().unwrap() - 21.7).abs() < 1e-9);
    assert_eq!(json["local_time"], "09:30");
}

#[tokio::test]
async fn unknown_city_is_404_with_message() {
    let app = app_with(
        Box::new(StubGeocoder::with_unknown("Atlantis")),
        Box::new(StubProvider::new()),
    )
    .await;
    let uri = format!(
        "/weather/forecast/?city=Atlantis&date={}",
        date_from_today(0)
    );
    let resp = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Location not found.");
}

#[tokio::test]
async fn provider_failure_status_and_body_pass_through() {
    let app = app_with(
        Box::new(StubGeocoder::new()),
        Box::new(StubProvider::failing_with(503)),
    )
    .await;
    let uri = format!("/weather/forecast/?city=Paris&date={}", date_from_today(2));
    let resp = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(resp).await;
    assert_eq!(json["reason"], "scripted failure");
}

#[tokio::test]
async fn store_hit_skips_geocoding_entirely() {
    let geocoder = StubGeocoder::new();
    let geocoder_calls = geocoder.calls.clone();
    let app = app_with(Box::new(geocoder), Box::new(StubProvider::new())).await;
    let date = date_from_today(5);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/weather/forecast/",
            serde_json::json!({
                "city": "Nice",
                "date": date,
                "min_temperature": 18.0,
                "max_temperature": 27.0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let uri = format!("/weather/forecast/?city=Nice&date={date}");
    let resp = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(geocoder_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validation_happens_before_any_outbound_call() {
    let geocoder = StubGeocoder::new();
    let geocoder_calls = geocoder.calls.clone();
    let provider = StubProvider::new();
    let provider_calls = provider.calls.clone();
    let app = app_with(Box::new(geocoder), Box::new(provider)).await;

    let uri = format!("/weather/forecast/?city=Paris&date={}", date_from_today(11));
    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app.oneshot(get("/weather/forecast/?date=2026-09-01")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(geocoder_calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider_calls.load(Ordering::SeqCst), 0);
}
