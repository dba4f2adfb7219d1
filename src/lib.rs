//! Weathervane — city weather and forecast HTTP API.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod geocode;
pub mod provider;
pub mod resolver;
pub mod store;
pub mod types;
pub mod validate;
