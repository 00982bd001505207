//! Core library for the `weather` tools.
//!
//! This crate defines:
//! - Configuration & credential resolution
//! - The current-weather lookup and its typed errors
//! - Shared domain models (city queries, summaries)
//!
//! It is used by `weather-cli` and `weather-web`, which only own presentation.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, Settings};
pub use error::{ErrorKind, LookupError};
pub use model::{CityQuery, Credential, WeatherSummary};
pub use provider::{
    WeatherProvider, classify_status, lookup, openweather::OpenWeatherProvider, verify_credential,
};
