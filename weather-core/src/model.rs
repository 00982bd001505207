use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LookupError;

/// API key for the weather provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key: String = key.into();
        let key = key.trim();
        if key.is_empty() { None } else { Some(Self(key.to_string())) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A normalized, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    /// Trims whitespace and surrounding quote characters.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let city = raw.trim().trim_matches(&['"', '\''][..]).trim();
        if city.is_empty() {
            return Err(LookupError::EmptyCity);
        }
        Ok(Self(city.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city: String,
    pub country: String,
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: u8,
    pub description: String,
    /// Metres per second.
    pub wind_speed: f64,
    pub icon: String,
}

/// Capitalizes the first letter of every alphabetic run, lowercasing the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Rounds half away from zero.
pub fn round_celsius(value: f64) -> i64 {
    value.round() as i64
}
