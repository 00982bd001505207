use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

use crate::{
    error::LookupError,
    model::{CityQuery, Credential, WeatherSummary},
};

pub mod openweather;

/// City used by [`verify_credential`] to probe the provider.
pub const PROBE_CITY: &str = "London";

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One round trip to the provider's current-weather endpoint.
    async fn current_weather(
        &self,
        city: &CityQuery,
        credential: &Credential,
    ) -> Result<WeatherSummary, LookupError>;
}

/// Validate the inputs and fetch current weather for `city`.
///
/// The city is checked first, so a blank city is reported even without a key.
/// Nothing is sent to the provider when either check fails.
pub async fn lookup<P>(
    provider: &P,
    city: &str,
    credential: Option<&Credential>,
) -> Result<WeatherSummary, LookupError>
where
    P: WeatherProvider + ?Sized,
{
    let city = CityQuery::parse(city)?;
    let credential = credential.ok_or(LookupError::MissingCredential)?;

    provider.current_weather(&city, credential).await
}

/// Map a non-success provider status to its error. Returns `None` for 200.
pub fn classify_status(status: StatusCode, city: &CityQuery) -> Option<LookupError> {
    match status {
        StatusCode::OK => None,
        StatusCode::UNAUTHORIZED => Some(LookupError::InvalidCredential),
        StatusCode::NOT_FOUND => Some(LookupError::CityNotFound { city: city.to_string() }),
        other => Some(LookupError::Provider {
            status: other.as_u16(),
            reason: other.canonical_reason().unwrap_or("Unknown").to_string(),
        }),
    }
}

/// Probe the provider with a known city; only a rejected key is reported.
///
/// Other failures (network, outages) say nothing about the key and are ignored.
pub async fn verify_credential<P>(provider: &P, credential: &Credential) -> Result<(), LookupError>
where
    P: WeatherProvider + ?Sized,
{
    let city = CityQuery::parse(PROBE_CITY)?;
    match provider.current_weather(&city, credential).await {
        Err(LookupError::InvalidCredential) => Err(LookupError::InvalidCredential),
        Err(err) => {
            tracing::debug!(error = %err, "credential probe inconclusive");
            Ok(())
        }
        Ok(_) => Ok(()),
    }
}
