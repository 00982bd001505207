use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::DEFAULT_BASE_URL,
    error::LookupError,
    model::{CityQuery, Credential, WeatherSummary, round_celsius, title_case},
    provider::classify_status,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl Default for OpenWeatherProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl OpenWeatherProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_summary(self) -> Result<WeatherSummary, LookupError> {
        let condition = self.weather.into_iter().next().ok_or_else(|| {
            LookupError::Unexpected("response contained no weather conditions".into())
        })?;

        Ok(WeatherSummary {
            city: self.name,
            country: self.sys.country,
            temperature: round_celsius(self.main.temp),
            feels_like: round_celsius(self.main.feels_like),
            humidity: self.main.humidity,
            description: title_case(&condition.description),
            wind_speed: self.wind.speed,
            icon: condition.icon,
        })
    }
}

/// Decode a 200 response body into a summary.
fn decode_current(body: &str) -> Result<WeatherSummary, LookupError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|err| LookupError::Unexpected(err.to_string()))?;
    parsed.into_summary()
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_connect() || err.is_timeout() {
        LookupError::Network
    } else {
        LookupError::Unexpected(err.to_string())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        city: &CityQuery,
        credential: &Credential,
    ) -> Result<WeatherSummary, LookupError> {
        debug!(city = %city, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("q", city.as_str()),
                ("appid", credential.expose()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|err| {
                warn!(city = %city, error = %err, "OpenWeather request failed");
                transport_error(err)
            })?;

        let status = res.status();
        if let Some(err) = classify_status(status, city) {
            warn!(city = %city, status = status.as_u16(), "OpenWeather returned an error status");
            return Err(err);
        }

        let body = res.text().await.map_err(transport_error)?;
        let summary = decode_current(&body)?;

        debug!(city = %summary.city, country = %summary.country, "decoded current weather");
        Ok(summary)
    }
}
