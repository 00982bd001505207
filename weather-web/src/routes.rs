//! HTTP routes: `GET /` and `POST /weather`.
//!
//! `POST /weather` always answers 200; failures travel in the `error` field.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use weather_core::{Credential, LookupError, WeatherProvider, WeatherSummary, lookup};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    pub credential: Option<Credential>,
}

/// Body of `POST /weather`. A missing `city` counts as empty.
#[derive(Debug, Deserialize)]
pub struct WeatherForm {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WeatherReply {
    Summary(WeatherSummary),
    Error { error: String },
}

impl From<Result<WeatherSummary, LookupError>> for WeatherReply {
    fn from(result: Result<WeatherSummary, LookupError>) -> Self {
        match result {
            Ok(summary) => WeatherReply::Summary(summary),
            Err(err) => WeatherReply::Error { error: err.to_string() },
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/weather", post(handle_weather))
        .with_state(state)
}

/// GET /: the static lookup page.
async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /weather: look up one city.
async fn handle_weather(
    State(state): State<AppState>,
    form: Result<Json<WeatherForm>, JsonRejection>,
) -> Json<WeatherReply> {
    let city = match form {
        Ok(Json(form)) => form.city,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "unreadable weather request body");
            return Json(WeatherReply::Error { error: LookupError::EmptyCity.to_string() });
        }
    };

    let result = lookup(state.provider.as_ref(), &city, state.credential.as_ref()).await;
    match &result {
        Ok(summary) => info!(city = %summary.city, "weather lookup succeeded"),
        Err(err) => info!(city = %city.trim(), kind = ?err.kind(), "weather lookup failed"),
    }

    Json(result.into())
}
