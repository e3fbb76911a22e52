//! Current-weather lookups for cities, fetched concurrently from Open-Meteo.
//!
//! A batch never fails as a whole. Each city gets its own [`CityWeather`]
//! entry, holding either the observed conditions or the error message for
//! that city alone.

pub mod error;

use std::{collections::BTreeMap, time::Duration};

use eventus_core::City;
use futures::StreamExt as _;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

pub use error::{Error, Result};

/// Public Open-Meteo forecast endpoint.
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the weather API.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
  pub base_url: String,
  /// Per-request timeout.
  pub timeout:  Duration,
}

impl Default for WeatherConfig {
  fn default() -> Self {
    Self {
      base_url: OPEN_METEO_URL.to_owned(),
      timeout:  Duration::from_secs(10),
    }
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Conditions reported under `current_weather`. Any field the API leaves out
/// is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
  /// Degrees Celsius.
  pub temperature: Option<f64>,
  /// Kilometres per hour.
  #[serde(alias = "windspeed")]
  pub wind_speed:  Option<f64>,
  /// Observation time as reported by the API (ISO 8601, local to the city).
  pub time:        Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherOutcome {
  Current(CurrentWeather),
  Error { message: String },
}

/// The lookup result for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityWeather {
  pub city:    String,
  pub country: String,
  #[serde(flatten)]
  pub outcome: WeatherOutcome,
}

#[derive(Deserialize)]
struct ForecastResponse {
  #[serde(default)]
  current_weather: Option<CurrentWeather>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for the Open-Meteo forecast API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct WeatherClient {
  client:   Client,
  base_url: Url,
}

impl WeatherClient {
  pub fn new(config: &WeatherConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url).map_err(|e| Error::InvalidBaseUrl {
      url:    config.base_url.clone(),
      reason: e.to_string(),
    })?;
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, base_url })
  }

  pub fn forecast_url(&self, city: &City) -> Url { forecast_url(&self.base_url, city) }

  /// Look up one city. Never fails: transport errors, non-success statuses
  /// and undecodable bodies all become [`WeatherOutcome::Error`].
  pub async fn fetch(&self, city: &City) -> CityWeather {
    let outcome = match self.try_fetch(city).await {
      Ok(current) => WeatherOutcome::Current(current),
      Err(e) => {
        tracing::warn!(city = %city.key(), error = %e, "weather lookup failed");
        WeatherOutcome::Error { message: e.to_string() }
      }
    };

    CityWeather {
      city: city.name().to_owned(),
      country: city.country().to_owned(),
      outcome,
    }
  }

  async fn try_fetch(&self, city: &City) -> Result<CurrentWeather, reqwest::Error> {
    let body: ForecastResponse = self
      .client
      .get(self.forecast_url(city))
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;
    Ok(body.current_weather.unwrap_or_default())
  }

  /// Look up every distinct city with at most `workers` requests in flight
  /// (at least one). The result is keyed by `"Name|Country"`; duplicate
  /// cities are fetched once.
  pub async fn fetch_all<I>(&self, cities: I, workers: usize) -> BTreeMap<String, CityWeather>
  where
    I: IntoIterator<Item = City>,
  {
    let mut unique: BTreeMap<String, City> = BTreeMap::new();
    for city in cities {
      unique.entry(city.key()).or_insert(city);
    }

    let workers = workers.max(1);
    tracing::info!(cities = unique.len(), workers, "fetching current weather");

    // Each future owns its city and yields its own (key, result) pair; the
    // map is only assembled once the stream is drained.
    futures::stream::iter(unique)
      .map(|(key, city)| async move {
        let weather = self.fetch(&city).await;
        (key, weather)
      })
      .buffer_unordered(workers)
      .collect()
      .await
  }
}

/// `base` with the coordinate and `current_weather=true` query parameters
/// appended.
pub fn forecast_url(base: &Url, city: &City) -> Url {
  let mut url = base.clone();
  url
    .query_pairs_mut()
    .append_pair("latitude", &city.latitude().to_string())
    .append_pair("longitude", &city.longitude().to_string())
    .append_pair("current_weather", "true");
  url
}

#[cfg(test)]
mod tests;
