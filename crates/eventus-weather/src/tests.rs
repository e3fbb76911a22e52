//! Weather client tests against an in-process stand-in for Open-Meteo.

use std::{
  collections::HashMap,
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use axum::{
  Json, Router,
  extract::{Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
};
use eventus_core::City;
use serde_json::json;

use crate::{WeatherClient, WeatherConfig, WeatherOutcome};

/// Request bookkeeping shared with the fake server.
#[derive(Default)]
struct Traffic {
  hits:      AtomicUsize,
  in_flight: AtomicUsize,
  peak:      AtomicUsize,
}

/// Serves `/v1/forecast`: cities south of the equator get a 500, everything
/// else a fixed observation after a short delay. Returns the endpoint URL and
/// the request bookkeeping.
async fn fake_open_meteo() -> (String, Arc<Traffic>) {
  async fn forecast(
    State(traffic): State<Arc<Traffic>>,
    Query(params): Query<HashMap<String, String>>,
  ) -> Response {
    traffic.hits.fetch_add(1, Ordering::SeqCst);
    let now = traffic.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    traffic.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    traffic.in_flight.fetch_sub(1, Ordering::SeqCst);

    let latitude: f64 = params
      .get("latitude")
      .and_then(|v| v.parse().ok())
      .unwrap_or_default();
    if params.get("current_weather").map(String::as_str) != Some("true") {
      return StatusCode::BAD_REQUEST.into_response();
    }
    if latitude < 0.0 {
      return (StatusCode::INTERNAL_SERVER_ERROR, "upstream failure").into_response();
    }
    Json(json!({
      "latitude": latitude,
      "current_weather": {
        "temperature": 14.5,
        "windspeed": 7.2,
        "time": "2025-05-01T12:00"
      }
    }))
    .into_response()
  }

  let traffic = Arc::new(Traffic::default());
  let app = Router::new()
    .route("/v1/forecast", get(forecast))
    .with_state(traffic.clone());

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let address = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });

  (format!("http://{address}/v1/forecast"), traffic)
}

fn client(base_url: &str) -> WeatherClient {
  WeatherClient::new(&WeatherConfig {
    base_url: base_url.to_owned(),
    timeout:  Duration::from_secs(5),
  })
  .unwrap()
}

fn bogota() -> City { City::new("Bogotá", "Colombia", 4.711, -74.072, "").unwrap() }

fn quito() -> City { City::new("Quito", "Ecuador", -0.1807, -78.4678, "").unwrap() }

#[test]
fn forecast_url_carries_coordinates() {
  let url = client("https://api.open-meteo.com/v1/forecast").forecast_url(&bogota());
  let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

  assert_eq!(url.path(), "/v1/forecast");
  assert_eq!(pairs["latitude"], "4.711");
  assert_eq!(pairs["longitude"], "-74.072");
  assert_eq!(pairs["current_weather"], "true");
}

#[test]
fn invalid_base_url_is_rejected() {
  let result = WeatherClient::new(&WeatherConfig {
    base_url: "not a url".to_owned(),
    ..WeatherConfig::default()
  });
  assert!(matches!(result, Err(crate::Error::InvalidBaseUrl { .. })));
}

#[tokio::test]
async fn fetch_decodes_current_weather() {
  let (url, _) = fake_open_meteo().await;
  let weather = client(&url).fetch(&bogota()).await;

  assert_eq!(weather.city, "Bogotá");
  assert_eq!(weather.country, "Colombia");
  let WeatherOutcome::Current(current) = weather.outcome else {
    panic!("expected an observation, got {:?}", weather.outcome);
  };
  assert_eq!(current.temperature, Some(14.5));
  assert_eq!(current.wind_speed, Some(7.2));
  assert_eq!(current.time.as_deref(), Some("2025-05-01T12:00"));
}

#[tokio::test]
async fn one_failing_city_does_not_abort_the_batch() {
  let (url, _) = fake_open_meteo().await;
  let results = client(&url).fetch_all([bogota(), quito()], 2).await;

  assert_eq!(results.len(), 2);
  assert!(matches!(
    results["Bogotá|Colombia"].outcome,
    WeatherOutcome::Current(_)
  ));
  assert!(matches!(
    &results["Quito|Ecuador"].outcome,
    WeatherOutcome::Error { message } if message.contains("500")
  ));
}

#[tokio::test]
async fn duplicate_cities_are_fetched_once() {
  let (url, traffic) = fake_open_meteo().await;
  let results = client(&url)
    .fetch_all([bogota(), bogota(), quito(), bogota()], 0)
    .await;

  assert_eq!(results.len(), 2);
  assert_eq!(traffic.hits.load(Ordering::SeqCst), 2);
  // Zero workers still means one request at a time.
  assert_eq!(traffic.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn requests_in_flight_never_exceed_workers() {
  let (url, traffic) = fake_open_meteo().await;
  let cities: Vec<City> = (0..6)
    .map(|i| City::new(&format!("Station {i}"), "Testland", f64::from(i), 0.0, "").unwrap())
    .collect();

  let results = client(&url).fetch_all(cities, 2).await;

  assert_eq!(results.len(), 6);
  assert_eq!(traffic.hits.load(Ordering::SeqCst), 6);
  let peak = traffic.peak.load(Ordering::SeqCst);
  assert!((1..=2).contains(&peak), "peak in flight was {peak}");
}

#[tokio::test]
async fn unreachable_server_becomes_error_entries() {
  // Port 9 (discard) is not expected to be listening.
  let results = client("http://127.0.0.1:9/v1/forecast")
    .fetch_all([bogota(), quito()], 5)
    .await;

  assert_eq!(results.len(), 2);
  assert!(
    results
      .values()
      .all(|w| matches!(w.outcome, WeatherOutcome::Error { .. }))
  );
}

#[test]
fn outcome_serialises_with_status_tag() {
  let weather = crate::CityWeather {
    city:    "Quito".into(),
    country: "Ecuador".into(),
    outcome: WeatherOutcome::Error { message: "timed out".into() },
  };
  let value = serde_json::to_value(&weather).unwrap();
  assert_eq!(
    value,
    json!({ "city": "Quito", "country": "Ecuador", "status": "error", "message": "timed out" })
  );
}
