//! The steps behind each subcommand, kept apart from argument parsing so they
//! can run against any [`EventStore`].

use std::{
  collections::{BTreeMap, HashSet},
  path::Path,
};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use eventus_core::{
  City, Event,
  processing::{attendance_summary, filter_by_city, sort_by_date},
  store::{EventId, EventStore},
};
use eventus_weather::{CityWeather, WeatherOutcome};

use crate::seed;

// ─── Data preparation ─────────────────────────────────────────────────────────

/// Events from the snapshot at `path`. When it is missing or empty, seed the
/// sample events and write them out first.
pub fn prepare_events(path: &Path, now: NaiveDateTime) -> Result<Vec<Event>> {
  let events = eventus_snapshot::load(path)
    .with_context(|| format!("loading snapshot {}", path.display()))?;
  if !events.is_empty() {
    tracing::info!(count = events.len(), "loaded events from snapshot");
    return Ok(events);
  }

  let events = seed::sample_events(now).context("building sample events")?;
  eventus_snapshot::export(&events, path)
    .with_context(|| format!("writing snapshot {}", path.display()))?;
  tracing::info!(count = events.len(), "seeded sample events");
  Ok(events)
}

/// Empty the store, then save `events` in order.
pub async fn repopulate<S: EventStore>(store: &S, events: &[Event]) -> Result<Vec<EventId>> {
  store.reset().await.context("resetting store")?;

  let mut ids = Vec::with_capacity(events.len());
  for event in events {
    let id = store
      .save_event(event)
      .await
      .with_context(|| format!("saving event {:?}", event.title()))?;
    ids.push(id);
  }
  Ok(ids)
}

/// Distinct cities of `events`, in first-seen order.
pub fn cities_of(events: &[Event]) -> Vec<City> {
  let mut seen = HashSet::new();
  events
    .iter()
    .map(Event::city)
    .filter(|c| seen.insert(c.key()))
    .cloned()
    .collect()
}

// ─── Output ───────────────────────────────────────────────────────────────────

pub fn print_events(events: &[Event]) {
  if events.is_empty() {
    println!("(no events)");
  }
  for event in events {
    println!("- {event}");
  }
}

pub fn print_cities(cities: &[City]) {
  if cities.is_empty() {
    println!("(no cities)");
  }
  for city in cities {
    if city.description().is_empty() {
      println!("- {city}");
    } else {
      println!("- {city}: {}", city.description());
    }
  }
}

pub fn print_summary(events: &[Event], city: Option<&str>) {
  let selected: Vec<Event> = match city {
    Some(name) => filter_by_city(events, name).into_iter().cloned().collect(),
    None => events.to_vec(),
  };
  let summary = attendance_summary(&selected);

  println!("Total events:     {}", summary.total_events);
  println!("Total attendance: {}", summary.total_attendance);
  println!("Total capacity:   {}", summary.total_capacity);
  println!("Occupancy:        {:.2}%", summary.occupancy_pct);
  println!("Cities:           {}", summary.cities.join(", "));
}

/// The full demo report: summary, one city's events and the date-ordered list.
pub fn print_report(events: &[Event], highlight_city: &str) {
  println!("\n=== Event summary ===");
  print_summary(events, None);

  println!("\nEvents in {highlight_city}:");
  let in_city: Vec<Event> = filter_by_city(events, highlight_city)
    .into_iter()
    .cloned()
    .collect();
  print_events(&in_city);

  println!("\nEvents by date:");
  print_events(&sort_by_date(events, false));
}

pub fn print_weather(results: &BTreeMap<String, CityWeather>) {
  println!("\n=== Current weather ===");
  for (key, weather) in results {
    match &weather.outcome {
      WeatherOutcome::Current(current) => println!(
        "{} ({}) - {} °C, wind {} km/h",
        weather.city,
        weather.country,
        display_reading(current.temperature),
        display_reading(current.wind_speed),
      ),
      WeatherOutcome::Error { message } => println!("{key}: lookup failed -> {message}"),
    }
  }
}

fn display_reading(value: Option<f64>) -> String {
  value.map_or_else(|| "?".to_owned(), |v| v.to_string())
}
