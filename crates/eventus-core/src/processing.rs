//! Pure helpers over collections of events: filtering, ordering and
//! attendance aggregation.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::Event;

/// Events whose city name matches `city_name`, ignoring case and surrounding
/// whitespace.
pub fn filter_by_city<'a>(events: &'a [Event], city_name: &str) -> Vec<&'a Event> {
  let wanted = city_name.trim().to_lowercase();
  events
    .iter()
    .filter(|e| e.city().name().to_lowercase() == wanted)
    .collect()
}

/// A copy of `events` ordered by date. The sort is stable, so events on the
/// same date keep their relative order.
pub fn sort_by_date(events: &[Event], descending: bool) -> Vec<Event> {
  let mut sorted = events.to_vec();
  if descending {
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
  } else {
    sorted.sort_by_key(Event::date);
  }
  sorted
}

/// Events dated within `[start, end]`, both ends inclusive.
pub fn events_between(
  events: &[Event],
  start: NaiveDateTime,
  end: NaiveDateTime,
) -> Vec<&Event> {
  events
    .iter()
    .filter(|e| (start..=end).contains(&e.date()))
    .collect()
}

/// Aggregate attendance figures for a set of events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
  pub total_events:     usize,
  pub total_attendance: u64,
  pub total_capacity:   u64,
  /// Attendance as a percentage of capacity, rounded to two decimals.
  pub occupancy_pct:    f64,
  /// Distinct city names, sorted.
  pub cities:           Vec<String>,
}

pub fn attendance_summary(events: &[Event]) -> AttendanceSummary {
  let total_attendance: u64 = events.iter().map(|e| u64::from(e.attendance())).sum();
  let total_capacity: u64 = events.iter().map(|e| u64::from(e.capacity())).sum();

  let occupancy_pct = if total_capacity == 0 {
    0.0
  } else {
    let pct = total_attendance as f64 / total_capacity as f64 * 100.0;
    (pct * 100.0).round() / 100.0
  };

  let cities: BTreeSet<&str> = events.iter().map(|e| e.city().name()).collect();

  AttendanceSummary {
    total_events: events.len(),
    total_attendance,
    total_capacity,
    occupancy_pct,
    cities: cities.into_iter().map(str::to_owned).collect(),
  }
}
