//! Encoding and decoding helpers between Eventus domain types and the plain
//! column values stored in SQLite.
//!
//! Dates are stored as ISO-8601 text without an offset. Variant-specific
//! event fields live in the `extra_data` JSON column, with the row's
//! `category` acting as the discriminant.

use chrono::NaiveDateTime;
use eventus_core::{
  City, Event,
  city::CityRecord,
  event::{EventRecord, VariantRecord},
  store::{CityId, EventId},
};

use crate::{Error, Result};

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

/// Fixed-width up to the seconds for years 0000 to 9999, then a 0/3/6/9-digit
/// fraction. Within that range text order equals chronological order; chrono
/// writes other years with a sign and more digits.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn encode_date(date: NaiveDateTime) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDateTime> {
  s.parse::<NaiveDateTime>()
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Write-side parameters ───────────────────────────────────────────────────

/// Owned column values for a city upsert; built on the caller's side so they
/// can be moved onto the database thread.
pub struct CityParams {
  pub name:        String,
  pub country:     String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub description: String,
}

impl From<&City> for CityParams {
  fn from(city: &City) -> Self {
    Self {
      name:        city.name().to_owned(),
      country:     city.country().to_owned(),
      latitude:    city.latitude(),
      longitude:   city.longitude(),
      description: city.description().to_owned(),
    }
  }
}

/// Owned column values for an event insert, minus the city id which is only
/// known once the city has been upserted.
pub struct EventParams {
  pub title:      String,
  pub date:       String,
  pub category:   String,
  pub capacity:   i64,
  pub attendance: i64,
  pub extra_data: String,
  pub city:       CityParams,
}

impl EventParams {
  pub fn encode(event: &Event) -> Result<Self> {
    Ok(Self {
      title:      event.title().to_owned(),
      date:       encode_date(event.date()),
      category:   event.category().to_owned(),
      capacity:   i64::from(event.capacity()),
      attendance: i64::from(event.attendance()),
      extra_data: event.side_channel()?,
      city:       CityParams::from(event.city()),
    })
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `cities` row.
pub struct RawCity {
  pub name:        String,
  pub country:     String,
  pub latitude:    f64,
  pub longitude:   f64,
  pub description: Option<String>,
}

impl RawCity {
  pub fn into_record(self) -> CityRecord {
    CityRecord {
      name:        self.name,
      country:     self.country,
      latitude:    self.latitude,
      longitude:   self.longitude,
      description: self.description.unwrap_or_default(),
    }
  }

  pub fn into_city(self) -> Result<City> { Ok(City::from_record(self.into_record())?) }
}

/// Raw values read from an `events` row left-joined with its city. `city` is
/// `None` when the referenced row is missing.
pub struct RawEventRow {
  pub id:         i64,
  pub title:      String,
  pub date:       String,
  pub category:   String,
  pub capacity:   i64,
  pub attendance: i64,
  pub extra_data: Option<String>,
  pub city_id:    i64,
  pub city:       Option<RawCity>,
}

impl RawEventRow {
  pub fn into_event(self) -> Result<Event> {
    let city = self.city.ok_or(Error::DanglingCity {
      event_id: EventId(self.id),
      city_id:  CityId(self.city_id),
    })?;

    let variant =
      VariantRecord::from_side_channel(&self.category, self.extra_data.as_deref())?;

    let record = EventRecord {
      title: self.title,
      date: decode_date(&self.date)?,
      city: city.into_record(),
      capacity: self.capacity,
      attendance: self.attendance,
      category: self.category,
      variant,
    };

    Ok(Event::from_record(record)?)
  }
}
