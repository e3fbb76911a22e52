//! City, the place an event happens.
//!
//! A city's identity is the pair (name, country) after normalisation. Two
//! cities with the same identity are the same row in any store, whatever their
//! coordinates or description say.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

// ─── City ────────────────────────────────────────────────────────────────────

/// A normalised city value.
///
/// Fields are private so the normalisation applied in [`City::new`] cannot be
/// bypassed.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
  name:        String,
  country:     String,
  latitude:    f64,
  longitude:   f64,
  description: String,
}

impl City {
  /// Build a city, trimming and title-casing `name` and `country` and
  /// trimming `description`.
  pub fn new(
    name: &str,
    country: &str,
    latitude: f64,
    longitude: f64,
    description: &str,
  ) -> Result<Self, ValidationError> {
    check_coordinate("latitude", latitude, 90.0)?;
    check_coordinate("longitude", longitude, 180.0)?;

    Ok(Self {
      name: title_case(name.trim()),
      country: title_case(country.trim()),
      latitude,
      longitude,
      description: description.trim().to_owned(),
    })
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn country(&self) -> &str { &self.country }

  pub fn latitude(&self) -> f64 { self.latitude }

  pub fn longitude(&self) -> f64 { self.longitude }

  pub fn description(&self) -> &str { &self.description }

  pub fn set_description(&mut self, description: &str) {
    self.description = description.trim().to_owned();
  }

  /// The `"Name|Country"` identity key.
  pub fn key(&self) -> String { format!("{}|{}", self.name, self.country) }

  pub fn to_record(&self) -> CityRecord {
    CityRecord {
      name:        self.name.clone(),
      country:     self.country.clone(),
      latitude:    self.latitude,
      longitude:   self.longitude,
      description: self.description.clone(),
    }
  }

  pub fn from_record(record: CityRecord) -> Result<Self, ValidationError> {
    Self::new(
      &record.name,
      &record.country,
      record.latitude,
      record.longitude,
      &record.description,
    )
  }
}

impl fmt::Display for City {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}, {} ({}, {})",
      self.name, self.country, self.latitude, self.longitude
    )
  }
}

fn check_coordinate(
  axis: &'static str,
  value: f64,
  bound: f64,
) -> Result<(), ValidationError> {
  if value.is_finite() && (-bound..=bound).contains(&value) {
    Ok(())
  } else {
    Err(ValidationError::InvalidCoordinate { axis, value })
  }
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest, so `"são PAULO"` becomes `"São Paulo"` and `"o'neil"` becomes
/// `"O'Neil"`.
fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut in_word = false;
  for c in s.chars() {
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

// ─── Record form ─────────────────────────────────────────────────────────────

/// The structured, serialisable form of a [`City`]; nested inside every
/// [`EventRecord`](crate::event::EventRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
  pub name:        String,
  pub country:     String,
  pub latitude:    f64,
  pub longitude:   f64,
  #[serde(default)]
  pub description: String,
}
