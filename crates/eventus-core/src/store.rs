//! The `EventStore` trait and the persisted identity types.
//!
//! In memory an [`Event`] embeds its [`City`] by value. A store converts that
//! into an id-indexed form: it resolves (upserts) the city to a [`CityId`],
//! then writes an event row referencing it. Domain values never carry ids.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::{City, Event};

// ─── Identities ──────────────────────────────────────────────────────────────

/// Row identity of a stored city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub i64);

/// Row identity of a stored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl fmt::Display for CityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl fmt::Display for EventId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a relational event store backend.
///
/// Cities are unique per (name, country): saving a city that already exists
/// overwrites its coordinates and description. Events are append-only; saving
/// the same event twice stores it twice.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `city`, or update the existing row with the same identity, and
  /// return the row's id.
  fn save_city<'a>(
    &'a self,
    city: &'a City,
  ) -> impl Future<Output = Result<CityId, Self::Error>> + Send + 'a;

  /// Upsert the event's city, then insert a new event row referencing it.
  fn save_event<'a>(
    &'a self,
    event: &'a Event,
  ) -> impl Future<Output = Result<EventId, Self::Error>> + Send + 'a;

  /// All stored cities, in storage order.
  fn list_cities(&self) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + '_;

  /// All stored events with their cities, ordered by date ascending.
  fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Remove every event and city so the store can be repopulated.
  fn reset(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
