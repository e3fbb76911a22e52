//! Error type for `eventus-store-sqlite`.

use std::path::PathBuf;

use eventus_core::store::{CityId, EventId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] eventus_core::Error),

  #[error("invalid stored value: {0}")]
  Validation(#[from] eventus_core::ValidationError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("could not create {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The city upsert completed without yielding a row id.
  #[error("could not resolve an id for city {name}|{country}")]
  CityUnresolved { name: String, country: String },

  /// An event row references a city row that does not exist.
  #[error("event {event_id} references missing city {city_id}")]
  DanglingCity { event_id: EventId, city_id: CityId },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
