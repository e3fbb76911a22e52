//! JSON snapshot codec for Eventus.
//!
//! A snapshot is a single JSON array holding every event in order. It is
//! always rewritten in full; there is no incremental update.
//!
//! Each entry is an [`EventRecord`]: a `"type"` discriminant (`"Event"` or
//! `"Conference"`), a nested city object, an ISO-8601 `date`, `capacity`,
//! `attendance`, `category`, and for conferences `topic`, `speakers` and
//! `modality`.

pub mod error;

use std::{fs, io, path::Path};

use eventus_core::{Event, event::EventRecord};

pub use error::{Error, Result};

/// Encode `events` as a pretty-printed JSON document.
pub fn to_string(events: &[Event]) -> Result<String> {
  let records: Vec<EventRecord> = events.iter().map(Event::to_record).collect();
  Ok(serde_json::to_string_pretty(&records)?)
}

/// Decode a snapshot document. Any malformed entry fails the whole decode.
pub fn from_str(text: &str) -> Result<Vec<Event>> {
  let records: Vec<EventRecord> = serde_json::from_str(text)?;
  records
    .into_iter()
    .map(|record| Event::from_record(record).map_err(Error::from))
    .collect()
}

/// Write `events` to `path`, creating parent directories and replacing any
/// existing file.
pub fn export(events: &[Event], path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  let text = to_string(events)?;

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|source| Error::Io {
      path: parent.to_path_buf(),
      source,
    })?;
  }
  fs::write(path, text).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;

  tracing::info!(path = %path.display(), count = events.len(), "exported snapshot");
  Ok(())
}

/// Read the snapshot at `path`. A missing file is a first run, not an error:
/// it yields an empty collection.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Event>> {
  let path = path.as_ref();
  let text = match fs::read_to_string(path) {
    Ok(text) => text,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      tracing::debug!(path = %path.display(), "no snapshot yet");
      return Ok(Vec::new());
    }
    Err(source) => {
      return Err(Error::Io { path: path.to_path_buf(), source });
    }
  };

  let events = from_str(&text)?;
  tracing::info!(path = %path.display(), count = events.len(), "loaded snapshot");
  Ok(events)
}
