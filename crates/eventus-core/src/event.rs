//! Event types: scheduled gatherings held in a [`City`].
//!
//! A conference is not a subtype of an event; it is an event whose
//! [`EventKind`] carries the conference-only fields. Every decode path
//! (snapshot documents, relational rows) switches on an explicit discriminant
//! to rebuild the right kind.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  Result, ValidationError,
  city::{City, CityRecord},
};

/// Category given to plain events when the caller does not choose one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Category carried by every conference. Reserved: plain events cannot use it.
pub const CONFERENCE_CATEGORY: &str = "conference";

/// Modality given to conferences when the caller does not choose one.
pub const DEFAULT_MODALITY: &str = "in person";

// ─── Conference ──────────────────────────────────────────────────────────────

/// The fields only a conference has.
#[derive(Debug, Clone, PartialEq)]
pub struct Conference {
  topic:    String,
  /// Insertion-ordered and free of duplicates.
  speakers: Vec<String>,
  modality: String,
}

impl Conference {
  pub fn new(topic: impl Into<String>) -> Self {
    Self {
      topic:    topic.into(),
      speakers: Vec::new(),
      modality: DEFAULT_MODALITY.to_owned(),
    }
  }

  pub fn with_speakers<I, S>(mut self, speakers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for speaker in speakers {
      self.add_speaker(speaker);
    }
    self
  }

  pub fn with_modality(mut self, modality: impl Into<String>) -> Self {
    self.modality = modality.into();
    self
  }

  pub fn topic(&self) -> &str { &self.topic }

  pub fn speakers(&self) -> &[String] { &self.speakers }

  pub fn modality(&self) -> &str { &self.modality }

  pub fn set_topic(&mut self, topic: impl Into<String>) { self.topic = topic.into(); }

  pub fn set_modality(&mut self, modality: impl Into<String>) {
    self.modality = modality.into();
  }

  /// Append a speaker. Returns `false` (and changes nothing) if the name is
  /// already listed.
  pub fn add_speaker(&mut self, name: impl Into<String>) -> bool {
    let name = name.into();
    if self.speakers.contains(&name) {
      return false;
    }
    self.speakers.push(name);
    true
  }

  pub fn to_record(&self) -> ConferenceRecord {
    ConferenceRecord {
      topic:    self.topic.clone(),
      speakers: self.speakers.clone(),
      modality: self.modality.clone(),
    }
  }

  pub fn from_record(record: ConferenceRecord) -> Self {
    Self::new(record.topic)
      .with_speakers(record.speakers)
      .with_modality(record.modality)
  }
}

// ─── EventKind ───────────────────────────────────────────────────────────────

/// Which variant an [`Event`] is.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
  /// A generic event with a free-form category.
  Plain { category: String },
  /// A conference; its category is always [`CONFERENCE_CATEGORY`].
  Conference(Conference),
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A scheduled gathering.
///
/// Invariants, upheld by every constructor and mutator:
/// - `capacity >= 1`
/// - `0 <= attendance <= capacity`
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
  title:      String,
  date:       NaiveDateTime,
  city:       City,
  capacity:   u32,
  attendance: u32,
  kind:       EventKind,
}

impl Event {
  /// A plain event in the [`DEFAULT_CATEGORY`] with no attendees.
  pub fn new(
    title: impl Into<String>,
    date: NaiveDateTime,
    city: City,
    capacity: i64,
  ) -> Result<Self, ValidationError> {
    Ok(Self {
      title: title.into(),
      date,
      city,
      capacity: validate_capacity(capacity)?,
      attendance: 0,
      kind: EventKind::Plain { category: DEFAULT_CATEGORY.to_owned() },
    })
  }

  /// A conference with no attendees.
  pub fn conference(
    title: impl Into<String>,
    date: NaiveDateTime,
    city: City,
    capacity: i64,
    conference: Conference,
  ) -> Result<Self, ValidationError> {
    Ok(Self {
      title: title.into(),
      date,
      city,
      capacity: validate_capacity(capacity)?,
      attendance: 0,
      kind: EventKind::Conference(conference),
    })
  }

  pub fn with_category(
    mut self,
    category: impl Into<String>,
  ) -> Result<Self, ValidationError> {
    self.set_category(category)?;
    Ok(self)
  }

  pub fn with_attendance(mut self, attendance: i64) -> Result<Self, ValidationError> {
    self.set_attendance(attendance)?;
    Ok(self)
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn title(&self) -> &str { &self.title }

  pub fn date(&self) -> NaiveDateTime { self.date }

  pub fn city(&self) -> &City { &self.city }

  pub fn capacity(&self) -> u32 { self.capacity }

  pub fn attendance(&self) -> u32 { self.attendance }

  pub fn kind(&self) -> &EventKind { &self.kind }

  pub fn category(&self) -> &str {
    match &self.kind {
      EventKind::Plain { category } => category,
      EventKind::Conference(_) => CONFERENCE_CATEGORY,
    }
  }

  pub fn available_slots(&self) -> u32 { self.capacity - self.attendance }

  pub fn is_conference(&self) -> bool {
    matches!(self.kind, EventKind::Conference(_))
  }

  pub fn as_conference(&self) -> Option<&Conference> {
    match &self.kind {
      EventKind::Conference(c) => Some(c),
      EventKind::Plain { .. } => None,
    }
  }

  pub fn as_conference_mut(&mut self) -> Option<&mut Conference> {
    match &mut self.kind {
      EventKind::Conference(c) => Some(c),
      EventKind::Plain { .. } => None,
    }
  }

  // ── Mutators ──────────────────────────────────────────────────────────────

  pub fn set_title(&mut self, title: impl Into<String>) { self.title = title.into(); }

  pub fn set_date(&mut self, date: NaiveDateTime) { self.date = date; }

  pub fn city_mut(&mut self) -> &mut City { &mut self.city }

  /// Change the category of a plain event. Conferences keep theirs.
  pub fn set_category(
    &mut self,
    category: impl Into<String>,
  ) -> Result<(), ValidationError> {
    let category = category.into();
    match &mut self.kind {
      EventKind::Conference(_) => Err(ValidationError::CategoryFixed),
      EventKind::Plain { .. } if category == CONFERENCE_CATEGORY => {
        Err(ValidationError::ReservedCategory(category))
      }
      EventKind::Plain { category: current } => {
        *current = category;
        Ok(())
      }
    }
  }

  /// Change the capacity. Attendance above the new capacity is clamped down
  /// to it.
  pub fn set_capacity(&mut self, capacity: i64) -> Result<(), ValidationError> {
    let capacity = validate_capacity(capacity)?;
    self.capacity = capacity;
    self.attendance = self.attendance.min(capacity);
    Ok(())
  }

  pub fn set_attendance(&mut self, attendance: i64) -> Result<(), ValidationError> {
    if attendance < 0 {
      return Err(ValidationError::NegativeAttendance(attendance));
    }
    if attendance > i64::from(self.capacity) {
      return Err(ValidationError::AttendanceOverCapacity {
        attendance,
        capacity: self.capacity,
      });
    }
    // Bounded by `capacity`, which is a u32.
    self.attendance = attendance as u32;
    Ok(())
  }

  /// Add `delta` attendees (negative to cancel registrations).
  pub fn register_attendees(&mut self, delta: i64) -> Result<(), ValidationError> {
    self.set_attendance(i64::from(self.attendance).saturating_add(delta))
  }

  // ── Record form ───────────────────────────────────────────────────────────

  pub fn to_record(&self) -> EventRecord {
    let variant = match &self.kind {
      EventKind::Plain { .. } => VariantRecord::Event,
      EventKind::Conference(c) => VariantRecord::Conference(c.to_record()),
    };

    EventRecord {
      title: self.title.clone(),
      date: self.date,
      city: self.city.to_record(),
      capacity: i64::from(self.capacity),
      attendance: i64::from(self.attendance),
      category: self.category().to_owned(),
      variant,
    }
  }

  /// Rebuild an event from its record, dispatching on the variant tag. The
  /// `category` of a conference record is ignored.
  pub fn from_record(record: EventRecord) -> Result<Self, ValidationError> {
    let city = City::from_record(record.city)?;

    let event = match record.variant {
      VariantRecord::Event => {
        Self::new(record.title, record.date, city, record.capacity)?
          .with_category(record.category)?
      }
      VariantRecord::Conference(conference) => Self::conference(
        record.title,
        record.date,
        city,
        record.capacity,
        Conference::from_record(conference),
      )?,
    };

    event.with_attendance(record.attendance)
  }

  /// Serialise the variant-specific fields for the relational side-channel
  /// column. Plain events produce an empty object.
  pub fn side_channel(&self) -> Result<String> {
    match &self.kind {
      EventKind::Plain { .. } => Ok("{}".to_owned()),
      EventKind::Conference(c) => Ok(serde_json::to_string(&c.to_record())?),
    }
  }
}

impl fmt::Display for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} in {} on {} ({}/{} attendees)",
      self.title,
      self.city.name(),
      self.date.date(),
      self.attendance,
      self.capacity
    )
  }
}

fn validate_capacity(capacity: i64) -> Result<u32, ValidationError> {
  if capacity <= 0 {
    return Err(ValidationError::InvalidCapacity(capacity));
  }
  u32::try_from(capacity).map_err(|_| ValidationError::InvalidCapacity(capacity))
}

// ─── Record forms ────────────────────────────────────────────────────────────

fn default_category() -> String { DEFAULT_CATEGORY.to_owned() }

fn default_modality() -> String { DEFAULT_MODALITY.to_owned() }

/// The structured, serialisable form of an [`Event`].
///
/// Capacity and attendance are signed so that out-of-range input surfaces as
/// a [`ValidationError`] from [`Event::from_record`] rather than as a
/// deserialisation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
  pub title:      String,
  pub date:       NaiveDateTime,
  pub city:       CityRecord,
  pub capacity:   i64,
  pub attendance: i64,
  #[serde(default = "default_category")]
  pub category:   String,
  #[serde(flatten)]
  pub variant:    VariantRecord,
}

/// The discriminant plus variant-specific fields. Flattened into
/// [`EventRecord`] as a `"type"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VariantRecord {
  Event,
  Conference(ConferenceRecord),
}

impl VariantRecord {
  /// Decode the side-channel column of a relational row. The row's category
  /// is the discriminant; `extra` is only read for conferences, and an empty
  /// or missing one yields a conference with an empty topic.
  pub fn from_side_channel(category: &str, extra: Option<&str>) -> Result<Self> {
    if category != CONFERENCE_CATEGORY {
      return Ok(Self::Event);
    }
    let extra = extra.filter(|s| !s.trim().is_empty()).unwrap_or("{}");
    Ok(Self::Conference(serde_json::from_str(extra)?))
  }
}

/// The conference-only fields, as stored in snapshots and side channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceRecord {
  #[serde(default)]
  pub topic:    String,
  #[serde(default)]
  pub speakers: Vec<String>,
  #[serde(default = "default_modality")]
  pub modality: String,
}
