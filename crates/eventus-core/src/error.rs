//! Error types for `eventus-core`.

use thiserror::Error;

/// An invariant violation on a domain value. The value that would have been
/// produced is discarded; nothing ever holds an out-of-range state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  #[error("capacity must be a positive integer, got {0}")]
  InvalidCapacity(i64),

  #[error("attendance cannot be negative, got {0}")]
  NegativeAttendance(i64),

  #[error("attendance {attendance} exceeds capacity {capacity}")]
  AttendanceOverCapacity { attendance: i64, capacity: u32 },

  #[error("category {0:?} is reserved for conferences")]
  ReservedCategory(String),

  #[error("the category of a conference cannot be changed")]
  CategoryFixed,

  #[error("{axis} {value} is out of range")]
  InvalidCoordinate { axis: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
