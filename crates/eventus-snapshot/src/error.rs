//! Error types for the eventus-snapshot codec.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error on {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed snapshot: {0}")]
  Json(#[from] serde_json::Error),

  /// A decoded entry breaks a domain invariant.
  #[error("invalid event in snapshot: {0}")]
  Core(#[from] eventus_core::ValidationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
