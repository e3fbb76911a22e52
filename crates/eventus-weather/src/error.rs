//! Error type for `eventus-weather`.
//!
//! Only client construction can fail. Per-city lookup failures are reported
//! as data in [`WeatherOutcome::Error`](crate::WeatherOutcome::Error).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid weather API url {url:?}: {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("http client error: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
