//! Layered runtime settings: built-in defaults, then the optional TOML file,
//! then `EVENTUS_*` environment variables.

use std::{path::{Path, PathBuf}, time::Duration};

use eventus_weather::{OPEN_METEO_URL, WeatherConfig};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
  /// JSON snapshot read on start-up and written after seeding.
  pub snapshot_path: PathBuf,
  /// SQLite database file.
  pub database_path: PathBuf,
  pub weather:       WeatherSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherSettings {
  pub base_url:     String,
  pub timeout_secs: u64,
  /// Maximum lookups in flight at once.
  pub workers:      usize,
}

impl Settings {
  /// Read settings from `path` (skipped if absent) and the environment.
  ///
  /// Top-level keys follow the prefix after one underscore
  /// (`EVENTUS_DATABASE_PATH`); nested keys use a double underscore
  /// (`EVENTUS_WEATHER__WORKERS=8`).
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("snapshot_path", "data/events.json")?
      .set_default("database_path", "data/events.db")?
      .set_default("weather.base_url", OPEN_METEO_URL)?
      .set_default("weather.timeout_secs", 10_i64)?
      .set_default("weather.workers", 5_i64)?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("EVENTUS")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn weather_config(&self) -> WeatherConfig {
    WeatherConfig {
      base_url: self.weather.base_url.clone(),
      timeout:  Duration::from_secs(self.weather.timeout_secs),
    }
  }
}
