//! `eventus`: load, store and report on scientific events.
//!
//! # Usage
//!
//! ```
//! eventus                      # demo: snapshot → store → report → weather
//! eventus --config eventus.toml summary --city Medellín
//! EVENTUS_WEATHER__WORKERS=2 eventus weather
//! ```

mod app;
mod seed;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eventus_core::store::EventStore;
use eventus_store_sqlite::SqliteStore;
use eventus_weather::WeatherClient;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "eventus", author, version, about = "Scientific event registry")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "eventus.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug, Default)]
enum Command {
  /// Load or seed events, repopulate the store, then report and fetch
  /// the weather.
  #[default]
  Demo,
  /// Replace the store's contents with the snapshot's events.
  Sync,
  /// List stored events by date.
  List,
  /// List stored cities.
  Cities,
  /// Attendance figures for stored events.
  Summary {
    /// Only count events held in this city.
    #[arg(long)]
    city: Option<String>,
  },
  /// Current weather for every stored city.
  Weather,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config)
    .with_context(|| format!("reading configuration from {}", cli.config.display()))?;
  tracing::debug!(?settings, "configuration loaded");

  let store = SqliteStore::open(&settings.database_path)
    .await
    .with_context(|| format!("opening store at {}", settings.database_path.display()))?;

  match cli.command.unwrap_or_default() {
    Command::Demo => demo(&settings, &store).await,
    Command::Sync => {
      let events = eventus_snapshot::load(&settings.snapshot_path)
        .with_context(|| format!("loading snapshot {}", settings.snapshot_path.display()))?;
      let ids = app::repopulate(&store, &events).await?;
      println!("Synchronised {} events into {}", ids.len(), store.path().display());
      Ok(())
    }
    Command::List => {
      app::print_events(&store.list_events().await.context("listing events")?);
      Ok(())
    }
    Command::Cities => {
      app::print_cities(&store.list_cities().await.context("listing cities")?);
      Ok(())
    }
    Command::Summary { city } => {
      let events = store.list_events().await.context("listing events")?;
      app::print_summary(&events, city.as_deref());
      Ok(())
    }
    Command::Weather => {
      let cities = store.list_cities().await.context("listing cities")?;
      let results = weather_client(&settings)?
        .fetch_all(cities, settings.weather.workers)
        .await;
      app::print_weather(&results);
      Ok(())
    }
  }
}

// ─── Demo ─────────────────────────────────────────────────────────────────────

async fn demo(settings: &Settings, store: &SqliteStore) -> Result<()> {
  println!("Preparing scientific event data...");
  let now = chrono::Local::now().naive_local();
  let events = app::prepare_events(&settings.snapshot_path, now)?;

  app::repopulate(store, &events).await?;
  let stored = store.list_events().await.context("listing events")?;
  println!("Events stored in the database: {}", stored.len());

  app::print_report(&stored, "Medellín");

  let results = weather_client(settings)?
    .fetch_all(app::cities_of(&stored), settings.weather.workers)
    .await;
  app::print_weather(&results);
  Ok(())
}

fn weather_client(settings: &Settings) -> Result<WeatherClient> {
  WeatherClient::new(&settings.weather_config()).context("building weather client")
}
