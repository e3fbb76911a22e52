//! [`SqliteStore`], the SQLite implementation of [`EventStore`].

use std::path::{Path, PathBuf};

use rusqlite::OptionalExtension as _;

use eventus_core::{
  City, Event,
  store::{CityId, EventId, EventStore},
};

use crate::{
  Error, Result,
  encode::{CityParams, EventParams, RawCity, RawEventRow},
  schema::{CONNECTION_PRAGMAS, SCHEMA},
};

/// Insert a city or overwrite the coordinates and description of the row with
/// the same (name, country), yielding the row id in the same statement.
const UPSERT_CITY: &str = "
INSERT INTO cities (name, country, latitude, longitude, description)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (name, country) DO UPDATE SET
    latitude    = excluded.latitude,
    longitude   = excluded.longitude,
    description = excluded.description
RETURNING id";

fn upsert_city(
  conn: &rusqlite::Connection,
  city: &CityParams,
) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      UPSERT_CITY,
      rusqlite::params![
        city.name,
        city.country,
        city.latitude,
        city.longitude,
        city.description,
      ],
      |row| row.get(0),
    )
    .optional()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Eventus store backed by a single SQLite file.
///
/// Holds no connection: every operation opens one, does its work and closes
/// it again. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, creating parent directories and
  /// running schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self { path: path.as_ref().to_path_buf() };
    store.init_schema().await?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Create the tables if they do not exist yet. Safe to call any number of
  /// times; existing rows are untouched.
  pub async fn init_schema(&self) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
    }

    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;

    tracing::info!(path = %self.path.display(), "schema initialised");
    Ok(())
  }

  /// Run `f` on a fresh connection and close it afterwards.
  async fn with_conn<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(self.path.clone()).await?;
    let out = conn
      .call(move |conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        f(conn)
      })
      .await?;
    conn.close().await?;
    Ok(out)
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn save_city(&self, city: &City) -> Result<CityId> {
    let params = CityParams::from(city);

    let id = self
      .with_conn(move |conn| Ok(upsert_city(conn, &params)?))
      .await?
      .ok_or_else(|| Error::CityUnresolved {
        name:    city.name().to_owned(),
        country: city.country().to_owned(),
      })?;

    tracing::debug!(city_id = id, city = %city.key(), "saved city");
    Ok(CityId(id))
  }

  async fn save_event(&self, event: &Event) -> Result<EventId> {
    let params = EventParams::encode(event)?;

    // City upsert and event insert commit together or not at all.
    let inserted = self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;
        let Some(city_id) = upsert_city(&tx, &params.city)? else {
          return Ok(None);
        };

        tx.execute(
          "INSERT INTO events (
             title, date, category, capacity, attendance, city_id, extra_data
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            params.title,
            params.date,
            params.category,
            params.capacity,
            params.attendance,
            city_id,
            params.extra_data,
          ],
        )?;
        let event_id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Some((CityId(city_id), EventId(event_id))))
      })
      .await?;

    let Some((city_id, event_id)) = inserted else {
      return Err(Error::CityUnresolved {
        name:    event.city().name().to_owned(),
        country: event.city().country().to_owned(),
      });
    };

    tracing::debug!(%event_id, %city_id, title = event.title(), "saved event");
    Ok(event_id)
  }

  async fn list_cities(&self) -> Result<Vec<City>> {
    let raws: Vec<RawCity> = self
      .with_conn(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, country, latitude, longitude, description
           FROM cities
           ORDER BY id",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawCity {
              name:        row.get(0)?,
              country:     row.get(1)?,
              latitude:    row.get(2)?,
              longitude:   row.get(3)?,
              description: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCity::into_city).collect()
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    // LEFT JOIN rather than an inner join: an event whose city row is gone
    // must fail the listing, not vanish from it.
    let raws: Vec<RawEventRow> = self
      .with_conn(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             e.id, e.title, e.date, e.category,
             e.capacity, e.attendance, e.extra_data, e.city_id,
             c.id, c.name, c.country, c.latitude, c.longitude, c.description
           FROM events e
           LEFT JOIN cities c ON c.id = e.city_id
           ORDER BY e.date ASC, e.id ASC",
        )?;

        let rows = stmt
          .query_map([], |row| {
            let city = match row.get::<_, Option<i64>>(8)? {
              Some(_) => Some(RawCity {
                name:        row.get(9)?,
                country:     row.get(10)?,
                latitude:    row.get(11)?,
                longitude:   row.get(12)?,
                description: row.get(13)?,
              }),
              None => None,
            };

            Ok(RawEventRow {
              id: row.get(0)?,
              title: row.get(1)?,
              date: row.get(2)?,
              category: row.get(3)?,
              capacity: row.get(4)?,
              attendance: row.get(5)?,
              extra_data: row.get(6)?,
              city_id: row.get(7)?,
              city,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let decoded = raws
      .into_iter()
      .map(RawEventRow::into_event)
      .collect::<Result<Vec<_>>>();

    let mut events = match decoded {
      Err(e @ Error::DanglingCity { .. }) => {
        tracing::error!(error = %e, path = %self.path.display(), "referential integrity violated");
        return Err(e);
      }
      other => other?,
    };

    // Date text only sorts chronologically for four-digit years. The sort is
    // stable, so same-date rows keep the id order from the query.
    events.sort_by_key(Event::date);
    Ok(events)
  }

  async fn reset(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(
          "DELETE FROM events;
           DELETE FROM cities;
           DELETE FROM sqlite_sequence WHERE name IN ('events', 'cities');",
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(path = %self.path.display(), "store reset");
    Ok(())
  }
}
