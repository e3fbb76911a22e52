//! SQL schema for the Eventus SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE … IF NOT EXISTS`. Running it
/// against an existing database leaves the data alone.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per (name, country); both are stored normalised (trimmed,
-- title-cased) so the UNIQUE constraint matches domain identity.
CREATE TABLE IF NOT EXISTS cities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    country     TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    UNIQUE (name, country)
);

-- Append-only; saving the same event twice yields two rows.
CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    date        TEXT NOT NULL,      -- ISO 8601
    category    TEXT NOT NULL,      -- 'conference' selects the conference variant
    capacity    INTEGER NOT NULL,
    attendance  INTEGER NOT NULL,
    city_id     INTEGER NOT NULL REFERENCES cities(id),
    extra_data  TEXT                -- JSON object of variant-only fields, '{}' if none
);

CREATE INDEX IF NOT EXISTS events_date_idx ON events(date);
CREATE INDEX IF NOT EXISTS events_city_idx ON events(city_id);

PRAGMA user_version = 1;
";

/// Applied on every new connection; `foreign_keys` is per-connection state.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";
