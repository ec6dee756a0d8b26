//! SQL schema for the mvw SQLite store.
//!
//! Executed on every open; idempotent thanks to `CREATE ... IF NOT EXISTS`.
//! Future migrations will be gated on `PRAGMA user_version`.

/// Full schema DDL. One table; the external catalog id is the primary key.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS movies (
    imdbid            TEXT PRIMARY KEY,
    title             TEXT NOT NULL,
    year              TEXT NOT NULL,
    rated             TEXT NOT NULL,
    released          TEXT NOT NULL,
    runtime           TEXT NOT NULL,
    genre             TEXT NOT NULL,
    director          TEXT NOT NULL,
    writer            TEXT NOT NULL,
    actors            TEXT NOT NULL,
    plot              TEXT NOT NULL,
    language          TEXT NOT NULL,
    country           TEXT NOT NULL,
    awards            TEXT NOT NULL,
    poster_link       TEXT NOT NULL,
    metascore         TEXT NOT NULL,
    imdbrating        REAL NOT NULL DEFAULT 0.0,
    imdbvotes         TEXT NOT NULL,
    type              TEXT NOT NULL,
    dvd               TEXT NOT NULL,
    boxoffice         TEXT NOT NULL,
    production        TEXT NOT NULL,
    website           TEXT NOT NULL,
    poster_local_path TEXT NOT NULL DEFAULT '',
    star              REAL NOT NULL DEFAULT 0.0,
    review            TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS movies_title_idx ON movies(title);

PRAGMA user_version = 1;
";
