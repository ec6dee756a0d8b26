//! [`SqliteStore`] — the SQLite implementation of [`MovieStore`].

use std::path::Path;

use mvw_core::{
  record::{CatalogRecord, MovieRecord, validate_star},
  store::MovieStore,
};
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

/// Column list shared by the insert, update, and select statements. Order is
/// load-bearing: it matches the `?1..?26` placeholders and the row indices in
/// [`movie_from_row`].
const COLUMNS: &str = "imdbid, title, year, rated, released, runtime, genre, \
                       director, writer, actors, plot, language, country, \
                       awards, poster_link, metascore, imdbrating, imdbvotes, \
                       type, dvd, boxoffice, production, website, \
                       poster_local_path, star, review";

// ─── Store ───────────────────────────────────────────────────────────────────

/// The mvw movie table backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The
/// connection is long-lived for the process; [`SqliteStore::close`] shuts it
/// down exactly once on the normal exit path, and dropping the last clone
/// covers the unwind path.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Parent directories are created as needed. Failure here is fatal to the
  /// caller: no later store operation can succeed without a connection.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    if let Some(parent) = path.as_ref().parent() {
      std::fs::create_dir_all(parent)?;
    }
    let conn = tokio_rusqlite::Connection::open(path.as_ref()).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.as_ref().display(), "opened movie store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the underlying connection. Call once, at process shutdown.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for SqliteStore {
  type Error = Error;

  async fn upsert(
    &self,
    record: CatalogRecord,
    poster_local_path: String,
    star: f64,
    review: String,
  ) -> Result<()> {
    validate_star(star)?;

    self
      .conn
      .call(move |conn| {
        // Explicit two-case contract: insert if absent, otherwise a full
        // replace of every column, inside one transaction.
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM movies WHERE imdbid = ?1",
            rusqlite::params![record.imdb_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        let params = rusqlite::params![
          record.imdb_id,
          record.title,
          record.year,
          record.rated,
          record.released,
          record.runtime,
          record.genre,
          record.director,
          record.writer,
          record.actors,
          record.plot,
          record.language,
          record.country,
          record.awards,
          record.poster_url,
          record.metascore,
          record.imdb_rating,
          record.imdb_votes,
          record.media_type,
          record.dvd,
          record.box_office,
          record.production,
          record.website,
          poster_local_path,
          star,
          review,
        ];

        if exists {
          tx.execute(
            "UPDATE movies SET
               title = ?2, year = ?3, rated = ?4, released = ?5,
               runtime = ?6, genre = ?7, director = ?8, writer = ?9,
               actors = ?10, plot = ?11, language = ?12, country = ?13,
               awards = ?14, poster_link = ?15, metascore = ?16,
               imdbrating = ?17, imdbvotes = ?18, type = ?19, dvd = ?20,
               boxoffice = ?21, production = ?22, website = ?23,
               poster_local_path = ?24, star = ?25, review = ?26
             WHERE imdbid = ?1",
            params,
          )?;
        } else {
          tx.execute(
            &format!(
              "INSERT INTO movies ({COLUMNS})
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                       ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22,
                       ?23, ?24, ?25, ?26)"
            ),
            params,
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn update_review(
    &self,
    imdb_id: &str,
    star: f64,
    review: &str,
  ) -> Result<usize> {
    validate_star(star)?;

    let imdb_id = imdb_id.to_owned();
    let review = review.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE movies SET star = ?1, review = ?2 WHERE imdbid = ?3",
          rusqlite::params![star, review, imdb_id],
        )?)
      })
      .await?;

    Ok(affected)
  }

  async fn get_all(&self) -> Result<Vec<MovieRecord>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM movies"))?;
        let rows = stmt
          .query_map([], movie_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn get_by_title(&self, title: &str) -> Result<Option<MovieRecord>> {
    let title = title.to_owned();
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM movies WHERE title = ?1 LIMIT 1"),
              rusqlite::params![title],
              movie_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

fn movie_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MovieRecord> {
  Ok(MovieRecord {
    imdb_id:     row.get(0)?,
    title:       row.get(1)?,
    year:        row.get(2)?,
    rated:       row.get(3)?,
    released:    row.get(4)?,
    runtime:     row.get(5)?,
    genre:       row.get(6)?,
    director:    row.get(7)?,
    writer:      row.get(8)?,
    actors:      row.get(9)?,
    plot:        row.get(10)?,
    language:    row.get(11)?,
    country:     row.get(12)?,
    awards:      row.get(13)?,
    poster_url:  row.get(14)?,
    metascore:   row.get(15)?,
    imdb_rating: row.get(16)?,
    imdb_votes:  row.get(17)?,
    media_type:  row.get(18)?,
    dvd:         row.get(19)?,
    box_office:  row.get(20)?,
    production:  row.get(21)?,
    website:     row.get(22)?,
    poster_local_path: row.get(23)?,
    star:              row.get(24)?,
    review:            row.get(25)?,
  })
}
