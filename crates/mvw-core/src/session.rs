//! The review session — decides whether an interaction is a first review or
//! an edit, and drives the store accordingly.
//!
//! A session is constructed with explicit references to its collaborators;
//! there is no process-wide shared state. Each `run` call is one complete
//! pass through the state machine: lookup, optional fetch, prompt, persist.

use crate::{
  catalog::{CatalogClient, PosterCache},
  record::{CatalogRecord, MovieRecord},
  store::MovieStore,
};

// ─── Outcome & prompter ──────────────────────────────────────────────────────

/// Terminal result of one session run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// A review was persisted (inserted or updated).
  Done,
  /// The session ended without any store mutation: the catalog had no
  /// match, a transient fetch failure occurred, or the user declined.
  Aborted,
}

/// Star and review text as confirmed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewInput {
  pub star:   f64,
  pub review: String,
}

/// The interactive collaborator. Returning `None` aborts the session with
/// no persisted side effect.
pub trait ReviewPrompter {
  /// Collect star and review for a freshly fetched record.
  fn first_review(&self, record: &CatalogRecord) -> Option<ReviewInput>;

  /// Collect star and review for an already-reviewed record, offering the
  /// prior values as defaults.
  fn edit_review(&self, existing: &MovieRecord) -> Option<ReviewInput>;
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// One review interaction over a title.
pub struct ReviewSession<'a, S, C, P, R> {
  store:    &'a S,
  catalog:  &'a C,
  posters:  &'a P,
  prompter: &'a R,
}

impl<'a, S, C, P, R> ReviewSession<'a, S, C, P, R>
where
  S: MovieStore,
  C: CatalogClient,
  P: PosterCache,
  R: ReviewPrompter,
{
  pub fn new(store: &'a S, catalog: &'a C, posters: &'a P, prompter: &'a R) -> Self {
    Self { store, catalog, posters, prompter }
  }

  /// Run one session for `title`.
  ///
  /// A stored title match always takes the editing path: catalog fields in
  /// the stored record are treated as already fresh, and no re-fetch is
  /// triggered. Catalog failures abort the session; only store failures are
  /// hard errors.
  pub async fn run(&self, title: &str) -> Result<Outcome, S::Error> {
    if let Some(existing) = self.store.get_by_title(title).await? {
      return self.edit(existing).await;
    }

    tracing::debug!(title, "no stored review, fetching from catalog");
    let record = match self.catalog.fetch_by_title(title).await {
      Ok(record) => record,
      Err(err) => {
        tracing::warn!(title, %err, "catalog fetch failed, aborting session");
        return Ok(Outcome::Aborted);
      }
    };

    self.first_review(record).await
  }

  /// Editing: the stored record carries the prior star/review; only those
  /// two fields may change. The update is keyed by the stored row's
  /// `imdb_id`, so two films sharing a title are never merged.
  async fn edit(&self, existing: MovieRecord) -> Result<Outcome, S::Error> {
    tracing::debug!(imdb_id = %existing.imdb_id, title = %existing.title, "editing existing review");

    let Some(input) = self.prompter.edit_review(&existing) else {
      return Ok(Outcome::Aborted);
    };

    let affected = self
      .store
      .update_review(&existing.imdb_id, input.star, &input.review)
      .await?;
    if affected == 0 {
      tracing::warn!(imdb_id = %existing.imdb_id, "review update matched no stored row");
    }

    Ok(Outcome::Done)
  }

  /// First review: cache the poster, collect star/review, persist the full
  /// record in one upsert. A poster failure is non-fatal; the record is
  /// stored with an empty local path.
  async fn first_review(&self, record: CatalogRecord) -> Result<Outcome, S::Error> {
    let poster_local_path = match self.posters.ensure_cached(&record.poster_url).await {
      Ok(path) => path.to_string_lossy().into_owned(),
      Err(err) => {
        tracing::warn!(imdb_id = %record.imdb_id, %err, "poster caching failed, storing record without one");
        String::new()
      }
    };

    let Some(input) = self.prompter.first_review(&record) else {
      return Ok(Outcome::Aborted);
    };

    self
      .store
      .upsert(record, poster_local_path, input.star, input.review)
      .await?;

    Ok(Outcome::Done)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    convert::Infallible,
    path::PathBuf,
    sync::{
      Mutex,
      atomic::{AtomicBool, Ordering},
    },
  };

  use super::*;
  use crate::catalog::{CatalogError, PlotDetail, PosterError, SearchHit};

  // ── Fakes ─────────────────────────────────────────────────────────────────

  #[derive(Default)]
  struct MemoryStore {
    rows: Mutex<Vec<MovieRecord>>,
  }

  impl MemoryStore {
    fn seeded(rows: Vec<MovieRecord>) -> Self {
      Self { rows: Mutex::new(rows) }
    }

    fn snapshot(&self) -> Vec<MovieRecord> {
      self.rows.lock().unwrap().clone()
    }
  }

  impl MovieStore for MemoryStore {
    type Error = Infallible;

    async fn upsert(
      &self,
      record: CatalogRecord,
      poster_local_path: String,
      star: f64,
      review: String,
    ) -> Result<(), Infallible> {
      let full = MovieRecord::from_catalog(record, poster_local_path, star, review);
      let mut rows = self.rows.lock().unwrap();
      match rows.iter_mut().find(|r| r.imdb_id == full.imdb_id) {
        Some(existing) => *existing = full,
        None => rows.push(full),
      }
      Ok(())
    }

    async fn update_review(
      &self,
      imdb_id: &str,
      star: f64,
      review: &str,
    ) -> Result<usize, Infallible> {
      let mut rows = self.rows.lock().unwrap();
      match rows.iter_mut().find(|r| r.imdb_id == imdb_id) {
        Some(row) => {
          row.star = star;
          row.review = review.to_owned();
          Ok(1)
        }
        None => Ok(0),
      }
    }

    async fn get_all(&self) -> Result<Vec<MovieRecord>, Infallible> {
      Ok(self.snapshot())
    }

    async fn get_by_title(
      &self,
      title: &str,
    ) -> Result<Option<MovieRecord>, Infallible> {
      Ok(
        self
          .rows
          .lock()
          .unwrap()
          .iter()
          .find(|r| r.title == title)
          .cloned(),
      )
    }
  }

  /// Catalog that either answers with a fixed record or reports not-found,
  /// and remembers whether it was consulted at all.
  struct ScriptedCatalog {
    record:  Option<CatalogRecord>,
    fetched: AtomicBool,
  }

  impl ScriptedCatalog {
    fn hit(record: CatalogRecord) -> Self {
      Self { record: Some(record), fetched: AtomicBool::new(false) }
    }

    fn miss() -> Self {
      Self { record: None, fetched: AtomicBool::new(false) }
    }

    fn was_fetched(&self) -> bool {
      self.fetched.load(Ordering::SeqCst)
    }
  }

  impl CatalogClient for ScriptedCatalog {
    async fn fetch_by_title(&self, _title: &str) -> Result<CatalogRecord, CatalogError> {
      self.fetched.store(true, Ordering::SeqCst);
      self.record.clone().ok_or(CatalogError::NotFound)
    }

    async fn fetch_by_id(
      &self,
      _imdb_id: &str,
      _plot: PlotDetail,
    ) -> Result<CatalogRecord, CatalogError> {
      self.fetched.store(true, Ordering::SeqCst);
      self.record.clone().ok_or(CatalogError::NotFound)
    }

    async fn search(&self, _title: &str) -> Result<Vec<SearchHit>, CatalogError> {
      Ok(Vec::new())
    }

    async fn validate_key(&self) -> bool {
      true
    }
  }

  struct FakePosters {
    fail: bool,
  }

  impl PosterCache for FakePosters {
    async fn ensure_cached(&self, remote_link: &str) -> Result<PathBuf, PosterError> {
      if self.fail {
        Err(PosterError::Fetch("connection reset".into()))
      } else {
        Ok(PathBuf::from(format!("/posters/{}", remote_link.len())))
      }
    }
  }

  struct ScriptedPrompter {
    input: Option<ReviewInput>,
  }

  impl ReviewPrompter for ScriptedPrompter {
    fn first_review(&self, _record: &CatalogRecord) -> Option<ReviewInput> {
      self.input.clone()
    }

    fn edit_review(&self, _existing: &MovieRecord) -> Option<ReviewInput> {
      self.input.clone()
    }
  }

  // ── Fixtures ──────────────────────────────────────────────────────────────

  fn catalog_record(imdb_id: &str, title: &str) -> CatalogRecord {
    CatalogRecord {
      imdb_id: imdb_id.into(),
      title: title.into(),
      year: "2014".into(),
      rated: "PG-13".into(),
      released: "07 Nov 2014".into(),
      runtime: "169 min".into(),
      genre: "Adventure, Drama, Sci-Fi".into(),
      director: "Christopher Nolan".into(),
      writer: "Jonathan Nolan, Christopher Nolan".into(),
      actors: "Matthew McConaughey, Anne Hathaway".into(),
      plot: "A team of explorers travel through a wormhole.".into(),
      language: "English".into(),
      country: "United States".into(),
      awards: "Won 1 Oscar. 44 wins & 148 nominations total".into(),
      poster_url: "https://img.example/poster.jpg".into(),
      metascore: "74".into(),
      imdb_rating: 8.7,
      imdb_votes: "1,900,000".into(),
      media_type: "movie".into(),
      dvd: "31 Mar 2015".into(),
      box_office: "$188,020,017".into(),
      production: "N/A".into(),
      website: "N/A".into(),
    }
  }

  fn stored_record(imdb_id: &str, title: &str, star: f64, review: &str) -> MovieRecord {
    MovieRecord::from_catalog(
      catalog_record(imdb_id, title),
      format!("/posters/{imdb_id}.jpg"),
      star,
      review.into(),
    )
  }

  fn input(star: f64, review: &str) -> ScriptedPrompter {
    ScriptedPrompter { input: Some(ReviewInput { star, review: review.into() }) }
  }

  fn declined() -> ScriptedPrompter {
    ScriptedPrompter { input: None }
  }

  // ── First review ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn first_review_fetches_and_persists_one_row() {
    let store = MemoryStore::default();
    let catalog = ScriptedCatalog::hit(catalog_record("tt001", "Alpha"));
    let posters = FakePosters { fail: false };
    let prompter = input(4.0, "Great");

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Alpha")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Done);
    let rows = store.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].imdb_id, "tt001");
    assert_eq!(rows[0].star, 4.0);
    assert_eq!(rows[0].review, "Great");
    assert!(!rows[0].poster_local_path.is_empty());
  }

  #[tokio::test]
  async fn poster_failure_is_not_fatal() {
    let store = MemoryStore::default();
    let catalog = ScriptedCatalog::hit(catalog_record("tt001", "Alpha"));
    let posters = FakePosters { fail: true };
    let prompter = input(3.5, "fine");

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Alpha")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Done);
    let rows = store.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].poster_local_path, "");
  }

  #[tokio::test]
  async fn catalog_not_found_aborts_without_mutation() {
    let store = MemoryStore::default();
    let catalog = ScriptedCatalog::miss();
    let posters = FakePosters { fail: false };
    let prompter = input(4.0, "never used");

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Unknown")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Aborted);
    assert!(store.snapshot().is_empty());
  }

  #[tokio::test]
  async fn declining_first_review_persists_nothing() {
    let store = MemoryStore::default();
    let catalog = ScriptedCatalog::hit(catalog_record("tt001", "Alpha"));
    let posters = FakePosters { fail: false };
    let prompter = declined();

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Alpha")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Aborted);
    assert!(store.snapshot().is_empty());
  }

  // ── Editing ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn stored_title_takes_editing_path_without_refetch() {
    let store =
      MemoryStore::seeded(vec![stored_record("tt001", "Alpha", 3.0, "ok")]);
    let catalog = ScriptedCatalog::hit(catalog_record("tt999", "Alpha"));
    let posters = FakePosters { fail: false };
    let prompter = input(4.5, "actually great");

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Alpha")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Done);
    assert!(!catalog.was_fetched());

    let rows = store.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].imdb_id, "tt001");
    assert_eq!(rows[0].star, 4.5);
    assert_eq!(rows[0].review, "actually great");
    // Catalog fields from the stored record are untouched.
    assert_eq!(rows[0].director, "Christopher Nolan");
    assert_eq!(rows[0].poster_local_path, "/posters/tt001.jpg");
  }

  #[tokio::test]
  async fn duplicate_title_edits_first_stored_row() {
    let store = MemoryStore::seeded(vec![
      stored_record("tt001", "Alpha", 3.0, "first"),
      stored_record("tt002", "Alpha", 1.0, "second"),
    ]);
    let catalog = ScriptedCatalog::miss();
    let posters = FakePosters { fail: false };
    let prompter = input(5.0, "rewatched");

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Alpha")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Done);
    assert!(!catalog.was_fetched());

    let rows = store.snapshot();
    assert_eq!(rows[0].imdb_id, "tt001");
    assert_eq!(rows[0].star, 5.0);
    // The second film sharing the title is never merged into.
    assert_eq!(rows[1].imdb_id, "tt002");
    assert_eq!(rows[1].star, 1.0);
    assert_eq!(rows[1].review, "second");
  }

  #[tokio::test]
  async fn declining_edit_leaves_row_unchanged() {
    let store =
      MemoryStore::seeded(vec![stored_record("tt001", "Alpha", 3.0, "ok")]);
    let catalog = ScriptedCatalog::miss();
    let posters = FakePosters { fail: false };
    let prompter = declined();

    let outcome = ReviewSession::new(&store, &catalog, &posters, &prompter)
      .run("Alpha")
      .await
      .unwrap();

    assert_eq!(outcome, Outcome::Aborted);
    let rows = store.snapshot();
    assert_eq!(rows[0].star, 3.0);
    assert_eq!(rows[0].review, "ok");
  }
}
