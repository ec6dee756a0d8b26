//! The `MovieStore` trait — the persistence seam of the application.
//!
//! The trait is implemented by storage backends (e.g. `mvw-store-sqlite`).
//! Higher layers (`ReviewSession`, the CLI) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::record::{CatalogRecord, MovieRecord};

/// Abstraction over the durable movie table, keyed by `imdb_id`.
///
/// All operations are issued by a single interactive session at a time and
/// run to completion before the caller proceeds; implementations never retry
/// internally and never execute in the background.
pub trait MovieStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new row, or overwrite **every** field of an existing row with
  /// the same `imdb_id`, catalog fields and the three local fields alike.
  ///
  /// Callers re-fetching catalog data must pass through the existing
  /// star/review when they do not intend to change them; the store does not
  /// preserve them on its own. Atomic per call: on failure no partial row
  /// state is visible.
  ///
  /// Rejects `star` outside [0.0, 5.0] before touching storage.
  fn upsert(
    &self,
    record: CatalogRecord,
    poster_local_path: String,
    star: f64,
    review: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Update only the `star` and `review` columns of the row with this
  /// `imdb_id`; catalog fields and `poster_local_path` stay untouched.
  ///
  /// Returns the number of rows affected. A missing id affects zero rows;
  /// not a store error, but callers should check.
  ///
  /// Rejects `star` outside [0.0, 5.0] before touching storage.
  fn update_review<'a>(
    &'a self,
    imdb_id: &'a str,
    star: f64,
    review: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Every stored record, in storage order. No ordering guarantee is made
  /// to callers; sort client-side if needed.
  fn get_all(
    &self,
  ) -> impl Future<Output = Result<Vec<MovieRecord>, Self::Error>> + Send + '_;

  /// Exact-match title lookup. Titles are not unique; the first matching
  /// row in storage order wins. Callers needing disambiguation must use
  /// `imdb_id`.
  fn get_by_title<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Option<MovieRecord>, Self::Error>> + Send + 'a;
}
