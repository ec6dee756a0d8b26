//! Collaborator seams for the remote catalog and the poster cache.
//!
//! `mvw-omdb` provides the production implementations; the session and the
//! CLI depend only on these traits.

use std::{future::Future, path::PathBuf};

use thiserror::Error;

use crate::record::CatalogRecord;

// ─── Catalog client ──────────────────────────────────────────────────────────

/// How much plot text an id-based fetch should request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotDetail {
  #[default]
  Short,
  Full,
}

impl PlotDetail {
  /// The provider query-parameter value.
  pub fn as_query_value(self) -> &'static str {
    match self {
      Self::Short => "short",
      Self::Full => "full",
    }
  }
}

#[derive(Debug, Error)]
pub enum CatalogError {
  /// The catalog has no entry for the given title or id.
  #[error("no catalog entry matched")]
  NotFound,

  /// Network, HTTP, or decode failure. Retry is a caller decision.
  #[error("catalog request failed: {0}")]
  Transient(String),

  /// The provider answered but the response is missing required fields.
  #[error("catalog response is malformed: {0}")]
  SchemaMismatch(String),
}

/// One row of a title search, enough to disambiguate before an id fetch.
#[derive(Debug, Clone)]
pub struct SearchHit {
  pub imdb_id: String,
  pub title:   String,
  pub year:    String,
}

/// A remote movie catalog, queried by title or by external id.
pub trait CatalogClient: Send + Sync {
  fn fetch_by_title<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<CatalogRecord, CatalogError>> + Send + 'a;

  fn fetch_by_id<'a>(
    &'a self,
    imdb_id: &'a str,
    plot: PlotDetail,
  ) -> impl Future<Output = Result<CatalogRecord, CatalogError>> + Send + 'a;

  /// Search for titles matching `title`, for disambiguation.
  fn search<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Vec<SearchHit>, CatalogError>> + Send + 'a;

  /// Probe whether the configured API key is accepted by the provider.
  fn validate_key(&self) -> impl Future<Output = bool> + Send + '_;
}

// ─── Poster cache ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PosterError {
  #[error("poster download failed: {0}")]
  Fetch(String),

  #[error("poster cache io error: {0}")]
  Io(#[from] std::io::Error),

  /// The provider reported no poster for this record.
  #[error("record carries no poster link")]
  NoPoster,
}

/// A local cache of downloaded poster images.
pub trait PosterCache: Send + Sync {
  /// Return the local path for `remote_link`, downloading on first use.
  /// Idempotent: an already-cached poster is returned without re-fetching.
  fn ensure_cached<'a>(
    &'a self,
    remote_link: &'a str,
  ) -> impl Future<Output = Result<PathBuf, PosterError>> + Send + 'a;
}
