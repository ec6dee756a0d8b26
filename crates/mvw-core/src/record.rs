//! Movie record types — the fixed row shape the store persists.
//!
//! The catalog client is responsible for mapping whatever the provider
//! returns onto [`CatalogRecord`]; nothing downstream ever sees a record
//! with absent attributes. [`MovieRecord`] is the persisted superset:
//! catalog fields plus the three locally-owned review fields.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Star rating ─────────────────────────────────────────────────────────────

pub const STAR_MIN: f64 = 0.0;
pub const STAR_MAX: f64 = 5.0;

/// Default rating offered when a movie is reviewed for the first time.
pub const STAR_FIRST_DEFAULT: f64 = 2.5;

/// Reject a star rating outside [0.0, 5.0].
///
/// The stored value is a plain real number; half-point granularity is a
/// display concern only.
pub fn validate_star(star: f64) -> Result<()> {
  if (STAR_MIN..=STAR_MAX).contains(&star) {
    Ok(())
  } else {
    Err(Error::StarOutOfRange(star))
  }
}

// ─── CatalogRecord ───────────────────────────────────────────────────────────

/// A normalized metadata record as produced by one catalog fetch.
///
/// Every field is set only by upsert-from-fetch; the partial star/review
/// update path never touches any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
  /// Stable catalog identifier (e.g. `tt0816692`). Primary key once stored.
  pub imdb_id:     String,
  pub title:       String,
  pub year:        String,
  /// Content rating, e.g. `PG-13`.
  pub rated:       String,
  pub released:    String,
  pub runtime:     String,
  pub genre:       String,
  pub director:    String,
  pub writer:      String,
  pub actors:      String,
  pub plot:        String,
  pub language:    String,
  pub country:     String,
  pub awards:      String,
  /// Remote poster link as reported by the provider.
  pub poster_url:  String,
  pub metascore:   String,
  pub imdb_rating: f64,
  pub imdb_votes:  String,
  /// `movie`, `series`, `episode`, ...
  pub media_type:  String,
  /// Physical-release date.
  pub dvd:         String,
  pub box_office:  String,
  pub production:  String,
  pub website:     String,
}

// ─── MovieRecord ─────────────────────────────────────────────────────────────

/// One stored row per distinct `imdb_id`: the catalog fields plus the three
/// locally-owned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
  pub imdb_id:     String,
  pub title:       String,
  pub year:        String,
  pub rated:       String,
  pub released:    String,
  pub runtime:     String,
  pub genre:       String,
  pub director:    String,
  pub writer:      String,
  pub actors:      String,
  pub plot:        String,
  pub language:    String,
  pub country:     String,
  pub awards:      String,
  pub poster_url:  String,
  pub metascore:   String,
  pub imdb_rating: f64,
  pub imdb_votes:  String,
  pub media_type:  String,
  pub dvd:         String,
  pub box_office:  String,
  pub production:  String,
  pub website:     String,

  /// Filesystem reference to the cached poster image; empty until fetched.
  pub poster_local_path: String,
  /// User rating in [0.0, 5.0].
  pub star:              f64,
  /// Free-text review; may be empty.
  pub review:            String,
}

impl MovieRecord {
  /// Assemble a full row from a catalog fetch plus the locally-owned fields.
  pub fn from_catalog(
    record: CatalogRecord,
    poster_local_path: String,
    star: f64,
    review: String,
  ) -> Self {
    Self {
      imdb_id: record.imdb_id,
      title: record.title,
      year: record.year,
      rated: record.rated,
      released: record.released,
      runtime: record.runtime,
      genre: record.genre,
      director: record.director,
      writer: record.writer,
      actors: record.actors,
      plot: record.plot,
      language: record.language,
      country: record.country,
      awards: record.awards,
      poster_url: record.poster_url,
      metascore: record.metascore,
      imdb_rating: record.imdb_rating,
      imdb_votes: record.imdb_votes,
      media_type: record.media_type,
      dvd: record.dvd,
      box_office: record.box_office,
      production: record.production,
      website: record.website,
      poster_local_path,
      star,
      review,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn star_bounds_are_inclusive() {
    assert!(validate_star(0.0).is_ok());
    assert!(validate_star(5.0).is_ok());
    assert!(validate_star(2.5).is_ok());
  }

  #[test]
  fn star_out_of_range_is_rejected() {
    assert!(matches!(validate_star(-0.1), Err(Error::StarOutOfRange(_))));
    assert!(matches!(validate_star(5.1), Err(Error::StarOutOfRange(_))));
  }
}
