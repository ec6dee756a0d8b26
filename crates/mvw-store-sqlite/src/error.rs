//! Error type for `mvw-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Rejected before any storage access (e.g. star out of range).
  #[error("invalid input: {0}")]
  InvalidInput(#[from] mvw_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// Failure creating the directory that holds the database file.
  #[error("store io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
