//! Error types for `mvw-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A star rating outside the supported [0.0, 5.0] range. Rejected before
  /// any storage access.
  #[error("star rating {0} is outside the supported range [0.0, 5.0]")]
  StarOutOfRange(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
