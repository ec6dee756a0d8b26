//! OMDb implementations of the mvw catalog and poster-cache seams.
//!
//! [`OmdbClient`] maps the provider's JSON onto the fixed
//! [`CatalogRecord`](mvw_core::record::CatalogRecord) shape, failing fast on
//! malformed responses. [`PosterStore`] keeps downloaded poster images in a
//! local directory, one file per remote link.

mod client;
mod poster;

pub use client::OmdbClient;
pub use poster::PosterStore;
