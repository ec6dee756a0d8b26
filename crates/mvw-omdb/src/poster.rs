//! Local poster image cache.

use std::path::{Path, PathBuf};

use mvw_core::catalog::{PosterCache, PosterError};

/// Downloads poster images into a flat directory, one file per remote link.
///
/// The filename is derived from the link, so a second call for the same
/// poster finds the file on disk and skips the network entirely.
#[derive(Clone)]
pub struct PosterStore {
  client: reqwest::Client,
  dir:    PathBuf,
}

impl PosterStore {
  pub fn new(client: reqwest::Client, dir: impl Into<PathBuf>) -> Self {
    Self { client, dir: dir.into() }
  }
}

impl PosterCache for PosterStore {
  async fn ensure_cached(&self, remote_link: &str) -> Result<PathBuf, PosterError> {
    if remote_link.is_empty() || remote_link == "N/A" {
      return Err(PosterError::NoPoster);
    }

    tokio::fs::create_dir_all(&self.dir).await?;
    let path = self.dir.join(poster_filename(remote_link));

    if path.exists() {
      tracing::debug!(path = %path.display(), "poster already cached");
      return Ok(path);
    }

    let resp = self
      .client
      .get(remote_link)
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|e| PosterError::Fetch(e.to_string()))?;
    let bytes = resp
      .bytes()
      .await
      .map_err(|e| PosterError::Fetch(e.to_string()))?;

    tokio::fs::write(&path, &bytes).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "poster cached");
    Ok(path)
  }
}

/// Derive a stable filename from the remote link: the last path segment with
/// the provider's `@...` sizing suffix stripped.
fn poster_filename(link: &str) -> String {
  let last = link.rsplit('/').next().unwrap_or(link);
  let stem = last.split('@').next().unwrap_or(last);
  if Path::new(stem).extension().is_some() {
    stem.to_string()
  } else {
    format!("{stem}.jpg")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filename_strips_sizing_suffix() {
    let link = "https://m.media-amazon.com/images/M/MV5BZjdkOTU3MDkt@._V1_SX300.jpg";
    assert_eq!(poster_filename(link), "MV5BZjdkOTU3MDkt.jpg");
  }

  #[test]
  fn filename_keeps_plain_image_names() {
    assert_eq!(
      poster_filename("https://img.example/posters/alien.png"),
      "alien.png"
    );
  }

  #[tokio::test]
  async fn cached_poster_skips_the_network() {
    let dir = tempfile::tempdir().unwrap();
    let link = "https://unreachable.invalid/posters/already@._V1.jpg";
    std::fs::write(dir.path().join("already.jpg"), b"jpeg bytes").unwrap();

    // An unreachable host proves no request is attempted for a cache hit.
    let store = PosterStore::new(reqwest::Client::new(), dir.path());
    let path = store.ensure_cached(link).await.unwrap();
    assert_eq!(path, dir.path().join("already.jpg"));
  }

  #[tokio::test]
  async fn placeholder_link_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = PosterStore::new(reqwest::Client::new(), dir.path());
    assert!(matches!(
      store.ensure_cached("N/A").await,
      Err(PosterError::NoPoster)
    ));
  }
}
