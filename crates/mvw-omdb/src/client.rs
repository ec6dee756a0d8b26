//! Async HTTP client for the OMDb API.

use std::time::Duration;

use mvw_core::{
  catalog::{CatalogClient, CatalogError, PlotDetail, SearchHit},
  record::CatalogRecord,
};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Async client for the OMDb JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OmdbClient {
  client:   reqwest::Client,
  api_key:  String,
  base_url: String,
}

impl OmdbClient {
  pub fn new(api_key: impl Into<String>) -> Result<Self, CatalogError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .map_err(|e| CatalogError::Transient(e.to_string()))?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      base_url: DEFAULT_BASE_URL.to_string(),
    })
  }

  /// Point the client at a different endpoint (tests, proxies).
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Share the inner HTTP client (e.g. with the poster cache).
  pub fn http_client(&self) -> reqwest::Client {
    self.client.clone()
  }

  async fn get_json<T: serde::de::DeserializeOwned>(
    &self,
    params: &[(&str, &str)],
  ) -> Result<T, CatalogError> {
    let resp = self
      .client
      .get(&self.base_url)
      .query(&[("apikey", self.api_key.as_str()), ("r", "json")])
      .query(params)
      .send()
      .await
      .map_err(|e| CatalogError::Transient(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(CatalogError::Transient(format!("HTTP {status}")));
    }

    resp
      .json()
      .await
      .map_err(|e| CatalogError::Transient(e.to_string()))
  }
}

impl CatalogClient for OmdbClient {
  async fn fetch_by_title(&self, title: &str) -> Result<CatalogRecord, CatalogError> {
    tracing::debug!(title, "fetching catalog record by title");
    let payload: OmdbMovie = self.get_json(&[("t", title)]).await?;
    payload.into_record()
  }

  async fn fetch_by_id(
    &self,
    imdb_id: &str,
    plot: PlotDetail,
  ) -> Result<CatalogRecord, CatalogError> {
    tracing::debug!(imdb_id, "fetching catalog record by id");
    let payload: OmdbMovie = self
      .get_json(&[("i", imdb_id), ("plot", plot.as_query_value())])
      .await?;
    payload.into_record()
  }

  async fn search(&self, title: &str) -> Result<Vec<SearchHit>, CatalogError> {
    let payload: OmdbSearch = self
      .get_json(&[("s", title), ("type", "movie")])
      .await?;
    payload.into_hits()
  }

  async fn validate_key(&self) -> bool {
    // A title every key tier can resolve; any provider-side rejection of
    // the key surfaces as an error here.
    self.fetch_by_title("Interstellar").await.is_ok()
  }
}

// ─── Provider payloads ───────────────────────────────────────────────────────

fn na() -> String {
  "N/A".to_string()
}

/// Raw single-movie response. `Title` and `imdbID` are the only fields a
/// well-formed hit must carry; everything else falls back to the provider's
/// own `N/A` placeholder.
#[derive(Debug, Deserialize)]
struct OmdbMovie {
  #[serde(rename = "Response")]
  response: String,
  #[serde(rename = "Error")]
  error:    Option<String>,

  #[serde(rename = "Title")]
  title:   Option<String>,
  #[serde(rename = "imdbID")]
  imdb_id: Option<String>,

  #[serde(rename = "Year", default = "na")]
  year:        String,
  #[serde(rename = "Rated", default = "na")]
  rated:       String,
  #[serde(rename = "Released", default = "na")]
  released:    String,
  #[serde(rename = "Runtime", default = "na")]
  runtime:     String,
  #[serde(rename = "Genre", default = "na")]
  genre:       String,
  #[serde(rename = "Director", default = "na")]
  director:    String,
  #[serde(rename = "Writer", default = "na")]
  writer:      String,
  #[serde(rename = "Actors", default = "na")]
  actors:      String,
  #[serde(rename = "Plot", default = "na")]
  plot:        String,
  #[serde(rename = "Language", default = "na")]
  language:    String,
  #[serde(rename = "Country", default = "na")]
  country:     String,
  #[serde(rename = "Awards", default = "na")]
  awards:      String,
  #[serde(rename = "Poster", default = "na")]
  poster:      String,
  #[serde(rename = "Metascore", default = "na")]
  metascore:   String,
  #[serde(rename = "imdbRating", default = "na")]
  imdb_rating: String,
  #[serde(rename = "imdbVotes", default = "na")]
  imdb_votes:  String,
  #[serde(rename = "Type", default = "na")]
  media_type:  String,
  #[serde(rename = "DVD", default = "na")]
  dvd:         String,
  #[serde(rename = "BoxOffice", default = "na")]
  box_office:  String,
  #[serde(rename = "Production", default = "na")]
  production:  String,
  #[serde(rename = "Website", default = "na")]
  website:     String,
}

impl OmdbMovie {
  fn into_record(self) -> Result<CatalogRecord, CatalogError> {
    if self.response != "True" {
      return Err(classify_provider_error(self.error));
    }

    // Fail fast instead of producing a record with absent attributes.
    let title = self
      .title
      .ok_or_else(|| CatalogError::SchemaMismatch("missing Title".into()))?;
    let imdb_id = self
      .imdb_id
      .ok_or_else(|| CatalogError::SchemaMismatch("missing imdbID".into()))?;

    Ok(CatalogRecord {
      imdb_id,
      title,
      year: self.year,
      rated: self.rated,
      released: self.released,
      runtime: self.runtime,
      genre: self.genre,
      director: self.director,
      writer: self.writer,
      actors: self.actors,
      plot: self.plot,
      language: self.language,
      country: self.country,
      awards: self.awards,
      poster_url: self.poster,
      metascore: self.metascore,
      imdb_rating: parse_rating(&self.imdb_rating),
      imdb_votes: self.imdb_votes,
      media_type: self.media_type,
      dvd: self.dvd,
      box_office: self.box_office,
      production: self.production,
      website: self.website,
    })
  }
}

/// The audience score is the one numeric column; the provider reports `N/A`
/// for unrated entries.
fn parse_rating(raw: &str) -> f64 {
  raw.parse().unwrap_or(0.0)
}

fn classify_provider_error(error: Option<String>) -> CatalogError {
  let message = error.unwrap_or_else(|| "unspecified provider error".into());
  let lowered = message.to_lowercase();
  if lowered.contains("not found") || lowered.contains("incorrect imdb id") {
    CatalogError::NotFound
  } else {
    CatalogError::Transient(message)
  }
}

// ─── Search payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OmdbSearch {
  #[serde(rename = "Response")]
  response: String,
  #[serde(rename = "Error")]
  error:    Option<String>,
  #[serde(rename = "Search", default)]
  search:   Vec<OmdbSearchHit>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchHit {
  #[serde(rename = "Title")]
  title:   String,
  #[serde(rename = "Year", default = "na")]
  year:    String,
  #[serde(rename = "imdbID")]
  imdb_id: String,
}

impl OmdbSearch {
  fn into_hits(self) -> Result<Vec<SearchHit>, CatalogError> {
    if self.response != "True" {
      return Err(classify_provider_error(self.error));
    }
    Ok(
      self
        .search
        .into_iter()
        .map(|hit| SearchHit {
          imdb_id: hit.imdb_id,
          title:   hit.title,
          year:    hit.year,
        })
        .collect(),
    )
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
