//! User settings: API key, reviewer identity, and storage paths.
//!
//! Loaded with the layered `config` builder (defaults, then the TOML file,
//! then `MVW_*` environment overrides) and written back as TOML.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// OMDb API key; empty until the user configures one.
  pub api_key:    String,
  /// Display name shown on the review card header.
  pub reviewer:   String,
  /// Location of the SQLite database file.
  pub store_path: PathBuf,
  /// Directory for cached poster images.
  pub poster_dir: PathBuf,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_key:    String::new(),
      reviewer:   String::new(),
      store_path: default_store_path(),
      poster_dir: default_poster_dir(),
    }
  }
}

impl Settings {
  /// Load settings from `file` (missing file is fine) with `MVW_*`
  /// environment variables taking precedence.
  pub fn load_from(file: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("MVW"))
      .build()
      .context("failed to read settings")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// Persist the current settings as TOML, creating parent directories.
  pub fn save_to(&self, file: &Path) -> Result<()> {
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(self).context("serialising settings")?;
    std::fs::write(file, raw)
      .with_context(|| format!("writing {}", file.display()))
  }

  /// Back to defaults, keeping the stored API key.
  pub fn reset(&self) -> Self {
    Self { api_key: self.api_key.clone(), ..Self::default() }
  }
}

/// `config.toml` under the per-user config directory unless overridden.
pub fn default_config_file() -> PathBuf {
  dirs::config_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("mvw")
    .join("config.toml")
}

fn default_store_path() -> PathBuf {
  dirs::data_local_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("mvw")
    .join("metadata.db")
}

fn default_poster_dir() -> PathBuf {
  dirs::cache_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("mvw")
    .join("posters")
}
