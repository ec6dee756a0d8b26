//! `mvw` — review movies from the terminal.
//!
//! # Usage
//!
//! ```
//! mvw config --api-key <KEY> --name alice
//! mvw search "Interstellar"
//! mvw list
//! mvw preview "Interstellar"
//! ```

mod config;
mod prompt;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use mvw_core::{
  catalog::CatalogClient as _,
  session::{Outcome, ReviewSession},
  store::MovieStore as _,
};
use mvw_omdb::{OmdbClient, PosterStore};
use mvw_store_sqlite::SqliteStore;
use owo_colors::OwoColorize as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mvw", version, about = "Review movies from the terminal")]
struct Cli {
  /// Path to a TOML config file (defaults to the per-user config dir).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch a movie and write (or re-edit) its review.
  Search {
    /// Exact title to look up; prompted for when omitted.
    title: Option<String>,

    /// Pick the title from the catalog's search hits first.
    #[arg(long)]
    pick: bool,
  },

  /// List reviewed movies, optionally fuzzy-filtered by title.
  List {
    filter: Option<String>,
  },

  /// Render the stored review card for an exact title.
  Preview {
    title: String,
  },

  /// Show or change settings.
  Config {
    /// Set the OMDb API key (validated against the live API first).
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Set your name as the reviewer.
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Reset settings to defaults, keeping the API key.
    #[arg(short, long)]
    reset: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config_file = cli.config.clone().unwrap_or_else(config::default_config_file);
  let settings = Settings::load_from(&config_file)?;

  // Running bare `mvw` is a search.
  let command = cli
    .command
    .unwrap_or(Command::Search { title: None, pick: false });

  match command {
    Command::Config { api_key, name, reset } => {
      run_config(&config_file, settings, api_key, name, reset).await
    }
    command => {
      // Storage-open failure is fatal: nothing below can work without it.
      let store = SqliteStore::open(&settings.store_path).await.with_context(|| {
        format!("failed to open store at {}", settings.store_path.display())
      })?;

      let result = match command {
        Command::Search { title, pick } => {
          run_search(&store, &settings, title, pick).await
        }
        Command::List { filter } => run_list(&store, filter).await,
        Command::Preview { title } => run_preview(&store, &settings, &title).await,
        Command::Config { .. } => unreachable!("handled above"),
      };

      // Close exactly once on the normal path; dropping the connection
      // covers the unwind path.
      let closed = store.close().await;
      result?;
      closed.context("failed to close store")?;
      Ok(())
    }
  }
}

// ─── search ───────────────────────────────────────────────────────────────────

async fn run_search(
  store: &SqliteStore,
  settings: &Settings,
  title: Option<String>,
  pick: bool,
) -> Result<()> {
  if settings.api_key.is_empty() {
    println!("No API key configured. Free keys: https://www.omdbapi.com/apikey.aspx");
    println!("Then run {}.", "`mvw config --api-key <KEY>`".yellow());
    return Ok(());
  }

  let mut title = match title {
    Some(title) => title,
    None => match prompt::read_line("MVW title") {
      Some(title) if !title.is_empty() => title,
      _ => return Ok(()),
    },
  };

  let catalog = OmdbClient::new(settings.api_key.clone())?;

  if pick {
    match pick_title(&catalog, &title).await? {
      Some(picked) => title = picked,
      None => {
        println!("Nothing was saved.");
        return Ok(());
      }
    }
  }

  let posters = PosterStore::new(catalog.http_client(), settings.poster_dir.clone());
  let prompter = prompt::StdinPrompter::new(settings.clone());

  let session = ReviewSession::new(store, &catalog, &posters, &prompter);
  match session.run(&title).await? {
    Outcome::Done => {
      if let Some(movie) = store.get_by_title(&title).await? {
        render::review_card(&movie, settings);
      }
      println!("{}", "✓ Review saved".green());
    }
    Outcome::Aborted => println!("Nothing was saved."),
  }
  Ok(())
}

/// Show the catalog's hits for `query` and let the user pick the canonical
/// title. `None` means no hits or the user declined.
async fn pick_title(catalog: &OmdbClient, query: &str) -> Result<Option<String>> {
  let hits = match catalog.search(query).await {
    Ok(hits) => hits,
    Err(err) => {
      tracing::warn!(%err, "catalog search failed");
      return Ok(None);
    }
  };
  if hits.is_empty() {
    println!("The catalog has no match for {query:?}.");
    return Ok(None);
  }

  for (index, hit) in hits.iter().enumerate() {
    println!("{:2}. {} ({})", index + 1, hit.title.bold(), hit.year.dimmed());
  }

  let Some(choice) = prompt::read_line("MVW pick") else {
    return Ok(None);
  };
  let picked = choice
    .parse::<usize>()
    .ok()
    .and_then(|n| n.checked_sub(1))
    .and_then(|n| hits.get(n));

  Ok(picked.map(|hit| hit.title.clone()))
}

// ─── list ─────────────────────────────────────────────────────────────────────

async fn run_list(store: &SqliteStore, filter: Option<String>) -> Result<()> {
  let mut movies = store.get_all().await?;
  if movies.is_empty() {
    println!("No reviews yet. Try {}.", "`mvw search`".yellow());
    return Ok(());
  }

  if let Some(filter) = filter {
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<_> = movies
      .into_iter()
      .filter_map(|movie| {
        matcher
          .fuzzy_match(&movie.title, &filter)
          .map(|score| (score, movie))
      })
      .collect();
    scored.sort_by_key(|(score, _)| std::cmp::Reverse(*score));
    movies = scored.into_iter().map(|(_, movie)| movie).collect();

    if movies.is_empty() {
      println!("No reviewed title matches {filter:?}.");
      return Ok(());
    }
  }

  render::listing(&movies);
  Ok(())
}

// ─── preview ──────────────────────────────────────────────────────────────────

async fn run_preview(store: &SqliteStore, settings: &Settings, title: &str) -> Result<()> {
  match store.get_by_title(title).await? {
    Some(movie) => render::review_card(&movie, settings),
    None => println!("No stored review for {title:?}. Titles match exactly."),
  }
  Ok(())
}

// ─── config ───────────────────────────────────────────────────────────────────

async fn run_config(
  config_file: &Path,
  mut settings: Settings,
  api_key: Option<String>,
  name: Option<String>,
  reset: bool,
) -> Result<()> {
  let mut dirty = false;

  if reset {
    settings = settings.reset();
    dirty = true;
    println!("Settings reset to defaults (API key kept).");
  }

  if let Some(key) = api_key {
    let client = OmdbClient::new(key.clone())?;
    if client.validate_key().await {
      settings.api_key = key;
      dirty = true;
      println!("{}", "✓ API key accepted".green());
    } else {
      println!("{}", "x The provider rejected that API key".red());
    }
  }

  if let Some(name) = name {
    settings.reviewer = name;
    dirty = true;
  }

  if dirty {
    settings.save_to(config_file)?;
  }

  render::settings_table(&settings);
  Ok(())
}
