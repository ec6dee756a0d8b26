//! Terminal rendering for review cards, listings, and settings.

use mvw_core::record::{CatalogRecord, MovieRecord, STAR_MAX, STAR_MIN};
use owo_colors::OwoColorize as _;
use regex_lite::Regex;

use crate::config::Settings;

// ─── Stars ───────────────────────────────────────────────────────────────────

/// Render a rating as five star glyphs, rounded to the nearest half star.
/// The stored value stays a plain real number; rounding is display-only.
pub fn star_icons(star: f64) -> String {
  let halves = (star.clamp(STAR_MIN, STAR_MAX) * 2.0).round() as usize;
  let full = halves / 2;
  let half = halves % 2 == 1;
  let empty = 5 - full - usize::from(half);

  let mut icons = "★".repeat(full);
  if half {
    icons.push('½');
  }
  icons.push_str(&"☆".repeat(empty));
  icons
}

// ─── Awards ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AwardsSummary {
  pub oscars:      u32,
  pub wins:        u32,
  pub nominations: u32,
}

/// Pull the Oscar/win/nomination counts out of the provider's free-text
/// awards blurb, e.g. "Won 4 Oscars. 42 wins & 52 nominations total".
pub fn extract_awards(text: &str) -> AwardsSummary {
  fn count(pattern: &str, text: &str) -> u32 {
    Regex::new(pattern)
      .ok()
      .and_then(|re| re.captures(text))
      .and_then(|caps| caps.get(1))
      .and_then(|m| m.as_str().parse().ok())
      .unwrap_or(0)
  }

  AwardsSummary {
    oscars:      count(r"(?i)(\d+)\s*Oscar", text),
    wins:        count(r"(?i)(\d+)\s*win", text),
    nominations: count(r"(?i)(\d+)\s*nomination", text),
  }
}

// ─── Review card ─────────────────────────────────────────────────────────────

/// The full review card for a stored record.
pub fn review_card(movie: &MovieRecord, settings: &Settings) {
  println!();
  println!(
    "{} {} ({})",
    "󰿎 MOVIE :".cyan().bold(),
    movie.title.bold(),
    movie.year
  );
  println!("  ├ director : {}", movie.director);
  println!("  ├ language : {}", movie.language);
  println!("  ├ rated    : {}", movie.rated);
  println!("  ├ runtime  : {}", movie.runtime);
  println!("  ├ released : {}", movie.released);
  println!("  └ genre    : {}", movie.genre);

  println!("{} {}", "󰈚 IMDB :".yellow().bold(), movie.imdb_id);
  println!("  └ rating   : {}/10 ({})", movie.imdb_rating, movie.imdb_votes);

  println!("{} {}", " STATS :".red().bold(), movie.box_office);
  let awards = extract_awards(&movie.awards);
  if awards.oscars > 0 {
    println!("  ├ Won {} Oscars", awards.oscars);
  }
  println!("  ├ Got {} Nominations", awards.nominations);
  println!("  └ Won {} Awards", awards.wins);

  if !movie.poster_local_path.is_empty() {
    println!("{} {}", " POSTER :".magenta().bold(), movie.poster_local_path.dimmed());
  }

  let reviewer = if settings.reviewer.is_empty() {
    "MY".to_string()
  } else {
    format!("{}'S", settings.reviewer.to_uppercase())
  };
  println!();
  println!(
    "{} {}",
    format!("󰭹 {reviewer} REVIEW :").bold(),
    star_icons(movie.star).yellow()
  );
  let review = if movie.review.is_empty() {
    "Your review will show here."
  } else {
    movie.review.as_str()
  };
  println!("{review}");
  println!();
}

/// Card shown during a first review, before anything is stored.
pub fn catalog_card(record: &CatalogRecord, settings: &Settings) {
  let preview =
    MovieRecord::from_catalog(record.clone(), String::new(), 0.0, String::new());
  review_card(&preview, settings);
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// One line per reviewed movie.
pub fn listing(movies: &[MovieRecord]) {
  for movie in movies {
    println!(
      "{}  {} ({})",
      star_icons(movie.star).yellow(),
      movie.title.bold(),
      movie.year.dimmed()
    );
  }
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn settings_table(settings: &Settings) {
  let dash = "-".to_string();
  let key = if settings.api_key.is_empty() { &dash } else { &settings.api_key };
  let name = if settings.reviewer.is_empty() { &dash } else { &settings.reviewer };

  println!();
  println!("{}", "Settings".bold());
  println!("  {} {}", "api_key    :".cyan(), key);
  println!("  {} {}", "reviewer   :".cyan(), name);
  println!("  {} {}", "store_path :".cyan(), settings.store_path.display());
  println!("  {} {}", "poster_dir :".cyan(), settings.poster_dir.display());
  println!();
  println!("  Try {} to edit these.", "`mvw config --help`".yellow());
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn star_icons_cover_full_half_and_empty() {
    assert_eq!(star_icons(0.0), "☆☆☆☆☆");
    assert_eq!(star_icons(3.5), "★★★½☆");
    assert_eq!(star_icons(5.0), "★★★★★");
  }

  #[test]
  fn star_icons_round_to_half_and_clamp_for_display() {
    assert_eq!(star_icons(3.3), "★★★½☆");
    assert_eq!(star_icons(4.9), "★★★★★");
    assert_eq!(star_icons(7.0), "★★★★★");
    assert_eq!(star_icons(-1.0), "☆☆☆☆☆");
  }

  #[test]
  fn awards_extraction_finds_all_three_counts() {
    let summary =
      extract_awards("Won 4 Oscars. 42 wins & 52 nominations total");
    assert_eq!(
      summary,
      AwardsSummary { oscars: 4, wins: 42, nominations: 52 }
    );
  }

  #[test]
  fn awards_extraction_defaults_to_zero() {
    assert_eq!(extract_awards("N/A"), AwardsSummary::default());
  }
}
