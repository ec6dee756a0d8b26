//! Interactive prompts — the `ReviewPrompter` implementation over stdin and
//! the user's `$EDITOR`.

use std::io::{self, BufRead, Write as _};

use mvw_core::{
  record::{CatalogRecord, MovieRecord, STAR_FIRST_DEFAULT, validate_star},
  session::{ReviewInput, ReviewPrompter},
};

use crate::{config::Settings, render};

/// Prompter backed by the terminal. Returning `None` from any step aborts
/// the session with nothing persisted.
pub struct StdinPrompter {
  settings: Settings,
}

impl StdinPrompter {
  pub fn new(settings: Settings) -> Self {
    Self { settings }
  }
}

impl ReviewPrompter for StdinPrompter {
  fn first_review(&self, record: &CatalogRecord) -> Option<ReviewInput> {
    render::catalog_card(record, &self.settings);

    let star = read_star(STAR_FIRST_DEFAULT)?;
    let review = read_review(None)?;
    Some(ReviewInput { star, review })
  }

  fn edit_review(&self, existing: &MovieRecord) -> Option<ReviewInput> {
    render::review_card(existing, &self.settings);
    println!(
      "Already reviewed. Press ENTER at any prompt to keep the previous value."
    );

    let star = read_star(existing.star)?;
    let review = read_review(Some(&existing.review))?;
    Some(ReviewInput { star, review })
  }
}

// ─── Line-level helpers ──────────────────────────────────────────────────────

/// One trimmed line from stdin; `None` on EOF (user abort).
pub fn read_line(prompt: &str) -> Option<String> {
  print!("{prompt}> ");
  io::stdout().flush().ok();

  let mut line = String::new();
  match io::stdin().lock().read_line(&mut line) {
    Ok(0) => None,
    Ok(_) => Some(line.trim().to_string()),
    Err(err) => {
      tracing::warn!(%err, "failed to read stdin");
      None
    }
  }
}

/// Star rating in [0.0, 5.0]; empty input accepts `default`, bad input
/// re-prompts, EOF aborts. Half points are a display convention; any real
/// number in range is accepted.
fn read_star(default: f64) -> Option<f64> {
  loop {
    let line = read_line(&format!("MVW star (0 ~ 5) [{default}]"))?;
    if line.is_empty() {
      return Some(default);
    }
    match line.parse::<f64>() {
      Ok(star) if validate_star(star).is_ok() => return Some(star),
      _ => println!("Please enter a number between 0 and 5 (halves allowed)."),
    }
  }
}

/// Review text, inline or via `$EDITOR`. `prior` is offered both as the
/// inline default and as the editor seed.
fn read_review(prior: Option<&str>) -> Option<String> {
  let answer = read_line("MVW use text editor? [y/N]")?;
  if answer.eq_ignore_ascii_case("y") {
    match edit_in_editor(prior.unwrap_or_default()) {
      Ok(text) => return Some(text),
      Err(err) => {
        tracing::warn!(%err, "editor failed, falling back to inline input");
      }
    }
  }

  let line = read_line("MVW review")?;
  match prior {
    Some(prior) if line.is_empty() => Some(prior.to_string()),
    _ => Some(line),
  }
}

/// Open `$EDITOR` (default `vi`) on a temp file seeded with `seed`.
fn edit_in_editor(seed: &str) -> io::Result<String> {
  let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

  let mut file = tempfile::NamedTempFile::new()?;
  file.write_all(seed.as_bytes())?;
  file.flush()?;

  let status = std::process::Command::new(&editor).arg(file.path()).status()?;
  if !status.success() {
    return Err(io::Error::other(format!("{editor} exited with {status}")));
  }

  let text = std::fs::read_to_string(file.path())?;
  Ok(text.trim_end().to_string())
}
