//! CLI output formatting utilities.
//!
//! Status lines go to stdout (success, info) or stderr (warning, error) with
//! a leading symbol, colored when the stream supports it. Machine output is
//! pretty-printed JSON on stdout.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

#[derive(Debug, Clone, Copy)]
enum Level {
  Success,
  Info,
  Warning,
  Error,
}

impl Level {
  fn symbol(self) -> &'static str {
    match self {
      Level::Success => symbols::SUCCESS,
      Level::Info => symbols::INFO,
      Level::Warning => symbols::WARNING,
      Level::Error => symbols::ERROR,
    }
  }

  fn color(self) -> AnsiColors {
    match self {
      Level::Success => AnsiColors::Green,
      Level::Info => AnsiColors::Blue,
      Level::Warning => AnsiColors::Yellow,
      Level::Error => AnsiColors::Red,
    }
  }

  fn stream(self) -> Stream {
    match self {
      Level::Success | Level::Info => Stream::Stdout,
      Level::Warning | Level::Error => Stream::Stderr,
    }
  }

  /// Problems color the whole message, not just the symbol.
  fn colors_message(self) -> bool {
    matches!(self, Level::Warning | Level::Error)
  }
}

fn print_status(level: Level, message: &str) {
  let color = level.color();
  let symbol_text = level.symbol();
  let symbol = symbol_text.if_supports_color(level.stream(), |s| s.color(color));

  let line = if level.colors_message() {
    format!("{} {}", symbol, message.if_supports_color(level.stream(), |s| s.color(color)))
  } else {
    format!("{} {}", symbol, message)
  };

  match level {
    Level::Success | Level::Info => println!("{}", line),
    Level::Warning | Level::Error => eprintln!("{}", line),
  }
}

pub fn print_success(message: &str) {
  print_status(Level::Success, message);
}

pub fn print_info(message: &str) {
  print_status(Level::Info, message);
}

pub fn print_warning(message: &str) {
  print_status(Level::Warning, message);
}

pub fn print_error(message: &str) {
  print_status(Level::Error, message);
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Human-readable elapsed time. Toolchain builds run for minutes to hours.
pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();

  match secs {
    3600.. => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
    60.. => format!("{}m {}s", secs / 60, secs % 60),
    1.. => format!("{}.{:02}s", secs, duration.subsec_millis() / 10),
    0 => format!("{}ms", duration.subsec_millis()),
  }
}
