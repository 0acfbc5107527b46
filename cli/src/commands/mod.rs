mod completions;
mod show;
mod watch;

use anyhow::{bail, Result};
use clap::Subcommand;
use log::error;
use otp_clock_lib::otp::{OtpBoard, OtpEntry};
use std::path::Path;

use crate::config::read_config;

#[derive(Debug, Subcommand)]
pub enum MainCommand {
  #[clap(about = "Print current and next codes once")]
  Show(show::ShowCommand),
  #[clap(about = "Print codes on every interval change")]
  Watch(watch::WatchCommand),
  #[clap(about = "Generate shell completions")]
  Completions(completions::CompletionCommand),
}

impl MainCommand {
  pub fn run(self, config_path: Option<&Path>) -> Result<()> {
    match self {
      MainCommand::Show(cmd) => cmd.run(config_path),
      MainCommand::Watch(cmd) => cmd.run(config_path),
      MainCommand::Completions(cmd) => cmd.run(),
    }
  }
}

/// Entries of the config file followed by the ones given as arguments.
///
/// Malformed arguments are logged and skipped.
fn collect_entries(config_path: Option<&Path>, args: &[String]) -> Result<Vec<OtpEntry>> {
  let mut entries = match read_config(config_path)? {
    Some(config) => config.entries,
    None => Vec::new(),
  };

  for arg in args {
    match arg.parse::<OtpEntry>() {
      Ok(entry) => entries.push(entry),
      Err(err) => error!("Skipping argument: {}", err),
    }
  }

  Ok(entries)
}

fn create_board(config_path: Option<&Path>, args: &[String]) -> Result<OtpBoard> {
  let entries = collect_entries(config_path, args)?;
  let (board, failures) = OtpBoard::from_entries(&entries);

  if board.is_empty() {
    if entries.is_empty() && failures.is_empty() {
      bail!("No OTP entries given. Pass 'label=SECRET' arguments or use a config file");
    }
    bail!("None of the OTP entries is valid");
  }

  Ok(board)
}

#[cfg(test)]
mod tests {
  use super::*;
  use spectral::prelude::*;
  use std::io::Write;

  #[test]
  fn test_collect_entries_skips_malformed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[entries]]\nlabel = \"from-config\"\nsecret = \"MZXW6YTB\"").unwrap();
    let args = vec![
      "cli=GEZDGNBVGY3TQOJQ".to_string(),
      "missing-separator".to_string(),
      "other=secret:GEZDGNBV,len:8".to_string(),
    ];

    let entries = collect_entries(Some(file.path()), &args).unwrap();
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();

    assert_that(&labels).is_equal_to(vec!["from-config", "cli", "other"]);
  }

  #[test]
  fn test_create_board_with_invalid_entries() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "entries = []").unwrap();

    assert_that(&create_board(Some(file.path()), &["bad=1111".to_string()]).is_err()).is_true();
    assert_that(&create_board(Some(file.path()), &[]).is_err()).is_true();

    let board = create_board(Some(file.path()), &["bad=1111".to_string(), "good=MZXW6YTB".to_string()]).unwrap();
    assert_that(&board.generators().count()).is_equal_to(1);
  }
}
