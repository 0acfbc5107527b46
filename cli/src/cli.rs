use clap::Parser;
use std::path::PathBuf;

use crate::commands::MainCommand;

#[derive(Debug, Parser)]
#[clap(name = "otp-clock", about = "Shows time-based one-time passwords", version = clap::crate_version!())]
pub struct Args {
  #[clap(short, long, help = "Enable debug logs")]
  pub debug: bool,

  #[clap(short, long, help = "Config file to read entries from")]
  pub config: Option<PathBuf>,

  #[clap(subcommand)]
  pub sub_command: MainCommand,
}
