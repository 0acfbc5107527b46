use crate::error::ExtResult;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod view;

fn main() {
  let args = cli::Args::parse();

  let mut log_builder = env_logger::Builder::from_default_env();

  if args.debug {
    log_builder.filter(None, log::LevelFilter::Debug);
  } else {
    log_builder.filter(None, log::LevelFilter::Error);
  }
  log_builder.target(env_logger::Target::Stderr);
  log_builder.init();

  args.sub_command.run(args.config.as_deref()).ok_or_exit("otp-clock: ");
}
