use anyhow::Result;
use clap::Args;
use otp_clock_lib::otp::{GroupTick, OtpAlgorithm, OtpBoard};
use serde::Serialize;
use std::path::Path;

use super::create_board;
use crate::view::{print_group, Widths};

#[derive(Debug, Args)]
pub struct ShowCommand {
  #[clap(long, help = "Output as json")]
  json: bool,

  #[clap(help = "Entries as 'label=SECRET' or 'label=secret:SECRET,hash:SHA256,len:8,interval:60'")]
  entries: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CodeOutput<'a> {
  label: &'a str,
  algorithm: OtpAlgorithm,
  digits: u32,
  interval: u64,
  otp: &'a str,
  next_otp: &'a str,
  remaining_secs: u64,
}

impl ShowCommand {
  pub fn run(self, config_path: Option<&Path>) -> Result<()> {
    let mut board = create_board(config_path, &self.entries)?;
    let ticks = board.force_refresh();

    if self.json {
      println!("{}", serde_json::to_string_pretty(&code_outputs(&board, &ticks))?);
    } else {
      let widths = Widths::of(board.generators());
      for (group, tick) in board.groups().iter().zip(ticks.iter()) {
        print_group(group, tick, widths);
      }
    }

    Ok(())
  }
}

fn code_outputs<'a>(board: &'a OtpBoard, ticks: &[GroupTick]) -> Vec<CodeOutput<'a>> {
  board
    .groups()
    .iter()
    .zip(ticks.iter())
    .flat_map(|(group, tick)| {
      group.generators().iter().map(move |generator| CodeOutput {
        label: generator.label(),
        algorithm: generator.algorithm(),
        digits: generator.digits(),
        interval: tick.interval_secs,
        otp: generator.otp(),
        next_otp: generator.next_otp(),
        remaining_secs: tick.remaining_secs(),
      })
    })
    .collect()
}
