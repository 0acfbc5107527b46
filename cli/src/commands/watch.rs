use anyhow::Result;
use atty::Stream;
use clap::Args;
use otp_clock_lib::otp::{millis_to_next_second, SystemTimeSource, TimeSource};
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use super::create_board;
use crate::view::{print_group, progress_line, Widths};

#[derive(Debug, Args)]
pub struct WatchCommand {
  #[clap(long, help = "Do not show the progress line, even on a terminal")]
  no_progress: bool,

  #[clap(help = "Entries as 'label=SECRET' or 'label=secret:SECRET,hash:SHA256,len:8,interval:60'")]
  entries: Vec<String>,
}

impl WatchCommand {
  pub fn run(self, config_path: Option<&Path>) -> Result<()> {
    let mut board = create_board(config_path, &self.entries)?;
    let show_progress = !self.no_progress && atty::is(Stream::Stdout);
    let time_source = SystemTimeSource;
    let mut stdout = io::stdout();
    let mut progress_shown = false;
    let mut ticks = board.force_refresh();

    loop {
      if ticks.iter().any(|tick| tick.changed) {
        if progress_shown {
          println!();
          progress_shown = false;
        }
        let widths = Widths::of(board.generators());
        for (group, tick) in board.groups().iter().zip(ticks.iter()) {
          if tick.changed {
            print_group(group, tick, widths);
          }
        }
      }
      if show_progress {
        print!("\r{}", progress_line(&ticks));
        stdout.flush()?;
        progress_shown = true;
      }

      thread::sleep(Duration::from_millis(millis_to_next_second(time_source.now_millis())));
      ticks = board.tick();
    }
  }
}
