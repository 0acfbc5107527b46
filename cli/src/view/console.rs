use crossterm_style::{style, Color};
use otp_clock_lib::otp::{GroupTick, IntervalGroup, TotpGenerator};

/// Column widths shared by all code lines, so groups printed at different times line up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Widths {
  pub label: usize,
  pub otp: usize,
}

impl Widths {
  pub fn of<'a, I>(generators: I) -> Widths
  where
    I: IntoIterator<Item = &'a TotpGenerator>,
  {
    generators.into_iter().fold(Widths::default(), |widths, generator| Widths {
      label: widths.label.max(generator.label().len()),
      otp: widths.otp.max(generator.otp().len()),
    })
  }
}

pub fn interval_header(tick: &GroupTick) -> String {
  format!(
    "Interval: {:>8}; Elapsed: {:>2}s; Remaining: {:>2}s",
    tick.interval_index,
    tick.elapsed_secs(),
    tick.remaining_secs()
  )
}

pub fn code_line(generator: &TotpGenerator, widths: Widths) -> String {
  format!(
    "  {:>label$}: OTP= {:<otp$}  OTP+1= {:<otp$}",
    generator.label(),
    generator.otp(),
    generator.next_otp(),
    label = widths.label,
    otp = widths.otp
  )
}

pub const SEPARATOR: &str = "------------------------------------------------";

pub fn print_group(group: &IntervalGroup, tick: &GroupTick, widths: Widths) {
  println!("{}", interval_header(tick));
  for generator in group.generators() {
    println!("{}", code_line(generator, widths));
  }
  println!("{}", SEPARATOR);
}

/// Remaining time of all groups on one line, colored as the interval runs out.
pub fn progress_line(ticks: &[GroupTick]) -> String {
  ticks
    .iter()
    .map(|tick| {
      let color = if tick.progress < 0.5 {
        Color::Green
      } else if tick.progress < 0.8 {
        Color::Yellow
      } else {
        Color::Red
      };
      format!(
        "[{}s] {}",
        tick.interval_secs,
        style(format!("{:>3}s {:>3}%", tick.remaining_secs(), (tick.progress * 100.0).round())).with(color)
      )
    })
    .collect::<Vec<_>>()
    .join("  ")
}
