use super::clock::{SystemTimeSource, TimeIntervalClock, TimeSource};
use super::totp::TotpGenerator;
use super::{OtpEntry, OtpError, OtpResult};
use log::{debug, error};
use serde::Serialize;
use std::sync::Arc;

/// Generators sharing one interval clock.
#[derive(Debug)]
pub struct IntervalGroup {
  clock: Arc<TimeIntervalClock>,
  generators: Vec<TotpGenerator>,
}

impl IntervalGroup {
  pub fn clock(&self) -> &TimeIntervalClock {
    &self.clock
  }

  pub fn generators(&self) -> &[TotpGenerator] {
    &self.generators
  }
}

/// State of one interval group after a tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupTick {
  pub interval_secs: u64,
  pub interval_index: u64,
  pub changed: bool,
  pub elapsed_ms: u64,
  pub remaining_ms: u64,
  pub progress: f64,
}

impl GroupTick {
  fn of(clock: &TimeIntervalClock, changed: bool) -> GroupTick {
    GroupTick {
      interval_secs: clock.interval_secs(),
      interval_index: clock.value(),
      changed,
      elapsed_ms: clock.elapsed_ms(),
      remaining_ms: clock.remaining_ms(),
      progress: clock.progress(),
    }
  }

  /// Remaining whole seconds, rounded up.
  pub fn remaining_secs(&self) -> u64 {
    (self.remaining_ms + 999) / 1000
  }

  /// Elapsed whole seconds, rounded down.
  pub fn elapsed_secs(&self) -> u64 {
    self.elapsed_ms / 1000
  }
}

/// An entry that could not be turned into a generator.
#[derive(Debug, PartialEq, Eq)]
pub struct EntryFailure {
  pub label: String,
  pub error: OtpError,
}

/// Set of TOTP generators, one clock per distinct interval duration.
#[derive(Debug, Default)]
pub struct OtpBoard {
  groups: Vec<IntervalGroup>,
}

impl OtpBoard {
  /// Build generators for all entries on system time.
  ///
  /// Entries failing validation or secret decoding are logged and returned as failures,
  /// they never prevent the remaining entries from being built.
  pub fn from_entries<'a, I>(entries: I) -> (OtpBoard, Vec<EntryFailure>)
  where
    I: IntoIterator<Item = &'a OtpEntry>,
  {
    Self::with_time_source(entries, Arc::new(SystemTimeSource))
  }

  pub fn with_time_source<'a, I>(entries: I, time_source: Arc<dyn TimeSource>) -> (OtpBoard, Vec<EntryFailure>)
  where
    I: IntoIterator<Item = &'a OtpEntry>,
  {
    let mut board = OtpBoard::default();
    let mut failures = Vec::new();

    for entry in entries {
      if let Err(error) = board.add_entry(entry, &time_source) {
        error!("Skipping '{}': {}", entry.label, error);
        failures.push(EntryFailure {
          label: entry.label.clone(),
          error,
        });
      }
    }
    // Longer intervals (refreshed less often) first.
    board
      .groups
      .sort_by(|g1, g2| g2.clock.interval_ms().cmp(&g1.clock.interval_ms()));

    (board, failures)
  }

  fn add_entry(&mut self, entry: &OtpEntry, time_source: &Arc<dyn TimeSource>) -> OtpResult<()> {
    entry.validate()?;

    let interval_ms = entry.interval.saturating_mul(1000);
    let existing = self
      .groups
      .iter()
      .position(|group| group.clock.interval_ms() == interval_ms);
    let clock = match existing {
      Some(index) => self.groups[index].clock.clone(),
      None => Arc::new(TimeIntervalClock::with_time_source(entry.interval, time_source.clone())?),
    };
    let generator = TotpGenerator::new(entry.label.as_str(), &entry.secret, &entry.hash, entry.len, clock.clone())?;

    match existing {
      Some(index) => self.groups[index].generators.push(generator),
      None => {
        debug!("New interval clock: {}s", entry.interval);
        self.groups.push(IntervalGroup {
          clock,
          generators: vec![generator],
        })
      }
    }

    Ok(())
  }

  pub fn groups(&self) -> &[IntervalGroup] {
    &self.groups
  }

  pub fn generators(&self) -> impl Iterator<Item = &TotpGenerator> {
    self.groups.iter().flat_map(|group| group.generators.iter())
  }

  pub fn is_empty(&self) -> bool {
    self.groups.iter().all(|group| group.generators.is_empty())
  }

  /// Refresh every clock and, where the interval changed, the generators bound to it.
  pub fn tick(&mut self) -> Vec<GroupTick> {
    self
      .groups
      .iter_mut()
      .map(|group| {
        let changed = group.clock.refresh();
        if changed {
          group.generators.iter_mut().for_each(TotpGenerator::refresh);
        }
        GroupTick::of(&group.clock, changed)
      })
      .collect()
  }

  /// Refresh every clock and generator unconditionally, all groups report a change.
  pub fn force_refresh(&mut self) -> Vec<GroupTick> {
    self
      .groups
      .iter_mut()
      .map(|group| {
        group.clock.refresh();
        group.generators.iter_mut().for_each(TotpGenerator::refresh);
        GroupTick::of(&group.clock, true)
      })
      .collect()
  }
}

/// Delay until the next whole wall-clock second.
pub fn millis_to_next_second(now_ms: u64) -> u64 {
  1000 - now_ms % 1000
}
