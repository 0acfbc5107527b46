use super::{OtpError, OtpResult};
use chrono::Utc;
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait TimeSource: Send + Sync {
  fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
  fn now_millis(&self) -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
  }
}

/// Index of the interval containing `now_ms`.
pub fn compute_counter(now_ms: u64, interval_ms: u64) -> u64 {
  now_ms / interval_ms
}

/// Tracks the current TOTP interval index for a fixed interval duration.
///
/// `refresh` is a single atomic read-modify-write, so a clock may be shared behind an `Arc`
/// by several generators (and threads). The index never decreases.
pub struct TimeIntervalClock {
  interval_ms: u64,
  value: AtomicU64,
  time_source: Arc<dyn TimeSource>,
}

impl TimeIntervalClock {
  /// Clock on system time.
  pub fn new(interval_secs: u64) -> OtpResult<TimeIntervalClock> {
    Self::with_time_source(interval_secs, Arc::new(SystemTimeSource))
  }

  /// `interval_secs` must be positive and representable in milliseconds.
  pub fn with_time_source(interval_secs: u64, time_source: Arc<dyn TimeSource>) -> OtpResult<TimeIntervalClock> {
    let interval_ms = match interval_secs.checked_mul(1000) {
      Some(interval_ms) if interval_ms > 0 => interval_ms,
      _ => {
        return Err(OtpError::InvalidConfiguration(format!(
          "interval of {}s out of range",
          interval_secs
        )))
      }
    };
    let value = compute_counter(time_source.now_millis(), interval_ms);

    Ok(TimeIntervalClock {
      interval_ms,
      value: AtomicU64::new(value),
      time_source,
    })
  }

  /// Recompute the interval index, `true` if it changed since the last refresh.
  pub fn refresh(&self) -> bool {
    let value = compute_counter(self.time_source.now_millis(), self.interval_ms);
    let previous = self.value.fetch_max(value, Ordering::AcqRel);

    if previous < value {
      debug!("Interval {}s: {} -> {}", self.interval_secs(), previous, value);
      true
    } else {
      false
    }
  }

  pub fn value(&self) -> u64 {
    self.value.load(Ordering::Acquire)
  }

  pub fn interval_ms(&self) -> u64 {
    self.interval_ms
  }

  pub fn interval_secs(&self) -> u64 {
    self.interval_ms / 1000
  }

  /// Milliseconds elapsed since the start of the current interval.
  pub fn elapsed_ms(&self) -> u64 {
    let start = self.value().saturating_mul(self.interval_ms);

    self.time_source.now_millis().saturating_sub(start)
  }

  /// Milliseconds left before the next interval, 0 once the boundary has passed without a refresh.
  pub fn remaining_ms(&self) -> u64 {
    self.interval_ms.saturating_sub(self.elapsed_ms())
  }

  /// Elapsed fraction of the current interval in `[0, 1]`.
  pub fn progress(&self) -> f64 {
    (self.elapsed_ms() as f64 / self.interval_ms as f64).min(1.0)
  }
}

impl fmt::Debug for TimeIntervalClock {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("TimeIntervalClock")
      .field("interval_ms", &self.interval_ms)
      .field("value", &self.value())
      .finish()
  }
}

/// Manually advanced time source.
#[derive(Debug, Default)]
pub struct ManualTimeSource(AtomicU64);

impl ManualTimeSource {
  pub fn new(now_ms: u64) -> ManualTimeSource {
    ManualTimeSource(AtomicU64::new(now_ms))
  }

  pub fn set(&self, now_ms: u64) {
    self.0.store(now_ms, Ordering::Release);
  }

  pub fn advance(&self, delta_ms: u64) {
    self.0.fetch_add(delta_ms, Ordering::AcqRel);
  }
}

impl TimeSource for ManualTimeSource {
  fn now_millis(&self) -> u64 {
    self.0.load(Ordering::Acquire)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use spectral::prelude::*;

  fn manual_clock(interval_secs: u64, now_ms: u64) -> (Arc<ManualTimeSource>, TimeIntervalClock) {
    let time = Arc::new(ManualTimeSource::new(now_ms));
    let clock = TimeIntervalClock::with_time_source(interval_secs, time.clone()).unwrap();
    (time, clock)
  }

  #[test]
  fn test_initial_value() {
    let (_, clock) = manual_clock(30, 59_999);

    assert_that(&clock.value()).is_equal_to(1);
    assert_that(&clock.interval_ms()).is_equal_to(30_000);
    assert_that(&clock.interval_secs()).is_equal_to(30);
    assert_that(&clock.elapsed_ms()).is_equal_to(29_999);
    assert_that(&clock.remaining_ms()).is_equal_to(1);
  }

  #[test]
  fn test_refresh_changes_once_per_boundary() {
    let (time, clock) = manual_clock(30, 1_111_111_109_000);
    let start = clock.value();

    assert_that(&clock.refresh()).is_false();
    time.advance(500);
    assert_that(&clock.refresh()).is_false();
    time.set(1_111_111_110_000);
    assert_that(&clock.refresh()).is_true();
    assert_that(&clock.refresh()).is_false();
    assert_that(&clock.value()).is_equal_to(start + 1);
  }

  #[test]
  fn test_elapsed_plus_remaining() {
    let (time, clock) = manual_clock(60, 1_700_000_000_000);

    for _ in 0..200 {
      time.advance(1_337);
      clock.refresh();
      assert_that(&(clock.elapsed_ms() + clock.remaining_ms())).is_equal_to(clock.interval_ms());
    }
  }

  #[test]
  fn test_remaining_clamped_without_refresh() {
    let (time, clock) = manual_clock(30, 0);

    time.set(45_000);
    assert_that(&clock.elapsed_ms()).is_equal_to(45_000);
    assert_that(&clock.remaining_ms()).is_equal_to(0);
    assert_that(&clock.progress()).is_equal_to(1.0);
  }

  #[test]
  fn test_never_decreases() {
    let (time, clock) = manual_clock(30, 90_000);

    time.set(10_000);
    assert_that(&clock.refresh()).is_false();
    assert_that(&clock.value()).is_equal_to(3);
  }

  #[test]
  fn test_interval_out_of_range() {
    let time = Arc::new(ManualTimeSource::new(0));

    assert_that(&TimeIntervalClock::with_time_source(0, time.clone()).is_err()).is_true();
    assert_that(&TimeIntervalClock::with_time_source(u64::MAX / 1000 + 1, time.clone()).is_err()).is_true();
    assert_that(&TimeIntervalClock::with_time_source(1 << 61, time.clone()).is_err()).is_true();
    assert_that(&TimeIntervalClock::with_time_source(u64::MAX / 1000, time).is_ok()).is_true();
  }

  #[test]
  fn test_system_clock() {
    let clock = TimeIntervalClock::new(30).unwrap();

    assert_that(&clock.value()).is_greater_than(50_000_000);
    assert_that(&clock.remaining_ms()).is_less_than_or_equal_to(30_000);
  }
}
