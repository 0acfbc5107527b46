use super::clock::TimeIntervalClock;
use super::hotp::HotpEngine;
use super::{OtpAlgorithm, OtpError, OtpResult, OtpSecret};
use std::sync::Arc;

/// TOTP (RFC 6238) generator for one secret, driven by a possibly shared interval clock.
#[derive(Debug)]
pub struct TotpGenerator {
  label: String,
  engine: HotpEngine,
  clock: Arc<TimeIntervalClock>,
  otp: String,
  next_otp: String,
}

impl TotpGenerator {
  /// Build a generator from textual parameters.
  ///
  /// Unknown algorithm names fall back to SHA1 (with a warning). Fails on an empty or
  /// malformed secret and on a zero digit count.
  pub fn new<L, S>(
    label: L,
    secret: S,
    algorithm: &str,
    digits: u32,
    clock: Arc<TimeIntervalClock>,
  ) -> OtpResult<TotpGenerator>
  where
    L: Into<String>,
    S: AsRef<str>,
  {
    let secret: OtpSecret = secret.as_ref().parse()?;

    Self::with_secret(label, &secret, OtpAlgorithm::resolve(algorithm), digits, clock)
  }

  pub fn with_secret<L: Into<String>>(
    label: L,
    secret: &OtpSecret,
    algorithm: OtpAlgorithm,
    digits: u32,
    clock: Arc<TimeIntervalClock>,
  ) -> OtpResult<TotpGenerator> {
    if secret.is_empty() {
      return Err(OtpError::InvalidConfiguration("secret must not be empty".to_string()));
    }
    let engine = HotpEngine::new(secret.as_bytes(), algorithm, digits)?;
    let mut generator = TotpGenerator {
      label: label.into(),
      engine,
      clock,
      otp: String::new(),
      next_otp: String::new(),
    };
    generator.refresh();

    Ok(generator)
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn algorithm(&self) -> OtpAlgorithm {
    self.engine.algorithm()
  }

  pub fn digits(&self) -> u32 {
    self.engine.digits()
  }

  pub fn clock(&self) -> &Arc<TimeIntervalClock> {
    &self.clock
  }

  /// Code for an arbitrary counter.
  pub fn generate(&self, counter: u64) -> String {
    self.engine.compute(counter)
  }

  /// Code of the interval the clock currently points at.
  pub fn current_code(&self) -> String {
    self.generate(self.clock.value())
  }

  /// Code of the interval following the current one.
  pub fn next_code(&self) -> String {
    self.generate(self.clock.value().wrapping_add(1))
  }

  /// Re-derive the cached codes from the clock.
  pub fn refresh(&mut self) {
    let counter = self.clock.value();

    self.otp = self.generate(counter);
    self.next_otp = self.generate(counter.wrapping_add(1));
  }

  /// Cached code as of the last `refresh`.
  pub fn otp(&self) -> &str {
    &self.otp
  }

  /// Cached look-ahead code as of the last `refresh`.
  pub fn next_otp(&self) -> &str {
    &self.next_otp
  }
}
