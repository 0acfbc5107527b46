use super::{OtpError, OtpResult, DEFAULT_ALGORITHM, DEFAULT_DIGITS, DEFAULT_INTERVAL_SECS, MAX_DIGITS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

fn default_hash() -> String {
  DEFAULT_ALGORITHM.to_string()
}

fn default_len() -> u32 {
  DEFAULT_DIGITS
}

fn default_interval() -> u64 {
  DEFAULT_INTERVAL_SECS
}

/// Parameters of one TOTP secret, as given on the command line or in a config file.
///
/// Command line form is either `label=SECRET` or
/// `label=secret:SECRET,hash:SHA256,len:8,interval:60` (keys in any order, only `secret`
/// required).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct OtpEntry {
  pub label: String,
  pub secret: String,
  #[serde(default = "default_hash")]
  pub hash: String,
  #[serde(default = "default_len")]
  pub len: u32,
  #[serde(default = "default_interval")]
  pub interval: u64,
}

impl OtpEntry {
  pub fn new<L: Into<String>, S: Into<String>>(label: L, secret: S) -> OtpEntry {
    OtpEntry {
      label: label.into(),
      secret: secret.into(),
      hash: default_hash(),
      len: default_len(),
      interval: default_interval(),
    }
  }

  pub fn validate(&self) -> OtpResult<()> {
    if self.secret.trim().is_empty() {
      return Err(OtpError::InvalidConfiguration(format!("{}: empty secret", self.label)));
    }
    if self.len == 0 || self.len > MAX_DIGITS {
      return Err(OtpError::InvalidConfiguration(format!(
        "{}: code length must be between 1 and {}",
        self.label, MAX_DIGITS
      )));
    }
    if self.interval == 0 || self.interval.checked_mul(1000).is_none() {
      return Err(OtpError::InvalidConfiguration(format!(
        "{}: interval must be positive and at most {}s",
        self.label,
        u64::MAX / 1000
      )));
    }
    Ok(())
  }
}

impl FromStr for OtpEntry {
  type Err = OtpError;

  fn from_str(s: &str) -> OtpResult<Self> {
    let (label, value) = s
      .split_once('=')
      .ok_or_else(|| OtpError::InvalidEntry(format!("expected 'label=value', got '{}'", s)))?;
    let mut entry = OtpEntry::new(label.trim(), "");

    // A base32 secret never contains ':'
    if !value.contains(':') && !value.contains(',') {
      entry.secret = value.trim().to_string();
      return Ok(entry);
    }

    let mut secret = None;
    for param in value.split(',') {
      let (key, param_value) = param.split_once(':').ok_or_else(|| {
        OtpError::InvalidEntry(format!(
          "expected 'label=key1:value1,...' with a secret, got '{}'",
          s
        ))
      })?;
      let param_value = param_value.trim();
      match key.trim().to_lowercase().as_str() {
        "secret" => secret = Some(param_value.to_string()),
        "hash" => entry.hash = param_value.to_string(),
        "len" => entry.len = param_value.parse()?,
        "interval" => entry.interval = param_value.parse()?,
        unknown => {
          return Err(OtpError::InvalidEntry(format!(
            "unhandled parameter '{}' for '{}'",
            unknown, entry.label
          )))
        }
      }
    }
    entry.secret = secret.ok_or_else(|| {
      OtpError::InvalidEntry(format!(
        "expected 'label=key1:value1,...' with a secret, got '{}'",
        s
      ))
    })?;

    Ok(entry)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use spectral::prelude::*;

  #[test]
  fn test_bare_secret() {
    let entry: OtpEntry = " work = JBSWY3DPEHPK3PXP ".parse().unwrap();

    assert_that(&entry).is_equal_to(OtpEntry::new("work", "JBSWY3DPEHPK3PXP"));
    assert_that(&entry.hash).is_equal_to("SHA1".to_string());
    assert_that(&entry.len).is_equal_to(6);
    assert_that(&entry.interval).is_equal_to(30);
  }

  #[test]
  fn test_bare_secret_keeps_padding() {
    let entry: OtpEntry = "a=MZXW6===".parse().unwrap();

    assert_that(&entry.secret).is_equal_to("MZXW6===".to_string());
  }

  #[test]
  fn test_single_parameter() {
    let entry: OtpEntry = "x=secret:ABC".parse().unwrap();

    assert_that(&entry.secret).is_equal_to("ABC".to_string());
  }

  #[test]
  fn test_parameters() {
    let entry: OtpEntry = "bank=Secret: GEZDGNBV , HASH:SHA-256,len:8,interval:60".parse().unwrap();

    assert_that(&entry.label).is_equal_to("bank".to_string());
    assert_that(&entry.secret).is_equal_to("GEZDGNBV".to_string());
    assert_that(&entry.hash).is_equal_to("SHA-256".to_string());
    assert_that(&entry.len).is_equal_to(8);
    assert_that(&entry.interval).is_equal_to(60);
  }

  #[test]
  fn test_invalid_entries() {
    assert_that(&"no-separator".parse::<OtpEntry>()).is_err();
    assert_that(&"x=hash:SHA1,len:8".parse::<OtpEntry>()).is_err();
    assert_that(&"x=secret:ABC,colour:red".parse::<OtpEntry>()).is_err();
    assert_that(&"x=secret:ABC,len:six".parse::<OtpEntry>()).is_err();
    assert_that(&"x=secret:ABC,len:-1".parse::<OtpEntry>()).is_err();
    assert_that(&"x=secret:ABC,nocolon".parse::<OtpEntry>()).is_err();
  }

  #[test]
  fn test_validate() {
    assert_that(&OtpEntry::new("ok", "ABC").validate()).is_ok();
    assert_that(&OtpEntry::new("empty", "  ").validate()).is_err();

    let mut entry = OtpEntry::new("zero", "ABC");
    entry.len = 0;
    assert_that(&entry.validate()).is_err();

    let mut entry = OtpEntry::new("zero", "ABC");
    entry.interval = 0;
    assert_that(&entry.validate()).is_err();

    let entry: OtpEntry = "huge=secret:ABC,len:4294967295".parse().unwrap();
    assert_that(&entry.validate()).is_err();

    let entry: OtpEntry = "huge=secret:ABC,interval:18446744073709552".parse().unwrap();
    assert_that(&entry.validate()).is_err();
  }
}
