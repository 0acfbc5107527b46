use anyhow::{Context, Result};
use otp_clock_lib::otp::OtpEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub entries: Vec<OtpEntry>,
}

pub fn config_file() -> PathBuf {
  let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
  dirs::config_dir()
    .map(|configs| configs.join("otp-clock"))
    .unwrap_or_else(|| home_dir.join(".otp-clock"))
    .join("config.toml")
}

pub fn parse_config(content: &str) -> Result<Config> {
  Ok(toml::from_str::<Config>(content)?)
}

/// Read the given config file, or the default one if it exists.
pub fn read_config(explicit: Option<&Path>) -> Result<Option<Config>> {
  let config_file = match explicit {
    Some(path) => path.to_path_buf(),
    None => config_file(),
  };
  match fs::read_to_string(&config_file) {
    Ok(content) => {
      let config = parse_config(&content).with_context(|| format!("Invalid config file '{}'", config_file.display()))?;
      Ok(Some(config))
    }
    Err(ref err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => Ok(None),
    Err(err) => Err(err).with_context(|| format!("Unable to read '{}'", config_file.display())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use spectral::prelude::*;
  use std::io::Write;

  #[test]
  fn test_parse_config_defaults() {
    let config = parse_config(
      r#"
[[entries]]
label = "work"
secret = "JBSWY3DPEHPK3PXP"

[[entries]]
label = "bank"
secret = "GEZDGNBVGY3TQOJQ"
hash = "SHA256"
len = 8
interval = 60
"#,
    )
    .unwrap();

    assert_that(&config.entries).has_length(2);
    assert_that(&config.entries[0]).is_equal_to(OtpEntry::new("work", "JBSWY3DPEHPK3PXP"));
    assert_that(&config.entries[1].hash).is_equal_to("SHA256".to_string());
    assert_that(&config.entries[1].len).is_equal_to(8);
    assert_that(&config.entries[1].interval).is_equal_to(60);
  }

  #[test]
  fn test_parse_config_missing_secret() {
    assert_that(&parse_config("[[entries]]\nlabel = \"x\"\n").is_err()).is_true();
  }

  #[test]
  fn test_read_explicit_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[entries]]\nlabel = \"a\"\nsecret = \"MZXW6YTB\"").unwrap();

    let config = read_config(Some(file.path())).unwrap().unwrap();

    assert_that(&config.entries[0].label).is_equal_to("a".to_string());
  }

  #[test]
  fn test_read_missing_explicit_config() {
    let dir = tempfile::tempdir().unwrap();

    assert_that(&read_config(Some(dir.path().join("missing.toml").as_path())).is_err()).is_true();
  }
}
