use log::warn;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod base32;
mod board;
mod clock;
mod entry;
mod error;
mod hotp;
mod totp;


pub use self::board::*;
pub use self::clock::*;
pub use self::entry::*;
pub use self::error::*;
pub use self::hotp::{hotp, HotpEngine};
pub use self::totp::TotpGenerator;

pub const DEFAULT_ALGORITHM: OtpAlgorithm = OtpAlgorithm::SHA1;
pub const DEFAULT_DIGITS: u32 = 6;
pub const MAX_DIGITS: u32 = 64;
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum OtpAlgorithm {
  SHA1,
  SHA256,
  SHA512,
}

impl OtpAlgorithm {
  /// Resolve an algorithm name, falling back to SHA1 for anything unknown.
  pub fn resolve(name: &str) -> OtpAlgorithm {
    match name.parse() {
      Ok(algorithm) => algorithm,
      Err(error) => {
        warn!("{}: fallback to {}", error, DEFAULT_ALGORITHM);
        DEFAULT_ALGORITHM
      }
    }
  }
}

impl fmt::Display for OtpAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      OtpAlgorithm::SHA1 => write!(f, "SHA1")?,
      OtpAlgorithm::SHA256 => write!(f, "SHA256")?,
      OtpAlgorithm::SHA512 => write!(f, "SHA512")?,
    }
    Ok(())
  }
}

impl FromStr for OtpAlgorithm {
  type Err = OtpError;

  // Accepts SHA1 / SHA-1 / HmacSHA1 / HMAC-SHA1 style names, case-insensitive.
  fn from_str(s: &str) -> OtpResult<Self> {
    let upper = s.trim().to_ascii_uppercase();
    let name = match upper.strip_prefix("HMAC") {
      Some(rest) => rest.trim_start_matches('-'),
      None => &upper,
    };

    match name {
      "SHA1" | "SHA-1" => Ok(OtpAlgorithm::SHA1),
      "SHA256" | "SHA-256" => Ok(OtpAlgorithm::SHA256),
      "SHA512" | "SHA-512" => Ok(OtpAlgorithm::SHA512),
      _ => Err(OtpError::UnsupportedAlgorithm(s.trim().to_string())),
    }
  }
}

/// Decoded shared secret, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct OtpSecret(Vec<u8>);

impl OtpSecret {
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Vec<u8>> for OtpSecret {
  fn from(bytes: Vec<u8>) -> Self {
    OtpSecret(bytes)
  }
}

impl FromStr for OtpSecret {
  type Err = OtpError;

  fn from_str(s: &str) -> OtpResult<Self> {
    Ok(OtpSecret(base32::decode(s)?))
  }
}

impl fmt::Debug for OtpSecret {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "OtpSecret({} bytes)", self.0.len())
  }
}
