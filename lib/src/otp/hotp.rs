use super::{OtpAlgorithm, OtpError, OtpResult, MAX_DIGITS};
use byteorder::{BigEndian, ByteOrder};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use std::fmt;

#[derive(Clone)]
enum KeyedMac {
  Sha1(Hmac<Sha1>),
  Sha256(Hmac<Sha256>),
  Sha512(Hmac<Sha512>),
}

/// Keyed HOTP (RFC 4226) code derivation.
///
/// The HMAC key schedule is done once on construction, every `compute` only hashes the
/// counter, so `compute` cannot fail.
#[derive(Clone)]
pub struct HotpEngine {
  mac: KeyedMac,
  algorithm: OtpAlgorithm,
  digits: u32,
}

impl HotpEngine {
  pub fn new(secret: &[u8], algorithm: OtpAlgorithm, digits: u32) -> OtpResult<HotpEngine> {
    if digits == 0 || digits > MAX_DIGITS {
      return Err(OtpError::InvalidConfiguration(format!(
        "digit count must be between 1 and {}, got {}",
        MAX_DIGITS, digits
      )));
    }
    let mac = match algorithm {
      OtpAlgorithm::SHA1 => KeyedMac::Sha1(Hmac::<Sha1>::new_from_slice(secret)?),
      OtpAlgorithm::SHA256 => KeyedMac::Sha256(Hmac::<Sha256>::new_from_slice(secret)?),
      OtpAlgorithm::SHA512 => KeyedMac::Sha512(Hmac::<Sha512>::new_from_slice(secret)?),
    };

    Ok(HotpEngine { mac, algorithm, digits })
  }

  pub fn algorithm(&self) -> OtpAlgorithm {
    self.algorithm
  }

  pub fn digits(&self) -> u32 {
    self.digits
  }

  pub fn compute(&self, counter: u64) -> String {
    let message = counter.to_be_bytes();
    let code = match &self.mac {
      KeyedMac::Sha1(mac) => truncate(&mac.clone().chain_update(message).finalize().into_bytes()),
      KeyedMac::Sha256(mac) => truncate(&mac.clone().chain_update(message).finalize().into_bytes()),
      KeyedMac::Sha512(mac) => truncate(&mac.clone().chain_update(message).finalize().into_bytes()),
    };

    format_code(code, self.digits)
  }
}

impl fmt::Debug for HotpEngine {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("HotpEngine")
      .field("algorithm", &self.algorithm)
      .field("digits", &self.digits)
      .finish_non_exhaustive()
  }
}

/// One-shot HOTP: `HOTP(secret, counter)` reduced to `digits` decimal digits.
pub fn hotp(secret: &[u8], algorithm: OtpAlgorithm, counter: u64, digits: u32) -> OtpResult<String> {
  Ok(HotpEngine::new(secret, algorithm, digits)?.compute(counter))
}

// Dynamic truncation. Every supported digest is at least 20 bytes, so offset + 4 stays in range.
fn truncate(digest: &[u8]) -> u32 {
  let offset = (digest[digest.len() - 1] & 0xf) as usize;

  BigEndian::read_u32(&digest[offset..offset + 4]) & 0x7fff_ffff
}

fn format_code(code: u32, digits: u32) -> String {
  let reduced = match 10_u64.checked_pow(digits) {
    Some(modulus) => u64::from(code) % modulus,
    None => u64::from(code),
  };

  format!("{:01$}", reduced, digits as usize)
}
