use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
  #[error("Invalid base32 character: {0:?}")]
  InvalidBase32Character(char),
  #[error("Unsupported OTP algorithm: {0}. Only SHA1, SHA256, SHA512 are supported")]
  UnsupportedAlgorithm(String),
  #[error("Invalid configuration: {0}")]
  InvalidConfiguration(String),
  #[error("Invalid OTP entry: {0}")]
  InvalidEntry(String),
  #[error("Invalid HMAC key: {0}")]
  InvalidKey(String),
}

pub type OtpResult<T> = Result<T, OtpError>;

error_convert_from!(std::num::ParseIntError, OtpError, InvalidEntry, "expected a positive number");
error_convert_from!(hmac::digest::InvalidLength, OtpError, InvalidKey, "rejected by HMAC");
