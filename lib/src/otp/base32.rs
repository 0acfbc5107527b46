use super::{OtpError, OtpResult};

const PADDING: char = '=';

fn symbol_value(symbol: char) -> Option<u32> {
  match symbol {
    'A'..='Z' => Some(symbol as u32 - 'A' as u32),
    '2'..='7' => Some(symbol as u32 - '2' as u32 + 26),
    _ => None,
  }
}

/// Decode RFC 4648 base32 text.
///
/// Whitespace anywhere and trailing `=` padding are ignored, lowercase is accepted.
/// Trailing bits that do not fill a whole byte are dropped, so the output is always
/// `floor(symbols * 5 / 8)` bytes long.
pub fn decode<S: AsRef<str>>(text: S) -> OtpResult<Vec<u8>> {
  let compact: String = text.as_ref().chars().filter(|c| !c.is_whitespace()).collect();
  let symbols = compact.trim_end_matches(PADDING);

  let mut result = Vec::with_capacity(symbols.len() * 5 / 8);
  let mut buffer: u32 = 0;
  let mut bits: u32 = 0;

  for symbol in symbols.chars().map(|c| c.to_ascii_uppercase()) {
    let value = symbol_value(symbol).ok_or(OtpError::InvalidBase32Character(symbol))?;

    buffer = (buffer << 5) | value;
    bits += 5;
    if bits >= 8 {
      bits -= 8;
      result.push((buffer >> bits) as u8);
      buffer &= (1 << bits) - 1;
    }
  }

  Ok(result)
}
