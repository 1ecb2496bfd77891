use core::{str::FromStr, fmt::Write};

use alloc::string::String;

use crate::{io::Cursor, NumberPart, JsonError};

/// The maximum length of a number literal, in bytes.
pub const MAX_NUMBER_LENGTH: usize = 256;

/// The significant digits numbers are written with, matching C's `%.15g`.
const SIGNIFICANT_DIGITS: usize = f64::DIGITS as usize;
/// The largest decimal exponent numbers are written without an exponent for.
const MAX_FIXED_EXPONENT: i16 = 14;
/// The smallest decimal exponent numbers are written without an exponent for.
const MIN_FIXED_EXPONENT: i16 = -4;

/// An implementor of `core::fmt::Write` which writes to a slice.
struct SliceWrite<'a>(&'a mut [u8], usize);
impl Write for SliceWrite<'_> {
  #[inline(always)]
  fn write_str(&mut self, s: &str) -> core::fmt::Result {
    let remaining = self.0.len() - self.1;
    if remaining < s.len() {
      Err(core::fmt::Error)?;
    }
    self.0[self.1 .. (self.1 + s.len())].copy_from_slice(s.as_bytes());
    self.1 += s.len();
    Ok(())
  }
}

/// Check the number being read hasn't exceeded the length limit.
#[inline(always)]
fn check_length(cursor: &Cursor<'_>, start: usize) -> Result<(), JsonError> {
  let length = cursor.position() - start;
  if length > MAX_NUMBER_LENGTH {
    Err(JsonError::NumberTooLong { length, offset: start })?;
  }
  Ok(())
}

/// Advance past a run of digits.
#[inline(always)]
fn skip_digits(cursor: &mut Cursor<'_>, start: usize) -> Result<(), JsonError> {
  while matches!(cursor.peek(0), Some(b'0' ..= b'9')) {
    cursor.advance(1);
    check_length(cursor, start)?;
  }
  Ok(())
}

/// Advance past a run of digits which must be non-empty.
#[inline(always)]
fn require_digits(
  cursor: &mut Cursor<'_>,
  start: usize,
  part: NumberPart,
) -> Result<(), JsonError> {
  match cursor.peek(0) {
    Some(b'0' ..= b'9') => skip_digits(cursor, start),
    None => Err(JsonError::TruncatedNumber { offset: start }),
    Some(_) => Err(JsonError::MissingDigits { part, offset: cursor.position() }),
  }
}

/// Read the number the cursor is positioned at.
///
/// The number is read until the first byte which can't continue it. That byte is left unread.
/*
  https://datatracker.ietf.org/doc/html/rfc8259#section-6 defines the grammar as
  `[ minus ] int [ decimal-point 1*DIGIT ] [ e [ minus / plus ] 1*DIGIT ]`, where `int` is either
  `0` or a non-zero digit followed by any amount of digits.
*/
pub(crate) fn read_number(cursor: &mut Cursor<'_>) -> Result<f64, JsonError> {
  let start = cursor.position();

  if cursor.peek(0) == Some(b'-') {
    cursor.advance(1);
  }
  match cursor.peek(0) {
    Some(b'0') => {
      cursor.advance(1);
      if matches!(cursor.peek(0), Some(b'0' ..= b'9')) {
        Err(JsonError::LeadingZero { offset: start })?;
      }
    }
    Some(b'1' ..= b'9') => skip_digits(cursor, start)?,
    None => Err(JsonError::TruncatedNumber { offset: start })?,
    Some(_) => {
      Err(JsonError::MissingDigits { part: NumberPart::Integer, offset: cursor.position() })?
    }
  }

  if cursor.peek(0) == Some(b'.') {
    cursor.advance(1);
    require_digits(cursor, start, NumberPart::Fraction)?;
  }

  if matches!(cursor.peek(0), Some(b'e' | b'E')) {
    cursor.advance(1);
    if matches!(cursor.peek(0), Some(b'+' | b'-')) {
      cursor.advance(1);
    }
    require_digits(cursor, start, NumberPart::Exponent)?;
  }
  check_length(cursor, start)?;

  // Rust's grammar for floats is a superset of RFC 8259's, so this will only fail if the above
  // accepted something it shouldn't have
  f64::from_str(cursor.since(start)).map_err(|_| JsonError::InternalError)
}

/// Write a finite number as C's `%.15g` would.
///
/// The number is rounded to 15 significant digits, with trailing zeroes dropped. It's written
/// with an exponent if its decimal exponent is outside of `-4 ..= 14`, where the exponent has a
/// sign and at least two digits (`1e+20`, `1e-05`).
pub(crate) fn write_number(value: f64, out: &mut String) {
  // `-d.ddddddddddddddde-ddd` fits within this buffer
  let mut buffer = [0; 32];
  let mut writer = SliceWrite(&mut buffer, 0);
  if write!(&mut writer, "{:.*e}", SIGNIFICANT_DIGITS - 1, value).is_err() {
    // Unreachable for finite numbers, yet Rust's own representation is still valid JSON
    let _ = write!(out, "{value:e}");
    return;
  }
  let len = writer.1;
  let formatted = &buffer[.. len];

  let (negative, formatted) = match formatted.split_first() {
    Some((b'-', formatted)) => (true, formatted),
    _ => (false, formatted),
  };
  let marker = formatted.iter().position(|byte| *byte == b'e').unwrap_or(formatted.len());
  let (mantissa, exponent) = formatted.split_at(marker);

  // Rust writes the exponent as `e`, an optional `-`, then its digits
  let mut exponent_negative = false;
  let mut exponent_value = 0i16;
  for byte in exponent.iter().skip(1) {
    match byte {
      b'-' => exponent_negative = true,
      b'0' ..= b'9' => {
        exponent_value = exponent_value.saturating_mul(10).saturating_add(i16::from(byte - b'0'))
      }
      _ => {}
    }
  }
  let exponent = if exponent_negative { -exponent_value } else { exponent_value };

  let mut digits = [b'0'; SIGNIFICANT_DIGITS];
  let mut significant = 0;
  for digit in mantissa.iter().filter(|byte| byte.is_ascii_digit()).take(SIGNIFICANT_DIGITS) {
    digits[significant] = *digit;
    significant += 1;
  }
  while (significant > 1) && (digits[significant - 1] == b'0') {
    significant -= 1;
  }
  let significant = significant.max(1);
  let digits = &digits[.. significant];

  if negative {
    out.push('-');
  }
  if (exponent < MIN_FIXED_EXPONENT) || (exponent > MAX_FIXED_EXPONENT) {
    out.push(char::from(digits[0]));
    if significant > 1 {
      out.push('.');
      out.extend(digits[1 ..].iter().map(|digit| char::from(*digit)));
    }
    out.push('e');
    out.push(if exponent < 0 { '-' } else { '+' });
    let _ = write!(out, "{:02}", exponent.unsigned_abs());
  } else if exponent >= 0 {
    let integer_digits = usize::from(exponent.unsigned_abs()) + 1;
    for i in 0 .. integer_digits {
      out.push(char::from(digits.get(i).copied().unwrap_or(b'0')));
    }
    if significant > integer_digits {
      out.push('.');
      out.extend(digits[integer_digits ..].iter().map(|digit| char::from(*digit)));
    }
  } else {
    out.push_str("0.");
    for _ in 1 .. exponent.unsigned_abs() {
      out.push('0');
    }
    out.extend(digits.iter().map(|digit| char::from(*digit)));
  }
}

#[cfg(test)]
fn read(text: &str) -> Result<(f64, usize), JsonError> {
  let mut cursor = Cursor::new(text);
  let number = read_number(&mut cursor)?;
  Ok((number, cursor.position()))
}

#[test]
#[allow(clippy::float_cmp)]
fn test_read_number() {
  assert_eq!(read("0").unwrap(), (0.0, 1));
  assert_eq!(read("-0").unwrap(), (0.0, 2));
  assert!(read("-0").unwrap().0.is_sign_negative());
  assert_eq!(read("123,").unwrap(), (123.0, 3));
  assert_eq!(read("-12.5e-1]").unwrap(), (-1.25, 8));
  assert_eq!(read("1E+2 ").unwrap(), (100.0, 4));
  assert_eq!(read("0.000001").unwrap().0, 0.000001);
  assert_eq!(read("1e400").unwrap().0, f64::INFINITY);
  // The number ends at the first byte which can't continue it
  assert_eq!(read("1.5.3").unwrap(), (1.5, 3));
  assert_eq!(read("0x10").unwrap(), (0.0, 1));
}

#[test]
fn test_read_number_errors() {
  assert_eq!(read("01").unwrap_err(), JsonError::LeadingZero { offset: 0 });
  assert_eq!(read("-00").unwrap_err(), JsonError::LeadingZero { offset: 0 });
  assert_eq!(
    read("-a").unwrap_err(),
    JsonError::MissingDigits { part: NumberPart::Integer, offset: 1 }
  );
  assert_eq!(
    read("-.5").unwrap_err(),
    JsonError::MissingDigits { part: NumberPart::Integer, offset: 1 }
  );
  assert_eq!(
    read("1.e5").unwrap_err(),
    JsonError::MissingDigits { part: NumberPart::Fraction, offset: 2 }
  );
  assert_eq!(
    read("1e+]").unwrap_err(),
    JsonError::MissingDigits { part: NumberPart::Exponent, offset: 3 }
  );
  assert_eq!(read("-").unwrap_err(), JsonError::TruncatedNumber { offset: 0 });
  assert_eq!(read("2.").unwrap_err(), JsonError::TruncatedNumber { offset: 0 });
  assert_eq!(read("2e-").unwrap_err(), JsonError::TruncatedNumber { offset: 0 });
  assert!(read("2e-").unwrap_err().is_incomplete());
}

#[test]
fn test_number_length() {
  let limit = "1".repeat(MAX_NUMBER_LENGTH);
  assert_eq!(read(&limit).unwrap().1, MAX_NUMBER_LENGTH);

  let long = "1".repeat(MAX_NUMBER_LENGTH + 100);
  assert_eq!(
    read(&long).unwrap_err(),
    JsonError::NumberTooLong { length: MAX_NUMBER_LENGTH + 1, offset: 0 }
  );
  let long = format!("-{}", "1".repeat(MAX_NUMBER_LENGTH));
  assert!(matches!(read(&long).unwrap_err(), JsonError::NumberTooLong { .. }));
}

#[cfg(test)]
fn written(value: f64) -> String {
  let mut out = String::new();
  write_number(value, &mut out);
  out
}

#[test]
fn test_write_number() {
  assert_eq!(written(0.0), "0");
  assert_eq!(written(-0.0), "-0");
  assert_eq!(written(1.0), "1");
  assert_eq!(written(-2.5), "-2.5");
  assert_eq!(written(123.456), "123.456");
  assert_eq!(written(0.1), "0.1");
  assert_eq!(written(0.0001), "0.0001");
  assert_eq!(written(0.00001), "1e-05");
  assert_eq!(written(0.000123), "0.000123");
  assert_eq!(written(1.0 / 3.0), "0.333333333333333");
  assert_eq!(written(2.0 / 3.0), "0.666666666666667");
  assert_eq!(written(100_000_000_000_000.0), "100000000000000");
  assert_eq!(written(1e15), "1e+15");
  assert_eq!(written(1e20), "1e+20");
  assert_eq!(written(1.5e-7), "1.5e-07");
  assert_eq!(written(123_456_789_012_345_678.0), "1.23456789012346e+17");
  assert_eq!(written(f64::MAX), "1.79769313486232e+308");
  assert_eq!(written(-f64::MAX), "-1.79769313486232e+308");
  assert_eq!(written(5e-324), "4.94065645841247e-324");
  // The longest `%.15g` output still fits the formatting buffer
  assert_eq!(written(-5e-324), "-4.94065645841247e-324");
  let mut out = String::from("[");
  write_number(-1.5e-100, &mut out);
  write_number(2e300, &mut out);
  assert_eq!(out, "[-1.5e-1002e+300");
  // Rounding may carry into the exponent
  assert_eq!(written(999_999_999_999_999.9), "1e+15");
  assert_eq!(written(0.1 + 0.2), "0.3");
}
