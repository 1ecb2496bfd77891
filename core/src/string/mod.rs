use alloc::string::String;

use crate::{io::Cursor, UnexpectedEscape, JsonError};

mod hex;
mod unicode;
mod escape;

use hex::read_hex;
use unicode::*;
pub use escape::{escape_str, escape_bytes};

/// Read a string from a JSON serialization, decoding its escape sequences.
///
/// The cursor must be positioned at the string's opening quote. Upon success, the cursor will be
/// positioned immediately after the closing quote.
pub(crate) fn read_string(
  cursor: &mut Cursor<'_>,
  unexpected_escape: UnexpectedEscape,
) -> Result<String, JsonError> {
  let opened = cursor.position();
  cursor.advance(1);

  let mut string = String::new();
  loop {
    // Copy everything up to the next byte requiring special handling verbatim
    // https://datatracker.ietf.org/doc/html/rfc8259#section-7 defines the unescaped characters
    let run = cursor
      .remaining()
      .iter()
      .position(|byte| matches!(byte, b'"' | b'\\' | b'\x00' ..= b'\x1f'));
    let Some(run) = run else { Err(JsonError::UnclosedString { offset: opened })? };
    let start = cursor.position();
    cursor.advance(run);
    string.push_str(cursor.since(start));

    match cursor.peek(0) {
      Some(b'"') => {
        cursor.advance(1);
        return Ok(string);
      }
      Some(b'\\') => read_escape(cursor, opened, unexpected_escape, &mut string)?,
      Some(byte) => Err(JsonError::ControlCharacter { byte, offset: cursor.position() })?,
      None => Err(JsonError::UnclosedString { offset: opened })?,
    }
  }
}

/// Read the escape sequence the cursor is positioned at, pushing the character it represents.
fn read_escape(
  cursor: &mut Cursor<'_>,
  opened: usize,
  unexpected_escape: UnexpectedEscape,
  string: &mut String,
) -> Result<(), JsonError> {
  let offset = cursor.position();
  let Some(escaped) = cursor.peek(1) else { Err(JsonError::UnclosedString { offset: opened })? };
  let char = match escaped {
    b'"' | b'\\' | b'/' => char::from(escaped),
    b'b' => '\x08',
    b'f' => '\x0c',
    b'n' => '\n',
    b'r' => '\r',
    b't' => '\t',
    b'u' => return read_unicode_escape(cursor, opened, string),
    _ => {
      cursor.advance(1);
      let escaped = cursor.peek_char().ok_or(JsonError::UnclosedString { offset: opened })?;
      match unexpected_escape {
        UnexpectedEscape::Error => Err(JsonError::InvalidEscape { escaped, offset })?,
        UnexpectedEscape::Skip => {
          tracing::warn!(%escaped, offset, "skipping unexpected escaped character");
        }
        UnexpectedEscape::Keep => {
          tracing::warn!(%escaped, offset, "keeping unexpected escaped character");
          string.push(escaped);
        }
      }
      cursor.advance(escaped.len_utf8());
      return Ok(());
    }
  };
  string.push(char);
  cursor.advance(2);
  Ok(())
}

/// Read the UTF-16 code unit of the `\uXXXX` escape the cursor is positioned at.
fn read_utf16_unit(cursor: &mut Cursor<'_>, opened: usize) -> Result<u16, JsonError> {
  let offset = cursor.position();

  // Zero isn't a hex digit, so bytes past the end of the input won't be read as such
  let mut hex = [0; 4];
  let mut available = 0;
  for (i, digit) in hex.iter_mut().enumerate() {
    let Some(byte) = cursor.peek(2 + i) else { break };
    *digit = byte;
    available += 1;
  }

  match read_hex(hex) {
    Ok(unit) => {
      cursor.advance(6);
      Ok(unit)
    }
    // Every digit present was valid, the input simply ended
    Err(valid_digits) if valid_digits >= available => {
      Err(JsonError::UnclosedString { offset: opened })
    }
    Err(valid_digits) => {
      cursor.advance(2 + valid_digits);
      let found = cursor.peek_char().ok_or(JsonError::UnclosedString { offset: opened })?;
      Err(JsonError::InvalidUnicodeEscape { found, valid_digits, offset })
    }
  }
}

fn read_unicode_escape(
  cursor: &mut Cursor<'_>,
  opened: usize,
  string: &mut String,
) -> Result<(), JsonError> {
  let offset = cursor.position();
  let unit = read_utf16_unit(cursor, opened)?;

  let char = if HIGH_SURROGATES.contains(&unit) {
    /*
      Characters outside the Basic Multilingual Plane are escaped as their UTF-16 surrogate pair,
      so the low surrogate must immediately follow. An unpaired surrogate can't be represented
      within a `String`, so it's an error.
    */
    match (cursor.peek(0), cursor.peek(1)) {
      (Some(b'\\'), Some(b'u')) => {}
      (None, _) | (Some(b'\\'), None) => Err(JsonError::UnclosedString { offset: opened })?,
      _ => Err(JsonError::UnpairedSurrogate { unit, offset })?,
    }
    let low = read_utf16_unit(cursor, opened)?;
    combine_surrogates(unit, low).ok_or(JsonError::UnpairedSurrogate { unit, offset })?
  } else {
    // Lone low surrogates are the only code units which aren't characters by themselves
    char::from_u32(u32::from(unit)).ok_or(JsonError::UnpairedSurrogate { unit, offset })?
  };
  string.push(char);
  Ok(())
}

#[cfg(test)]
fn read(text: &str, unexpected_escape: UnexpectedEscape) -> Result<(String, usize), JsonError> {
  let mut cursor = Cursor::new(text);
  let string = read_string(&mut cursor, unexpected_escape)?;
  Ok((string, cursor.position()))
}

#[test]
fn test_read_string() {
  let error = UnexpectedEscape::Error;
  assert_eq!(read(r#""abc" tail"#, error).unwrap(), ("abc".into(), 5));
  assert_eq!(read(r#""""#, error).unwrap(), (String::new(), 2));
  assert_eq!(
    read(r#""a\"b\\c\/d\b\f\n\r\t""#, error).unwrap().0,
    "a\"b\\c/d\x08\x0c\n\r\t"
  );
  assert_eq!(read("\"caf\u{e9} \u{1F600}\"", error).unwrap().0, "caf\u{e9} \u{1F600}");
  assert_eq!(read(r#""\u00e9\u20AC""#, error).unwrap().0, "\u{e9}\u{20ac}");
  assert_eq!(read(r#""\ud83d\ude00x""#, error).unwrap().0, "\u{1F600}x");
}

#[test]
fn test_read_string_errors() {
  let error = UnexpectedEscape::Error;
  assert_eq!(read("\"abc", error).unwrap_err(), JsonError::UnclosedString { offset: 0 });
  assert_eq!(read("\"abc\\", error).unwrap_err(), JsonError::UnclosedString { offset: 0 });
  assert_eq!(read("\"\\u00", error).unwrap_err(), JsonError::UnclosedString { offset: 0 });
  assert_eq!(read("\"\\ud83d", error).unwrap_err(), JsonError::UnclosedString { offset: 0 });
  assert_eq!(read("\"\\ud83d\\", error).unwrap_err(), JsonError::UnclosedString { offset: 0 });
  assert_eq!(read("\"\\ud83d\\ude", error).unwrap_err(), JsonError::UnclosedString { offset: 0 });
  assert!(read("\"\\ud83d\\ude", error).unwrap_err().is_incomplete());

  assert_eq!(
    read("\"a\nb\"", error).unwrap_err(),
    JsonError::ControlCharacter { byte: b'\n', offset: 2 }
  );
  assert_eq!(
    read(r#""\u0g00""#, error).unwrap_err(),
    JsonError::InvalidUnicodeEscape { found: 'g', valid_digits: 1, offset: 1 }
  );
  assert_eq!(
    read("\"\\u12\u{e9}0\"", error).unwrap_err(),
    JsonError::InvalidUnicodeEscape { found: '\u{e9}', valid_digits: 2, offset: 1 }
  );
  assert_eq!(
    read(r#""\ud83dx""#, error).unwrap_err(),
    JsonError::UnpairedSurrogate { unit: 0xd83d, offset: 1 }
  );
  assert_eq!(
    read(r#""\ud83d\u0041""#, error).unwrap_err(),
    JsonError::UnpairedSurrogate { unit: 0xd83d, offset: 1 }
  );
  assert_eq!(
    read(r#""a\ude00""#, error).unwrap_err(),
    JsonError::UnpairedSurrogate { unit: 0xde00, offset: 2 }
  );
  assert_eq!(
    read(r#""\q""#, error).unwrap_err(),
    JsonError::InvalidEscape { escaped: 'q', offset: 1 }
  );
}

#[test]
fn test_unexpected_escapes() {
  assert_eq!(read(r#""a\qb""#, UnexpectedEscape::Skip).unwrap().0, "ab");
  assert_eq!(read(r#""a\qb""#, UnexpectedEscape::Keep).unwrap().0, "aqb");
  assert_eq!(read("\"a\\\u{e9}b\"", UnexpectedEscape::Skip).unwrap().0, "ab");
  assert_eq!(read("\"a\\\u{e9}b\"", UnexpectedEscape::Keep).unwrap().0, "a\u{e9}b");
  // Only unexpected escapes are affected
  assert_eq!(read(r#""\n\q""#, UnexpectedEscape::Keep).unwrap().0, "\nq");
}

#[test]
fn test_unexpected_escape_warnings() {
  use std::sync::{Arc, Mutex};

  #[derive(Clone, Default)]
  struct Captured(Arc<Mutex<Vec<u8>>>);
  impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  let captured = Captured::default();
  let writer = captured.clone();
  let subscriber = tracing_subscriber::fmt().with_writer(move || writer.clone()).finish();
  tracing::subscriber::with_default(subscriber, || {
    read(r#""\q""#, UnexpectedEscape::Skip).unwrap();
    read(r#""ok\z""#, UnexpectedEscape::Keep).unwrap();
    read(r#""\n""#, UnexpectedEscape::Keep).unwrap();
  });

  let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
  let lines = logs.lines().collect::<Vec<_>>();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].contains("WARN"));
  assert!(lines[0].contains("skipping unexpected escaped character"));
  assert!(lines[0].contains("escaped=q"));
  assert!(lines[0].contains("offset=1"));
  assert!(lines[1].contains("keeping unexpected escaped character"));
  assert!(lines[1].contains("escaped=z"));
  assert!(lines[1].contains("offset=3"));
}
