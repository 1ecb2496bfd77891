use alloc::string::String;

use crate::EncodeError;
use super::unicode::push_utf16_escape;

/// Write `text` as a quoted JSON string.
///
/// The output is pure ASCII: every non-ASCII character is written as its UTF-16 escape sequence
/// (a surrogate pair for characters outside the Basic Multilingual Plane). `"`, `\`, newlines,
/// carriage returns, and tabs use their short escapes, while all other control characters (and
/// DEL) use `\u00XX`.
pub fn escape_str(text: &str, out: &mut String) {
  out.reserve(text.len() + 2);
  out.push('"');
  // Printable ASCII is copied over in runs
  let mut run = 0;
  for (i, char) in text.char_indices() {
    if matches!(char, '\x20' ..= '\x7e') && (char != '"') && (char != '\\') {
      continue;
    }

    out.push_str(&text[run .. i]);
    run = i + char.len_utf8();
    match char {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      _ => {
        let mut units = [0; 2];
        for unit in char.encode_utf16(&mut units) {
          push_utf16_escape(out, *unit);
        }
      }
    }
  }
  out.push_str(&text[run ..]);
  out.push('"');
}

/// Write `bytes`, which must be UTF-8, as a quoted JSON string.
///
/// This is [`escape_str`] for text not yet known to be UTF-8. On error, nothing is written.
pub fn escape_bytes(bytes: &[u8], out: &mut String) -> Result<(), EncodeError> {
  let text = core::str::from_utf8(bytes)
    .map_err(|e| EncodeError::InvalidUtf8 { offset: e.valid_up_to() })?;
  escape_str(text, out);
  Ok(())
}

#[cfg(test)]
fn escaped(text: &str) -> String {
  let mut out = String::new();
  escape_str(text, &mut out);
  out
}

#[test]
fn test_escape_str() {
  assert_eq!(escaped(""), "\"\"");
  assert_eq!(escaped("plain / text"), "\"plain / text\"");
  assert_eq!(escaped("a\"b\\c\u{7}"), "\"a\\\"b\\\\c\\u0007\"");
  assert_eq!(escaped("\n\r\t\x08\x0c\x7f"), "\"\\n\\r\\t\\u0008\\u000c\\u007f\"");
  assert_eq!(escaped("caf\u{e9}"), "\"caf\\u00e9\"");
  assert_eq!(escaped("\u{20ac}1"), "\"\\u20ac1\"");
  assert_eq!(escaped("\u{1F600}!"), "\"\\ud83d\\ude00!\"");
  assert!(escaped("\u{10FFFF}\u{0}\u{80}").is_ascii());
}

#[test]
fn test_escape_bytes() {
  let mut out = String::new();
  escape_bytes("\u{e9}".as_bytes(), &mut out).unwrap();
  assert_eq!(out, "\"\\u00e9\"");

  let mut out = String::new();
  assert_eq!(escape_bytes(b"ab\x80", &mut out), Err(EncodeError::InvalidUtf8 { offset: 2 }));
  assert_eq!(escape_bytes(b"\xc3", &mut out), Err(EncodeError::InvalidUtf8 { offset: 0 }));
  assert_eq!(
    escape_bytes(b"\xed\xa0\x80", &mut out),
    Err(EncodeError::InvalidUtf8 { offset: 0 })
  );
  assert!(out.is_empty());
}
