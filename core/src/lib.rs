#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

use core::fmt;

mod io;
mod options;
mod value;
mod string;
mod number;
mod deserializer;
mod serializer;

pub use options::{UnexpectedEscape, UnknownEscapeMode, ParseOptions, DEFAULT_MAX_DEPTH};
pub use value::{Type, Sequence, Value};
pub use number::MAX_NUMBER_LENGTH;
pub use string::{escape_str, escape_bytes};
pub use serializer::{encode, encode_into};
use deserializer::Deserializer;

/// The class of a [`JsonError`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
  /// The input violates the JSON grammar. Supplying more bytes won't help.
  Malformed,
  /// The input ended mid-token. Supplying additional trailing bytes and decoding again from the
  /// start may succeed.
  Incomplete,
}

/// The part of a number a digit was expected within.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NumberPart {
  /// The integer part, before any `.`.
  Integer,
  /// The fractional part, after the `.`.
  Fraction,
  /// The exponent, after the `e` and its optional sign.
  Exponent,
}

impl fmt::Display for NumberPart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      NumberPart::Integer => "integer part",
      NumberPart::Fraction => "fractional part",
      NumberPart::Exponent => "exponent",
    })
  }
}

/// An error incurred when decoding.
///
/// All offsets are byte offsets into the text which was decoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JsonError {
  /// An unexpected state was reached during decoding.
  InternalError,
  /// The input was empty or solely whitespace.
  NoData,
  /// A character which can't start (or continue) a value at this position.
  UnexpectedCharacter {
    /// The character.
    character: char,
    /// Where the character was.
    offset: usize,
  },
  /// The input ended within `true`, `false`, or `null`.
  TruncatedLiteral {
    /// The literal which was expected.
    literal: &'static str,
    /// Where the literal started.
    offset: usize,
  },
  /// A value started as if it was `true`, `false`, or `null`, yet wasn't.
  InvalidLiteral {
    /// The literal which was expected.
    literal: &'static str,
    /// Where the literal started.
    offset: usize,
  },
  /// The input ended within a string.
  UnclosedString {
    /// Where the string's opening quote was.
    offset: usize,
  },
  /// A string contained an unescaped control character.
  ControlCharacter {
    /// The control character.
    byte: u8,
    /// Where the control character was.
    offset: usize,
  },
  /// A string contained an escape sequence RFC 8259 doesn't define.
  InvalidEscape {
    /// The character after the backslash.
    escaped: char,
    /// Where the backslash was.
    offset: usize,
  },
  /// A `\u` escape wasn't followed by four hex digits.
  InvalidUnicodeEscape {
    /// The first character which wasn't a hex digit.
    found: char,
    /// The amount of hex digits which preceded it.
    valid_digits: usize,
    /// Where the backslash was.
    offset: usize,
  },
  /// A UTF-16 surrogate which wasn't part of a pair.
  UnpairedSurrogate {
    /// The surrogate.
    unit: u16,
    /// Where the escape sequence for the surrogate started.
    offset: usize,
  },
  /// A number had a leading zero.
  LeadingZero {
    /// Where the number started.
    offset: usize,
  },
  /// A part of a number had no digits.
  MissingDigits {
    /// The part without digits.
    part: NumberPart,
    /// Where the digit was expected.
    offset: usize,
  },
  /// The input ended within a number, where a digit was still required.
  TruncatedNumber {
    /// Where the number started.
    offset: usize,
  },
  /// A number was longer than [`MAX_NUMBER_LENGTH`].
  NumberTooLong {
    /// The length of the number, as far as it was read.
    length: usize,
    /// Where the number started.
    offset: usize,
  },
  /// The input ended within an array.
  IncompleteArray {
    /// Where the array was opened.
    offset: usize,
  },
  /// The input ended within an object.
  IncompleteObject {
    /// Where the object was opened.
    offset: usize,
  },
  /// An array or object had a comma after its last item.
  TrailingComma {
    /// Where the comma was.
    offset: usize,
  },
  /// An object had a key which wasn't a string.
  InvalidKey {
    /// The character found where a key's opening quote was expected.
    character: char,
    /// Where the character was.
    offset: usize,
  },
  /// An object's key wasn't followed by a `:`.
  MissingColon {
    /// The character found where the `:` was expected.
    character: char,
    /// Where the character was.
    offset: usize,
  },
  /// Arrays and objects were nested deeper than [`ParseOptions::max_depth`].
  TooDeep {
    /// The configured limit.
    limit: usize,
    /// Where the container exceeding the limit was opened.
    offset: usize,
  },
  /// The input wasn't valid UTF-8.
  NotUtf8 {
    /// Where the invalid UTF-8 started.
    offset: usize,
  },
  /// The input ended within a UTF-8 sequence.
  TruncatedUtf8 {
    /// Where the truncated sequence started.
    offset: usize,
  },
}

impl JsonError {
  /// If this error is malformed input or incomplete input.
  pub fn kind(&self) -> ErrorKind {
    match self {
      JsonError::NoData |
      JsonError::TruncatedLiteral { .. } |
      JsonError::UnclosedString { .. } |
      JsonError::TruncatedNumber { .. } |
      JsonError::IncompleteArray { .. } |
      JsonError::IncompleteObject { .. } |
      JsonError::TruncatedUtf8 { .. } => ErrorKind::Incomplete,
      _ => ErrorKind::Malformed,
    }
  }

  /// If supplying more input may resolve this error.
  pub fn is_incomplete(&self) -> bool {
    self.kind() == ErrorKind::Incomplete
  }

  /// The byte offset this error is located at, if it has one.
  pub fn offset(&self) -> Option<usize> {
    Some(match *self {
      JsonError::InternalError | JsonError::NoData => None?,
      JsonError::UnexpectedCharacter { offset, .. } |
      JsonError::TruncatedLiteral { offset, .. } |
      JsonError::InvalidLiteral { offset, .. } |
      JsonError::UnclosedString { offset } |
      JsonError::ControlCharacter { offset, .. } |
      JsonError::InvalidEscape { offset, .. } |
      JsonError::InvalidUnicodeEscape { offset, .. } |
      JsonError::UnpairedSurrogate { offset, .. } |
      JsonError::LeadingZero { offset } |
      JsonError::MissingDigits { offset, .. } |
      JsonError::TruncatedNumber { offset } |
      JsonError::NumberTooLong { offset, .. } |
      JsonError::IncompleteArray { offset } |
      JsonError::IncompleteObject { offset } |
      JsonError::TrailingComma { offset } |
      JsonError::InvalidKey { offset, .. } |
      JsonError::MissingColon { offset, .. } |
      JsonError::TooDeep { offset, .. } |
      JsonError::NotUtf8 { offset } |
      JsonError::TruncatedUtf8 { offset } => offset,
    })
  }
}

impl fmt::Display for JsonError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      JsonError::InternalError => write!(f, "an internal error occurred while decoding"),
      JsonError::NoData => write!(f, "no data to parse"),
      JsonError::UnexpectedCharacter { character, offset } => {
        write!(f, "unexpected character '{character}' at offset {offset}")
      }
      JsonError::TruncatedLiteral { literal, offset } => {
        write!(f, "input ended within `{literal}`, started at offset {offset}")
      }
      JsonError::InvalidLiteral { literal, offset } => {
        write!(f, "expected `{literal}` at offset {offset}")
      }
      JsonError::UnclosedString { offset } => {
        write!(f, "unclosed string, opened at offset {offset}")
      }
      JsonError::ControlCharacter { byte, offset } => {
        write!(f, "unescaped control character 0x{byte:02x} within string at offset {offset}")
      }
      JsonError::InvalidEscape { escaped, offset } => {
        write!(f, "unexpected escaped character '\\{escaped}' at offset {offset}")
      }
      JsonError::InvalidUnicodeEscape { found, valid_digits, offset } => write!(
        f,
        "unexpected unicode escaped char '{found}'; 4 hex digits should follow the \\u (found \
         {valid_digits} valid digits) at offset {offset}"
      ),
      JsonError::UnpairedSurrogate { unit, offset } => {
        write!(f, "unpaired UTF-16 surrogate \\u{unit:04x} at offset {offset}")
      }
      JsonError::LeadingZero { offset } => {
        write!(f, "number with a leading zero at offset {offset}")
      }
      JsonError::MissingDigits { part, offset } => {
        write!(f, "expected a digit within the number's {part} at offset {offset}")
      }
      JsonError::TruncatedNumber { offset } => {
        write!(f, "input ended within the number started at offset {offset}")
      }
      JsonError::NumberTooLong { length, offset } => write!(
        f,
        "number at offset {offset} is at least {length} bytes long, exceeding the limit of \
         {MAX_NUMBER_LENGTH}"
      ),
      JsonError::IncompleteArray { offset } => {
        write!(f, "incomplete array, opened at offset {offset}")
      }
      JsonError::IncompleteObject { offset } => {
        write!(f, "incomplete object, opened at offset {offset}")
      }
      JsonError::TrailingComma { offset } => write!(f, "trailing comma at offset {offset}"),
      JsonError::InvalidKey { character, offset } => {
        write!(f, "expected a string key, found '{character}' at offset {offset}")
      }
      JsonError::MissingColon { character, offset } => {
        write!(f, "expected ':' after the key, found '{character}' at offset {offset}")
      }
      JsonError::TooDeep { limit, offset } => {
        write!(f, "nesting exceeds the limit of {limit} at offset {offset}")
      }
      JsonError::NotUtf8 { offset } => write!(f, "invalid UTF-8 at offset {offset}"),
      JsonError::TruncatedUtf8 { offset } => {
        write!(f, "input ended within the UTF-8 sequence at offset {offset}")
      }
    }
  }
}

impl core::error::Error for JsonError {}

/// An error incurred when encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EncodeError {
  /// The bytes to encode as a string weren't valid UTF-8.
  InvalidUtf8 {
    /// Where the invalid UTF-8 started.
    offset: usize,
  },
  /// An object was described with differing amounts of keys and values.
  KeyCountMismatch {
    /// The amount of keys.
    keys: usize,
    /// The amount of values.
    values: usize,
  },
}

impl fmt::Display for EncodeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EncodeError::InvalidUtf8 { offset } => {
        write!(f, "unable to escape string with invalid UTF-8 at byte {offset}")
      }
      EncodeError::KeyCountMismatch { keys, values } => {
        write!(f, "object has {keys} keys yet {values} values")
      }
    }
  }
}

impl core::error::Error for EncodeError {}

/// Decode the JSON value at the start of `text`.
///
/// Leading whitespace is skipped. The text after the value is not read, and may be anything.
/// Alongside the value, this returns the offset of the first byte after the value, allowing the
/// caller to decode concatenated documents (as [`decode_all`] does).
pub fn decode(text: &str, options: &ParseOptions) -> Result<(Value, usize), JsonError> {
  Deserializer::new(text, 0, options).document()
}

/// Decode the JSON value at the start of `bytes`.
///
/// This is [`decode`] for input not yet known to be UTF-8. Invalid UTF-8 is only an error if it
/// has to be read to decode the value.
pub fn decode_bytes(bytes: &[u8], options: &ParseOptions) -> Result<(Value, usize), JsonError> {
  let utf8_error = match core::str::from_utf8(bytes) {
    Ok(text) => return decode(text, options),
    Err(e) => e,
  };

  let valid = utf8_error.valid_up_to();
  let text = core::str::from_utf8(&bytes[.. valid])
    .map_err(|e| JsonError::NotUtf8 { offset: e.valid_up_to() })?;
  match decode(text, options) {
    // The value ended within the valid prefix, or was malformed within it
    Ok(decoded) => Ok(decoded),
    Err(e) if !e.is_incomplete() => Err(e),
    // The value needed to read the invalid UTF-8
    Err(_) => Err(match utf8_error.error_len() {
      None => JsonError::TruncatedUtf8 { offset: valid },
      Some(_) => JsonError::NotUtf8 { offset: valid },
    }),
  }
}

/// Decode every JSON value within `text`, where the values are concatenated (optionally with
/// whitespace in between).
pub fn decode_all<'text, 'options>(
  text: &'text str,
  options: &'options ParseOptions,
) -> Documents<'text, 'options> {
  Documents { text, position: 0, options, done: false }
}

/// An iterator over concatenated JSON documents.
///
/// Iteration ends once only whitespace remains, or after the first error.
#[derive(Clone, Debug)]
pub struct Documents<'text, 'options> {
  text: &'text str,
  position: usize,
  options: &'options ParseOptions,
  done: bool,
}

impl Documents<'_, '_> {
  /// The offset of the first byte after the last document decoded.
  pub fn position(&self) -> usize {
    self.position
  }
}

impl Iterator for Documents<'_, '_> {
  type Item = Result<Value, JsonError>;
  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      None?;
    }
    let mut deserializer = Deserializer::new(self.text, self.position, self.options);
    if deserializer.at_end() {
      self.done = true;
      None?;
    }
    Some(match deserializer.document() {
      Ok((value, consumed)) => {
        self.position = consumed;
        Ok(value)
      }
      Err(e) => {
        self.done = true;
        Err(e)
      }
    })
  }
}

impl core::iter::FusedIterator for Documents<'_, '_> {}

#[cfg(test)]
fn decode_str(text: &str) -> Result<Value, JsonError> {
  decode(text, &ParseOptions::default()).map(|(value, _)| value)
}

#[test]
fn surrogate_pairs() {
  assert_eq!(decode_str(r#""\uD83D\uDE00""#).unwrap(), Value::from("\u{1F600}"));
  assert_eq!("\u{1F600}".len(), 4);
  let err = decode_str(r#""\uD83D""#).unwrap_err();
  assert_eq!(err, JsonError::UnpairedSurrogate { unit: 0xd83d, offset: 1 });
  assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn number_grammar() {
  assert_eq!(decode_str("01").unwrap_err(), JsonError::LeadingZero { offset: 0 });
  assert_eq!(decode_str("1.").unwrap_err(), JsonError::TruncatedNumber { offset: 0 });
  assert_eq!(
    decode_str("1.]").unwrap_err(),
    JsonError::MissingDigits { part: NumberPart::Fraction, offset: 2 }
  );
  assert_eq!(decode_str("1e").unwrap_err(), JsonError::TruncatedNumber { offset: 0 });
  assert_eq!(
    decode_str("1e+x").unwrap_err(),
    JsonError::MissingDigits { part: NumberPart::Exponent, offset: 3 }
  );
  assert_eq!(decode_str("1.5e2").unwrap(), Value::Number(150.0));
  assert_eq!(decode_str("-0").unwrap(), Value::Number(0.0));
}

#[test]
fn incomplete_or_malformed() {
  assert!(decode_str("\"abc").unwrap_err().is_incomplete());
  assert!(decode_str("tru").unwrap_err().is_incomplete());
  assert_eq!(decode_str("txyz").unwrap_err().kind(), ErrorKind::Malformed);
  assert!(decode_str("").unwrap_err().is_incomplete());
  assert!(decode_str("[1, 2").unwrap_err().is_incomplete());
  assert!(decode_str("{\"a\": 1").unwrap_err().is_incomplete());
  assert_eq!(decode_str("[1 2]").unwrap_err().kind(), ErrorKind::Malformed);
}

#[test]
fn collapsing() {
  let options = ParseOptions::default().with_collapse_homogeneous_arrays(true);
  let (value, _) = decode("[1,2,3]", &options).unwrap();
  let Value::Sequence(sequence) = &value else { panic!("homogeneous array wasn't collapsed") };
  assert_eq!(sequence.len(), 3);
  assert_eq!(sequence.element_kind(), Type::Number);

  let (value, _) = decode("[1,\"a\",3]", &options).unwrap();
  let Value::Array(values) = &value else { panic!("heterogeneous array was collapsed") };
  assert_eq!(values.len(), 3);
}

#[test]
fn multiple_documents() {
  let text = "{} {}";
  let (first, consumed) = decode(text, &ParseOptions::default()).unwrap();
  assert_eq!(first, Value::Object(vec![]));
  assert_eq!(consumed, 2);
  let (second, _) = decode(&text[consumed ..], &ParseOptions::default()).unwrap();
  assert_eq!(second, Value::Object(vec![]));

  let options = ParseOptions::default();
  let mut documents = decode_all("1 [true]\n\"x\"  ", &options);
  assert_eq!(documents.next(), Some(Ok(Value::Number(1.0))));
  assert_eq!(documents.next(), Some(Ok(Value::Array(vec![Value::Bool(true)]))));
  assert_eq!(documents.next(), Some(Ok(Value::from("x"))));
  assert_eq!(documents.position(), 12);
  assert_eq!(documents.next(), None);

  let mut documents = decode_all("1 ] 2", &options);
  assert_eq!(documents.next(), Some(Ok(Value::Number(1.0))));
  assert_eq!(
    documents.next(),
    Some(Err(JsonError::UnexpectedCharacter { character: ']', offset: 2 }))
  );
  assert_eq!(documents.next(), None);
}

#[test]
fn bytes() {
  let options = ParseOptions::default();
  assert_eq!(decode_bytes(b"[1]\xff", &options).unwrap(), (Value::Array(vec![1.0.into()]), 3));
  assert_eq!(decode_bytes(b"\"a\xff\"", &options).unwrap_err(), JsonError::NotUtf8 { offset: 2 });
  let err = decode_bytes(b"\"\xe2\x82", &options).unwrap_err();
  assert_eq!(err, JsonError::TruncatedUtf8 { offset: 1 });
  assert!(err.is_incomplete());
  assert_eq!(
    decode_bytes("\"\u{20ac}\"".as_bytes(), &options).unwrap().0,
    Value::from("\u{20ac}")
  );
}

#[test]
fn error_messages() {
  let err = decode_str(r#""\u12x4""#).unwrap_err();
  assert_eq!(err, JsonError::InvalidUnicodeEscape { found: 'x', valid_digits: 2, offset: 1 });
  assert_eq!(
    err.to_string(),
    "unexpected unicode escaped char 'x'; 4 hex digits should follow the \\u (found 2 valid \
     digits) at offset 1"
  );
  assert_eq!(
    decode_str(r#""\q""#).unwrap_err().to_string(),
    "unexpected escaped character '\\q' at offset 1"
  );
  assert_eq!(err.offset(), Some(1));
  assert_eq!(JsonError::NoData.offset(), None);
}
