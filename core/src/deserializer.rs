use alloc::{vec, vec::Vec};

use crate::{
  io::Cursor,
  string::read_string,
  number::read_number,
  value::ArrayBuilder,
  ParseOptions, JsonError, Value,
};

/// What was found after an item within an array or object.
enum AfterItem {
  /// A comma, followed by another item.
  Comma,
  /// The close of the structure.
  Closed,
}

/// A recursive-descent deserializer for a single JSON document.
pub(crate) struct Deserializer<'text, 'options> {
  cursor: Cursor<'text>,
  options: &'options ParseOptions,
  /// The amount of currently open arrays and objects.
  depth: usize,
}

impl<'text, 'options> Deserializer<'text, 'options> {
  /// Create a deserializer for the document starting at `position` within `text`.
  pub(crate) fn new(text: &'text str, position: usize, options: &'options ParseOptions) -> Self {
    let mut cursor = Cursor::new(text);
    cursor.advance(position);
    Self { cursor, options, depth: 0 }
  }

  /// If only whitespace remains.
  pub(crate) fn at_end(&mut self) -> bool {
    self.cursor.skip_whitespace().is_none()
  }

  /// Decode the document, returning it with the offset of the first byte after it.
  pub(crate) fn document(mut self) -> Result<(Value, usize), JsonError> {
    let value = self.value()?;
    Ok((value, self.cursor.position()))
  }

  /// The character at the current position, for error reporting.
  fn found(&self) -> char {
    self.cursor.peek_char().unwrap_or(char::REPLACEMENT_CHARACTER)
  }

  fn unexpected(&self) -> JsonError {
    JsonError::UnexpectedCharacter { character: self.found(), offset: self.cursor.position() }
  }

  /// Read the value at the current position, after any whitespace.
  ///
  /// This returns `JsonError::NoData` if there is no value, which containers must translate to
  /// their own error.
  fn value(&mut self) -> Result<Value, JsonError> {
    let Some(next) = self.cursor.skip_whitespace() else { Err(JsonError::NoData)? };
    Ok(match next {
      b'{' => self.object()?,
      b'[' => self.array()?,
      b'"' => Value::Text(read_string(&mut self.cursor, self.options.unexpected_escape)?),
      b'-' | b'0' ..= b'9' => Value::Number(read_number(&mut self.cursor)?),
      b't' => self.literal("true", Value::Bool(true))?,
      b'f' => self.literal("false", Value::Bool(false))?,
      b'n' => self.literal("null", Value::Null)?,
      _ => Err(self.unexpected())?,
    })
  }

  /// Read a literal, by comparing the remaining input against it.
  fn literal(&mut self, literal: &'static str, value: Value) -> Result<Value, JsonError> {
    let offset = self.cursor.position();
    let remaining = self.cursor.remaining();
    if remaining.starts_with(literal.as_bytes()) {
      self.cursor.advance(literal.len());
      return Ok(value);
    }
    // If the input ended while still matching the literal, more input may complete it
    if literal.as_bytes().starts_with(remaining) {
      Err(JsonError::TruncatedLiteral { literal, offset })?;
    }
    Err(JsonError::InvalidLiteral { literal, offset })
  }

  /// Open an array or object, enforcing the depth limit.
  fn open(&mut self) -> Result<usize, JsonError> {
    let opened = self.cursor.position();
    self.depth += 1;
    if let Some(limit) = self.options.max_depth &&
      (self.depth > limit)
    {
      Err(JsonError::TooDeep { limit, offset: opened })?;
    }
    self.cursor.advance(1);
    Ok(opened)
  }

  /// Advance past the `closer` of a structure if it immediately follows, returning if it did.
  fn advance_past_immediate_close(
    &mut self,
    closer: u8,
    incomplete: JsonError,
  ) -> Result<bool, JsonError> {
    match self.cursor.skip_whitespace() {
      None => Err(incomplete),
      Some(next) if next == closer => {
        self.cursor.advance(1);
        self.depth -= 1;
        Ok(true)
      }
      Some(_) => Ok(false),
    }
  }

  /// Advance past a comma, or past the close of the structure.
  fn advance_past_comma_or_close(
    &mut self,
    closer: u8,
    incomplete: JsonError,
  ) -> Result<AfterItem, JsonError> {
    match self.cursor.skip_whitespace() {
      None => Err(incomplete),
      Some(b',') => {
        let comma = self.cursor.position();
        self.cursor.advance(1);
        match self.cursor.skip_whitespace() {
          None => Err(incomplete),
          Some(next) if next == closer => Err(JsonError::TrailingComma { offset: comma }),
          Some(_) => Ok(AfterItem::Comma),
        }
      }
      Some(next) if next == closer => {
        self.cursor.advance(1);
        self.depth -= 1;
        Ok(AfterItem::Closed)
      }
      Some(_) => Err(self.unexpected()),
    }
  }

  /// Read a value within a structure, where the end of the input means the structure is
  /// incomplete.
  fn item(&mut self, incomplete: JsonError) -> Result<Value, JsonError> {
    match self.value() {
      Err(JsonError::NoData) => Err(incomplete),
      res => res,
    }
  }

  fn array(&mut self) -> Result<Value, JsonError> {
    let opened = self.open()?;
    let incomplete = JsonError::IncompleteArray { offset: opened };
    if self.advance_past_immediate_close(b']', incomplete)? {
      return Ok(Value::Array(vec![]));
    }

    let mut builder =
      ArrayBuilder::new(self.item(incomplete)?, self.options.collapse_homogeneous_arrays);
    while let AfterItem::Comma = self.advance_past_comma_or_close(b']', incomplete)? {
      builder.push(self.item(incomplete)?);
    }
    Ok(builder.finish())
  }

  /// Advance past the `:` separating a key from its value.
  fn advance_past_colon(&mut self, incomplete: JsonError) -> Result<(), JsonError> {
    match self.cursor.skip_whitespace() {
      None => Err(incomplete),
      Some(b':') => {
        self.cursor.advance(1);
        Ok(())
      }
      Some(_) => {
        Err(JsonError::MissingColon { character: self.found(), offset: self.cursor.position() })
      }
    }
  }

  fn object(&mut self) -> Result<Value, JsonError> {
    let opened = self.open()?;
    let incomplete = JsonError::IncompleteObject { offset: opened };
    let mut members = Vec::new();
    if self.advance_past_immediate_close(b'}', incomplete)? {
      return Ok(Value::Object(members));
    }

    loop {
      // `advance_past_immediate_close`, `advance_past_comma_or_close` leave us at the next key
      if self.cursor.peek(0) != Some(b'"') {
        Err(JsonError::InvalidKey { character: self.found(), offset: self.cursor.position() })?;
      }
      let key = read_string(&mut self.cursor, self.options.unexpected_escape)?;
      self.advance_past_colon(incomplete)?;
      let value = self.item(incomplete)?;
      members.push((key, value));

      if let AfterItem::Closed = self.advance_past_comma_or_close(b'}', incomplete)? {
        break;
      }
    }
    Ok(Value::Object(members))
  }
}

#[cfg(test)]
fn decode(text: &str, options: &ParseOptions) -> Result<(Value, usize), JsonError> {
  Deserializer::new(text, 0, options).document()
}

#[test]
fn test_scalars() {
  let options = ParseOptions::default();
  assert_eq!(decode("  true ", &options).unwrap(), (Value::Bool(true), 6));
  assert_eq!(decode("false", &options).unwrap(), (Value::Bool(false), 5));
  assert_eq!(decode("\nnull", &options).unwrap(), (Value::Null, 5));
  assert_eq!(decode(" \"a b\"", &options).unwrap(), (Value::from("a b"), 6));
  assert_eq!(decode("-1.5", &options).unwrap(), (Value::Number(-1.5), 4));
  // Literals are matched by prefix, with the rest of the input left unread
  assert_eq!(decode("trueabc", &options).unwrap(), (Value::Bool(true), 4));
}

#[test]
fn test_literal_errors() {
  let options = ParseOptions::default();
  assert_eq!(
    decode("fals", &options).unwrap_err(),
    JsonError::TruncatedLiteral { literal: "false", offset: 0 }
  );
  assert_eq!(
    decode(" nul", &options).unwrap_err(),
    JsonError::TruncatedLiteral { literal: "null", offset: 1 }
  );
  assert_eq!(
    decode("txyz", &options).unwrap_err(),
    JsonError::InvalidLiteral { literal: "true", offset: 0 }
  );
  assert_eq!(
    decode("nil", &options).unwrap_err(),
    JsonError::InvalidLiteral { literal: "null", offset: 0 }
  );
  assert_eq!(
    decode("  x", &options).unwrap_err(),
    JsonError::UnexpectedCharacter { character: 'x', offset: 2 }
  );
  assert_eq!(
    decode("\u{e9}", &options).unwrap_err(),
    JsonError::UnexpectedCharacter { character: '\u{e9}', offset: 0 }
  );
  assert_eq!(decode(" \t", &options).unwrap_err(), JsonError::NoData);
}

#[test]
fn test_arrays() {
  let options = ParseOptions::default();
  assert_eq!(decode("[]", &options).unwrap(), (Value::Array(vec![]), 2));
  assert_eq!(decode("[ \n ]", &options).unwrap(), (Value::Array(vec![]), 5));
  assert_eq!(
    decode("[1, \"a\" ,[null], {}]x", &options).unwrap(),
    (
      Value::Array(vec![
        Value::Number(1.0),
        Value::from("a"),
        Value::Array(vec![Value::Null]),
        Value::Object(vec![]),
      ]),
      20
    )
  );
  // Collapsing is opt-in
  assert!(matches!(decode("[1, 2]", &options).unwrap().0, Value::Array(_)));

  let collapse = ParseOptions::default().with_collapse_homogeneous_arrays(true);
  assert!(matches!(decode("[]", &collapse).unwrap().0, Value::Array(_)));
  assert!(matches!(
    decode("[true, false]", &collapse).unwrap().0,
    Value::Sequence(crate::Sequence::Bool(_))
  ));
  assert!(matches!(
    decode("[\"a\", \"b\"]", &collapse).unwrap().0,
    Value::Sequence(crate::Sequence::Text(_))
  ));
  assert!(matches!(decode("[null, null]", &collapse).unwrap().0, Value::Array(_)));
  let (nested, _) = decode("[[1, 2], [true]]", &collapse).unwrap();
  assert!(matches!(nested.element(0), Some(Value::Sequence(crate::Sequence::Number(_)))));
}

#[test]
fn test_array_errors() {
  let options = ParseOptions::default();
  assert_eq!(decode("[", &options).unwrap_err(), JsonError::IncompleteArray { offset: 0 });
  assert_eq!(decode(" [1,", &options).unwrap_err(), JsonError::IncompleteArray { offset: 1 });
  assert_eq!(decode("[1 ", &options).unwrap_err(), JsonError::IncompleteArray { offset: 0 });
  assert_eq!(decode("[[1]", &options).unwrap_err(), JsonError::IncompleteArray { offset: 0 });
  assert_eq!(decode("[1,]", &options).unwrap_err(), JsonError::TrailingComma { offset: 2 });
  assert_eq!(
    decode("[1 2]", &options).unwrap_err(),
    JsonError::UnexpectedCharacter { character: '2', offset: 3 }
  );
  assert_eq!(
    decode("[1}", &options).unwrap_err(),
    JsonError::UnexpectedCharacter { character: '}', offset: 2 }
  );
  assert_eq!(
    decode("[,1]", &options).unwrap_err(),
    JsonError::UnexpectedCharacter { character: ',', offset: 1 }
  );
}

#[test]
fn test_objects() {
  let options = ParseOptions::default();
  assert_eq!(decode("{}", &options).unwrap(), (Value::Object(vec![]), 2));
  let (object, consumed) =
    decode(r#"{ "b" : 1, "a":[true] , "b": {"c": null} } tail"#, &options).unwrap();
  assert_eq!(consumed, 42);
  assert_eq!(
    object,
    Value::Object(vec![
      ("b".into(), Value::Number(1.0)),
      ("a".into(), Value::Array(vec![Value::Bool(true)])),
      ("b".into(), Value::Object(vec![("c".into(), Value::Null)])),
    ])
  );
  // Duplicate keys are preserved in order
  assert_eq!(object.get("b"), Some(&Value::Number(1.0)));
}

#[test]
fn test_object_errors() {
  let options = ParseOptions::default();
  assert_eq!(decode("{", &options).unwrap_err(), JsonError::IncompleteObject { offset: 0 });
  assert_eq!(decode("{\"a\"", &options).unwrap_err(), JsonError::IncompleteObject { offset: 0 });
  assert_eq!(
    decode("{\"a\": ", &options).unwrap_err(),
    JsonError::IncompleteObject { offset: 0 }
  );
  assert_eq!(
    decode("{\"a\": 1,", &options).unwrap_err(),
    JsonError::IncompleteObject { offset: 0 }
  );
  assert_eq!(decode("{\"a", &options).unwrap_err(), JsonError::UnclosedString { offset: 1 });
  assert_eq!(
    decode("{\"a\": 1,}", &options).unwrap_err(),
    JsonError::TrailingComma { offset: 7 }
  );
  assert_eq!(
    decode("{a: 1}", &options).unwrap_err(),
    JsonError::InvalidKey { character: 'a', offset: 1 }
  );
  assert_eq!(
    decode("{\"a\": 1, 2: 3}", &options).unwrap_err(),
    JsonError::InvalidKey { character: '2', offset: 9 }
  );
  assert_eq!(
    decode("{\"a\" 1}", &options).unwrap_err(),
    JsonError::MissingColon { character: '1', offset: 5 }
  );
  assert_eq!(
    decode("{\"a\": 1]", &options).unwrap_err(),
    JsonError::UnexpectedCharacter { character: ']', offset: 7 }
  );
}

#[test]
fn test_max_depth() {
  let options = ParseOptions::default().with_max_depth(2);
  assert!(decode("[[1], {\"a\": 1}]", &options).is_ok());
  assert_eq!(
    decode("[[1], {\"a\": []}]", &options).unwrap_err(),
    JsonError::TooDeep { limit: 2, offset: 12 }
  );
  assert_eq!(
    decode("[[[1]]]", &options).unwrap_err(),
    JsonError::TooDeep { limit: 2, offset: 2 }
  );
  assert_eq!(
    decode("{\"a\": {\"b\": {}}}", &options).unwrap_err(),
    JsonError::TooDeep { limit: 2, offset: 12 }
  );
  // Depth is released when containers close
  assert!(decode("[[1], [2], [[]]]", &ParseOptions::default().with_max_depth(3)).is_ok());

  let scalars_only = ParseOptions::default().with_max_depth(0);
  assert!(decode("1", &scalars_only).is_ok());
  assert_eq!(decode("[]", &scalars_only).unwrap_err(), JsonError::TooDeep { limit: 0, offset: 0 });

  let deep = "[".repeat(10_000);
  assert_eq!(
    decode(&deep, &ParseOptions::default().with_max_depth(64)).unwrap_err(),
    JsonError::TooDeep { limit: 64, offset: 64 }
  );
}

#[test]
fn test_default_depth_fits_thread_stack() {
  use crate::DEFAULT_MAX_DEPTH;

  // Spawned threads, including test threads, have 2 MiB stacks
  let decoded = std::thread::Builder::new()
    .stack_size(2 * 1024 * 1024)
    .spawn(|| {
      let options = ParseOptions::default();
      let nested = |depth: usize| "[".repeat(depth) + &"]".repeat(depth);
      let (_, consumed) = decode(&nested(DEFAULT_MAX_DEPTH), &options).unwrap();
      assert_eq!(consumed, 2 * DEFAULT_MAX_DEPTH);
      let object = "{\"a\":".repeat(DEFAULT_MAX_DEPTH) + "null" + &"}".repeat(DEFAULT_MAX_DEPTH);
      assert!(decode(&object, &options).is_ok());
      (decode(&nested(DEFAULT_MAX_DEPTH + 1), &options), decode(&nested(100_000), &options))
    })
    .unwrap()
    .join()
    .unwrap();
  assert_eq!(
    decoded.0,
    Err(JsonError::TooDeep { limit: DEFAULT_MAX_DEPTH, offset: DEFAULT_MAX_DEPTH })
  );
  assert_eq!(
    decoded.1,
    Err(JsonError::TooDeep { limit: DEFAULT_MAX_DEPTH, offset: DEFAULT_MAX_DEPTH })
  );
}
