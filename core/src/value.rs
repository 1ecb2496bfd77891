use core::fmt;

use alloc::{string::String, vec, vec::Vec};

use crate::EncodeError;

/// The amount of elements an array is allocated for before it first has to grow.
const START_CAPACITY: usize = 10;

/// The type of a value.
///
/// https://datatracker.ietf.org/doc/html/rfc8259#section-3 defines all possible values, to which
/// we add the caller-domain notion of a missing value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Type {
  /// An object.
  Object,
  /// An array, whether generic or a collapsed [`Sequence`].
  Array,
  /// A string.
  String,
  /// A RFC-8259 number.
  Number,
  /// A boolean.
  Bool,
  /// The `null` unit value.
  Null,
  /// A missing value, which has no JSON representation of its own.
  Missing,
}

impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Type::Object => "object",
      Type::Array => "array",
      Type::String => "string",
      Type::Number => "number",
      Type::Bool => "boolean",
      Type::Null => "null",
      Type::Missing => "missing",
    })
  }
}

/// A compact array of scalars which all share a kind.
///
/// This is semantically equivalent to an [`Value::Array`] of the same scalars, and compares equal
/// to one.
#[derive(Clone, Debug)]
pub enum Sequence {
  /// A sequence of booleans.
  Bool(Vec<bool>),
  /// A sequence of numbers.
  Number(Vec<f64>),
  /// A sequence of strings.
  Text(Vec<String>),
}

impl Sequence {
  /// The amount of elements within this sequence.
  pub fn len(&self) -> usize {
    match self {
      Sequence::Bool(items) => items.len(),
      Sequence::Number(items) => items.len(),
      Sequence::Text(items) => items.len(),
    }
  }

  /// If this sequence is empty.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The type of the elements within this sequence.
  pub fn element_kind(&self) -> Type {
    match self {
      Sequence::Bool(_) => Type::Bool,
      Sequence::Number(_) => Type::Number,
      Sequence::Text(_) => Type::String,
    }
  }

  /// Get the element at index `i` as a standalone value.
  pub fn get(&self, i: usize) -> Option<Value> {
    Some(match self {
      Sequence::Bool(items) => Value::Bool(*items.get(i)?),
      Sequence::Number(items) => Value::Number(*items.get(i)?),
      Sequence::Text(items) => Value::Text(items.get(i)?.clone()),
    })
  }

  /// Convert this sequence into tagged values.
  pub fn into_values(self) -> Vec<Value> {
    match self {
      Sequence::Bool(items) => items.into_iter().map(Value::Bool).collect(),
      Sequence::Number(items) => items.into_iter().map(Value::Number).collect(),
      Sequence::Text(items) => items.into_iter().map(Value::Text).collect(),
    }
  }

  #[allow(clippy::float_cmp)]
  fn eq_values(&self, values: &[Value]) -> bool {
    (self.len() == values.len()) &&
      match self {
        Sequence::Bool(items) => {
          items.iter().zip(values).all(|(a, b)| matches!(b, Value::Bool(b) if a == b))
        }
        Sequence::Number(items) => {
          items.iter().zip(values).all(|(a, b)| matches!(b, Value::Number(b) if a == b))
        }
        Sequence::Text(items) => {
          items.iter().zip(values).all(|(a, b)| matches!(b, Value::Text(b) if a == b))
        }
      }
  }
}

impl PartialEq for Sequence {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Sequence::Bool(a), Sequence::Bool(b)) => a == b,
      (Sequence::Number(a), Sequence::Number(b)) => a == b,
      (Sequence::Text(a), Sequence::Text(b)) => a == b,
      // Differently-typed sequences are only equivalent when there's nothing within them
      _ => self.is_empty() && other.is_empty(),
    }
  }
}

/// A JSON value.
///
/// Values are built once, by [`decode`](crate::decode) or by the caller, and own everything
/// within them.
#[derive(Clone, Debug)]
pub enum Value {
  /// `null`.
  Null,
  /// `true` or `false`.
  Bool(bool),
  /// A number.
  ///
  /// JSON only has one numeric type, so integers and floats are not distinguished.
  Number(f64),
  /// A string, with its escape sequences already decoded.
  Text(String),
  /// An array of arbitrary values.
  Array(Vec<Value>),
  /// An object's members, in the order they were first seen.
  ///
  /// Keys are not required to be unique. If a key is present multiple times, every instance is
  /// preserved.
  Object(Vec<(String, Value)>),
  /// An array whose elements are all scalars of the same kind.
  Sequence(Sequence),
  /// A value the caller knows is missing.
  ///
  /// This is never produced when decoding. It's encoded as the string `"NA"`.
  Missing,
}

impl Value {
  /// The type of this value.
  pub fn kind(&self) -> Type {
    match self {
      Value::Null => Type::Null,
      Value::Bool(_) => Type::Bool,
      Value::Number(_) => Type::Number,
      Value::Text(_) => Type::String,
      Value::Array(_) | Value::Sequence(_) => Type::Array,
      Value::Object(_) => Type::Object,
      Value::Missing => Type::Missing,
    }
  }

  /// If this value is `null`.
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// This value as a `bool`, if it is one.
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as an `f64`, if it's a number.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Number(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as a `str`, if it's a string.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Text(value) => Some(value),
      _ => None,
    }
  }

  /// The members of this value, if it's an object.
  pub fn as_object(&self) -> Option<&[(String, Value)]> {
    match self {
      Value::Object(members) => Some(members),
      _ => None,
    }
  }

  /// The amount of elements (or members) within this value, if it's an array or an object.
  pub fn len(&self) -> Option<usize> {
    match self {
      Value::Array(values) => Some(values.len()),
      Value::Sequence(sequence) => Some(sequence.len()),
      Value::Object(members) => Some(members.len()),
      _ => None,
    }
  }

  /// Get the value for `key`, if this is an object with such a key.
  ///
  /// If the key is present multiple times, the first instance is returned.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.as_object()?.iter().find(|(k, _)| k == key).map(|(_, value)| value)
  }

  /// Get the element at index `i`, if this is an array with such an element.
  ///
  /// Elements of a [`Sequence`] don't exist as standalone values, so this returns an owned copy.
  pub fn element(&self, i: usize) -> Option<Value> {
    match self {
      Value::Array(values) => values.get(i).cloned(),
      Value::Sequence(sequence) => sequence.get(i),
      _ => None,
    }
  }

  /// Convert a [`Value::Sequence`] into a [`Value::Array`], leaving all other values as-is.
  pub fn into_generic(self) -> Value {
    match self {
      Value::Sequence(sequence) => Value::Array(sequence.into_values()),
      value => value,
    }
  }

  /// Build an array from its elements.
  ///
  /// If `collapse` is set and the elements are all scalars of one kind, the result is a
  /// [`Value::Sequence`].
  pub fn from_elements(elements: Vec<Value>, collapse: bool) -> Value {
    let mut elements = elements.into_iter();
    let Some(first) = elements.next() else { return Value::Array(vec![]) };
    let mut builder = ArrayBuilder::new(first, collapse);
    for element in elements {
      builder.push(element);
    }
    builder.finish()
  }

  /// Build an object from a column of keys and a column of values.
  pub fn from_columns(keys: Vec<String>, values: Vec<Value>) -> Result<Value, EncodeError> {
    if keys.len() != values.len() {
      Err(EncodeError::KeyCountMismatch { keys: keys.len(), values: values.len() })?;
    }
    Ok(Value::Object(keys.into_iter().zip(values).collect()))
  }
}

impl PartialEq for Value {
  #[allow(clippy::float_cmp)]
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Null, Value::Null) | (Value::Missing, Value::Missing) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::Text(a), Value::Text(b)) => a == b,
      (Value::Array(a), Value::Array(b)) => a == b,
      (Value::Object(a), Value::Object(b)) => a == b,
      (Value::Sequence(a), Value::Sequence(b)) => a == b,
      (Value::Array(values), Value::Sequence(sequence)) |
      (Value::Sequence(sequence), Value::Array(values)) => sequence.eq_values(values),
      _ => false,
    }
  }
}

impl fmt::Display for Value {
  /// Write this value as compact JSON, or indented by two spaces with the alternate flag (`{:#}`).
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent_width = if f.alternate() { 2 } else { 0 };
    f.write_str(&crate::encode(self, indent_width))
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}
impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Number(value)
  }
}
impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Text(value.into())
  }
}
impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::Text(value)
  }
}
impl From<Vec<Value>> for Value {
  fn from(values: Vec<Value>) -> Self {
    Value::Array(values)
  }
}
impl From<Sequence> for Value {
  fn from(sequence: Sequence) -> Self {
    Value::Sequence(sequence)
  }
}

/// An array under construction.
///
/// While every element seen so far is a scalar of the same kind, elements are accumulated in
/// their compact form. The first element which doesn't fit converts the accumulated elements to
/// tagged values, after which accumulation continues generically. This conversion happens at most
/// once per array.
#[derive(Debug)]
pub(crate) enum ArrayBuilder {
  Typed(Sequence),
  Generic(Vec<Value>),
}

impl ArrayBuilder {
  /// Start an array with its first element.
  pub(crate) fn new(first: Value, collapse: bool) -> Self {
    fn with_first<T>(first: T) -> Vec<T> {
      let mut items = Vec::with_capacity(START_CAPACITY);
      items.push(first);
      items
    }

    if !collapse {
      return ArrayBuilder::Generic(with_first(first));
    }
    match first {
      Value::Bool(value) => ArrayBuilder::Typed(Sequence::Bool(with_first(value))),
      Value::Number(value) => ArrayBuilder::Typed(Sequence::Number(with_first(value))),
      Value::Text(value) => ArrayBuilder::Typed(Sequence::Text(with_first(value))),
      value => ArrayBuilder::Generic(with_first(value)),
    }
  }

  pub(crate) fn push(&mut self, value: Value) {
    let value = match (&mut *self, value) {
      (ArrayBuilder::Generic(values), value) => {
        values.push(value);
        return;
      }
      (ArrayBuilder::Typed(Sequence::Bool(items)), Value::Bool(value)) => {
        items.push(value);
        return;
      }
      (ArrayBuilder::Typed(Sequence::Number(items)), Value::Number(value)) => {
        items.push(value);
        return;
      }
      (ArrayBuilder::Typed(Sequence::Text(items)), Value::Text(value)) => {
        items.push(value);
        return;
      }
      (ArrayBuilder::Typed(_), value) => value,
    };

    // This element doesn't share the sequence's kind, so fall back to tagged values
    let mut values = match core::mem::replace(self, ArrayBuilder::Generic(Vec::new())) {
      ArrayBuilder::Typed(sequence) => sequence.into_values(),
      ArrayBuilder::Generic(values) => values,
    };
    values.push(value);
    *self = ArrayBuilder::Generic(values);
  }

  pub(crate) fn finish(self) -> Value {
    match self {
      ArrayBuilder::Typed(sequence) => Value::Sequence(sequence),
      ArrayBuilder::Generic(values) => Value::Array(values),
    }
  }
}

#[test]
fn array_builder_collapses() {
  let mut builder = ArrayBuilder::new(Value::Number(1.0), true);
  builder.push(Value::Number(2.0));
  builder.push(Value::Number(3.0));
  let Value::Sequence(Sequence::Number(items)) = builder.finish() else {
    panic!("homogeneous numbers weren't collapsed")
  };
  assert_eq!(items, vec![1.0, 2.0, 3.0]);
}

#[test]
fn array_builder_falls_back_once() {
  let mut builder = ArrayBuilder::new(Value::from("a"), true);
  builder.push(Value::from("b"));
  builder.push(Value::Bool(true));
  assert!(matches!(builder, ArrayBuilder::Generic(_)));
  builder.push(Value::from("c"));
  let Value::Array(values) = builder.finish() else { panic!("mixed kinds were collapsed") };
  assert_eq!(
    values,
    vec![Value::from("a"), Value::from("b"), Value::Bool(true), Value::from("c")]
  );
}

#[test]
fn array_builder_containers_are_generic() {
  let builder = ArrayBuilder::new(Value::Array(vec![]), true);
  assert!(matches!(builder, ArrayBuilder::Generic(_)));
  let builder = ArrayBuilder::new(Value::Null, true);
  assert!(matches!(builder, ArrayBuilder::Generic(_)));
  let builder = ArrayBuilder::new(Value::Number(1.0), false);
  assert!(matches!(builder, ArrayBuilder::Generic(_)));
}

#[test]
fn sequence_equivalence() {
  let sequence = Value::Sequence(Sequence::Number(vec![1.0, 2.0]));
  let array = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
  assert_eq!(sequence, array);
  assert_eq!(array, sequence);
  assert_ne!(sequence, Value::Array(vec![Value::Number(1.0), Value::from("2")]));
  assert_eq!(Value::Sequence(Sequence::Text(vec![])), Value::Sequence(Sequence::Bool(vec![])));
  assert_eq!(Value::Sequence(Sequence::Bool(vec![])), Value::Array(vec![]));
  assert_eq!(sequence.clone().into_generic(), array);
  assert!(matches!(sequence.into_generic(), Value::Array(_)));
}

#[test]
fn accessors() {
  let object = Value::Object(vec![
    ("a".into(), Value::Number(1.0)),
    ("b".into(), Value::Sequence(Sequence::Text(vec!["x".into(), "y".into()]))),
    ("a".into(), Value::Number(2.0)),
  ]);
  assert_eq!(object.kind(), Type::Object);
  assert_eq!(object.len(), Some(3));
  assert_eq!(object.get("a").and_then(Value::as_f64), Some(1.0));
  assert!(object.get("c").is_none());
  let b = object.get("b").unwrap();
  assert_eq!(b.kind(), Type::Array);
  assert_eq!(b.element(1), Some(Value::from("y")));
  assert_eq!(b.element(2), None);
  assert_eq!(Value::Null.len(), None);
  assert!(Value::Null.is_null());
  assert_eq!(Value::Missing.kind(), Type::Missing);
}

#[test]
fn from_columns() {
  let object =
    Value::from_columns(vec!["x".into(), "y".into()], vec![Value::Null, Value::Bool(false)])
      .unwrap();
  assert_eq!(object.get("y"), Some(&Value::Bool(false)));
  assert_eq!(
    Value::from_columns(vec!["x".into()], vec![]).unwrap_err(),
    EncodeError::KeyCountMismatch { keys: 1, values: 0 }
  );
}

#[test]
fn from_elements() {
  assert_eq!(Value::from_elements(vec![], true), Value::Array(vec![]));
  assert!(matches!(
    Value::from_elements(vec![Value::Bool(true), Value::Bool(false)], true),
    Value::Sequence(Sequence::Bool(_))
  ));
  assert!(matches!(
    Value::from_elements(vec![Value::Bool(true), Value::Bool(false)], false),
    Value::Array(_)
  ));
}
