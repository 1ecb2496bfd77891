#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use core::fmt;

use alloc::string::String;

pub use tagjson::*;

mod primitives;
mod float;
mod string;
mod sequences;
mod maps;
mod option;
mod boxed;

/// An error when converting between a [`Value`] and a Rust type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
  /// The JSON couldn't be decoded.
  Decode(JsonError),
  /// The value was of a different type than expected.
  Type {
    /// The type expected.
    expected: Type,
    /// The type found.
    found: Type,
  },
  /// The number wasn't exactly representable by the type expected.
  OutOfRange,
  /// The array had a different amount of elements than expected.
  Length {
    /// The amount of elements expected.
    expected: usize,
    /// The amount of elements found.
    found: usize,
  },
}

impl From<JsonError> for Error {
  fn from(error: JsonError) -> Self {
    Error::Decode(error)
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::Decode(error) => fmt::Display::fmt(error, f),
      Error::Type { expected, found } => write!(f, "expected {expected}, found {found}"),
      Error::OutOfRange => write!(f, "number isn't representable by the type expected"),
      Error::Length { expected, found } => {
        write!(f, "expected an array of {expected} elements, found {found}")
      }
    }
  }
}

impl core::error::Error for Error {
  fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
    match self {
      Error::Decode(error) => Some(error),
      _ => None,
    }
  }
}

/// The error for a value which isn't of the `expected` type.
pub(crate) fn type_error(expected: Type, value: &Value) -> Error {
  Error::Type { expected, found: value.kind() }
}

/// An item which can be deserialized from a [`Value`].
pub trait JsonDeserialize: Sized {
  /// Convert a [`Value`] into this item.
  fn deserialize(value: &Value) -> Result<Self, Error>;
}

/// An item which can be serialized into a [`Value`].
pub trait JsonSerialize {
  /// Convert this item into a [`Value`].
  fn serialize(&self) -> Value;

  /// Convert a slice of these items into an array.
  ///
  /// Types representable as a [`Sequence`] override this to produce one. This method SHOULD NOT
  /// be called directly, as `[T]` and `Vec<T>` call it.
  fn serialize_slice(items: &[Self]) -> Value
  where
    Self: Sized,
  {
    Value::Array(items.iter().map(Self::serialize).collect())
  }
}

/// Decode the JSON value at the start of `text`, then deserialize it.
pub fn from_json_str<T: JsonDeserialize>(text: &str, options: &ParseOptions) -> Result<T, Error> {
  let (value, _) = decode(text, options)?;
  T::deserialize(&value)
}

/// Serialize an item, then encode it as JSON.
///
/// Please see [`encode`] for the meaning of `indent_width`.
pub fn to_json_string<T: ?Sized + JsonSerialize>(item: &T, indent_width: usize) -> String {
  encode(&item.serialize(), indent_width)
}

impl JsonDeserialize for Value {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    Ok(value.clone())
  }
}

impl JsonSerialize for Value {
  fn serialize(&self) -> Value {
    self.clone()
  }
}

#[test]
fn test_errors() {
  assert_eq!(
    from_json_str::<bool>("1", &ParseOptions::default()),
    Err(Error::Type { expected: Type::Bool, found: Type::Number })
  );
  let err = from_json_str::<bool>("tru", &ParseOptions::default()).unwrap_err();
  assert!(matches!(err, Error::Decode(e) if e.is_incomplete()));
  assert!(core::error::Error::source(&err).is_some());
  assert_eq!(
    Error::Type { expected: Type::String, found: Type::Null }.to_string(),
    "expected string, found null"
  );
}

#[test]
fn test_value_passthrough() {
  let value = Value::Array(vec![Value::Null, Value::from("x")]);
  assert_eq!(Value::deserialize(&value).unwrap(), value);
  assert_eq!(to_json_string(&value, 0), "[null,\"x\"]");
}
