use alloc::vec::Vec;

use crate::{Type, Value, Error, type_error, JsonDeserialize, JsonSerialize};

/// Deserialize each element of an array, whether generic or collapsed into a `Sequence`.
fn deserialize_elements<T: JsonDeserialize>(value: &Value) -> Result<Vec<T>, Error> {
  match value {
    Value::Array(values) => values.iter().map(T::deserialize).collect(),
    Value::Sequence(sequence) => (0 .. sequence.len())
      .filter_map(|i| sequence.get(i))
      .map(|element| T::deserialize(&element))
      .collect(),
    _ => Err(type_error(Type::Array, value)),
  }
}

impl<T: JsonDeserialize> JsonDeserialize for Vec<T> {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    deserialize_elements(value)
  }
}

impl<T: JsonDeserialize, const N: usize> JsonDeserialize for [T; N] {
  /// This requires the array have exactly `N` elements.
  fn deserialize(value: &Value) -> Result<Self, Error> {
    let elements = deserialize_elements::<T>(value)?;
    let found = elements.len();
    elements.try_into().map_err(|_| Error::Length { expected: N, found })
  }
}

impl<T: JsonSerialize> JsonSerialize for [T] {
  fn serialize(&self) -> Value {
    T::serialize_slice(self)
  }
}

impl<T: JsonSerialize> JsonSerialize for Vec<T> {
  fn serialize(&self) -> Value {
    T::serialize_slice(self)
  }
}

impl<T: JsonSerialize, const N: usize> JsonSerialize for [T; N] {
  fn serialize(&self) -> Value {
    T::serialize_slice(self)
  }
}

#[test]
fn test_vec() {
  use crate::{ParseOptions, Sequence, from_json_str};

  let options = ParseOptions::default();
  let collapse = options.with_collapse_homogeneous_arrays(true);
  for options in [options, collapse] {
    assert_eq!(from_json_str::<Vec<u8>>("[1, 2, 3]", &options), Ok(vec![1, 2, 3]));
    assert_eq!(from_json_str::<Vec<String>>("[]", &options), Ok(vec![]));
    assert_eq!(
      from_json_str::<Vec<Vec<bool>>>("[[true], [], [false, true]]", &options),
      Ok(vec![vec![true], vec![], vec![false, true]])
    );
    assert_eq!(from_json_str::<Vec<u8>>("[1, 256]", &options), Err(Error::OutOfRange));
    assert_eq!(
      from_json_str::<Vec<u8>>("{}", &options),
      Err(Error::Type { expected: Type::Array, found: Type::Object })
    );
  }

  assert!(matches!(vec![1.0, 2.0].serialize(), Value::Sequence(Sequence::Number(_))));
  assert!(matches!(vec![true].serialize(), Value::Sequence(Sequence::Bool(_))));
  assert!(matches!(
    vec![String::from("a")].serialize(),
    Value::Sequence(Sequence::Text(_))
  ));
  // Types without a compact representation use generic arrays
  assert!(matches!(vec![1u8].serialize(), Value::Array(_)));
  assert!(matches!(vec![Some(true)].serialize(), Value::Array(_)));
  assert_eq!(crate::to_json_string(&vec![1.5, 2.0], 0), "[1.5,2]");
  assert_eq!(crate::to_json_string(&[[1u8], [2]], 1), "[\n [\n  1\n ],\n [\n  2\n ]\n]");
}

#[test]
fn test_array() {
  use crate::{ParseOptions, from_json_str};

  let options = ParseOptions::default().with_collapse_homogeneous_arrays(true);
  assert_eq!(from_json_str::<[u16; 2]>("[1, 2]", &options), Ok([1, 2]));
  assert_eq!(
    from_json_str::<[u16; 2]>("[1, 2, 3]", &options),
    Err(Error::Length { expected: 2, found: 3 })
  );
  assert_eq!(
    from_json_str::<[String; 1]>("[]", &options),
    Err(Error::Length { expected: 1, found: 0 })
  );
  assert_eq!(crate::to_json_string(&[true, false], 0), "[true,false]");
}
