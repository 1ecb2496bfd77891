use alloc::{string::String, vec::Vec, collections::BTreeMap};
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::{Type, Value, Error, type_error, JsonDeserialize, JsonSerialize};

/*
  Objects may repeat a key. As the fields are collected in order, the last occurrence of a key is
  the one retained.
*/
fn deserialize_fields<T: JsonDeserialize>(
  value: &Value,
) -> Result<impl Iterator<Item = Result<(String, T), Error>>, Error> {
  let fields = value.as_object().ok_or_else(|| type_error(Type::Object, value))?;
  Ok(fields.iter().map(|(key, value)| T::deserialize(value).map(|value| (key.clone(), value))))
}

fn serialize_fields<'serializing, K: 'serializing + AsRef<str>, T: 'serializing + JsonSerialize>(
  fields: impl Iterator<Item = (&'serializing K, &'serializing T)>,
) -> Value {
  Value::Object(
    fields.map(|(key, value)| (String::from(key.as_ref()), value.serialize())).collect::<Vec<_>>(),
  )
}

impl<T: JsonDeserialize> JsonDeserialize for BTreeMap<String, T> {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    deserialize_fields(value)?.collect()
  }
}
impl<K: AsRef<str>, T: JsonSerialize> JsonSerialize for BTreeMap<K, T> {
  fn serialize(&self) -> Value {
    serialize_fields(self.iter())
  }
}

#[cfg(feature = "std")]
impl<T: JsonDeserialize> JsonDeserialize for HashMap<String, T> {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    deserialize_fields(value)?.collect()
  }
}
#[cfg(feature = "std")]
impl<K: AsRef<str>, T: JsonSerialize> JsonSerialize for HashMap<K, T> {
  fn serialize(&self) -> Value {
    serialize_fields(self.iter())
  }
}

#[test]
fn test_maps() {
  use crate::{ParseOptions, from_json_str, to_json_string};

  let options = ParseOptions::default();
  let map = from_json_str::<BTreeMap<String, u8>>(r#"{"b": 2, "a": 1, "b": 3}"#, &options).unwrap();
  assert_eq!(map.len(), 2);
  assert_eq!(map["a"], 1);
  assert_eq!(map["b"], 3);
  assert_eq!(to_json_string(&map, 0), r#"{"a":1,"b":3}"#);

  assert_eq!(
    from_json_str::<BTreeMap<String, u8>>("[]", &options),
    Err(Error::Type { expected: Type::Object, found: Type::Array })
  );
  assert_eq!(
    from_json_str::<BTreeMap<String, u8>>(r#"{"a": true}"#, &options),
    Err(Error::Type { expected: Type::Number, found: Type::Bool })
  );
  assert!(from_json_str::<BTreeMap<String, bool>>("{}", &options).unwrap().is_empty());

  let mut borrowed = BTreeMap::new();
  borrowed.insert("key", "value");
  assert_eq!(to_json_string(&borrowed, 0), r#"{"key":"value"}"#);
}

#[cfg(feature = "std")]
#[test]
fn test_hash_map() {
  use crate::{ParseOptions, from_json_str, to_json_string};

  let options = ParseOptions::default().with_collapse_homogeneous_arrays(true);
  let map = from_json_str::<HashMap<String, Vec<f64>>>(r#"{"x": [1, 2]}"#, &options).unwrap();
  assert_eq!(map["x"], [1.0, 2.0]);
  assert_eq!(to_json_string(&map, 0), r#"{"x":[1,2]}"#);
}
