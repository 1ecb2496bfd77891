use crate::{Value, Error, JsonDeserialize, JsonSerialize};

impl<T: JsonDeserialize> JsonDeserialize for Option<T> {
  /// `null`, and values which were never present, deserialize as `None`.
  fn deserialize(value: &Value) -> Result<Self, Error> {
    match value {
      Value::Null | Value::Missing => Ok(None),
      value => T::deserialize(value).map(Some),
    }
  }
}

impl<T: JsonSerialize> JsonSerialize for Option<T> {
  fn serialize(&self) -> Value {
    match self {
      Some(value) => value.serialize(),
      None => Value::Null,
    }
  }
}

#[test]
fn test_option() {
  use crate::{Type, ParseOptions, from_json_str, to_json_string};

  let options = ParseOptions::default();
  assert_eq!(from_json_str::<Option<u8>>("null", &options), Ok(None));
  assert_eq!(from_json_str::<Option<u8>>("7", &options), Ok(Some(7)));
  assert_eq!(Option::<bool>::deserialize(&Value::Missing), Ok(None));
  assert_eq!(
    from_json_str::<Option<u8>>("\"7\"", &options),
    Err(Error::Type { expected: Type::Number, found: Type::String })
  );

  // Absent fields, as read via `Value::get`, are also `None`
  let (object, _) = crate::decode(r#"{"a": 1}"#, &options).unwrap();
  let absent = object.get("b").cloned().unwrap_or(Value::Missing);
  assert_eq!(Option::<u8>::deserialize(&absent), Ok(None));

  assert_eq!(
    from_json_str::<Vec<Option<bool>>>("[true, null]", &options),
    Ok(vec![Some(true), None])
  );
  assert_eq!(to_json_string(&[Some(1.5), None], 0), "[1.5,null]");
}
