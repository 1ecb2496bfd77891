use crate::{Type, Sequence, Value, Error, type_error, JsonDeserialize, JsonSerialize};

impl JsonDeserialize for f64 {
  /// This accepts numbers, along with the strings `"NaN"`, `"Inf"`, and `"-Inf"` which non-finite
  /// numbers are encoded as.
  fn deserialize(value: &Value) -> Result<Self, Error> {
    match value {
      Value::Number(number) => Ok(*number),
      Value::Text(text) => match text.as_str() {
        "NaN" => Ok(f64::NAN),
        "Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        _ => Err(type_error(Type::Number, value)),
      },
      _ => Err(type_error(Type::Number, value)),
    }
  }
}

impl JsonSerialize for f64 {
  fn serialize(&self) -> Value {
    Value::Number(*self)
  }
  fn serialize_slice(items: &[Self]) -> Value {
    Value::Sequence(Sequence::Number(items.to_vec()))
  }
}

#[test]
#[allow(clippy::float_cmp)]
fn test_f64() {
  assert_eq!(f64::deserialize(&Value::Number(-2.5)), Ok(-2.5));
  assert_eq!(f64::deserialize(&Value::from("Inf")), Ok(f64::INFINITY));
  assert_eq!(f64::deserialize(&Value::from("-Inf")), Ok(f64::NEG_INFINITY));
  assert!(f64::deserialize(&Value::from("NaN")).unwrap().is_nan());
  assert_eq!(
    f64::deserialize(&Value::from("1")),
    Err(Error::Type { expected: Type::Number, found: Type::String })
  );

  // Non-finite numbers survive being encoded and decoded
  let options = crate::ParseOptions::default();
  for number in [f64::INFINITY, f64::NEG_INFINITY, 0.5, 1e300] {
    let json = crate::to_json_string(&number, 0);
    assert_eq!(crate::from_json_str::<f64>(&json, &options), Ok(number));
  }
  assert_eq!(crate::to_json_string(&f64::NAN, 0), "\"NaN\"");
}
