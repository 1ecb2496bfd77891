use alloc::string::String;

use crate::{Type, Sequence, Value, Error, type_error, JsonDeserialize, JsonSerialize};

impl JsonDeserialize for String {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    value.as_str().map(String::from).ok_or_else(|| type_error(Type::String, value))
  }
}

impl JsonSerialize for str {
  fn serialize(&self) -> Value {
    Value::Text(self.into())
  }
}

impl JsonSerialize for String {
  fn serialize(&self) -> Value {
    self.as_str().serialize()
  }
  fn serialize_slice(items: &[Self]) -> Value {
    Value::Sequence(Sequence::Text(items.to_vec()))
  }
}

#[test]
fn test_string() {
  assert_eq!(String::deserialize(&Value::from("caf\u{e9}")).unwrap(), "caf\u{e9}");
  assert_eq!(
    String::deserialize(&Value::Missing),
    Err(Error::Type { expected: Type::String, found: Type::Missing })
  );
  assert_eq!(crate::to_json_string("a\"\u{1F600}", 0), r#""a\"\ud83d\ude00""#);
  assert_eq!(
    crate::from_json_str::<String>(r#""é\n""#, &crate::ParseOptions::default()).unwrap(),
    "\u{e9}\n"
  );
}
