use alloc::boxed::Box;

use crate::{Value, Error, JsonDeserialize, JsonSerialize};

impl<T: JsonDeserialize> JsonDeserialize for Box<T> {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    T::deserialize(value).map(Box::new)
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for Box<T> {
  fn serialize(&self) -> Value {
    T::serialize(self)
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for &T {
  fn serialize(&self) -> Value {
    T::serialize(self)
  }
}

#[test]
fn test_boxed() {
  let options = crate::ParseOptions::default();
  assert_eq!(crate::from_json_str::<Box<u8>>("3", &options), Ok(Box::new(3)));
  let boxed: Box<[bool]> = Box::new([true, false]);
  assert_eq!(crate::to_json_string(&boxed, 0), "[true,false]");
  assert_eq!(crate::to_json_string(&&"x", 0), "\"x\"");
}
