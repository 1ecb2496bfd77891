use crate::{Type, Value, Error, type_error, JsonDeserialize, JsonSerialize};

/// Read a number with no fractional part.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::float_cmp)]
fn exact_integer(value: &Value) -> Result<i128, Error> {
  let number = value.as_f64().ok_or_else(|| type_error(Type::Number, value))?;
  /*
    `as` saturates, and maps `NaN` to zero, so the conversion only round-trips if the number is an
    integer within the range of an `i128`. Every `f64` with no fractional part and a magnitude
    below 2**127 is exactly representable by an `i128`.
  */
  let integer = number as i128;
  if (integer as f64) != number {
    Err(Error::OutOfRange)?;
  }
  Ok(integer)
}

/// Integers with a magnitude exceeding 2**53 will be rounded.
#[allow(clippy::cast_precision_loss)]
fn i64_to_f64(integer: i64) -> f64 {
  integer as f64
}

/// Integers exceeding 2**53 will be rounded.
#[allow(clippy::cast_precision_loss)]
fn u64_to_f64(integer: u64) -> f64 {
  integer as f64
}

macro_rules! integer {
  ($($integer: ty => $to_f64: path),*) => {
    $(
      impl JsonDeserialize for $integer {
        /// This requires the number have no fractional part and be within this type's range.
        fn deserialize(value: &Value) -> Result<Self, Error> {
          exact_integer(value)?.try_into().map_err(|_| Error::OutOfRange)
        }
      }
      impl JsonSerialize for $integer {
        fn serialize(&self) -> Value {
          Value::Number($to_f64(*self))
        }
      }
    )*
  };
}
integer!(
  i8 => f64::from,
  i16 => f64::from,
  i32 => f64::from,
  i64 => i64_to_f64,
  u8 => f64::from,
  u16 => f64::from,
  u32 => f64::from,
  u64 => u64_to_f64
);

impl JsonDeserialize for bool {
  fn deserialize(value: &Value) -> Result<Self, Error> {
    value.as_bool().ok_or_else(|| type_error(Type::Bool, value))
  }
}
impl JsonSerialize for bool {
  fn serialize(&self) -> Value {
    Value::Bool(*self)
  }
  fn serialize_slice(items: &[Self]) -> Value {
    Value::Sequence(crate::Sequence::Bool(items.to_vec()))
  }
}

#[test]
fn test_integers() {
  assert_eq!(u8::deserialize(&Value::Number(255.0)), Ok(255));
  assert_eq!(u8::deserialize(&Value::Number(256.0)), Err(Error::OutOfRange));
  assert_eq!(u32::deserialize(&Value::Number(-1.0)), Err(Error::OutOfRange));
  assert_eq!(i16::deserialize(&Value::Number(-32768.0)), Ok(i16::MIN));
  assert_eq!(i64::deserialize(&Value::Number(1e15)), Ok(1_000_000_000_000_000));
  assert_eq!(i64::deserialize(&Value::Number(1.5)), Err(Error::OutOfRange));
  assert_eq!(i64::deserialize(&Value::Number(f64::NAN)), Err(Error::OutOfRange));
  assert_eq!(i64::deserialize(&Value::Number(f64::INFINITY)), Err(Error::OutOfRange));
  assert_eq!(u64::deserialize(&Value::Number(1e30)), Err(Error::OutOfRange));
  assert_eq!(
    i32::deserialize(&Value::from("1")),
    Err(Error::Type { expected: Type::Number, found: Type::String })
  );

  assert_eq!(crate::to_json_string(&-12i32, 0), "-12");
  assert_eq!(crate::to_json_string(&u32::MAX, 0), "4294967295");
  assert_eq!(crate::to_json_string(&i8::MIN, 0), "-128");
  assert_eq!(crate::to_json_string(&-(1i64 << 40), 0), "-1099511627776");
  assert_eq!(crate::to_json_string(&u64::MAX, 0), "1.84467440737096e+19");
  assert_eq!(
    crate::from_json_str::<u16>("1e3", &crate::ParseOptions::default()),
    Ok(1000)
  );
}

#[test]
fn test_bool() {
  assert_eq!(bool::deserialize(&Value::Bool(true)), Ok(true));
  assert_eq!(
    bool::deserialize(&Value::Null),
    Err(Error::Type { expected: Type::Bool, found: Type::Null })
  );
  assert_eq!(crate::to_json_string(&false, 0), "false");
}
