use rand_core::{RngCore, OsRng};

use tagjson::{Type, Value, ParseOptions, decode};

/// Assert a float is within 0.1% of the expected float.
pub fn check_float(number: f64, expected: f64) {
  let allowed_deviation = number.abs().min(expected.abs()) / 1000.0;
  assert!((number - expected).abs() <= allowed_deviation, "{number} != {expected}");
}

/*
  `serde_json` only retains the last value for a repeated key, while `tagjson` retains every member
  in order. We accordingly compare against the last member with each key, and then solely check no
  members exist which `serde_json` doesn't have.
*/
/// Assert a `Value` is equivalent to the value `serde_json` decoded.
pub fn check_equivalent(value: &Value, expected: &serde_json::Value) {
  match expected {
    serde_json::Value::Null => assert!(value.is_null()),
    serde_json::Value::Bool(expected) => assert_eq!(value.as_bool(), Some(*expected)),
    serde_json::Value::Number(expected) => {
      check_float(value.as_f64().unwrap(), expected.as_f64().unwrap())
    }
    serde_json::Value::String(expected) => assert_eq!(value.as_str(), Some(expected.as_str())),
    serde_json::Value::Array(expected) => {
      assert_eq!(value.kind(), Type::Array);
      assert_eq!(value.len(), Some(expected.len()));
      for (i, expected) in expected.iter().enumerate() {
        check_equivalent(&value.element(i).unwrap(), expected);
      }
    }
    serde_json::Value::Object(expected) => {
      let members = value.as_object().unwrap();
      for (key, expected) in expected {
        let (_, value) = members.iter().rev().find(|(found, _)| found == key).unwrap();
        check_equivalent(value, expected);
      }
      for (key, _) in members {
        assert!(expected.contains_key(key));
      }
    }
  }
}

/// Decode `encoding` with and without collapsing arrays, checking both against `serde_json`.
pub fn check_value(encoding: &str, expected: &serde_json::Value) {
  for collapse in [false, true] {
    let options = ParseOptions::default().with_collapse_homogeneous_arrays(collapse);
    let (value, consumed) = decode(encoding, &options).unwrap();
    assert_eq!(consumed, encoding.trim_end().len());
    check_equivalent(&value, expected);
  }
}

/// A random number which survives being written with 15 significant digits.
pub fn random_number() -> f64 {
  let mantissa = OsRng.next_u64() % 1_000_000_000_000_000;
  let exponent = i64::from(OsRng.next_u32() % 41) - 20;
  let sign = if (OsRng.next_u32() & 1) == 1 { "-" } else { "" };
  format!("{sign}{mantissa}e{exponent}").parse().unwrap()
}

/// A random string, mixing control characters, ASCII, and characters outside the BMP.
pub fn random_string() -> String {
  (0 .. (OsRng.next_u32() % 16))
    .filter_map(|_| {
      let bound = match OsRng.next_u32() % 4 {
        0 => 0x20,
        1 => 0x80,
        2 => 0x1_0000,
        _ => 0x11_0000,
      };
      char::from_u32(OsRng.next_u32() % bound)
    })
    .collect()
}

/// A random value, nested at most `depth` times.
pub fn random_value(depth: usize) -> Value {
  let kinds = if depth == 0 { 4 } else { 6 };
  match OsRng.next_u32() % kinds {
    0 => Value::Null,
    1 => Value::Bool((OsRng.next_u32() & 1) == 1),
    2 => Value::Number(random_number()),
    3 => Value::Text(random_string()),
    4 => Value::Array((0 .. (OsRng.next_u32() % 8)).map(|_| random_value(depth - 1)).collect()),
    _ => Value::Object(
      (0 .. (OsRng.next_u32() % 8)).map(|_| (random_string(), random_value(depth - 1))).collect(),
    ),
  }
}

#[test]
fn documents() {
  for encoding in [
    r#"{"a": [1, 2, 3], "b": {"c": null, "d": "é😀"}}"#,
    r#"[true, false, "x", 1e-5, -0, 0.5E+3]  "#,
    r#"{"key": 1, "key": 2}"#,
    "[[], {}, [[]], [1.7976931348623157e308]]",
    "\"\\/\\b\\f\"",
    "-12.5e-3",
  ] {
    check_value(encoding, &serde_json::from_str(encoding).unwrap());
  }
}

#[test]
fn fuzz() {
  for _ in 0 .. 1000 {
    let value = random_value(4);
    for indent_width in [0, 2] {
      let encoding = tagjson::encode(&value, indent_width);
      assert!(encoding.is_ascii());

      let (decoded, consumed) = decode(&encoding, &ParseOptions::default()).unwrap();
      assert_eq!(consumed, encoding.len());
      assert_eq!(decoded, value);

      let expected = serde_json::from_str::<serde_json::Value>(&encoding).unwrap();
      check_equivalent(&value, &expected);

      // `serde_json` writes non-ASCII characters as-is, which we should equally accept
      check_value(&serde_json::to_string(&expected).unwrap(), &expected);
    }
  }
}

#[test]
fn traits() {
  use std::collections::BTreeMap;

  for _ in 0 .. 100 {
    let mut map = BTreeMap::new();
    for _ in 0 .. (OsRng.next_u32() % 8) {
      let numbers = (0 .. (OsRng.next_u32() % 8)).map(|_| random_number()).collect::<Vec<_>>();
      map.insert(random_string(), numbers);
    }

    let encoding = tagjson_traits::to_json_string(&map, 1);
    let expected = serde_json::from_str::<BTreeMap<String, Vec<f64>>>(&encoding).unwrap();
    assert_eq!(expected.len(), map.len());
    for ((key, numbers), (expected_key, expected)) in map.iter().zip(&expected) {
      assert_eq!(key, expected_key);
      assert_eq!(numbers.len(), expected.len());
      for (number, expected) in numbers.iter().zip(expected) {
        check_float(*number, *expected);
      }
    }

    let options = ParseOptions::default().with_collapse_homogeneous_arrays(true);
    assert_eq!(tagjson_traits::from_json_str(&encoding, &options), Ok(map));
  }
}
