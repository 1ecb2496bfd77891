use alloc::string::String;

use crate::{number::write_number, escape_str, Sequence, Value};

/// Encode a value as JSON.
///
/// With an `indent_width` of zero, the most compact encoding is produced. Otherwise, every item
/// within an array or object is written on its own line, indented by `indent_width` spaces per
/// level of nesting.
///
/// The output is pure ASCII. Non-finite numbers, which JSON can't represent, are written as the
/// strings `"NaN"`, `"Inf"`, and `"-Inf"`. [`Value::Missing`] is written as the string `"NA"`.
pub fn encode(value: &Value, indent_width: usize) -> String {
  let mut out = String::new();
  encode_into(value, indent_width, &mut out);
  out
}

/// Encode a value as JSON, appending it to `out`.
///
/// This is [`encode`] for callers with an existing buffer.
pub fn encode_into(value: &Value, indent_width: usize, out: &mut String) {
  Serializer { out, indent_width }.value(value, 0);
}

struct Serializer<'out> {
  out: &'out mut String,
  indent_width: usize,
}

impl Serializer<'_> {
  /// Start a new line at the indentation for `depth`, if pretty-printing.
  fn newline(&mut self, depth: usize) {
    if self.indent_width == 0 {
      return;
    }
    self.out.push('\n');
    self.out.extend(core::iter::repeat_n(' ', depth * self.indent_width));
  }

  fn container<T>(
    &mut self,
    items: &[T],
    depth: usize,
    (opener, closer): (char, char),
    mut item: impl FnMut(&mut Self, &T, usize),
  ) {
    self.out.push(opener);
    // Empty containers are never broken across lines
    if items.is_empty() {
      self.out.push(closer);
      return;
    }
    for (i, element) in items.iter().enumerate() {
      if i != 0 {
        self.out.push(',');
      }
      self.newline(depth + 1);
      item(self, element, depth + 1);
    }
    self.newline(depth);
    self.out.push(closer);
  }

  fn number(&mut self, value: f64) {
    if value.is_nan() {
      self.out.push_str("\"NaN\"");
    } else if value.is_infinite() {
      self.out.push_str(if value.is_sign_positive() { "\"Inf\"" } else { "\"-Inf\"" });
    } else {
      write_number(value, self.out);
    }
  }

  fn value(&mut self, value: &Value, depth: usize) {
    match value {
      Value::Null => self.out.push_str("null"),
      Value::Bool(value) => self.out.push_str(if *value { "true" } else { "false" }),
      Value::Number(value) => self.number(*value),
      Value::Text(value) => escape_str(value, self.out),
      Value::Missing => self.out.push_str("\"NA\""),
      Value::Array(values) => {
        self.container(values, depth, ('[', ']'), |this, value, depth| this.value(value, depth))
      }
      Value::Sequence(Sequence::Bool(items)) => {
        self.container(items, depth, ('[', ']'), |this, value, _| {
          this.out.push_str(if *value { "true" } else { "false" })
        })
      }
      Value::Sequence(Sequence::Number(items)) => {
        self.container(items, depth, ('[', ']'), |this, value, _| this.number(*value))
      }
      Value::Sequence(Sequence::Text(items)) => {
        self.container(items, depth, ('[', ']'), |this, value, _| escape_str(value, this.out))
      }
      Value::Object(members) => {
        self.container(members, depth, ('{', '}'), |this, (key, value), depth| {
          escape_str(key, this.out);
          this.out.push(':');
          this.value(value, depth);
        })
      }
    }
  }
}

#[cfg(test)]
fn sample() -> Value {
  Value::Object(vec![
    ("name".into(), Value::from("caf\u{e9}")),
    ("values".into(), Value::Sequence(Sequence::Number(vec![1.0, 2.5]))),
    (
      "nested".into(),
      Value::Array(vec![Value::Null, Value::Object(vec![]), Value::Array(vec![])]),
    ),
    ("flag".into(), Value::Bool(false)),
  ])
}

#[test]
fn test_encode_compact() {
  assert_eq!(
    encode(&sample(), 0),
    r#"{"name":"caf\u00e9","values":[1,2.5],"nested":[null,{},[]],"flag":false}"#
  );
  assert_eq!(encode(&Value::Array(vec![]), 0), "[]");
  assert_eq!(encode(&Value::Object(vec![]), 4), "{}");
  assert_eq!(encode(&Value::from("a\"b\\c\u{7}"), 0), "\"a\\\"b\\\\c\\u0007\"");
  assert_eq!(
    encode(&Value::Sequence(Sequence::Text(vec!["x".into(), "\u{1F600}".into()])), 0),
    r#"["x","\ud83d\ude00"]"#
  );
  assert_eq!(
    encode(&Value::Sequence(Sequence::Bool(vec![true, false])), 0),
    "[true,false]"
  );
}

#[test]
fn test_encode_pretty() {
  assert_eq!(
    encode(&sample(), 2),
    r#"{
  "name":"caf\u00e9",
  "values":[
    1,
    2.5
  ],
  "nested":[
    null,
    {},
    []
  ],
  "flag":false
}"#
  );
  assert_eq!(encode(&Value::Array(vec![Value::Null]), 3), "[\n   null\n]");
  assert_eq!(encode(&Value::Bool(true), 2), "true");
}

#[test]
fn test_encode_sentinels() {
  let value = Value::Array(vec![
    Value::Number(f64::NAN),
    Value::Number(f64::INFINITY),
    Value::Number(f64::NEG_INFINITY),
    Value::Missing,
    Value::Number(1e-5),
  ]);
  assert_eq!(encode(&value, 0), r#"["NaN","Inf","-Inf","NA",1e-05]"#);
  assert_eq!(
    encode(&Value::Sequence(Sequence::Number(vec![f64::NAN, 1e20])), 0),
    r#"["NaN",1e+20]"#
  );
}

#[test]
fn test_encode_into() {
  let mut out = String::from("value: ");
  encode_into(&Value::Number(3.0), 0, &mut out);
  assert_eq!(out, "value: 3");
}

#[test]
fn test_display() {
  let value = Value::Array(vec![Value::Number(1.0), Value::Null]);
  assert_eq!(value.to_string(), "[1,null]");
  assert_eq!(format!("{value:#}"), "[\n  1,\n  null\n]");
}

#[test]
fn test_round_trip() {
  let options = crate::ParseOptions::default();
  let value = sample();
  for indent_width in [0, 1, 2, 8] {
    let (decoded, consumed) = crate::decode(&encode(&value, indent_width), &options).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(consumed, encode(&value, indent_width).len());
  }

  let collapse = options.with_collapse_homogeneous_arrays(true);
  let (decoded, _) = crate::decode(&encode(&value, 2), &collapse).unwrap();
  assert_eq!(decoded, value);
  assert!(matches!(decoded.get("values"), Some(Value::Sequence(Sequence::Number(_)))));
}
