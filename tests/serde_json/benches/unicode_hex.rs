#[cfg(debug_assertions)]
fn main() {}
#[cfg(not(debug_assertions))]
fn main() {
  use tagjson::{Value, ParseOptions, decode, encode};

  // Generate a string which will be ~64 MB once serialized
  let mut string = String::with_capacity(64 * 1024 * 1024 / 6);
  while string.len() < (64 * 1024 * 1024 / 6) {
    string.push_str("\u{2764}\u{fe0f}\u{1F600}");
  }
  let value = Value::Text(string);

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(encode(&value, 0));
    println!(
      "tagjson took {}ms to serialize a 64 MB Unicode (hex) string",
      start.elapsed().as_millis()
    );
  }

  let serialization = encode(&value, 0);
  drop(value);

  {
    let start = std::time::Instant::now();
    let _ =
      core::hint::black_box(serde_json::from_str::<serde_json::Value>(&serialization).unwrap());
    println!(
      "serde_json took {}ms to deserialize a 64 MB Unicode (hex) string",
      start.elapsed().as_millis()
    );
  }

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(decode(&serialization, &ParseOptions::default()).unwrap());
    println!(
      "tagjson took {}ms to deserialize a 64 MB Unicode (hex) string",
      start.elapsed().as_millis()
    );
  }
}
