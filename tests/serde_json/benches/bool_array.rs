#[cfg(not(debug_assertions))]
use rand_core::{RngCore, OsRng};

#[cfg(debug_assertions)]
fn main() {}
#[cfg(not(debug_assertions))]
fn main() {
  use tagjson::{ParseOptions, decode};

  // Generate an array which will be ~64 MB once serialized
  let mut array = Vec::with_capacity(64 * 1024 * 1024 / 4);
  while array.len() < (64 * 1024 * 1024 / 4) {
    let mut bits = OsRng.next_u64();
    for _ in 0 .. 64 {
      array.push((bits & 1) == 1);
      bits >>= 1;
    }
  }

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(serde_json::to_string(&array).unwrap());
    println!("serde_json took {}ms to serialize a 64 MB bool array", start.elapsed().as_millis());
  }

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(tagjson_traits::to_json_string(&array, 0));
    println!("tagjson took {}ms to serialize a 64 MB bool array", start.elapsed().as_millis());
  }

  let serialization = serde_json::to_string(&array).unwrap();
  drop(array);

  {
    let start = std::time::Instant::now();
    let _ =
      core::hint::black_box(serde_json::from_str::<serde_json::Value>(&serialization).unwrap());
    println!("serde_json took {}ms to deserialize a 64 MB bool array", start.elapsed().as_millis());
  }

  for collapse in [false, true] {
    let options = ParseOptions::default().with_collapse_homogeneous_arrays(collapse);
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(decode(&serialization, &options).unwrap());
    println!(
      "tagjson took {}ms to deserialize a 64 MB bool array (collapsing: {collapse})",
      start.elapsed().as_millis()
    );
  }
}
