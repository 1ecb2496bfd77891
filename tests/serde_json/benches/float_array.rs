#[cfg(debug_assertions)]
fn main() {}
#[cfg(not(debug_assertions))]
fn main() {
  use tagjson::{ParseOptions, decode};

  // Generate a 64 MB array
  let array = (0 .. (64 * 1024 * 1024 / 8))
    .map(|_| tagjson_serde_json_tests::random_number())
    .collect::<Vec<f64>>();

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(serde_json::to_string(&array).unwrap());
    println!("serde_json took {}ms to serialize a 64 MB f64 array", start.elapsed().as_millis());
  }

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(tagjson_traits::to_json_string(&array, 0));
    println!("tagjson took {}ms to serialize a 64 MB f64 array", start.elapsed().as_millis());
  }

  let serialization = tagjson_traits::to_json_string(&array, 0);

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(serde_json::from_str::<Vec<f64>>(&serialization).unwrap());
    println!(
      "serde_json took {}ms to deserialize a 64 MB f64 array into a Vec<f64>",
      start.elapsed().as_millis()
    );
  }

  {
    let options = ParseOptions::default().with_collapse_homogeneous_arrays(true);
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(
      tagjson_traits::from_json_str::<Vec<f64>>(&serialization, &options).unwrap(),
    );
    println!(
      "tagjson took {}ms to deserialize a 64 MB f64 array into a Vec<f64>",
      start.elapsed().as_millis()
    );
  }

  for collapse in [false, true] {
    let options = ParseOptions::default().with_collapse_homogeneous_arrays(collapse);
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(decode(&serialization, &options).unwrap());
    println!(
      "tagjson took {}ms to deserialize a 64 MB f64 array (collapsing: {collapse})",
      start.elapsed().as_millis()
    );
  }
}
