use alloc::string::String;

/// The range of UTF-16 high surrogates.
pub(super) const HIGH_SURROGATES: core::ops::RangeInclusive<u16> = 0xd800 ..= 0xdbff;
/// The range of UTF-16 low surrogates.
pub(super) const LOW_SURROGATES: core::ops::RangeInclusive<u16> = 0xdc00 ..= 0xdfff;

/// Combine a UTF-16 surrogate pair into the character it represents.
///
/// Returns `None` if `high` or `low` aren't the respective halves of a surrogate pair.
/// https://en.wikipedia.org/wiki/UTF-16#U+D800_to_U+DFFF_(surrogates) is used as reference.
#[inline(always)]
pub(super) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
  if !(HIGH_SURROGATES.contains(&high) && LOW_SURROGATES.contains(&low)) {
    None?;
  }
  let high = u32::from(high - 0xd800) << 10;
  let low = u32::from(low - 0xdc00);
  char::from_u32(high + low + 0x10000)
}

/// Push the `\uXXXX` escape sequence for a UTF-16 code unit, with lowercase hex digits.
#[inline(always)]
pub(super) fn push_utf16_escape(out: &mut String, unit: u16) {
  out.push_str("\\u");
  for n in 0 .. 4 {
    // Safe to cast as this is masked with 0b1111 (a 4-bit value)
    let nibble = ((unit >> (12 - (n * 4))) & 0b1111) as u8;
    out.push(char::from(if let Some(value) = nibble.checked_sub(10) {
      b'a' + value
    } else {
      b'0' + nibble
    }));
  }
}

#[test]
fn test_combine_surrogates() {
  assert_eq!(combine_surrogates(0xd83d, 0xde00), Some('\u{1F600}'));
  assert_eq!(combine_surrogates(0xd800, 0xdc00), Some('\u{10000}'));
  assert_eq!(combine_surrogates(0xdbff, 0xdfff), Some('\u{10FFFF}'));
  assert_eq!(combine_surrogates(0xd83d, 0x0041), None);
  assert_eq!(combine_surrogates(0xde00, 0xd83d), None);

  for char in ['\u{10000}', '\u{1F600}', '\u{10FFFF}'] {
    let mut units = [0; 2];
    let units = char.encode_utf16(&mut units);
    assert_eq!(combine_surrogates(units[0], units[1]), Some(char));
  }
}

#[test]
fn test_push_utf16_escape() {
  let mut out = String::new();
  push_utf16_escape(&mut out, 0x00e9);
  push_utf16_escape(&mut out, 0xd83d);
  push_utf16_escape(&mut out, 0x0007);
  assert_eq!(out, "\\u00e9\\ud83d\\u0007");
}
