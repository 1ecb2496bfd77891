/// Check if four bytes are all ASCII hex digits.
#[must_use]
#[inline(always)]
fn validate_hex(bytes: [u8; 4]) -> bool {
  // The order of these bytes within our `u32` is irrelevant
  let bytes = u32::from_ne_bytes(bytes);

  const HIGH_BIT: u32 = 1 << 7;
  const HIGH_BITS: u32 = (HIGH_BIT << 24) | (HIGH_BIT << 16) | (HIGH_BIT << 8) | HIGH_BIT;

  const ZERO_CHAR: u32 =
    ((b'0' as u32) << 24) | ((b'0' as u32) << 16) | ((b'0' as u32) << 8) | (b'0' as u32);
  const DISTANCE_AFTER_NINE: u32 = HIGH_BIT - ((b'9' + 1) as u32);
  const DISTANCES_AFTER_NINE: u32 = (DISTANCE_AFTER_NINE << 24) |
    (DISTANCE_AFTER_NINE << 16) |
    (DISTANCE_AFTER_NINE << 8) |
    DISTANCE_AFTER_NINE;

  const FIFTH_BIT: u32 = 1 << 5;
  const FIFTH_BITS: u32 = (FIFTH_BIT << 24) | (FIFTH_BIT << 16) | (FIFTH_BIT << 8) | FIFTH_BIT;

  const A_CHAR: u32 =
    ((b'a' as u32) << 24) | ((b'a' as u32) << 16) | ((b'a' as u32) << 8) | (b'a' as u32);
  const DISTANCE_AFTER_F: u32 = HIGH_BIT - ((b'f' + 1) as u32);
  const DISTANCES_AFTER_F: u32 = (DISTANCE_AFTER_F << 24) |
    (DISTANCE_AFTER_F << 16) |
    (DISTANCE_AFTER_F << 8) |
    DISTANCE_AFTER_F;

  /*
    Setting the high bit of every lane shields the lanes from each other, as no borrow from a
    subtraction of a constant below 128 will cross into the next lane. If a lane's value is less
    than the constant, its high bit is borrowed and becomes unset.
  */
  let bytes_with_high_bits = bytes | HIGH_BITS;
  let gte_zero = bytes_with_high_bits.wrapping_sub(ZERO_CHAR);
  // `'A' ..= 'F'` only differ from `'a' ..= 'f'` by their fifth bit, so we check them as one
  let gte_a = (bytes_with_high_bits | FIFTH_BITS).wrapping_sub(A_CHAR);

  /*
    Adding the distance from the end of a range to the high bit sets the high bit if and only if
    the lane's value is past the end of the range.
  */
  let lte_9 = bytes.wrapping_add(DISTANCES_AFTER_NINE);
  let lte_f = (bytes | FIFTH_BITS).wrapping_add(DISTANCES_AFTER_F);

  /*
    A lane within a range has its gte bit set and its lte bit unset. A lane can't be less than the
    start of a range while past its end, so XOR isolates the in-range state.
  */
  let number = gte_zero ^ lte_9;
  let alpha = gte_a ^ lte_f;
  let number_or_alpha = number | alpha;
  // The above is only well-defined for ASCII lanes
  let ascii = (!bytes) & HIGH_BITS;
  (ascii & number_or_alpha) == HIGH_BITS
}

/// Read a UTF-16 code unit from its big-endian hexadecimal encoding.
///
/// If the bytes aren't all hex digits, this returns the amount of leading bytes which were.
#[inline(always)]
pub(super) fn read_hex(hex: [u8; 4]) -> Result<u16, usize> {
  if !validate_hex(hex) {
    Err(hex.iter().take_while(|byte| byte.is_ascii_hexdigit()).count())?;
  }

  #[inline(always)]
  fn hex_char(char: u8) -> u16 {
    u16::from(match char {
      b'0' ..= b'9' => char - b'0',
      b'a' ..= b'f' => char - b'a' + 10,
      // `validate_hex` only leaves `'A' ..= 'F'`
      _ => char - b'A' + 10,
    })
  }
  Ok(
    (hex_char(hex[0]) << 12) |
      (hex_char(hex[1]) << 8) |
      (hex_char(hex[2]) << 4) |
      hex_char(hex[3]),
  )
}

#[test]
fn test_validate_hex() {
  let mut hex = [0, b'f', b'f', b'f'];
  for i in u8::MIN ..= u8::MAX {
    hex[0] = i;
    assert_eq!(validate_hex(hex), hex[0].is_ascii_hexdigit());
  }
}

#[test]
fn test_read_hex() {
  assert_eq!(read_hex(*b"00e9"), Ok(0xe9));
  assert_eq!(read_hex(*b"D83D"), Ok(0xd83d));
  assert_eq!(read_hex(*b"aBcD"), Ok(0xabcd));
  assert_eq!(read_hex(*b"12x4"), Err(2));
  assert_eq!(read_hex(*b"g000"), Err(0));
  assert_eq!(read_hex([b'1', b'2', b'3', 0]), Err(3));
}
