//! The cursor the decoder reads through.

/// A position within an in-memory UTF-8 buffer.
///
/// This is `Copy` so a caller may take a snapshot before speculatively reading, and restore it if
/// it decides not to consume what it read.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'text> {
  text: &'text str,
  position: usize,
}

impl<'text> Cursor<'text> {
  #[inline(always)]
  pub(crate) fn new(text: &'text str) -> Self {
    Self { text, position: 0 }
  }

  /// The offset of the next unread byte.
  #[inline(always)]
  pub(crate) fn position(&self) -> usize {
    self.position
  }

  /// The unread bytes.
  #[inline(always)]
  pub(crate) fn remaining(&self) -> &'text [u8] {
    &self.text.as_bytes()[self.position ..]
  }

  /// Peek at the byte `i` bytes ahead, or `None` if that's past the end of the buffer.
  #[inline(always)]
  pub(crate) fn peek(&self, i: usize) -> Option<u8> {
    self.text.as_bytes().get(self.position + i).copied()
  }

  /// Peek at the character starting at the next unread byte.
  ///
  /// The cursor only ever rests on character boundaries, as it's solely advanced past ASCII bytes
  /// or entire characters.
  #[inline(always)]
  pub(crate) fn peek_char(&self) -> Option<char> {
    self.text.get(self.position ..)?.chars().next()
  }

  #[inline(always)]
  pub(crate) fn advance(&mut self, bytes: usize) {
    self.position = (self.position + bytes).min(self.text.len());
  }

  /// Read the next byte, advancing past it.
  #[inline(always)]
  pub(crate) fn read_byte(&mut self) -> Option<u8> {
    let byte = self.peek(0)?;
    self.position += 1;
    Some(byte)
  }

  /// The text between `start` and the current position.
  #[inline(always)]
  pub(crate) fn since(&self, start: usize) -> &'text str {
    &self.text[start .. self.position]
  }

  /// Advance past whitespace, returning the next non-whitespace byte (without consuming it).
  #[inline(always)]
  pub(crate) fn skip_whitespace(&mut self) -> Option<u8> {
    loop {
      let next = self.peek(0)?;
      // https://datatracker.ietf.org/doc/html/rfc8259#section-2 defines whitespace as follows
      if !matches!(next, b'\x20' | b'\x09' | b'\x0A' | b'\x0D') {
        return Some(next);
      }
      self.position += 1;
    }
  }
}

#[test]
fn cursor_whitespace() {
  let mut cursor = Cursor::new(" \t\r\n[ ");
  assert_eq!(cursor.skip_whitespace(), Some(b'['));
  assert_eq!(cursor.position(), 4);
  assert_eq!(cursor.read_byte(), Some(b'['));
  assert_eq!(cursor.skip_whitespace(), None);
  assert_eq!(cursor.position(), 6);
  assert!(cursor.remaining().is_empty());
}

#[test]
fn cursor_peek_char() {
  let mut cursor = Cursor::new("a\u{e9}b");
  cursor.advance(1);
  assert_eq!(cursor.peek_char(), Some('\u{e9}'));
  cursor.advance('\u{e9}'.len_utf8());
  assert_eq!(cursor.peek_char(), Some('b'));
  assert_eq!(cursor.since(1), "\u{e9}");
  cursor.advance(10);
  assert_eq!(cursor.peek_char(), None);
}
