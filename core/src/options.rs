use core::{fmt, str::FromStr};

/// How to handle an escape sequence RFC 8259 doesn't define, such as `\q`.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum UnexpectedEscape {
  /// Fail the parse.
  #[default]
  Error,
  /// Drop both the backslash and the escaped character, emitting a warning.
  Skip,
  /// Drop the backslash yet keep the escaped character literally, emitting a warning.
  Keep,
}

/// An unrecognized name for an [`UnexpectedEscape`] mode.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UnknownEscapeMode(pub alloc::string::String);

impl fmt::Display for UnknownEscapeMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown unexpected-escape mode \"{}\" (expected error, skip, or keep)", self.0)
  }
}

impl core::error::Error for UnknownEscapeMode {}

impl FromStr for UnexpectedEscape {
  type Err = UnknownEscapeMode;
  fn from_str(name: &str) -> Result<Self, Self::Err> {
    Ok(match name {
      "error" => Self::Error,
      "skip" => Self::Skip,
      "keep" => Self::Keep,
      _ => Err(UnknownEscapeMode(name.into()))?,
    })
  }
}

/// Options for [`decode`](crate::decode).
///
/// The defaults are strict: unexpected escapes fail the parse, arrays are never collapsed, and
/// nesting is bounded by [`DEFAULT_MAX_DEPTH`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParseOptions {
  /// The handling for escape sequences other than `\" \\ \/ \b \f \n \r \t \uXXXX`.
  pub unexpected_escape: UnexpectedEscape,
  /// If arrays whose elements are all scalars of one kind should be represented as a
  /// [`Sequence`](crate::Sequence).
  pub collapse_homogeneous_arrays: bool,
  /// The maximum depth of nested arrays and objects.
  ///
  /// Decoding recurses once per level of nesting. `None` removes the bound, leaving the caller's
  /// stack as the only limit.
  pub max_depth: Option<usize>,
}

/// The nesting depth [`ParseOptions::default`] allows.
///
/// This fits within the 2 MiB stack Rust gives spawned threads, including in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      unexpected_escape: UnexpectedEscape::default(),
      collapse_homogeneous_arrays: false,
      max_depth: Some(DEFAULT_MAX_DEPTH),
    }
  }
}

impl ParseOptions {
  /// Set the handling for unexpected escape sequences.
  #[must_use]
  pub fn with_unexpected_escape(mut self, unexpected_escape: UnexpectedEscape) -> Self {
    self.unexpected_escape = unexpected_escape;
    self
  }

  /// Set if homogeneous arrays should be collapsed.
  #[must_use]
  pub fn with_collapse_homogeneous_arrays(mut self, collapse: bool) -> Self {
    self.collapse_homogeneous_arrays = collapse;
    self
  }

  /// Bound the nesting depth.
  #[must_use]
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = Some(max_depth);
    self
  }

  /// Remove the bound on the nesting depth.
  ///
  /// Deeply nested input will then exhaust the stack instead of returning an error.
  #[must_use]
  pub fn without_max_depth(mut self) -> Self {
    self.max_depth = None;
    self
  }
}

#[test]
fn unexpected_escape_from_str() {
  assert_eq!("error".parse::<UnexpectedEscape>().unwrap(), UnexpectedEscape::Error);
  assert_eq!("skip".parse::<UnexpectedEscape>().unwrap(), UnexpectedEscape::Skip);
  assert_eq!("keep".parse::<UnexpectedEscape>().unwrap(), UnexpectedEscape::Keep);
  let err = "Skip".parse::<UnexpectedEscape>().unwrap_err();
  assert_eq!(err, UnknownEscapeMode("Skip".into()));
  assert!(err.to_string().contains("\"Skip\""));
}

#[test]
fn parse_options_builder() {
  let options = ParseOptions::default()
    .with_unexpected_escape(UnexpectedEscape::Keep)
    .with_collapse_homogeneous_arrays(true)
    .with_max_depth(4);
  assert_eq!(options.unexpected_escape, UnexpectedEscape::Keep);
  assert!(options.collapse_homogeneous_arrays);
  assert_eq!(options.max_depth, Some(4));
  assert_eq!(options.without_max_depth().max_depth, None);

  let defaults = ParseOptions::default();
  assert_eq!(defaults.unexpected_escape, UnexpectedEscape::Error);
  assert!(!defaults.collapse_homogeneous_arrays);
  assert_eq!(defaults.max_depth, Some(DEFAULT_MAX_DEPTH));
}
