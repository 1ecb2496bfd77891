#![allow(non_snake_case)]

#[cfg(test)]
mod tests {
  use tagjson::{JsonError, ParseOptions, decode, decode_bytes};

  /*
    A selection of `JSONTestSuite`'s vectors, inlined. `y_` vectors must be accepted, `n_` vectors
    must be rejected, and `i_` vectors are left to the implementation.
  */

  const PASS: &[(&str, &str)] = &[
    ("y_array_arraysWithSpaces", "[[]   ]"),
    ("y_array_empty-string", r#"[""]"#),
    ("y_array_empty", "[]"),
    ("y_array_false", "[false]"),
    ("y_array_heterogeneous", r#"[null, 1, "1", {}]"#),
    ("y_array_null", "[null]"),
    ("y_array_with_leading_space", " [1]"),
    ("y_array_with_several_null", "[1,null,null,null,2]"),
    ("y_array_with_trailing_space", "[2] "),
    ("y_number", "[123e65]"),
    ("y_number_0e+1", "[0e+1]"),
    ("y_number_0e1", "[0e1]"),
    ("y_number_after_space", "[ 4]"),
    ("y_number_double_close_to_zero", "[-0.000000000000000000000000000000000000000000000000000000000000000000000000000001]"),
    ("y_number_int_with_exp", "[20e1]"),
    ("y_number_minus_zero", "[-0]"),
    ("y_number_negative_int", "[-123]"),
    ("y_number_negative_one", "[-1]"),
    ("y_number_real_capital_e", "[1E22]"),
    ("y_number_real_capital_e_neg_exp", "[1E-2]"),
    ("y_number_real_capital_e_pos_exp", "[1E+2]"),
    ("y_number_real_exponent", "[123e45]"),
    ("y_number_real_fraction_exponent", "[123.456e78]"),
    ("y_number_real_neg_exp", "[1e-2]"),
    ("y_number_simple_int", "[123]"),
    ("y_number_simple_real", "[123.456789]"),
    ("y_object", r#"{"asd":"sdf", "dfg":"fgh"}"#),
    ("y_object_basic", r#"{"asd":"sdf"}"#),
    ("y_object_duplicated_key", r#"{"a":"b","a":"c"}"#),
    ("y_object_duplicated_key_and_value", r#"{"a":"b","a":"b"}"#),
    ("y_object_empty", "{}"),
    ("y_object_empty_key", r#"{"":0}"#),
    ("y_object_escaped_null_in_key", r#"{"foo\u0000bar": 42}"#),
    ("y_object_long_strings", r#"{"x":[{"id": "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"}], "id": "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"}"#),
    ("y_object_simple", r#"{"a":[]}"#),
    ("y_object_with_newlines", "{\n\"a\": \"b\"\n}"),
    ("y_string_1_2_3_bytes_UTF-8_sequences", r#"["`Īካ"]"#),
    ("y_string_accepted_surrogate_pair", r#"["𐐷"]"#),
    ("y_string_accepted_surrogate_pairs", r#"["😹💍"]"#),
    ("y_string_allowed_escapes", r#"["\"\\\/\b\f\n\r\t"]"#),
    ("y_string_backslash_and_u_escaped_zero", r#"["\\u0000"]"#),
    ("y_string_comments", r#"["a/*b*/c/*d//e"]"#),
    ("y_string_escaped_control_character", r#"["\u0012"]"#),
    ("y_string_in_array_with_leading_space", r#"[ "asd"]"#),
    ("y_string_last_surrogates_1_and_2", r#"["􏿿"]"#),
    ("y_string_nonCharacterInUTF-8_U+FFFF", "[\"\u{ffff}\"]"),
    ("y_string_pi", "[\"\u{3c0}\"]"),
    ("y_string_unescaped_char_delete", "[\"\u{7f}\"]"),
    ("y_string_unicode_U+FFFE_nonchar", r#"["￾"]"#),
    ("y_string_utf8", "[\"\u{20ac}\u{1d11e}\"]"),
    ("y_structure_lonely_false", "false"),
    ("y_structure_lonely_int", "42"),
    ("y_structure_lonely_negative_real", "-0.1"),
    ("y_structure_lonely_null", "null"),
    ("y_structure_lonely_string", r#""asd""#),
    ("y_structure_string_empty", r#""""#),
    ("y_structure_true_in_array", "[true]"),
    ("y_structure_whitespace_array", " [] "),
  ];

  const FAIL: &[(&str, &str)] = &[
    ("n_array_1_true_without_comma", "[1 true]"),
    ("n_array_colon_instead_of_comma", r#"["": 1]"#),
    ("n_array_double_comma", "[1,,2]"),
    ("n_array_extra_comma", r#"["",]"#),
    ("n_array_incomplete", r#"["x""#),
    ("n_array_incomplete_invalid_value", "[x"),
    ("n_array_just_comma", "[,]"),
    ("n_array_missing_value", r#"[   , ""]"#),
    ("n_array_number_and_comma", "[1,]"),
    ("n_array_unclosed", r#"[""#),
    ("n_array_unclosed_trailing_comma", "[1,"),
    ("n_incomplete_false", "[fals]"),
    ("n_incomplete_null", "[nul]"),
    ("n_incomplete_true", "[tru]"),
    ("n_number_++", "[++1234]"),
    ("n_number_-01", "[-01]"),
    ("n_number_-1.0.", "[-1.0.]"),
    ("n_number_.-1", "[.-1]"),
    ("n_number_0.e1", "[0.e1]"),
    ("n_number_0_capital_E+", "[0E+]"),
    ("n_number_1.0e", "[1.0e]"),
    ("n_number_1.0e-", "[1.0e-]"),
    ("n_number_2.e3", "[2.e3]"),
    ("n_number_Inf", "[Inf]"),
    ("n_number_NaN", "[NaN]"),
    ("n_number_hex_1_digit", "[0x1]"),
    ("n_number_minus_space_1", "[- 1]"),
    ("n_number_neg_int_starting_with_zero", "[-012]"),
    ("n_number_plus_1", "[+1]"),
    ("n_number_with_leading_zero", "[012]"),
    ("n_object_bad_value", r#"["x", truth]"#),
    ("n_object_comma_instead_of_colon", r#"{"x", null}"#),
    ("n_object_missing_colon", r#"{"a" b}"#),
    ("n_object_missing_key", r#"{:"b"}"#),
    ("n_object_missing_value", r#"{"a":"#),
    ("n_object_non_string_key", "{1:1}"),
    ("n_object_single_quote", "{'a':0}"),
    ("n_object_trailing_comma", r#"{"id":0,}"#),
    ("n_object_unquoted_key", r#"{a: "b"}"#),
    ("n_single_space", " "),
    ("n_string_1_surrogate_then_escape_u1", r#"["\uD800\u1"]"#),
    ("n_string_escape_x", r#"["\x00"]"#),
    ("n_string_escaped_ctrl_char_tab", "[\"\\\t\"]"),
    ("n_string_incomplete_surrogate_escape_invalid", r#"["\uD800\uD800\x"]"#),
    ("n_string_invalid_unicode_escape", r#"["\uqqqq"]"#),
    ("n_string_single_quote", "['single quote']"),
    ("n_string_unescaped_newline", "[\"new\nline\"]"),
    ("n_string_unescaped_tab", "[\"\t\"]"),
    ("n_structure_UTF8_BOM_no_data", "\u{feff}"),
    ("n_structure_no_data", ""),
    ("n_structure_open_object", "{"),
    ("n_structure_unclosed_array_partial_null", "[ false, nul"),
    ("n_structure_whitespace_formfeed", "[\u{c}]"),
  ];

  #[test]
  fn pass() {
    for (name, encoding) in PASS {
      // `serde_json` discards the repeated key, so solely check these decode
      if name.starts_with("y_object_duplicated_key") {
        let (value, _) = decode(encoding, &ParseOptions::default()).unwrap();
        assert_eq!(value.len(), Some(2), "{name}");
        continue;
      }

      let expected = serde_json::from_str::<serde_json::Value>(encoding).unwrap();
      tagjson_serde_json_tests::check_value(encoding, &expected);
    }
  }

  #[test]
  fn fail() {
    for (name, encoding) in FAIL {
      assert!(decode(encoding, &ParseOptions::default()).is_err(), "did not error for {name}");
    }
  }

  #[test]
  fn implementation_defined() {
    let options = ParseOptions::default();

    // Numbers beyond the range of an `f64` saturate to infinity
    let (value, _) = decode("[1.5e999]", &options).unwrap();
    assert_eq!(value.element(0).and_then(|number| number.as_f64()), Some(f64::INFINITY));
    let (value, _) = decode("[-123123e100000]", &options).unwrap();
    assert_eq!(value.element(0).and_then(|number| number.as_f64()), Some(f64::NEG_INFINITY));
    let (value, _) = decode("[123456789012345678901234567890]", &options).unwrap();
    assert!(value.element(0).and_then(|number| number.as_f64()).unwrap() > 1e29);

    // Lone surrogates aren't representable
    for encoding in [r#"["\uDADA"]"#, r#"["\uDd1ea"]"#, r#"["\uD800\n"]"#] {
      assert!(matches!(
        decode(encoding, &options),
        Err(JsonError::UnpairedSurrogate { .. })
      ));
    }

    // Nor is invalid UTF-8
    assert!(matches!(
      decode_bytes(b"[\"\xe0\xff\"]", &options),
      Err(JsonError::NotUtf8 { offset: 2 })
    ));
    assert!(matches!(decode_bytes(b"[\"\xe9\"]", &options), Err(JsonError::NotUtf8 { .. })));

    // Nesting is bounded by default, rejecting `n_structure_100000_opening_arrays` without
    // exhausting the stack
    let nested = |depth: usize| "[".repeat(depth) + &"]".repeat(depth);
    assert!(matches!(
      decode(&"[".repeat(100_000), &options),
      Err(JsonError::TooDeep { limit: tagjson::DEFAULT_MAX_DEPTH, .. })
    ));
    let (_, consumed) = decode(&nested(tagjson::DEFAULT_MAX_DEPTH), &options).unwrap();
    assert_eq!(consumed, 2 * tagjson::DEFAULT_MAX_DEPTH);
    assert!(matches!(
      decode(&nested(100), &options.with_max_depth(99)),
      Err(JsonError::TooDeep { limit: 99, offset: 99 })
    ));
    let (_, consumed) = decode(&nested(200), &options.without_max_depth()).unwrap();
    assert_eq!(consumed, 400);
  }
}
