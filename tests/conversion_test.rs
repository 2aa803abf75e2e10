mod common;

use common::{eval, with_context};
use jstest_runtime_v8::{Error, convert_to_string, convert_to_string_vector, describe_error};
use std::pin::pin;

#[test]
fn test_string_round_trip() {
    with_context(|scope| {
        for text in ["", "hello", "multi word string", "héllo wörld", "日本語", "emoji 🎉"] {
            let value = v8::String::new(scope, text).unwrap();
            assert_eq!(convert_to_string(scope, value.into()).unwrap(), text);
        }
    });
}

#[test]
fn test_numbers_and_booleans_use_js_coercion() {
    with_context(|scope| {
        let cases = [
            ("42", "42"),
            ("1.5", "1.5"),
            ("-0", "0"),
            ("1e21", "1e+21"),
            ("NaN", "NaN"),
            ("true", "true"),
            ("false", "false"),
            ("null", "null"),
            ("undefined", "undefined"),
        ];

        for (code, expected) in cases {
            let value = eval(scope, code);
            assert_eq!(convert_to_string(scope, value).unwrap(), expected, "{}", code);
        }
    });
}

#[test]
fn test_objects_use_to_string() {
    with_context(|scope| {
        let value = eval(scope, "({ toString() { return 'custom'; } })");
        assert_eq!(convert_to_string(scope, value).unwrap(), "custom");

        let value = eval(scope, "[1, 2, 3]");
        assert_eq!(convert_to_string(scope, value).unwrap(), "1,2,3");

        let value = eval(scope, "({})");
        assert_eq!(convert_to_string(scope, value).unwrap(), "[object Object]");
    });
}

#[test]
fn test_symbol_fails_to_convert() {
    with_context(|scope| {
        let value = eval(scope, "Symbol('nope')");

        let tc = pin!(v8::TryCatch::new(scope));
        let mut tc = tc.init();

        assert_eq!(convert_to_string(&mut tc, value), Err(Error::StringConversion));

        // The TypeError stays pending for the caller
        assert!(tc.has_caught());
        let description = describe_error(&tc).unwrap();
        assert!(description.contains("Symbol"), "{}", description);
    });
}

#[test]
fn test_string_vector() {
    with_context(|scope| {
        let value = eval(scope, "['a', 'b', 'c']");
        let mut out = Vec::new();

        convert_to_string_vector(scope, value, &mut out).unwrap();
        assert_eq!(out, vec!["a", "b", "c"]);
    });
}

#[test]
fn test_string_vector_coerces_elements() {
    with_context(|scope| {
        let value = eval(scope, "[1, true, null, undefined, 'x', [2, 3]]");
        let mut out = Vec::new();

        convert_to_string_vector(scope, value, &mut out).unwrap();
        assert_eq!(out, vec!["1", "true", "null", "undefined", "x", "2,3"]);
    });
}

#[test]
fn test_string_vector_holes_are_undefined() {
    with_context(|scope| {
        let value = eval(scope, "[1, , 3]");
        let mut out = Vec::new();

        convert_to_string_vector(scope, value, &mut out).unwrap();
        assert_eq!(out, vec!["1", "undefined", "3"]);
    });
}

#[test]
fn test_string_vector_huge_sparse_length() {
    with_context(|scope| {
        // Fails on the first element instead of reserving 2^32 - 1 slots
        let value = eval(scope, "const a = []; a.length = 2 ** 32 - 1; a[0] = Symbol('x'); a");
        let mut out = Vec::new();

        assert_eq!(
            convert_to_string_vector(scope, value, &mut out),
            Err(Error::ElementConversion { index: 0 })
        );
        assert!(out.is_empty());
    });
}

#[test]
fn test_string_vector_appends() {
    with_context(|scope| {
        let value = eval(scope, "['b', 'c']");
        let mut out = vec!["a".to_string()];

        convert_to_string_vector(scope, value, &mut out).unwrap();
        assert_eq!(out, vec!["a", "b", "c"]);
    });
}

#[test]
fn test_string_vector_empty_array() {
    with_context(|scope| {
        let value = eval(scope, "[]");
        let mut out = Vec::new();

        convert_to_string_vector(scope, value, &mut out).unwrap();
        assert!(out.is_empty());
    });
}

#[test]
fn test_string_vector_rejects_non_arrays() {
    with_context(|scope| {
        for code in ["'abc'", "42", "({ length: 2, 0: 'a', 1: 'b' })", "undefined"] {
            let value = eval(scope, code);
            let mut out = vec!["kept".to_string()];

            assert_eq!(
                convert_to_string_vector(scope, value, &mut out),
                Err(Error::NotAnArray),
                "{}",
                code
            );
            assert_eq!(out, vec!["kept"]);
        }
    });
}

#[test]
fn test_string_vector_element_failure_leaves_output_untouched() {
    with_context(|scope| {
        let value = eval(scope, "['a', Symbol('b'), 'c']");
        let mut out = Vec::new();

        assert_eq!(
            convert_to_string_vector(scope, value, &mut out),
            Err(Error::ElementConversion { index: 1 })
        );
        assert!(out.is_empty());
    });
}
