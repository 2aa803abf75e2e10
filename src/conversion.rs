//! Conversions from V8 values to native Rust strings.
//!
//! Every function expects an entered context: pass the scope of the caller's
//! `ContextScope` (or a `TryCatch` built on top of it).

use crate::{Error, Result};
use v8;

/// Converts any value to a UTF-8 string using JavaScript's `String(value)`
/// coercion, so `42` becomes `"42"` and `true` becomes `"true"`.
///
/// Fails with [`Error::StringConversion`] when the coercion throws (symbols,
/// objects with a throwing `toString`). The exception is left pending for the
/// caller's `TryCatch`.
pub fn convert_to_string(
    scope: &mut v8::PinScope<'_, '_>,
    value: v8::Local<'_, v8::Value>,
) -> Result<String> {
    value_to_string(scope, value).ok_or(Error::StringConversion)
}

/// Converts an array into strings, appending them to `out` in index order.
///
/// Non-array values are rejected with [`Error::NotAnArray`]. Elements are
/// converted like [`convert_to_string`]; if any of them fails the call returns
/// [`Error::ElementConversion`]. On error `out` is left untouched.
pub fn convert_to_string_vector(
    scope: &mut v8::PinScope<'_, '_>,
    value: v8::Local<'_, v8::Value>,
    out: &mut Vec<String>,
) -> Result<()> {
    let array = v8::Local::<v8::Array>::try_from(value).map_err(|_| Error::NotAnArray)?;
    let len = array.length();
    // `length` is script controlled, sparse arrays can claim 2^32 - 1
    let mut converted = Vec::with_capacity(len.min(1024) as usize);

    for index in 0..len {
        let text = array
            .get_index(scope, index)
            .and_then(|element| value_to_string(scope, element))
            .ok_or(Error::ElementConversion { index })?;

        converted.push(text);
    }

    out.extend(converted);
    Ok(())
}

/// Shared by the public helpers and the error formatter, which only holds a
/// shared reference to its `TryCatch`.
pub(crate) fn value_to_string(
    scope: &v8::PinScope<'_, '_>,
    value: v8::Local<'_, v8::Value>,
) -> Option<String> {
    value
        .to_string(scope)
        .map(|s| s.to_rust_string_lossy(scope))
}
