//! Script execution and error description.
//!
//! [`execute_js`] never installs its own `TryCatch`: exceptions stay visible
//! to whatever `TryCatch` the caller has on the stack, and [`describe_error`]
//! turns a populated one into a readable message.

use crate::conversion::value_to_string;
use crate::{Error, Result};
use v8;

/// Compile and run `source` as a classic script in the current context.
///
/// Returns the completion value of the script, or `None` if compilation or
/// execution threw. A non-empty `filename` is recorded as the script's
/// resource name, so it shows up in stack traces and error locations.
///
/// A `source` or `filename` longer than V8's maximum string length throws a
/// `RangeError` into the caller's `TryCatch` instead of compiling.
pub fn execute_js<'s>(
    scope: &mut v8::PinScope<'s, '_>,
    source: &str,
    filename: &str,
) -> Option<v8::Local<'s, v8::Value>> {
    let Some(code) = v8::String::new(scope, source) else {
        throw_range_error(scope, "Script source exceeds the maximum string length");
        return None;
    };

    let origin = if filename.is_empty() {
        None
    } else {
        let Some(origin) = script_origin(scope, filename) else {
            throw_range_error(scope, "Script filename exceeds the maximum string length");
            return None;
        };
        Some(origin)
    };

    log::trace!(
        "Executing {} bytes of JavaScript ({})",
        source.len(),
        if filename.is_empty() { "<no filename>" } else { filename }
    );

    let script = v8::Script::compile(scope, code, origin.as_ref())?;
    script.run(scope)
}

fn throw_range_error(scope: &mut v8::PinScope<'_, '_>, message: &str) {
    log::warn!("{}", message);

    if let Some(message) = v8::String::new(scope, message) {
        let exception = v8::Exception::range_error(scope, message);
        scope.throw_exception(exception);
    }
}

fn script_origin<'s>(
    scope: &mut v8::PinScope<'s, '_>,
    filename: &str,
) -> Option<v8::ScriptOrigin<'s>> {
    let resource_name = v8::String::new(scope, filename)?;

    Some(v8::ScriptOrigin::new(
        scope,
        resource_name.into(),
        0,
        0,
        false,
        0,
        None,
        false,
        false,
        false,
        None,
    ))
}

/// Describe the exception caught by `try_catch`.
///
/// The format is `<file>:<line>: <description>`, where the description is the
/// exception's stack trace when V8 recorded one (it already starts with the
/// error message) and `String(exception)` otherwise. Scripts run without a
/// filename are reported as `line <line>: <description>`.
///
/// Returns [`Error::NothingCaught`] if nothing was thrown.
pub fn describe_error(try_catch: &v8::PinnedRef<v8::TryCatch<v8::HandleScope>>) -> Result<String> {
    if !try_catch.has_caught() {
        return Err(Error::NothingCaught);
    }

    let description = try_catch
        .stack_trace()
        .filter(|stack| stack.is_string())
        .and_then(|stack| value_to_string(try_catch, stack))
        .or_else(|| {
            try_catch
                .exception()
                .and_then(|exception| value_to_string(try_catch, exception))
        })
        .unwrap_or_else(|| "Unknown exception".to_string());

    let Some(message) = try_catch.message() else {
        return Ok(description);
    };

    let line = message.get_line_number(try_catch).unwrap_or(0);

    let filename = message
        .get_script_resource_name(try_catch)
        .filter(|name| !name.is_null_or_undefined())
        .and_then(|name| value_to_string(try_catch, name))
        .filter(|name| !name.is_empty());

    Ok(match filename {
        Some(filename) => format!("{}:{}: {}", filename, line, description),
        None => format!("line {}: {}", line, description),
    })
}
