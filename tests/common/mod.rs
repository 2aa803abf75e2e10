#![allow(dead_code)]

use jstest_runtime_v8::{EngineConfig, create_isolate};
use std::pin::pin;

/// Runs `f` inside a fresh isolate with an entered context.
pub fn with_context<R>(f: impl FnOnce(&mut v8::PinScope) -> R) -> R {
    let mut isolate = create_isolate(&EngineConfig::default());
    in_context(&mut isolate, f)
}

/// Runs `f` in a new handle scope and context on an existing isolate.
///
/// Every handle created by `f` is gone once this returns, so the caller can
/// trigger GC on `isolate` between calls.
pub fn in_context<R>(isolate: &mut v8::OwnedIsolate, f: impl FnOnce(&mut v8::PinScope) -> R) -> R {
    let scope = pin!(v8::HandleScope::new(isolate));
    let mut scope = scope.init();
    let context = v8::Context::new(&scope, Default::default());
    let scope = &mut v8::ContextScope::new(&mut scope, context);

    f(scope)
}

/// Evaluates `code`, panicking on script errors.
pub fn eval<'s>(scope: &mut v8::PinScope<'s, '_>, code: &str) -> v8::Local<'s, v8::Value> {
    let code_str = v8::String::new(scope, code).unwrap();
    let script = v8::Script::compile(scope, code_str, None).unwrap();
    script.run(scope).unwrap()
}
