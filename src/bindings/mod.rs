//! Native callbacks exposed to scripts.
//!
//! A callback is moved into [`register_function`] or [`make_function`] and
//! from then on belongs to the isolate's host-function table. V8 only sees a
//! shared trampoline plus an `External` pointing at the table entry.
//!
//! ```ignore
//! let add = callback(|scope, args| {
//!     let a = args.get(0).number_value(scope).unwrap_or(0.0);
//!     let b = args.get(1).number_value(scope).unwrap_or(0.0);
//!     v8::Number::new(scope, a + b).into()
//! });
//! register_global_function(scope, "add", add)?;
//! ```

mod table;

use crate::{Error, Result};
use std::rc::Rc;
use table::{HostFunction, HostFunctionTable};

/// Native behaviour callable from script.
///
/// The returned handle becomes the result of the script call.
pub trait NativeFunction: 'static {
    fn call<'s>(
        &self,
        scope: &mut v8::PinScope<'s, '_>,
        args: &v8::FunctionCallbackArguments<'s>,
    ) -> v8::Local<'s, v8::Value>;
}

impl<F> NativeFunction for F
where
    F: for<'s, 'i> Fn(
            &mut v8::PinScope<'s, 'i>,
            &v8::FunctionCallbackArguments<'s>,
        ) -> v8::Local<'s, v8::Value>
        + 'static,
{
    fn call<'s>(
        &self,
        scope: &mut v8::PinScope<'s, '_>,
        args: &v8::FunctionCallbackArguments<'s>,
    ) -> v8::Local<'s, v8::Value> {
        self(scope, args)
    }
}

/// Uniquely owned callback, consumed by registration.
pub type HostCallback = Box<dyn NativeFunction>;

/// Box a closure as a [`HostCallback`], letting the compiler infer its
/// argument types.
pub fn callback<F>(f: F) -> HostCallback
where
    F: for<'s, 'i> Fn(
            &mut v8::PinScope<'s, 'i>,
            &v8::FunctionCallbackArguments<'s>,
        ) -> v8::Local<'s, v8::Value>
        + 'static,
{
    Box::new(f)
}

/// Put an empty host-function table in the isolate's slot.
pub(crate) fn install_host_function_table(isolate: &mut v8::Isolate) {
    if isolate.get_slot::<Rc<HostFunctionTable>>().is_none() {
        isolate.set_slot(Rc::new(HostFunctionTable::default()));
    }
}

/// The isolate's table, created on first use for isolates that did not come
/// from [`crate::create_isolate`].
fn host_function_table(scope: &mut v8::PinScope<'_, '_>) -> Rc<HostFunctionTable> {
    if let Some(table) = scope.get_slot::<Rc<HostFunctionTable>>() {
        return table.clone();
    }

    let table = Rc::new(HostFunctionTable::default());
    scope.set_slot(table.clone());
    table
}

/// Number of callbacks currently owned by the scope's isolate.
pub fn host_function_count(scope: &mut v8::PinScope<'_, '_>) -> usize {
    host_function_table(scope).len()
}

/// Shared trampoline behind every registered function.
fn invoke_host_function<'s>(
    scope: &mut v8::PinScope<'s, '_>,
    args: v8::FunctionCallbackArguments<'s>,
    mut retval: v8::ReturnValue<'s>,
) {
    let Ok(external) = v8::Local::<v8::External>::try_from(args.data()) else {
        return;
    };

    // SAFETY: the data of every function built here points at a HostFunction
    // owned by the isolate's table, which outlives the function.
    let function = unsafe { &*(external.value() as *const HostFunction) };

    log::trace!(
        "Calling host function `{}` with {} argument(s)",
        function.name,
        args.length()
    );

    let result = function.callback.call(scope, &args);
    retval.set(result);
}

/// Export `callback` as a function property `name` on `template`.
///
/// Every object instantiated from `template` gets the property. The callback
/// is owned by the isolate for the rest of its life.
pub fn register_function(
    scope: &mut v8::PinScope<'_, '_>,
    name: &str,
    callback: HostCallback,
    template: v8::Local<'_, v8::ObjectTemplate>,
) -> Result<()> {
    let key = v8::String::new(scope, name).ok_or(Error::StringAllocation)?;

    let (id, data) = host_function_table(scope).insert(name, callback);
    let external = v8::External::new(scope, data);

    let function_template = v8::FunctionTemplate::builder(invoke_host_function)
        .data(external.into())
        .build(scope);
    function_template.set_class_name(key);

    template.set(key.into(), function_template.into());

    log::trace!("Registered host function `{}` (#{}) on template", name, id);
    Ok(())
}

/// Create a standalone function named `name` that calls `callback`.
///
/// The callback is released when V8 collects the function, or when the
/// isolate is dropped.
pub fn make_function<'s>(
    scope: &mut v8::PinScope<'s, '_>,
    name: &str,
    callback: HostCallback,
) -> Result<v8::Local<'s, v8::Function>> {
    let function_name = v8::String::new(scope, name).ok_or(Error::StringAllocation)?;

    let table = host_function_table(scope);
    let (id, data) = table.insert(name, callback);
    let external = v8::External::new(scope, data);

    let Some(function) = v8::Function::builder(invoke_host_function)
        .data(external.into())
        .build(scope)
    else {
        table.release(id);
        return Err(Error::FunctionCreation(name.to_string()));
    };
    function.set_name(function_name);

    let handle =
        v8::Weak::with_finalizer(scope, function, HostFunctionTable::finalizer(&table, id));
    table.attach_handle(id, handle);

    log::trace!("Created host function `{}` (#{})", name, id);
    Ok(function)
}

/// [`make_function`], then store the result as `globalThis[name]`.
pub fn register_global_function(
    scope: &mut v8::PinScope<'_, '_>,
    name: &str,
    callback: HostCallback,
) -> Result<()> {
    let function = make_function(scope, name, callback)?;

    let global = scope.get_current_context().global(scope);
    let key = v8::String::new(scope, name).ok_or(Error::StringAllocation)?;
    global.set(scope, key.into(), function.into());

    Ok(())
}
