//! V8 embedding helpers for a JavaScript test runner.
//!
//! Thin adapters over the `v8` crate: a heap-backed ArrayBuffer allocator,
//! value-to-string conversions, script execution with readable error
//! descriptions, and native callbacks exposed as script functions.
//!
//! Apart from [`platform::init`] and [`create_isolate`], every function takes
//! the caller's scope and assumes an isolate, a handle scope and a context
//! are already entered.

pub mod allocator;
pub mod bindings;
pub mod config;
pub mod conversion;
pub mod error;
pub mod execution;
pub mod platform;

pub use allocator::{enable_typed_arrays, heap_allocator, is_typed_array_allocator_installed};
pub use bindings::{
    HostCallback, NativeFunction, callback, host_function_count,
    make_function, register_function, register_global_function,
};
pub use config::EngineConfig;
pub use conversion::{convert_to_string, convert_to_string_vector};
pub use error::{Error, Result};
pub use execution::{describe_error, execute_js};
pub use platform::create_isolate;
