//! Global V8 platform initialization and isolate creation.
//!
//! V8 can only be initialized once per process. This module provides
//! a single entry point for platform initialization used by all other modules.

use crate::EngineConfig;
use crate::allocator;
use crate::bindings;
use std::sync::OnceLock;
use v8;

static PLATFORM: OnceLock<v8::SharedRef<v8::Platform>> = OnceLock::new();

/// Get the global V8 platform, initializing it with `config` if necessary.
///
/// This is safe to call from multiple threads - the platform is only
/// initialized once and the same reference is returned to all callers.
/// Flags in `config` only take effect on the first call.
pub fn init(config: &EngineConfig) -> &'static v8::SharedRef<v8::Platform> {
    if let Some(platform) = PLATFORM.get() {
        if !config.v8_flags.is_empty() {
            log::debug!(
                "V8 platform already initialized, ignoring flags: {}",
                config.flags_string()
            );
        }

        return platform;
    }

    PLATFORM.get_or_init(|| {
        // Flags must be set before V8::initialize
        if !config.v8_flags.is_empty() {
            v8::V8::set_flags_from_string(&config.flags_string());
        }

        let platform = v8::new_default_platform(0, false).make_shared();
        v8::V8::initialize_platform(platform.clone());
        v8::V8::initialize();

        log::debug!(
            "Initialized V8 {} (flags: {:?})",
            v8::V8::get_version(),
            config.v8_flags
        );

        platform
    })
}

/// Create an isolate ready for the conversion, execution and binding helpers.
///
/// Initializes the platform if needed, applies the heap limits, attaches the
/// heap ArrayBuffer allocator when [`crate::enable_typed_arrays`] has been
/// called, and installs the host-function table.
///
/// The caller still owns scope management: enter a `HandleScope` and a
/// `ContextScope` before calling any helper.
pub fn create_isolate(config: &EngineConfig) -> v8::OwnedIsolate {
    init(config);

    let params = v8::CreateParams::default()
        .heap_limits(config.heap_initial_bytes(), config.heap_max_bytes());
    let params = allocator::attach(params);

    let mut isolate = v8::Isolate::new(params);
    bindings::install_host_function_table(&mut isolate);

    log::trace!(
        "Created isolate (heap {}MB..{}MB, heap allocator: {})",
        config.heap_initial_mb,
        config.heap_max_mb,
        allocator::is_typed_array_allocator_installed()
    );

    isolate
}
