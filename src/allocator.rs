//! Heap-backed V8 ArrayBuffer allocator.
//!
//! V8 asks the embedder for the memory behind every `ArrayBuffer` (and so
//! every `Uint8Array`, `Float64Array`, ...). This shim hands out plain C heap
//! blocks, which lets test scripts use binary data without the isolate owning
//! a private arena.
//!
//! ## How it works
//!
//! 1. [`enable_typed_arrays`] flips the process-wide switch, once.
//! 2. Every isolate created afterwards through [`crate::create_isolate`] (or
//!    [`attach`]) gets an allocator bound to the shim.
//! 3. V8 calls `allocate()` / `allocate_uninitialized()` for new buffers and
//!    `free()` when a buffer is garbage collected.
//! 4. If the C heap returns NULL, V8 throws
//!    `RangeError: Array buffer allocation failed`.

use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};
use v8::{RustAllocatorVtable, UniqueRef};

static INSTALLED: AtomicBool = AtomicBool::new(false);

static HEAP_ALLOCATOR: HeapAllocator = HeapAllocator;

/// Stateless ArrayBuffer allocator backed by `calloc`/`malloc`/`free`.
///
/// There is nothing to synchronize: every call goes straight to the C heap,
/// which is already thread-safe, so V8 may call in from any thread.
pub struct HeapAllocator;

impl HeapAllocator {
    /// Convert to a V8 allocator for use in `CreateParams`.
    pub fn into_v8_allocator(&'static self) -> UniqueRef<v8::Allocator> {
        let vtable: &'static RustAllocatorVtable<HeapAllocator> = &RustAllocatorVtable {
            allocate,
            allocate_uninitialized,
            free,
            drop,
        };

        unsafe { v8::new_rust_allocator(self as *const HeapAllocator, vtable) }
    }
}

/// Install the heap allocator for every isolate created from now on.
///
/// Returns `true` if this call performed the installation. Later calls are
/// no-ops; there is no way to uninstall.
pub fn enable_typed_arrays() -> bool {
    let already_installed = INSTALLED.swap(true, Ordering::SeqCst);

    if already_installed {
        log::debug!("Heap ArrayBuffer allocator already installed, ignoring");
    } else {
        log::debug!("Installed heap ArrayBuffer allocator");
    }

    !already_installed
}

/// Whether [`enable_typed_arrays`] has been called in this process.
pub fn is_typed_array_allocator_installed() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// A fresh V8 allocator handle bound to the shared heap shim.
///
/// For hosts that build their own `v8::CreateParams`.
pub fn heap_allocator() -> UniqueRef<v8::Allocator> {
    HEAP_ALLOCATOR.into_v8_allocator()
}

/// Attach the heap allocator to `params` if typed arrays are enabled.
pub fn attach(params: v8::CreateParams) -> v8::CreateParams {
    if is_typed_array_allocator_installed() {
        params.array_buffer_allocator(heap_allocator())
    } else {
        params
    }
}

/// Sizes requested through the shim, so tests can tell it apart from V8's
/// default allocator.
#[cfg(test)]
static REQUESTED: std::sync::Mutex<Vec<usize>> = std::sync::Mutex::new(Vec::new());

#[cfg(test)]
fn record(n: usize) {
    if let Ok(mut requested) = REQUESTED.lock() {
        requested.push(n);
    }
}

#[cfg(not(test))]
fn record(_n: usize) {}

/// Called by V8 for `new ArrayBuffer(n)` and friends. Returns zeroed memory.
unsafe extern "C" fn allocate(_allocator: &HeapAllocator, n: usize) -> *mut c_void {
    record(n);

    // calloc(0) may legitimately return NULL, which V8 would read as OOM
    let data = unsafe { libc::calloc(n.max(1), 1) };

    if data.is_null() {
        log::warn!("ArrayBuffer allocation of {} bytes failed", n);
    }

    data
}

/// Same as `allocate` without zeroing; V8 initializes the contents itself.
unsafe extern "C" fn allocate_uninitialized(_allocator: &HeapAllocator, n: usize) -> *mut c_void {
    record(n);

    let data = unsafe { libc::malloc(n.max(1)) };

    if data.is_null() {
        log::warn!("Uninitialized ArrayBuffer allocation of {} bytes failed", n);
    }

    data
}

/// Called by V8 when an ArrayBuffer is garbage collected.
unsafe extern "C" fn free(_allocator: &HeapAllocator, data: *mut c_void, _n: usize) {
    // SAFETY: data came from calloc/malloc above
    unsafe { libc::free(data) };
}

/// The shim is a static, there is nothing to release.
unsafe extern "C" fn drop(_allocator: *const HeapAllocator) {}
