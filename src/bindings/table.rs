use super::HostCallback;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::c_void;
use std::rc::{Rc, Weak};

/// A registered callback. The function's `External` data points at this.
pub(super) struct HostFunction {
    pub name: String,
    pub callback: HostCallback,
}

struct Entry {
    /// `None` once the owning V8 function has been collected.
    function: Option<Box<HostFunction>>,
    /// Keeps the GC finalizer armed for standalone functions.
    handle: Option<v8::Weak<v8::Function>>,
}

/// Per-isolate owner of every registered native callback.
///
/// Lives in an isolate slot, so callbacks are dropped with the isolate at the
/// latest. Only touched from the isolate's thread.
#[derive(Default)]
pub(crate) struct HostFunctionTable {
    entries: RefCell<HashMap<u64, Entry>>,
    next_id: Cell<u64>,
}

impl HostFunctionTable {
    /// Take ownership of `callback`. Returns its id and the stable address to
    /// hand to V8 as function data.
    pub(super) fn insert(&self, name: &str, callback: HostCallback) -> (u64, *mut c_void) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let function = Box::new(HostFunction {
            name: name.to_string(),
            callback,
        });
        let data = &*function as *const HostFunction as *mut c_void;

        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, entry| entry.function.is_some());
        entries.insert(
            id,
            Entry {
                function: Some(function),
                handle: None,
            },
        );

        (id, data)
    }

    /// Arm the weak handle whose finalizer will call [`Self::release`].
    pub(super) fn attach_handle(&self, id: u64, handle: v8::Weak<v8::Function>) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&id) {
            entry.handle = Some(handle);
        }
    }

    /// Drop the callback registered under `id`.
    ///
    /// The entry itself (and its weak handle) is pruned on the next insert,
    /// since this runs from inside the handle's own finalizer.
    pub(super) fn release(&self, id: u64) {
        let function = match self.entries.try_borrow_mut() {
            Ok(mut entries) => entries.get_mut(&id).and_then(|entry| entry.function.take()),
            Err(_) => {
                log::warn!("Host function table busy, keeping #{} until isolate drop", id);
                None
            }
        };

        if let Some(function) = function {
            log::trace!("Released host function `{}` (#{})", function.name, id);
        }
    }

    /// Number of callbacks currently owned.
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|entry| entry.function.is_some())
            .count()
    }

    /// Finalizer for a standalone function's weak handle.
    pub(super) fn finalizer(
        table: &Rc<HostFunctionTable>,
        id: u64,
    ) -> Box<dyn FnOnce(&mut v8::Isolate)> {
        // Weak: the finalizer is stored inside the table it points to
        let table: Weak<HostFunctionTable> = Rc::downgrade(table);

        Box::new(move |_isolate: &mut v8::Isolate| {
            if let Some(table) = table.upgrade() {
                table.release(id);
            }
        })
    }
}
