//! # Process-wide listener-error hook.
//!
//! A single, crate-owned registry of handlers that are invoked whenever a
//! listener on **any** [`Emitter`](crate::Emitter) instance panics during a
//! synchronous emission pass. The registry outlives individual emitters and
//! is empty at program start.
//!
//! ## Routing
//! - Registry empty: the error propagates out of `emit` and the remaining
//!   snapshot entries are skipped.
//! - Registry non-empty: every handler runs, in registration order, and the
//!   emission continues with the next entry.
//!
//! ## Shared-state policy
//! This is the one sanctioned process-wide static in the crate: an explicit,
//! mutex-guarded list with handle-based lifecycle, never an ambient global
//! that grows behind the caller's back. Handlers are snapshot-cloned and
//! invoked outside the lock, so a handler may register or dispose handlers
//! re-entrantly; such changes apply from the next routed error onward.
//!
//! ## Example
//! ```rust
//! let hook = eventum::on_listener_error(|error| {
//!     eprintln!("listener failed: {}", error.as_message());
//! });
//!
//! // ... emissions on any emitter route panics through the hook ...
//!
//! hook.dispose();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::disposables::Disposable;
use crate::error::ListenerError;

type HandlerFn = Arc<dyn Fn(&ListenerError) + Send + Sync>;

struct HandlerEntry {
    id: u64,
    handler: HandlerFn,
}

/// Ordered handler list shared by every emitter instance.
static HANDLERS: Mutex<Vec<HandlerEntry>> = Mutex::new(Vec::new());

/// Monotonic ids for handler entries, used for handle-based removal.
static HANDLER_ID: AtomicU64 = AtomicU64::new(0);

/// Registers a process-wide handler for listener errors.
///
/// The handler runs for every routed error from every emitter instance, in
/// registration order, for as long as it stays registered. Disposing the
/// returned handle removes exactly this entry.
///
/// A handler that panics is not caught; the panic unwinds out of the
/// emission that routed the error.
pub fn on_listener_error(handler: impl Fn(&ListenerError) + Send + Sync + 'static) -> Disposable {
    let id = HANDLER_ID.fetch_add(1, Ordering::Relaxed);
    HANDLERS.lock().push(HandlerEntry {
        id,
        handler: Arc::new(handler),
    });
    Disposable::new(move || {
        HANDLERS.lock().retain(|entry| entry.id != id);
    })
}

/// Number of currently registered process-wide handlers.
#[must_use]
pub fn listener_error_handler_count() -> usize {
    HANDLERS.lock().len()
}

/// Fans `error` out to the registered handlers.
///
/// Returns `false` when the registry is empty, signalling the caller to
/// propagate the error instead.
pub(crate) fn dispatch(error: &ListenerError) -> bool {
    let snapshot: Vec<HandlerFn> = HANDLERS
        .lock()
        .iter()
        .map(|entry| Arc::clone(&entry.handler))
        .collect();
    if snapshot.is_empty() {
        return false;
    }
    for handler in snapshot {
        handler(error);
    }
    true
}

/// Serializes tests that observe or mutate the process-wide registry.
///
/// Any test relying on the registry being empty, or on a specific handler
/// set, must hold this guard for its whole body.
#[cfg(test)]
pub(crate) fn registry_test_guard() -> parking_lot::MutexGuard<'static, ()> {
    static GUARD: Mutex<()> = Mutex::new(());
    GUARD.lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let _serial = registry_test_guard();

        let order = Arc::new(Mutex::new(Vec::new()));
        let first = {
            let order = Arc::clone(&order);
            on_listener_error(move |_| order.lock().push(1))
        };
        let second = {
            let order = Arc::clone(&order);
            on_listener_error(move |_| order.lock().push(2))
        };

        let error = ListenerError::Rejected {
            reason: "boom".into(),
        };
        assert!(dispatch(&error));
        assert_eq!(*order.lock(), vec![1, 2]);

        first.dispose();
        second.dispose();
    }

    #[test]
    fn test_dispose_removes_exactly_one_entry() {
        let _serial = registry_test_guard();

        let hits = Arc::new(AtomicUsize::new(0));
        let first = {
            let hits = Arc::clone(&hits);
            on_listener_error(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        let second = {
            let hits = Arc::clone(&hits);
            on_listener_error(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        assert_eq!(listener_error_handler_count(), 2);

        first.dispose();
        first.dispose();
        assert_eq!(listener_error_handler_count(), 1);

        let error = ListenerError::Rejected {
            reason: "boom".into(),
        };
        assert!(dispatch(&error));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        second.dispose();
        assert_eq!(listener_error_handler_count(), 0);
    }

    #[test]
    fn test_dispatch_with_empty_registry_reports_unhandled() {
        let _serial = registry_test_guard();

        let error = ListenerError::Panicked {
            message: "unrouted".into(),
        };
        assert!(!dispatch(&error));
    }
}
