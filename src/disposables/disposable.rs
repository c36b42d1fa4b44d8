//! # Disposable — one-shot cancellation token.
//!
//! [`Disposable`] wraps a teardown action that runs **exactly once**, the
//! first time [`Disposable::dispose`] is called. Every registration method on
//! [`Emitter`](crate::Emitter) returns one; disposing it unsubscribes the
//! listener it represents.
//!
//! ## Rules
//! - `dispose()` is idempotent: repeated calls are no-ops.
//! - Clones share one inner state; disposing any clone disposes them all.
//! - Dropping a `Disposable` does **not** run the action. Teardown is
//!   explicit, never tied to scope.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventum::Disposable;
//!
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&runs);
//! let handle = Disposable::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! handle.dispose();
//! handle.dispose();
//!
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! assert!(handle.is_disposed());
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// Teardown action held by a [`Disposable`] until its first `dispose()`.
type DisposalAction = Box<dyn FnOnce() + Send>;

/// One-shot cancellation token.
///
/// Cheap to clone; clones are views of the same token. The disposed flag and
/// the pending action live behind an `Arc`, so a wrapper (for example the
/// self-removing `once` listener) can hold the same handle as the caller.
#[derive(Clone)]
pub struct Disposable {
    inner: Arc<Inner>,
}

struct Inner {
    disposed: AtomicBool,
    action: Mutex<Option<DisposalAction>>,
}

impl Disposable {
    /// Creates a token that runs `action` on its first `dispose()`.
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(false),
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// Creates a token with no teardown action.
    ///
    /// Disposing it only flips the flag. Useful as a placeholder where a
    /// `Disposable` is expected but nothing has to be undone.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(false),
                action: Mutex::new(None),
            }),
        }
    }

    /// Runs the teardown action if it has not run yet.
    ///
    /// The first call (across all clones) takes the action out and invokes
    /// it; every later call returns immediately.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        // Take the action out before running it so a re-entrant dispose()
        // from inside the action observes the token as already disposed.
        let action = self.inner.action.lock().take();
        if let Some(action) = action {
            action();
        }
    }

    /// True once `dispose()` has been called on this token or any clone.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispose_runs_action_exactly_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let handle = Disposable::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!handle.is_disposed());
        handle.dispose();
        handle.dispose();
        handle.dispose();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(handle.is_disposed());
    }

    #[test]
    fn test_clones_share_state() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let handle = Disposable::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let twin = handle.clone();

        twin.dispose();

        assert!(handle.is_disposed());
        assert!(twin.is_disposed());
        handle.dispose();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_token_only_flips_flag() {
        let handle = Disposable::empty();
        assert!(!handle.is_disposed());
        handle.dispose();
        assert!(handle.is_disposed());
    }

    #[test]
    fn test_drop_does_not_run_action() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        {
            let _handle = Disposable::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
