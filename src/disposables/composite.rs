//! # CompositeDisposable — bulk handle management.
//!
//! [`CompositeDisposable`] collects [`Disposable`] tokens so a whole group
//! can be torn down with one call. The emitter uses one internally to mark
//! every handle it issued as disposed when the instance itself is disposed;
//! callers can use it the same way to scope a batch of subscriptions.
//!
//! ## Rules
//! - `dispose()` disposes every member, once; the composite stays disposed.
//! - `add()` on a disposed composite disposes the new token immediately.
//! - Already-disposed members are pruned on `add()`, so a long-lived
//!   composite does not accumulate dead tokens.

use parking_lot::Mutex;

use super::disposable::Disposable;

/// Bulk container of [`Disposable`] tokens.
pub struct CompositeDisposable {
    state: Mutex<State>,
}

struct State {
    disposed: bool,
    members: Vec<Disposable>,
}

impl CompositeDisposable {
    /// Creates an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                disposed: false,
                members: Vec::new(),
            }),
        }
    }

    /// Adds a token to the composite.
    ///
    /// If the composite has already been disposed, the token is disposed
    /// immediately instead of being stored.
    pub fn add(&self, disposable: Disposable) {
        {
            let mut state = self.state.lock();
            if !state.disposed {
                state.members.retain(|member| !member.is_disposed());
                state.members.push(disposable);
                return;
            }
        }
        disposable.dispose();
    }

    /// Disposes every member and marks the composite disposed.
    ///
    /// Members are drained under the lock but disposed outside it, so a
    /// teardown action may safely touch this composite again.
    pub fn dispose(&self) {
        let members = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            std::mem::take(&mut state.members)
        };
        for member in members {
            member.dispose();
        }
    }

    /// Removes all members without disposing them.
    pub fn clear(&self) {
        self.state.lock().members.clear();
    }

    /// Number of live (not yet disposed) members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .members
            .iter()
            .filter(|member| !member.is_disposed())
            .count()
    }

    /// True if the composite holds no live members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once `dispose()` has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }
}

impl Default for CompositeDisposable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(runs: &Arc<AtomicUsize>) -> Disposable {
        let counter = Arc::clone(runs);
        Disposable::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_dispose_disposes_all_members_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let composite = CompositeDisposable::new();
        composite.add(counting(&runs));
        composite.add(counting(&runs));
        composite.add(counting(&runs));
        assert_eq!(composite.len(), 3);

        composite.dispose();
        composite.dispose();

        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert!(composite.is_disposed());
        assert!(composite.is_empty());
    }

    #[test]
    fn test_add_after_dispose_disposes_immediately() {
        let runs = Arc::new(AtomicUsize::new(0));
        let composite = CompositeDisposable::new();
        composite.dispose();

        let late = counting(&runs);
        composite.add(late.clone());

        assert!(late.is_disposed());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(composite.is_empty());
    }

    #[test]
    fn test_add_prunes_disposed_members() {
        let runs = Arc::new(AtomicUsize::new(0));
        let composite = CompositeDisposable::new();

        let first = counting(&runs);
        composite.add(first.clone());
        first.dispose();
        assert_eq!(composite.len(), 0);

        composite.add(counting(&runs));
        assert_eq!(composite.len(), 1);
    }

    #[test]
    fn test_clear_removes_without_disposing() {
        let runs = Arc::new(AtomicUsize::new(0));
        let composite = CompositeDisposable::new();
        let member = counting(&runs);
        composite.add(member.clone());

        composite.clear();

        assert!(composite.is_empty());
        assert!(!member.is_disposed());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
