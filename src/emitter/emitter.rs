//! # Emitter — registration, emission, inspection.
//!
//! [`Emitter`] owns a per-event-name listener registry and drives ordered,
//! synchronous-by-default fan-out. Registration hands back a
//! [`Disposable`]; disposing it is the only way to unsubscribe.
//!
//! ## Architecture
//! ```text
//! on / preempt / once / on_async ──► registry (per-name channels)
//!                                        │
//! emit(name, &value) ───────────────► snapshot ──► invoke in order
//!                                        │            │ panic?
//!                                        │            ▼
//!                                        │     process-wide hook registry
//!                                        │     (non-empty: fan out, continue)
//!                                        │     (empty:     return Err, stop)
//!                                        │
//! emit_async(name, &value) ─────────► same pass, futures spawned detached
//!                                        └──► aggregate: all-resolved / first-rejection
//! ```
//!
//! ## Rules
//! - **Snapshot per emission**: the entry list is copied at the instant of
//!   the call. Listeners registered during an emission are not observed by
//!   it; entries disposed during it are skipped via their liveness flag.
//! - **Lock discipline**: the registry lock is held for bookkeeping only,
//!   never across a listener call, so listeners may register, dispose and
//!   emit re-entrantly.
//! - **Eager futures**: a future-producing listener has its future spawned
//!   on the tokio runtime at invocation time. `emit` detaches it outright;
//!   `emit_async` also awaits the spawned tasks in its aggregate.

use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::disposables::{CompositeDisposable, Disposable};
use crate::error::{EmitterError, ListenerError};

use super::exceptions;
use super::registry::{Callback, EmitterState, Group, ListenerFuture};

/// Result of one spawned listener future, as seen by the aggregate.
type SpawnedListener = JoinHandle<Result<(), ListenerError>>;

/// In-process event emitter, generic over the emitted value type.
///
/// One payload type per instance; listeners receive `&V`. The emitter is
/// `Send + Sync` and all methods take `&self`, so it can be shared behind an
/// `Arc` and driven from any thread or task.
///
/// ### Properties
/// - **Ordered fan-out**: preempt entries before normal entries, FIFO within
///   each band (see [`Emitter::preempt`]).
/// - **Disposal-based unsubscription**: every registration returns a
///   [`Disposable`]; no listener identity comparison ever happens, so
///   registering the same closure twice yields two independent entries.
/// - **Shared failure hook**: listener panics route through the process-wide
///   registry installed via [`on_listener_error`](crate::on_listener_error).
///
/// ### Example
/// ```rust
/// use eventum::Emitter;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let emitter = Emitter::<u32>::new();
///
///     let sub = emitter.on("ready", |value| {
///         println!("ready: {value}");
///     })?;
///
///     emitter.emit("ready", &7)?;
///     sub.dispose();
///     emitter.emit("ready", &8)?; // no listeners left; no-op
///     Ok(())
/// }
/// ```
pub struct Emitter<V = ()> {
    state: Arc<Mutex<EmitterState<V>>>,
    subscriptions: CompositeDisposable,
}

impl<V: 'static> Emitter<V> {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(EmitterState::new())),
            subscriptions: CompositeDisposable::new(),
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers `callback` in the normal band of `name`.
    ///
    /// The callback runs for every emission of `name` until the returned
    /// handle is disposed. Registration is visible to inspection
    /// immediately, but not to an emission already in progress.
    ///
    /// # Errors
    /// [`EmitterError::Disposed`] if [`Emitter::dispose`] has run; no state
    /// is mutated in that case.
    pub fn on(
        &self,
        name: &str,
        callback: impl Fn(&V) + Send + Sync + 'static,
    ) -> Result<Disposable, EmitterError> {
        self.register(name, Group::Normal, Callback::Sync(Box::new(callback)))
    }

    /// Registers `callback` in the preempt band of `name`.
    ///
    /// Preempt entries run before every normal entry of the same name on
    /// every future emission, regardless of relative registration time
    /// between the bands; within the band, registration order holds.
    ///
    /// # Errors
    /// [`EmitterError::Disposed`] if [`Emitter::dispose`] has run.
    pub fn preempt(
        &self,
        name: &str,
        callback: impl Fn(&V) + Send + Sync + 'static,
    ) -> Result<Disposable, EmitterError> {
        self.register(name, Group::Preempt, Callback::Sync(Box::new(callback)))
    }

    /// Registers `callback` in the normal band of `name`, firing at most once.
    ///
    /// The entry disposes itself as part of its first invocation, before the
    /// wrapped callback runs, so the callback fires exactly one time total
    /// even when emissions for `name` happen again afterwards or
    /// re-entrantly from inside the callback itself.
    ///
    /// # Errors
    /// [`EmitterError::Disposed`] if [`Emitter::dispose`] has run.
    pub fn once(
        &self,
        name: &str,
        callback: impl Fn(&V) + Send + Sync + 'static,
    ) -> Result<Disposable, EmitterError> {
        let fired = AtomicBool::new(false);
        // The wrapper needs its own registration handle to self-dispose, but
        // the handle only exists after registration; hand it over via a slot.
        let slot: Arc<OnceLock<Disposable>> = Arc::new(OnceLock::new());
        let wrapper_slot = Arc::clone(&slot);

        let wrapped = move |value: &V| {
            if fired.swap(true, Ordering::AcqRel) {
                return;
            }
            if let Some(own) = wrapper_slot.get() {
                own.dispose();
            }
            callback(value);
        };

        let handle = self.register(name, Group::Normal, Callback::Sync(Box::new(wrapped)))?;
        let _ = slot.set(handle.clone());
        Ok(handle)
    }

    /// Registers a future-producing callback in the normal band of `name`.
    ///
    /// The callback itself runs synchronously during the emission pass, in
    /// band order like any other entry; the future it returns is spawned on
    /// the tokio runtime. [`Emitter::emit`] detaches the spawned task;
    /// [`Emitter::emit_async`] additionally awaits it in the aggregate.
    ///
    /// # Errors
    /// [`EmitterError::Disposed`] if [`Emitter::dispose`] has run.
    ///
    /// # Example
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let emitter = eventum::Emitter::<String>::new();
    ///
    /// emitter.on_async("saved", |path| {
    ///     let path = path.clone();
    ///     async move {
    ///         // flush bookkeeping for `path`...
    ///         let _ = path;
    ///         Ok(())
    ///     }
    /// })?;
    ///
    /// emitter.emit_async("saved", &"notes.md".to_string()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn on_async<F, Fut>(&self, name: &str, callback: F) -> Result<Disposable, EmitterError>
    where
        F: Fn(&V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        self.register(name, Group::Normal, Self::deferred(callback))
    }

    /// Registers a future-producing callback in the preempt band of `name`.
    ///
    /// Same contract as [`Emitter::on_async`], with preempt ordering.
    ///
    /// # Errors
    /// [`EmitterError::Disposed`] if [`Emitter::dispose`] has run.
    pub fn preempt_async<F, Fut>(&self, name: &str, callback: F) -> Result<Disposable, EmitterError>
    where
        F: Fn(&V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        self.register(name, Group::Preempt, Self::deferred(callback))
    }

    fn deferred<F, Fut>(callback: F) -> Callback<V>
    where
        F: Fn(&V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        Callback::Deferred(Box::new(move |value: &V| -> ListenerFuture {
            Box::pin(callback(value))
        }))
    }

    fn register(
        &self,
        name: &str,
        group: Group,
        callback: Callback<V>,
    ) -> Result<Disposable, EmitterError> {
        let (name_key, seq) = {
            let mut state = self.state.lock();
            if state.disposed {
                return Err(EmitterError::Disposed);
            }
            state.insert(name, group, callback)
        };

        let state_ref = Arc::clone(&self.state);
        let handle = Disposable::new(move || {
            state_ref.lock().remove(&name_key, seq);
        });
        self.subscriptions.add(handle.clone());
        Ok(handle)
    }

    // ---------------------------
    // Emission
    // ---------------------------

    /// Emits `value` to every listener currently registered for `name`.
    ///
    /// Takes a snapshot of the channel at call time and invokes each
    /// still-active entry in order: preempt band first, then normal band,
    /// FIFO within each. Unknown or empty names are a no-op.
    ///
    /// Futures returned by [`Emitter::on_async`] listeners are spawned
    /// detached; their outcome is not observed here. Call this variant only
    /// from within a tokio runtime when such listeners are registered.
    ///
    /// # Errors
    /// [`ListenerError::Panicked`] when a listener panics and the
    /// process-wide handler registry is empty; entries after the panicking
    /// one are not invoked. With at least one handler registered, the error
    /// is fanned out to the handlers instead and emission continues.
    pub fn emit(&self, name: &str, value: &V) -> Result<(), ListenerError> {
        self.run_pass(name, value, None)
    }

    /// Emits `value` and returns a future aggregating the listener futures.
    ///
    /// The synchronous pass happens eagerly, inside this call, with exactly
    /// the ordering and panic routing of [`Emitter::emit`]; each
    /// listener-returned future is spawned as a detached tokio task at its
    /// invocation point. The returned aggregate:
    ///
    /// - resolves with `Ok(())` once every spawned task has resolved;
    /// - rejects with the first rejection (or listener-task panic) to
    ///   complete, without awaiting the remaining tasks. They are not
    ///   cancelled, merely no longer awaited.
    ///
    /// An unrouted panic from the synchronous pass surfaces through the
    /// aggregate as well; tasks spawned before the panicking entry keep
    /// running detached.
    pub fn emit_async(
        &self,
        name: &str,
        value: &V,
    ) -> impl Future<Output = Result<(), ListenerError>> + Send + 'static {
        let mut tasks = Vec::new();
        let pass = self.run_pass(name, value, Some(&mut tasks));

        async move {
            pass?;
            let mut pending: FuturesUnordered<SpawnedListener> = tasks.into_iter().collect();
            while let Some(joined) = pending.next().await {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => return Err(error),
                    Err(join_error) if join_error.is_panic() => {
                        return Err(ListenerError::from_panic(join_error.into_panic()));
                    }
                    Err(join_error) => {
                        return Err(ListenerError::Rejected {
                            reason: join_error.to_string(),
                        });
                    }
                }
            }
            Ok(())
        }
    }

    /// One synchronous emission pass over the snapshot for `name`.
    ///
    /// `collected` is `Some` for `emit_async`, which awaits the spawned
    /// tasks; `None` for `emit`, which detaches them.
    fn run_pass(
        &self,
        name: &str,
        value: &V,
        mut collected: Option<&mut Vec<SpawnedListener>>,
    ) -> Result<(), ListenerError> {
        let snapshot = self.state.lock().snapshot(name);

        for entry in snapshot {
            if !entry.is_active() {
                continue;
            }
            match &entry.callback {
                Callback::Sync(callback) => {
                    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
                        let error = ListenerError::from_panic(payload);
                        if !exceptions::dispatch(&error) {
                            return Err(error);
                        }
                    }
                }
                Callback::Deferred(produce) => {
                    match catch_unwind(AssertUnwindSafe(|| produce(value))) {
                        Ok(future) => {
                            let task = tokio::spawn(future);
                            if let Some(tasks) = collected.as_mut() {
                                tasks.push(task);
                            }
                        }
                        Err(payload) => {
                            let error = ListenerError::from_panic(payload);
                            if !exceptions::dispatch(&error) {
                                return Err(error);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ---------------------------
    // Inspection and bulk operations
    // ---------------------------

    /// Names with at least one active listener, in the order each name most
    /// recently became non-empty.
    #[must_use]
    pub fn event_names(&self) -> Vec<Arc<str>> {
        self.state.lock().names()
    }

    /// Number of active listeners for `name`; 0 for unknown names.
    #[must_use]
    pub fn listener_count_for(&self, name: &str) -> usize {
        self.state.lock().count_for(name)
    }

    /// Total number of active listeners across all names.
    #[must_use]
    pub fn total_listener_count(&self) -> usize {
        self.state.lock().total()
    }

    /// True once [`Emitter::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Removes every listener for every name on this instance.
    ///
    /// Subsequent emissions are no-ops until new registrations occur; an
    /// emission already in progress skips the cleared entries. Outstanding
    /// handles are **not** marked disposed; disposing one later is a safe
    /// no-op. The process-wide handler registry is untouched.
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    /// Disposes the instance: every handle it issued becomes disposed and
    /// the registries are released.
    ///
    /// Further registrations fail with [`EmitterError::Disposed`]; further
    /// emissions are no-ops. Idempotent.
    pub fn dispose(&self) {
        {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
        }
        // Handle teardown actions re-acquire the state lock one by one.
        self.subscriptions.dispose();
        self.state.lock().clear();
    }
}

impl<V: 'static> Default for Emitter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Emitter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Emitter")
            .field("event_names", &state.names().len())
            .field("listeners", &state.total())
            .field("disposed", &state.disposed)
            .finish()
    }
}
