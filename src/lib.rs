//! # eventum
//!
//! **Eventum** is a lightweight in-process event emission library for Rust.
//!
//! It provides a synchronous-by-default publish/subscribe primitive:
//! callers register named-event listeners and later emit values under a
//! name, triggering ordered invocation of every listener registered for
//! that name at that instant.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   on("save", f)  preempt("save", g)  once("open", h)  on_async("save", k)
//!        │               │                  │                 │
//!        ▼               ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Emitter<V>                                                       │
//! │  - per-name channels: [preempt band | normal band], FIFO each     │
//! │  - every registration → Disposable (the only way to unsubscribe)  │
//! └──────────────┬───────────────────────────────┬────────────────────┘
//!                │ emit("save", &v)              │ emit_async("save", &v)
//!                ▼                               ▼
//!      snapshot → invoke in order      same pass + spawn listener futures
//!                │ panic?                        │
//!                ▼                               ▼
//! ┌─────────────────────────────┐   aggregate future:
//! │ process-wide hook registry  │   - Ok once every task resolved
//! │ (on_listener_error, shared  │   - Err on first rejection, without
//! │  by all emitter instances)  │     awaiting the rest (not cancelled)
//! └─────────────────────────────┘
//! ```
//!
//! ### Emission pass
//! ```text
//! emit(name, &value):
//!   ├─► snapshot = channel[name] (preempt band, then normal band)
//!   ├─► for entry in snapshot:
//!   │     ├─ disposed meanwhile?  ──► skip
//!   │     ├─ invoke callback with &value (catch_unwind)
//!   │     │     ├─ Ok            ──► continue
//!   │     │     └─ panic:
//!   │     │          ├─ hooks registered ──► fan out, continue
//!   │     │          └─ none              ──► return Err, stop pass
//!   │     └─ future-producing entry ──► tokio::spawn (detached)
//!   └─► Ok(())
//! ```
//!
//! ## Features
//! | Area               | Description                                                       | Key types / functions                    |
//! |--------------------|-------------------------------------------------------------------|------------------------------------------|
//! | **Registration**   | Priority bands, one-shot listeners, future-producing listeners.   | [`Emitter::on`], [`Emitter::preempt`], [`Emitter::once`], [`Emitter::on_async`] |
//! | **Emission**       | Ordered synchronous fan-out; async aggregation variant.           | [`Emitter::emit`], [`Emitter::emit_async`] |
//! | **Disposal**       | Handle-based unsubscription, bulk teardown.                       | [`Disposable`], [`CompositeDisposable`]  |
//! | **Error routing**  | Process-wide hook shared by every emitter instance.               | [`on_listener_error`], [`ListenerError`] |
//! | **Inspection**     | Live listener accounting per name and in total.                   | [`Emitter::event_names`], [`Emitter::total_listener_count`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`ErrorLogger`] hook _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use eventum::Emitter;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let emitter = Emitter::<String>::new();
//!
//!     // Normal listeners run in registration order...
//!     emitter.on("file-opened", |path| {
//!         println!("opened: {path}");
//!     })?;
//!
//!     // ...but preempt listeners always run first.
//!     emitter.preempt("file-opened", |path| {
//!         println!("about to open: {path}");
//!     })?;
//!
//!     // One-shot listener: disposes itself on first invocation.
//!     let greeting = emitter.once("file-opened", |_| {
//!         println!("first open!");
//!     })?;
//!
//!     emitter.emit("file-opened", &"notes.md".to_string())?;
//!     emitter.emit("file-opened", &"todo.md".to_string())?;
//!
//!     assert!(greeting.is_disposed());
//!     emitter.dispose();
//!     Ok(())
//! }
//! ```

mod disposables;
mod emitter;
mod error;

// ---- Public re-exports ----

pub use disposables::{CompositeDisposable, Disposable};
pub use emitter::{Emitter, listener_error_handler_count, on_listener_error};
pub use error::{EmitterError, ListenerError};

// Optional: expose a simple built-in error-logging hook (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use emitter::ErrorLogger;
