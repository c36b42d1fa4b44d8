//! # ErrorLogger — simple listener-error printer
//!
//! A minimal process-wide handler that prints routed listener errors to
//! stderr. Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [eventum] listener error: panic: index out of bounds
//! [eventum] listener error: rejected: flush failed
//! ```

use crate::disposables::Disposable;
use crate::emitter::exceptions;

/// Stderr writer for routed listener errors.
#[derive(Default)]
pub struct ErrorLogger;

impl ErrorLogger {
    /// Construct a new [`ErrorLogger`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Installs the logger as a process-wide handler.
    ///
    /// Returns the hook's handle; dispose it to stop logging. While
    /// installed it also keeps the handler registry non-empty, so listener
    /// panics are routed instead of propagating to `emit` callers.
    pub fn install(self) -> Disposable {
        exceptions::on_listener_error(|error| {
            eprintln!("[eventum] listener error: {}", error.as_message());
        })
    }
}
