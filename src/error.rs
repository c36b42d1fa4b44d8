//! Error types used by the emitter and its listeners.
//!
//! This module defines two main error enums:
//!
//! - [`EmitterError`] — errors raised by the registration surface itself.
//! - [`ListenerError`] — failures of individual listeners during an emission.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;

use thiserror::Error;

/// # Errors produced by the emitter API surface.
///
/// These represent misuse of an emitter instance, not listener failures.
/// A callback that is not invocable cannot be expressed at this level:
/// the `Fn` bounds on the registration methods reject it at compile time,
/// so no runtime validation (and no partial-registration hazard) exists.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitterError {
    /// Registration was attempted after [`Emitter::dispose`](crate::Emitter::dispose) ran.
    #[error("emitter disposed; new registrations are not accepted")]
    Disposed,
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventum::EmitterError;
    ///
    /// assert_eq!(EmitterError::Disposed.as_label(), "emitter_disposed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::Disposed => "emitter_disposed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitterError::Disposed => "registration on a disposed emitter".to_string(),
        }
    }
}

/// # Failures of a single listener during an emission.
///
/// A synchronous listener fails by panicking; the panic is caught at the
/// emission boundary and routed either to the process-wide handler registry
/// or back to the `emit` caller (see [`crate::on_listener_error`]).
/// A future-producing listener fails by resolving to `Rejected`; that
/// surfaces only through the aggregate future returned by
/// [`Emitter::emit_async`](crate::Emitter::emit_async).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// Listener panicked while handling the emitted value.
    #[error("listener panicked: {message}")]
    Panicked {
        /// Message extracted from the panic payload.
        message: String,
    },

    /// Listener-returned future resolved to an error.
    #[error("listener rejected: {reason}")]
    Rejected {
        /// The rejection reason reported by the listener.
        reason: String,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventum::ListenerError;
    ///
    /// let err = ListenerError::Rejected { reason: "boom".into() };
    /// assert_eq!(err.as_label(), "listener_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Panicked { .. } => "listener_panicked",
            ListenerError::Rejected { .. } => "listener_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Panicked { message } => format!("panic: {message}"),
            ListenerError::Rejected { reason } => format!("rejected: {reason}"),
        }
    }

    /// Builds a `Panicked` error from a caught panic payload.
    ///
    /// Extracts the conventional `&str`/`String` payloads; anything else
    /// is reported as opaque.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        };
        ListenerError::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_panic_extracts_str_payload() {
        let err = ListenerError::from_panic(Box::new("bar"));
        match err {
            ListenerError::Panicked { message } => assert_eq!(message, "bar"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_panic_extracts_string_payload() {
        let err = ListenerError::from_panic(Box::new(String::from("boom")));
        match err {
            ListenerError::Panicked { message } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_panic_opaque_payload() {
        let err = ListenerError::from_panic(Box::new(42_u8));
        match err {
            ListenerError::Panicked { message } => assert_eq!(message, "opaque panic payload"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
