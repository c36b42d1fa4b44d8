//! # Example: error_hook
//!
//! Demonstrates process-wide listener-error routing.
//!
//! Shows how to:
//! - Install handlers with [`eventum::on_listener_error`].
//! - Observe routing: with handlers registered, a panicking listener is
//!   reported and the emission continues; without, the error propagates to
//!   the `emit` caller and the rest of the pass is skipped.
//! - Use the built-in [`ErrorLogger`] (feature `logging`).
//!
//! ## Run
//! ```bash
//! cargo run --example error_hook --features logging
//! ```

use eventum::{Emitter, ErrorLogger, on_listener_error};

fn main() -> anyhow::Result<()> {
    let emitter = Emitter::<u32>::new();

    emitter.on("tick", |n| {
        if n % 2 == 0 {
            panic!("even ticks are unsupported: {n}");
        }
    })?;
    emitter.on("tick", |n| {
        println!("tick {n} handled");
    })?;

    // No handlers yet: the panic propagates and the second listener is skipped.
    println!("--- unrouted ---");
    if let Err(error) = emitter.emit("tick", &2) {
        println!("emit failed: {error}");
    }

    // Install hooks: the stderr logger plus a counting handler. The panic is
    // now fanned out to both, in registration order, and emission continues.
    let logger = ErrorLogger::new().install();
    let audit = on_listener_error(|error| {
        println!("audit: {}", error.as_label());
    });

    println!("--- routed ---");
    emitter.emit("tick", &2)?;
    emitter.emit("tick", &3)?;

    audit.dispose();
    logger.dispose();
    Ok(())
}
