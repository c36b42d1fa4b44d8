//! # Example: basic
//!
//! Demonstrates the synchronous emitter core.
//!
//! Shows how to:
//! - Register listeners with [`Emitter::on`] / [`Emitter::preempt`] / [`Emitter::once`].
//! - Emit values and observe band ordering (preempt before normal).
//! - Unsubscribe with the returned [`Disposable`] handles.
//! - Inspect live listener accounting.
//!
//! ## Flow
//! ```text
//! on("line", print)            ─► normal band
//! preempt("line", number)      ─► preempt band (runs first)
//! once("line", banner)         ─► normal band, self-disposing
//!
//! emit("line", &text)          ─► number ─► banner ─► print
//! emit("line", &text)          ─► number ─► print
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use eventum::Emitter;

fn main() -> anyhow::Result<()> {
    let emitter = Emitter::<String>::new();

    // Normal-band listener: runs in registration order within its band.
    let printer = emitter.on("line", |text| {
        println!("    {text}");
    })?;

    // Preempt-band listener: runs before every normal listener, even though
    // it was registered later.
    let counter = Arc::new(AtomicUsize::new(0));
    let line_no = Arc::clone(&counter);
    emitter.preempt("line", move |_| {
        let n = line_no.fetch_add(1, Ordering::SeqCst) + 1;
        println!("-- line {n} --");
    })?;

    // One-shot listener: fires on the first emission only.
    emitter.once("line", |_| {
        println!("(first line incoming)");
    })?;

    emitter.emit("line", &"fee".to_string())?;
    emitter.emit("line", &"fie".to_string())?;

    println!(
        "names={:?} listeners={}",
        emitter.event_names(),
        emitter.total_listener_count()
    );

    // Disposal is the only way to unsubscribe; afterwards the listener is
    // never invoked again.
    printer.dispose();
    emitter.emit("line", &"foe".to_string())?;

    emitter.dispose();
    println!("disposed: {}", emitter.is_disposed());
    Ok(())
}
