//! # Example: async_listeners
//!
//! Demonstrates future-producing listeners and aggregate emission.
//!
//! Shows how to:
//! - Register listeners that return futures with [`Emitter::on_async`].
//! - Mix synchronous and future-producing listeners on one event name.
//! - Await the aggregate returned by [`Emitter::emit_async`].
//! - Observe first-rejection-wins aggregation.
//!
//! ## Flow
//! ```text
//! emit_async("sync", &v)
//!   ├─► synchronous pass (band order, like emit)
//!   │     ├─► sync listener runs inline
//!   │     └─► async listeners: futures spawned as detached tasks
//!   └─► aggregate future
//!         ├─► Ok(())  once every task resolved
//!         └─► Err(..) on the first rejection, without awaiting the rest
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example async_listeners
//! ```

use std::time::Duration;

use eventum::{Emitter, ListenerError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let emitter = Emitter::<u64>::new();

    emitter.on("sync", |id| {
        println!("[inline] syncing shard {id}");
    })?;

    emitter.on_async("sync", |id| {
        let id = *id;
        async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            println!("[task]   shard {id} flushed");
            Ok(())
        }
    })?;

    emitter.on_async("sync", |id| {
        let id = *id;
        async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            println!("[task]   shard {id} index rebuilt");
            Ok(())
        }
    })?;

    println!("--- all listeners succeed ---");
    emitter.emit_async("sync", &7).await?;
    println!("aggregate resolved\n");

    // A rejecting listener future fails the whole aggregate with its reason;
    // still-running tasks are left to finish on their own.
    emitter.on_async("sync", |id| {
        let id = *id;
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(ListenerError::Rejected {
                reason: format!("shard {id} is read-only"),
            })
        }
    })?;

    println!("--- one listener rejects ---");
    match emitter.emit_async("sync", &9).await {
        Ok(()) => println!("unexpected success"),
        Err(error) => println!("aggregate rejected: {error}"),
    }

    // Give the detached survivors a moment to print before exiting.
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(())
}
