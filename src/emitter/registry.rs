//! # Per-event-name listener registry.
//!
//! Storage layer behind [`Emitter`](crate::Emitter): an insertion-ordered
//! table of channels, one per event name, each holding two FIFO bands of
//! listener entries.
//!
//! ## Ordering invariant
//! Within a channel, every preempt entry precedes every normal entry at
//! emission time, regardless of relative registration order across bands;
//! within a band, entries run in registration order (`seq` FIFO). Removal
//! never reorders the survivors.
//!
//! ## Name table
//! A name is "known" exactly while its channel is non-empty. The channel is
//! dropped when its last entry is removed, and re-registering the name later
//! appends a fresh channel at the end of the table, so enumeration order is
//! "most recently became non-empty".
//!
//! ## Snapshot rule
//! Emission clones the channel's `Arc<Entry>` list under the lock, then
//! invokes outside it. Each entry carries an `active` flag that is cleared on
//! removal and re-checked immediately before invocation, so an entry disposed
//! mid-emission is skipped and an entry registered mid-emission is deferred
//! to the next snapshot.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ListenerError;

/// Boxed future produced by a future-producing listener.
pub(crate) type ListenerFuture = Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send>>;

/// Priority band of a listener entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Group {
    /// Runs before every `Normal` entry of the same channel.
    Preempt,
    /// Default band.
    Normal,
}

/// Invocable stored in an entry.
///
/// The shape is fixed at registration time: `Sync` callbacks run inline
/// during the emission pass; `Deferred` callbacks run inline too, but return
/// a future that the emission layer spawns and (for `emit_async`) awaits.
pub(crate) enum Callback<V> {
    Sync(Box<dyn Fn(&V) + Send + Sync>),
    Deferred(Box<dyn Fn(&V) -> ListenerFuture + Send + Sync>),
}

/// One registration: sequence number, liveness flag and the callback.
pub(crate) struct Entry<V> {
    pub(crate) seq: u64,
    pub(crate) active: AtomicBool,
    pub(crate) callback: Callback<V>,
}

impl<V> Entry<V> {
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Listener storage for a single event name.
pub(crate) struct Channel<V> {
    pub(crate) name: Arc<str>,
    preempt: Vec<Arc<Entry<V>>>,
    normal: Vec<Arc<Entry<V>>>,
}

impl<V> Channel<V> {
    fn new(name: Arc<str>) -> Self {
        Self {
            name,
            preempt: Vec::new(),
            normal: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.preempt.len() + self.normal.len()
    }

    fn is_empty(&self) -> bool {
        self.preempt.is_empty() && self.normal.is_empty()
    }

    /// Emission-ordered copy of the entries: preempt band, then normal band.
    fn snapshot(&self) -> Vec<Arc<Entry<V>>> {
        let mut entries = Vec::with_capacity(self.len());
        entries.extend(self.preempt.iter().cloned());
        entries.extend(self.normal.iter().cloned());
        entries
    }

    /// Removes the entry with `seq` from whichever band holds it.
    fn remove(&mut self, seq: u64) -> bool {
        for band in [&mut self.preempt, &mut self.normal] {
            if let Some(index) = band.iter().position(|entry| entry.seq == seq) {
                band[index].deactivate();
                band.remove(index);
                return true;
            }
        }
        false
    }
}

/// Mutable state owned by one emitter instance.
pub(crate) struct EmitterState<V> {
    channels: Vec<Channel<V>>,
    next_seq: u64,
    pub(crate) disposed: bool,
}

impl<V> EmitterState<V> {
    pub(crate) fn new() -> Self {
        Self {
            channels: Vec::new(),
            next_seq: 0,
            disposed: false,
        }
    }

    fn channel(&self, name: &str) -> Option<&Channel<V>> {
        self.channels
            .iter()
            .find(|channel| channel.name.as_ref() == name)
    }

    /// Inserts an entry, creating the channel if the name is unknown.
    ///
    /// Returns the interned name and the entry's sequence number, which
    /// together identify the registration for later removal.
    pub(crate) fn insert(
        &mut self,
        name: &str,
        group: Group,
        callback: Callback<V>,
    ) -> (Arc<str>, u64) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = Arc::new(Entry {
            seq,
            active: AtomicBool::new(true),
            callback,
        });

        let position = self
            .channels
            .iter()
            .position(|channel| channel.name.as_ref() == name);
        let channel = match position {
            Some(index) => &mut self.channels[index],
            None => {
                self.channels.push(Channel::new(Arc::from(name)));
                let last = self.channels.len() - 1;
                &mut self.channels[last]
            }
        };

        match group {
            Group::Preempt => channel.preempt.push(entry),
            Group::Normal => channel.normal.push(entry),
        }

        (Arc::clone(&channel.name), seq)
    }

    /// Removes one entry; drops the channel once it holds nothing.
    pub(crate) fn remove(&mut self, name: &str, seq: u64) {
        let Some(index) = self
            .channels
            .iter()
            .position(|channel| channel.name.as_ref() == name)
        else {
            return;
        };
        self.channels[index].remove(seq);
        if self.channels[index].is_empty() {
            self.channels.remove(index);
        }
    }

    /// Emission-ordered snapshot for `name`; empty for unknown names.
    pub(crate) fn snapshot(&self, name: &str) -> Vec<Arc<Entry<V>>> {
        self.channel(name)
            .map(Channel::snapshot)
            .unwrap_or_default()
    }

    /// Deactivates and drops every entry of every channel.
    pub(crate) fn clear(&mut self) {
        for channel in &self.channels {
            for entry in channel.snapshot() {
                entry.deactivate();
            }
        }
        self.channels.clear();
    }

    pub(crate) fn names(&self) -> Vec<Arc<str>> {
        self.channels
            .iter()
            .map(|channel| Arc::clone(&channel.name))
            .collect()
    }

    pub(crate) fn count_for(&self, name: &str) -> usize {
        self.channel(name).map_or(0, Channel::len)
    }

    pub(crate) fn total(&self) -> usize {
        self.channels.iter().map(Channel::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_noop<V: 'static>() -> Callback<V> {
        Callback::Sync(Box::new(|_| {}))
    }

    fn snapshot_seqs(state: &EmitterState<u32>, name: &str) -> Vec<u64> {
        state
            .snapshot(name)
            .iter()
            .map(|entry| entry.seq)
            .collect()
    }

    #[test]
    fn test_preempt_band_precedes_normal_band() {
        let mut state = EmitterState::<u32>::new();
        state.insert("evt", Group::Normal, sync_noop()); // seq 0
        state.insert("evt", Group::Preempt, sync_noop()); // seq 1
        state.insert("evt", Group::Normal, sync_noop()); // seq 2
        state.insert("evt", Group::Preempt, sync_noop()); // seq 3

        assert_eq!(snapshot_seqs(&state, "evt"), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_removal_keeps_order_of_survivors() {
        let mut state = EmitterState::<u32>::new();
        state.insert("evt", Group::Normal, sync_noop()); // seq 0
        state.insert("evt", Group::Normal, sync_noop()); // seq 1
        state.insert("evt", Group::Normal, sync_noop()); // seq 2

        state.remove("evt", 1);

        assert_eq!(snapshot_seqs(&state, "evt"), vec![0, 2]);
    }

    #[test]
    fn test_removed_entry_is_deactivated() {
        let mut state = EmitterState::<u32>::new();
        state.insert("evt", Group::Normal, sync_noop());
        let held = state.snapshot("evt");

        state.remove("evt", 0);

        assert!(!held[0].is_active());
    }

    #[test]
    fn test_channel_dropped_when_last_entry_removed() {
        let mut state = EmitterState::<u32>::new();
        state.insert("evt", Group::Normal, sync_noop());
        assert_eq!(state.names().len(), 1);

        state.remove("evt", 0);

        assert!(state.names().is_empty());
        assert_eq!(state.count_for("evt"), 0);
        assert!(state.snapshot("evt").is_empty());
    }

    #[test]
    fn test_reregistered_name_appends_at_end() {
        let mut state = EmitterState::<u32>::new();
        state.insert("alpha", Group::Normal, sync_noop()); // seq 0
        state.insert("beta", Group::Normal, sync_noop()); // seq 1

        state.remove("alpha", 0);
        state.insert("alpha", Group::Normal, sync_noop());

        let names: Vec<String> = state.names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_clear_deactivates_and_empties() {
        let mut state = EmitterState::<u32>::new();
        state.insert("evt", Group::Preempt, sync_noop());
        state.insert("evt", Group::Normal, sync_noop());
        let held = state.snapshot("evt");

        state.clear();

        assert_eq!(state.total(), 0);
        assert!(state.names().is_empty());
        assert!(held.iter().all(|entry| !entry.is_active()));
    }

    #[test]
    fn test_remove_unknown_name_is_noop() {
        let mut state = EmitterState::<u32>::new();
        state.insert("evt", Group::Normal, sync_noop());
        state.remove("other", 0);
        assert_eq!(state.total(), 1);
    }
}
