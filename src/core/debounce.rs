//! Per-key debounce table for the raw reaction channel.
//!
//! The gateway delivers reaction events in rapid bursts (a user tapping
//! several emoji within milliseconds, or redelivery). Processing each one
//! would race the reaction-cleanup step against itself, so events are
//! coalesced per (actor, message): every arrival registers a new generation
//! for its key and waits out a short quiescence window; only the arrival
//! whose generation is still current at the end of the window proceeds.
//! Entries are created on first use, superseded by newer arrivals, and
//! removed once the surviving arrival settles.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Key identifying one debounce lane: (actor id, message id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebounceKey {
    /// Discord user id of the actor
    pub actor_id: String,
    /// Discord message id the reactions target
    pub message_id: String,
}

/// Scheduled-task table coalescing reaction events per key.
///
/// Owned by the reconciler (constructor-injected) rather than living in
/// ambient global state.
#[derive(Debug)]
pub struct DebounceTable {
    window: Duration,
    pending: Mutex<HashMap<DebounceKey, u64>>,
    counter: Mutex<u64>,
}

impl DebounceTable {
    /// Creates a table with the given quiescence window. A zero window
    /// disables coalescing (useful in tests of downstream logic).
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(HashMap::new()),
            counter: Mutex::new(0),
        }
    }

    /// Waits out the quiescence window for `key`.
    ///
    /// Returns true when the caller is the last arrival for the key within
    /// the window and should proceed; false when a newer event superseded it
    /// and it must be discarded without any ledger write.
    pub async fn settle(&self, key: DebounceKey) -> bool {
        let generation = self.register(&key);
        if !self.window.is_zero() {
            tokio::time::sleep(self.window).await;
        }
        self.try_finish(&key, generation)
    }

    fn register(&self, key: &DebounceKey) -> u64 {
        let generation = {
            let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
            *counter += 1;
            *counter
        };
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.insert(key.clone(), generation);
        generation
    }

    /// Removes the key's entry if `generation` is still current; a stale
    /// generation means a newer arrival owns the lane.
    fn try_finish(&self, key: &DebounceKey, generation: u64) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.get(key) == Some(&generation) {
            pending.remove(key);
            true
        } else {
            false
        }
    }
}
