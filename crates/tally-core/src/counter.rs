//! The counter state store

use std::collections::VecDeque;
use std::sync::Arc;

use tally_api::{CounterAction, CounterSnapshot, HistoryEntry};
use tally_config::CounterLimits;
use tally_store::{COUNTER_STORAGE_KEY, PersistedState, Store, StoreResult};
use tracing::{debug, info, warn};

/// Maximum retained history entries; the oldest entry is dropped first.
pub const HISTORY_CAP: usize = 50;

/// The counter state store.
///
/// Exclusively owns `(count, history)`; all external access goes through
/// the operations below, which are total and never fail. Refused
/// operations (increment at the ceiling, decrement at the floor, undo on
/// empty history, set to the current value) are silent no-ops.
pub struct CounterStore {
    count: i64,
    history: VecDeque<HistoryEntry>,
    limits: CounterLimits,
    store: Arc<dyn Store>,
}

impl CounterStore {
    /// Create a store, rehydrating `(count, history)` from the storage
    /// provider when a well-formed blob is present.
    ///
    /// Bounds come from configuration, never from storage. Adopted state is
    /// normalized to the invariants: count clamped into bounds, history
    /// truncated to the cap.
    pub fn new(limits: CounterLimits, store: Arc<dyn Store>) -> Self {
        let (count, history) = match load_persisted(store.as_ref()) {
            Some(state) => {
                let mut history: VecDeque<HistoryEntry> = state.history.into();
                history.truncate(HISTORY_CAP);
                let count = state.count.clamp(limits.min_count, limits.max_count);
                (count, history)
            }
            None => (0, VecDeque::new()),
        };

        info!(count, history_len = history.len(), "Counter store initialized");

        Self {
            count,
            history,
            limits,
            store,
        }
    }

    /// Current counter value
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Retained history, most-recent-first
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    /// Configured bounds
    pub fn limits(&self) -> CounterLimits {
        self.limits
    }

    /// Read snapshot for consumers
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            count: self.count,
            history: self.history.iter().cloned().collect(),
            max_count: self.limits.max_count,
            min_count: self.limits.min_count,
        }
    }

    /// Increment by one. No-op at the inclusive ceiling.
    pub fn increment(&mut self) {
        if self.count >= self.limits.max_count {
            debug!(count = self.count, "Increment refused at ceiling");
            return;
        }

        let previous = self.count;
        self.count = self.count.saturating_add(1);
        self.record(CounterAction::Increment, previous, self.count);
    }

    /// Decrement by one. No-op at the inclusive floor.
    pub fn decrement(&mut self) {
        if self.count <= self.limits.min_count {
            debug!(count = self.count, "Decrement refused at floor");
            return;
        }

        let previous = self.count;
        self.count = self.count.saturating_sub(1);
        self.record(CounterAction::Decrement, previous, self.count);
    }

    /// Reset to zero. Always records, even when the value is already zero.
    pub fn reset(&mut self) {
        let previous = self.count;
        self.count = 0;
        self.record(CounterAction::Reset, previous, 0);
    }

    /// Set to `value`, clamped into bounds. No-op when the clamped value
    /// equals the current value.
    pub fn set_count(&mut self, value: i64) {
        let previous = self.count;
        let clamped = value.clamp(self.limits.min_count, self.limits.max_count);

        if clamped == previous {
            return;
        }

        self.count = clamped;
        self.record(CounterAction::Set, previous, clamped);
    }

    /// Undo the most recent recorded mutation: pop the front history entry
    /// and restore its previous value. Records no entry of its own; no-op
    /// on empty history. Entries evicted by the cap are unrecoverable.
    pub fn undo(&mut self) {
        let Some(entry) = self.history.pop_front() else {
            return;
        };

        // Stale persisted entries may predate the configured bounds
        self.count = entry
            .previous_value
            .clamp(self.limits.min_count, self.limits.max_count);

        debug!(action = ?entry.action, restored = self.count, "Undo applied");
        self.persist();
    }

    /// Drop all retained history, leaving the value untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist();
    }

    /// Append a history entry for an accepted mutation, evicting the oldest
    /// entry past the cap, then persist.
    fn record(&mut self, action: CounterAction, previous_value: i64, new_value: i64) {
        self.history
            .push_front(HistoryEntry::new(action, previous_value, new_value));
        self.history.truncate(HISTORY_CAP);
        self.persist();
    }

    /// Best-effort write of `(count, history)` to the storage provider.
    /// In-memory state stays authoritative regardless of the outcome.
    fn persist(&self) {
        let state = PersistedState {
            count: self.count,
            history: self.history.iter().cloned().collect(),
        };

        if let Err(e) = write_persisted(self.store.as_ref(), &state) {
            warn!(error = %e, "Failed to persist counter state");
        }
    }
}

fn load_persisted(store: &dyn Store) -> Option<PersistedState> {
    let blob = match store.read_blob(COUNTER_STORAGE_KEY) {
        Ok(blob) => blob?,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted counter state, using defaults");
            return None;
        }
    };

    match serde_json::from_value(blob) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!(error = %e, "Malformed persisted counter state, using defaults");
            None
        }
    }
}

fn write_persisted(store: &dyn Store, state: &PersistedState) -> StoreResult<()> {
    let blob = serde_json::to_value(state)
        .map_err(tally_store::StoreError::from)?;
    store.write_blob(COUNTER_STORAGE_KEY, &blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tally_store::SqliteStore;

    fn limits(min: i64, max: i64) -> CounterLimits {
        CounterLimits {
            max_count: max,
            min_count: min,
        }
    }

    fn make_store() -> CounterStore {
        CounterStore::new(
            CounterLimits::default(),
            Arc::new(SqliteStore::in_memory().unwrap()),
        )
    }

    #[test]
    fn starts_at_zero_with_empty_history() {
        let store = make_store();
        assert_eq!(store.count(), 0);
        assert!(store.history().is_empty());
    }

    #[test]
    fn increment_appends_history() {
        let mut store = make_store();
        store.increment();

        assert_eq!(store.count(), 1);
        assert_eq!(store.history().len(), 1);

        let entry = store.history().front().unwrap();
        assert_eq!(entry.action, CounterAction::Increment);
        assert_eq!(entry.previous_value, 0);
        assert_eq!(entry.new_value, 1);
    }

    #[test]
    fn increment_at_ceiling_is_a_no_op() {
        let mut store = CounterStore::new(
            limits(-3, 3),
            Arc::new(SqliteStore::in_memory().unwrap()),
        );

        for _ in 0..10 {
            store.increment();
        }

        assert_eq!(store.count(), 3);
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn decrement_at_floor_is_a_no_op() {
        let mut store = CounterStore::new(
            limits(-2, 2),
            Arc::new(SqliteStore::in_memory().unwrap()),
        );

        for _ in 0..10 {
            store.decrement();
        }

        assert_eq!(store.count(), -2);
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn reset_always_records_even_at_zero() {
        let mut store = make_store();
        store.reset();

        assert_eq!(store.count(), 0);
        assert_eq!(store.history().len(), 1);

        let entry = store.history().front().unwrap();
        assert_eq!(entry.action, CounterAction::Reset);
        assert_eq!(entry.previous_value, 0);
        assert_eq!(entry.new_value, 0);
    }

    #[test]
    fn set_count_clamps_into_bounds() {
        let mut store = make_store();
        store.set_count(5_000_000);

        assert_eq!(store.count(), 999_999);
        let entry = store.history().front().unwrap();
        assert_eq!(entry.action, CounterAction::Set);
        assert_eq!(entry.new_value, 999_999);
    }

    #[test]
    fn set_count_to_current_value_records_nothing() {
        let mut store = make_store();
        store.set_count(7);
        assert_eq!(store.history().len(), 1);

        store.set_count(7);
        assert_eq!(store.count(), 7);
        assert_eq!(store.history().len(), 1);

        // A clamp that lands on the current value is also a no-op
        store.set_count(0);
        assert_eq!(store.history().len(), 2);
        store.set_count(-4_000_000);
        let floored = store.count();
        store.set_count(-5_000_000);
        assert_eq!(store.count(), floored);
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn undo_restores_previous_value_and_consumes_the_entry() {
        let mut store = make_store();
        store.increment();
        store.increment();
        store.set_count(10);

        store.undo();
        assert_eq!(store.count(), 2);
        assert_eq!(store.history().len(), 2);

        store.undo();
        assert_eq!(store.count(), 1);
        store.undo();
        assert_eq!(store.count(), 0);
        assert!(store.history().is_empty());

        // Empty history: no-op
        store.undo();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn undo_records_no_entry_of_its_own() {
        let mut store = make_store();
        store.increment();
        store.undo();

        assert!(store.history().is_empty());
    }

    #[test]
    fn history_is_capped_at_fifty_most_recent_entries() {
        let mut store = make_store();
        for _ in 0..60 {
            store.increment();
        }

        assert_eq!(store.count(), 60);
        assert_eq!(store.history().len(), HISTORY_CAP);

        // Most-recent-first: front is 59 -> 60, back is 10 -> 11
        let front = store.history().front().unwrap();
        assert_eq!((front.previous_value, front.new_value), (59, 60));
        let back = store.history().back().unwrap();
        assert_eq!((back.previous_value, back.new_value), (10, 11));
    }

    #[test]
    fn clear_history_leaves_the_value() {
        let mut store = make_store();
        store.increment();
        store.increment();

        store.clear_history();
        assert_eq!(store.count(), 2);
        assert!(store.history().is_empty());
    }

    #[test]
    fn bounds_hold_in_every_reachable_state() {
        let mut store = CounterStore::new(
            limits(-2, 2),
            Arc::new(SqliteStore::in_memory().unwrap()),
        );

        for _ in 0..5 {
            store.increment();
        }
        store.set_count(100);
        store.set_count(-100);
        for _ in 0..5 {
            store.decrement();
        }
        store.undo();
        store.undo();

        assert!(store.count() >= -2 && store.count() <= 2);
        assert!(store.history().len() <= HISTORY_CAP);
    }

    #[test]
    fn documented_scenario() {
        // Three increments, one undo, then a far-out-of-range set
        let mut store = make_store();
        store.increment();
        store.increment();
        store.increment();

        assert_eq!(store.count(), 3);
        let transitions: Vec<(i64, i64)> = store
            .history()
            .iter()
            .map(|e| (e.previous_value, e.new_value))
            .collect();
        assert_eq!(transitions, vec![(2, 3), (1, 2), (0, 1)]);

        store.undo();
        assert_eq!(store.count(), 2);
        assert_eq!(store.history().len(), 2);

        store.set_count(-5_000_000);
        assert_eq!(store.count(), -999_999);

        let entry = store.history().front().unwrap();
        assert_eq!(entry.action, CounterAction::Set);
        assert_eq!(entry.previous_value, 2);
        assert_eq!(entry.new_value, -999_999);
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn state_is_rehydrated_from_the_store() {
        let backing = Arc::new(SqliteStore::in_memory().unwrap());

        {
            let mut store = CounterStore::new(CounterLimits::default(), backing.clone());
            store.increment();
            store.increment();
            store.decrement();
        }

        let store = CounterStore::new(CounterLimits::default(), backing);
        assert_eq!(store.count(), 1);
        assert_eq!(store.history().len(), 3);
        assert_eq!(
            store.history().front().unwrap().action,
            CounterAction::Decrement
        );
    }

    #[test]
    fn rehydrated_timestamps_round_trip() {
        let backing = Arc::new(SqliteStore::in_memory().unwrap());

        let original = {
            let mut store = CounterStore::new(CounterLimits::default(), backing.clone());
            store.increment();
            store.history().front().unwrap().clone()
        };

        let store = CounterStore::new(CounterLimits::default(), backing);
        assert_eq!(*store.history().front().unwrap(), original);
    }

    #[test]
    fn malformed_persisted_state_falls_back_to_defaults() {
        let backing = Arc::new(SqliteStore::in_memory().unwrap());
        backing
            .write_blob(COUNTER_STORAGE_KEY, &json!({"count": "not a number"}))
            .unwrap();

        let store = CounterStore::new(CounterLimits::default(), backing);
        assert_eq!(store.count(), 0);
        assert!(store.history().is_empty());
    }

    #[test]
    fn adopted_state_is_normalized_to_the_bounds() {
        let backing = Arc::new(SqliteStore::in_memory().unwrap());
        backing
            .write_blob(COUNTER_STORAGE_KEY, &json!({"count": 500, "history": []}))
            .unwrap();

        let store = CounterStore::new(limits(-10, 10), backing);
        assert_eq!(store.count(), 10);
    }
}
