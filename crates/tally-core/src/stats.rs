//! Statistics derived from the counter state

use tally_api::{CounterAction, CounterStats};
use tally_util::format_time_ago;

use crate::CounterStore;

impl CounterStore {
    /// Derive statistics from the current value and retained history.
    ///
    /// Extremes cover the current value plus every retained entry's
    /// previous and new values; entries evicted by the cap no longer
    /// contribute.
    pub fn stats(&self) -> CounterStats {
        let history = self.history();

        let increments = history
            .iter()
            .filter(|e| e.action == CounterAction::Increment)
            .count();
        let decrements = history
            .iter()
            .filter(|e| e.action == CounterAction::Decrement)
            .count();

        let mut max_value = self.count();
        let mut min_value = self.count();
        for entry in history {
            max_value = max_value.max(entry.previous_value).max(entry.new_value);
            min_value = min_value.min(entry.previous_value).min(entry.new_value);
        }

        let last_action = history.front().cloned();
        let last_action_age = last_action
            .as_ref()
            .map(|entry| format_time_ago(&entry.timestamp));

        CounterStats {
            current_value: self.count(),
            total_actions: history.len(),
            increments,
            decrements,
            max_value,
            min_value,
            last_action,
            last_action_age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CounterStore;
    use std::sync::Arc;
    use tally_config::CounterLimits;
    use tally_store::SqliteStore;

    fn make_store() -> CounterStore {
        CounterStore::new(
            CounterLimits::default(),
            Arc::new(SqliteStore::in_memory().unwrap()),
        )
    }

    #[test]
    fn empty_store_stats() {
        let store = make_store();
        let stats = store.stats();

        assert_eq!(stats.current_value, 0);
        assert_eq!(stats.total_actions, 0);
        assert_eq!(stats.increments, 0);
        assert_eq!(stats.decrements, 0);
        assert_eq!(stats.max_value, 0);
        assert_eq!(stats.min_value, 0);
        assert!(stats.last_action.is_none());
        assert!(stats.last_action_age.is_none());
    }

    #[test]
    fn counts_actions_by_kind() {
        let mut store = make_store();
        store.increment();
        store.increment();
        store.decrement();
        store.reset();

        let stats = store.stats();
        assert_eq!(stats.total_actions, 4);
        assert_eq!(stats.increments, 2);
        assert_eq!(stats.decrements, 1);
    }

    #[test]
    fn extremes_cover_history_transitions() {
        let mut store = make_store();
        store.set_count(8);
        store.set_count(-3);
        store.increment();

        let stats = store.stats();
        assert_eq!(stats.current_value, -2);
        assert_eq!(stats.max_value, 8);
        assert_eq!(stats.min_value, -3);
    }

    #[test]
    fn last_action_is_the_front_entry() {
        let mut store = make_store();
        store.increment();
        store.decrement();

        let stats = store.stats();
        let last = stats.last_action.unwrap();
        assert_eq!(last.action, CounterAction::Decrement);
        assert_eq!(stats.last_action_age.as_deref(), Some("just now"));
    }
}
