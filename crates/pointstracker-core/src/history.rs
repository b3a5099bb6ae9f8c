//! Per-counter change history and the 5 minute cumulative window.
//!
//! Entries older than the window are logically expired: they are ignored by
//! [`ChangeHistory::cumulative_change`] but only physically dropped when a new
//! change is appended or the counter's history is reset by a challenge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Length of the sliding window in milliseconds.
pub const WINDOW_MS: i64 = 5 * 60 * 1000;

/// A single recorded point delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointChange {
    /// Signed delta.
    pub amount: i64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl PointChange {
    pub fn new(amount: i64, timestamp: i64) -> Self {
        Self { amount, timestamp }
    }
}

fn cutoff(now_ms: i64) -> i64 {
    now_ms.saturating_sub(WINDOW_MS)
}

/// Sum of `|amount|` over entries inside the window ending at `now_ms`.
pub fn cumulative_change(entries: &[PointChange], now_ms: i64) -> u64 {
    let cutoff = cutoff(now_ms);
    entries
        .iter()
        .filter(|c| c.timestamp >= cutoff)
        .map(|c| c.amount.unsigned_abs())
        .fold(0u64, u64::saturating_add)
}

/// Drop entries outside the window ending at `now_ms`, then append `change`.
pub fn append_and_prune(entries: &[PointChange], change: PointChange, now_ms: i64) -> Vec<PointChange> {
    let cutoff = cutoff(now_ms);
    entries
        .iter()
        .filter(|c| c.timestamp >= cutoff)
        .copied()
        .chain(std::iter::once(change))
        .collect()
}

/// Counter name -> chronological list of changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeHistory(BTreeMap<String, Vec<PointChange>>);

impl ChangeHistory {
    /// Empty history with one (empty) list per counter.
    pub fn for_counters<I, S>(counters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(counters.into_iter().map(|c| (c.into(), Vec::new())).collect())
    }

    pub fn entries(&self, counter: &str) -> &[PointChange] {
        self.0.get(counter).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cumulative_change(&self, counter: &str, now_ms: i64) -> u64 {
        cumulative_change(self.entries(counter), now_ms)
    }

    pub fn append_and_prune(&self, counter: &str, change: PointChange, now_ms: i64) -> Vec<PointChange> {
        append_and_prune(self.entries(counter), change, now_ms)
    }

    pub fn replace(&mut self, counter: &str, entries: Vec<PointChange>) {
        self.0.insert(counter.to_string(), entries);
    }

    /// Clear a counter's window (challenge time).
    pub fn reset(&mut self, counter: &str) {
        self.replace(counter, Vec::new());
    }

    /// Make sure every counter has a list, keeping existing entries.
    pub fn ensure_counter(&mut self, counter: &str) {
        self.0.entry(counter.to_string()).or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_history_sums_to_zero() {
        let history = ChangeHistory::for_counters(["Lila", "Maryn"]);
        assert_eq!(history.cumulative_change("Lila", 1_000_000), 0);
        assert_eq!(history.cumulative_change("Nobody", 1_000_000), 0);
    }

    #[test]
    fn cumulative_sums_absolute_values_inside_window() {
        let entries = [
            PointChange::new(5, 1_000),
            PointChange::new(-7, 2_000),
            PointChange::new(3, 3_000),
        ];
        assert_eq!(cumulative_change(&entries, 3_000), 15);
    }

    #[test]
    fn entry_exactly_at_cutoff_is_counted() {
        let now = 10 * WINDOW_MS;
        let entries = [
            PointChange::new(4, now - WINDOW_MS),
            PointChange::new(9, now - WINDOW_MS - 1),
        ];
        assert_eq!(cumulative_change(&entries, now), 4);
    }

    #[test]
    fn cumulative_read_does_not_prune() {
        let mut history = ChangeHistory::default();
        history.replace("Lila", vec![PointChange::new(10, 0)]);
        assert_eq!(history.cumulative_change("Lila", WINDOW_MS * 2), 0);
        assert_eq!(history.entries("Lila").len(), 1);
    }

    #[test]
    fn append_and_prune_drops_expired_and_appends() {
        let now = 1_000_000;
        let entries = [
            PointChange::new(1, now - WINDOW_MS - 1),
            PointChange::new(2, now - 1_000),
        ];
        let next = append_and_prune(&entries, PointChange::new(-3, now), now);
        assert_eq!(next, vec![PointChange::new(2, now - 1_000), PointChange::new(-3, now)]);
    }

    #[test]
    fn reset_clears_only_that_counter() {
        let mut history = ChangeHistory::for_counters(["Lila", "Maryn"]);
        history.replace("Lila", vec![PointChange::new(3, 0)]);
        history.replace("Maryn", vec![PointChange::new(4, 0)]);
        history.reset("Lila");
        assert!(history.entries("Lila").is_empty());
        assert_eq!(history.entries("Maryn").len(), 1);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut history = ChangeHistory::for_counters(["Lila"]);
        history.replace("Lila", vec![PointChange::new(-20, 42)]);
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!({"Lila": [{"amount": -20, "timestamp": 42}]}));
    }

    proptest! {
        #[test]
        fn cumulative_matches_window_filter(
            raw in proptest::collection::vec((-1_000i64..1_000, 0i64..2_000_000), 0..40),
            now in 0i64..2_500_000,
        ) {
            let entries: Vec<_> = raw.iter().map(|(a, t)| PointChange::new(*a, *t)).collect();
            let expected: u64 = entries
                .iter()
                .filter(|c| c.timestamp >= now - WINDOW_MS)
                .map(|c| c.amount.unsigned_abs())
                .sum();
            prop_assert_eq!(cumulative_change(&entries, now), expected);
        }

        #[test]
        fn append_and_prune_keeps_order_and_ends_with_change(
            raw in proptest::collection::vec((-50i64..50, 0i64..1_000_000), 0..20),
            amount in -100i64..100,
            now in 0i64..1_500_000,
        ) {
            let entries: Vec<_> = raw.iter().map(|(a, t)| PointChange::new(*a, *t)).collect();
            let change = PointChange::new(amount, now);
            let next = append_and_prune(&entries, change, now);
            prop_assert_eq!(next.last().copied(), Some(change));
            let kept: Vec<_> = entries.iter().copied().filter(|c| c.timestamp >= now - WINDOW_MS).collect();
            prop_assert_eq!(&next[..next.len() - 1], kept.as_slice());
        }
    }
}
