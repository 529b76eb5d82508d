//! Rolling-window velocity tracking per counterparty
//!
//! The only mutable state the monitor owns. Each counterparty has a
//! window of recent transactions pruned against the lookback duration,
//! so memory is bounded by the number of distinct counterparties active
//! inside the window, not by the total transaction count ever seen.
//! Updates are serialized per counterparty by the map entry guard, not
//! by a global lock.

use chrono::{DateTime, Duration, Utc};
use compliance_core::config::VelocityConfig;
use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Transaction record inside a counterparty window
#[derive(Debug, Clone)]
struct WindowEntry {
    transaction_id: Uuid,
    amount: Decimal,
    observed_at: DateTime<Utc>,
}

/// Per-counterparty rolling window
struct CounterpartyWindow {
    entries: Vec<WindowEntry>,
}

impl CounterpartyWindow {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn prune(&mut self, window_start: DateTime<Utc>) {
        self.entries.retain(|e| e.observed_at >= window_start);
    }

    fn push(&mut self, transaction_id: Uuid, amount: Decimal, observed_at: DateTime<Utc>) {
        self.entries.push(WindowEntry {
            transaction_id,
            amount,
            observed_at,
        });
    }

    fn total_amount(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// Stats for one counterparty's window, including the transaction just
/// observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    /// Transactions inside the window
    pub count: u32,
    /// Total amount inside the window
    pub total_amount: Decimal,
}

/// Rolling-window velocity tracker
pub struct VelocityTracker {
    config: VelocityConfig,
    // Map: counterparty -> window
    windows: DashMap<String, CounterpartyWindow>,
}

impl VelocityTracker {
    /// Create a tracker with the given window configuration
    pub fn new(config: VelocityConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Record a transaction and return the counterparty's window stats
    /// including it. `at` is explicit so rule tests are reproducible.
    pub fn observe(
        &self,
        counterparty: &str,
        transaction_id: Uuid,
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> WindowStats {
        let window_start = at - Duration::minutes(self.config.window_minutes);

        let mut entry = self
            .windows
            .entry(counterparty.to_string())
            .or_insert_with(CounterpartyWindow::new);
        let window = entry.value_mut();

        window.prune(window_start);
        window.push(transaction_id, amount, at);

        WindowStats {
            count: window.entries.len() as u32,
            total_amount: window.total_amount(),
        }
    }

    /// True if the stats exceed either configured limit
    pub fn exceeds_limits(&self, stats: &WindowStats) -> bool {
        stats.count > self.config.max_transactions_in_window
            || stats.total_amount > self.config.max_amount_in_window
    }

    /// Drop counterparties with no transaction inside the window ending
    /// at `now`. Called periodically by the ingestion loop.
    pub fn prune_idle(&self, now: DateTime<Utc>) {
        let window_start = now - Duration::minutes(self.config.window_minutes);
        self.windows.retain(|_, window| {
            window.prune(window_start);
            !window.entries.is_empty()
        });
    }

    /// Counterparties currently holding window state
    pub fn tracked_counterparties(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(max_tx: u32, max_amount: i64, window_minutes: i64) -> VelocityTracker {
        VelocityTracker::new(VelocityConfig {
            window_minutes,
            max_transactions_in_window: max_tx,
            max_amount_in_window: Decimal::from(max_amount),
        })
    }

    #[test]
    fn test_window_counts_and_totals() {
        let tracker = tracker(10, 1_000_000, 60);
        let now = Utc::now();

        let s1 = tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(100), now);
        assert_eq!(s1, WindowStats { count: 1, total_amount: Decimal::from(100) });

        let s2 = tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(250), now);
        assert_eq!(s2.count, 2);
        assert_eq!(s2.total_amount, Decimal::from(350));

        // Separate counterparty, separate window
        let s3 = tracker.observe("CP-2", Uuid::new_v4(), Decimal::from(5), now);
        assert_eq!(s3.count, 1);
    }

    #[test]
    fn test_old_entries_fall_out_of_window() {
        let tracker = tracker(10, 1_000_000, 60);
        let start = Utc::now();

        tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(100), start);
        // 61 minutes later the first entry has aged out
        let later = start + Duration::minutes(61);
        let stats = tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(200), later);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_amount, Decimal::from(200));
    }

    #[test]
    fn test_limits() {
        let tracker = tracker(2, 500, 60);
        let now = Utc::now();

        let s1 = tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(100), now);
        assert!(!tracker.exceeds_limits(&s1));
        let s2 = tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(100), now);
        assert!(!tracker.exceeds_limits(&s2));
        // Third transaction breaches the count limit
        let s3 = tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(100), now);
        assert!(tracker.exceeds_limits(&s3));

        // Amount limit breached independently of count
        let s4 = tracker.observe("CP-2", Uuid::new_v4(), Decimal::from(600), now);
        assert!(tracker.exceeds_limits(&s4));
    }

    #[test]
    fn test_prune_idle_bounds_memory() {
        let tracker = tracker(10, 1_000_000, 60);
        let start = Utc::now();

        tracker.observe("CP-1", Uuid::new_v4(), Decimal::from(1), start);
        tracker.observe("CP-2", Uuid::new_v4(), Decimal::from(1), start);
        assert_eq!(tracker.tracked_counterparties(), 2);

        // Only CP-2 stays active
        let later = start + Duration::minutes(30);
        tracker.observe("CP-2", Uuid::new_v4(), Decimal::from(1), later);

        tracker.prune_idle(start + Duration::minutes(70));
        assert_eq!(tracker.tracked_counterparties(), 1);
    }
}
