use std::time::Instant;
use chrono::Duration;
use dashmap::DashMap;
use crate::simulation::deadline::Deadline;

/// Value reported by a sensor while a fault-table entry is active
pub const FAULT_OVERRIDE_VALUE: f64 = 0.0;

/// A time-boxed override installed through the public inject-fault API
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultEntry {
    pub expires_at: Deadline,
    pub override_value: f64,
    pub duration: Duration,
}

impl FaultEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.has_passed(now)
    }
}

/// Simulator-level fault table, independent of each sensor's own fault.
///
/// Expired entries are only removed when a lookup observes them; nothing sweeps the table in the background.
#[derive(Debug, Default)]
pub struct FaultTable {
    entries: DashMap<String, FaultEntry>,
}

impl FaultTable {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Installs a fault for `path`, replacing any previous entry.
    pub fn inject(&self, path: &str, duration: Duration, now: Instant) -> FaultEntry {
        let entry = FaultEntry {
            expires_at: Deadline::after(now, duration),
            override_value: FAULT_OVERRIDE_VALUE,
            duration,
        };
        self.entries.insert(path.to_string(), entry);
        entry
    }

    /// Returns the override value if `path` has an unexpired fault.
    ///
    /// An expired entry is removed here. The removal re-checks expiry under the shard lock, so an entry that a
    /// concurrent `inject` just replaced survives.
    pub fn active_override(&self, path: &str, now: Instant) -> Option<f64> {
        let expired = match self.entries.get(path) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.override_value),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(path, |_, entry| entry.is_expired(now));
        }
        None
    }

    /// Read-only view of every entry still in the table, expired or not.
    pub fn entries(&self) -> Vec<(String, FaultEntry)> {
        let mut entries: Vec<(String, FaultEntry)> = self.entries
            .iter()
            .map(|item| (item.key().clone(), *item.value()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> std::time::Duration {
        std::time::Duration::from_secs(n)
    }

    fn held_paths(table: &FaultTable) -> Vec<String> {
        table.entries().into_iter().map(|(path, _)| path).collect()
    }

    #[test]
    fn override_is_active_inside_the_window() {
        let table = FaultTable::new();
        let t0 = Instant::now();
        table.inject("mining/ore_bin_level", Duration::seconds(30), t0);

        assert_eq!(table.active_override("mining/ore_bin_level", t0), Some(0.0));
        assert_eq!(table.active_override("mining/ore_bin_level", t0 + secs(29)), Some(0.0));
        assert_eq!(held_paths(&table), vec!["mining/ore_bin_level"]);
    }

    #[test]
    fn expired_entry_is_removed_by_the_first_read() {
        let table = FaultTable::new();
        let t0 = Instant::now();
        table.inject("mining/ore_bin_level", Duration::seconds(30), t0);

        let later = t0 + secs(30);
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.active_override("mining/ore_bin_level", later), None);
        assert!(table.entries().is_empty());
        assert_eq!(table.active_override("mining/ore_bin_level", later), None);
    }

    #[test]
    fn expired_entries_linger_until_read() {
        let table = FaultTable::new();
        let t0 = Instant::now();
        table.inject("a/x", Duration::seconds(1), t0);
        table.inject("a/y", Duration::seconds(1), t0);

        table.active_override("a/x", t0 + secs(5));
        assert_eq!(held_paths(&table), vec!["a/y"]);
    }

    #[test]
    fn reinjection_replaces_the_previous_entry() {
        let table = FaultTable::new();
        let t0 = Instant::now();
        table.inject("a/x", Duration::seconds(5), t0);
        let entry = table.inject("a/x", Duration::seconds(60), t0 + secs(1));

        assert_eq!(table.entries().len(), 1);
        assert_eq!(entry.expires_at, Deadline::At(t0 + secs(61)));
        assert_eq!(table.active_override("a/x", t0 + secs(10)), Some(FAULT_OVERRIDE_VALUE));
    }

    #[test]
    fn oversized_duration_holds_instead_of_overflowing() {
        let table = FaultTable::new();
        let t0 = Instant::now();
        table.inject("a/x", Duration::weeks(100_000_000), t0);

        assert_eq!(table.active_override("a/x", t0 + secs(86_400 * 365)), Some(FAULT_OVERRIDE_VALUE));
    }
}
