use crate::domain::model::{LineItem, RemovedEntry};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_RETENTION_SECONDS: i64 = 5 * 60;

/// Holding area for removed lines that can still be undone.
///
/// Entries expire once they are `retention` old. Expiry is lazy: nothing is
/// dropped until [`RemovedLedger::purge`] runs.
#[derive(Debug, Clone)]
pub struct RemovedLedger {
    entries: Vec<RemovedEntry>,
    retention: Duration,
}

impl Default for RemovedLedger {
    fn default() -> Self {
        Self::new(Vec::new(), Duration::seconds(DEFAULT_RETENTION_SECONDS))
    }
}

impl RemovedLedger {
    pub fn new(entries: Vec<RemovedEntry>, retention: Duration) -> Self {
        Self { entries, retention }
    }

    /// Records a removal. A previous entry for the same id is replaced.
    pub fn record(&mut self, line_item: LineItem, now: DateTime<Utc>) {
        self.entries.retain(|entry| entry.id() != line_item.id());
        tracing::debug!("ledger record: {}", line_item.id());
        self.entries.push(RemovedEntry {
            line_item,
            removed_at: now,
        });
    }

    /// Drops every entry at least `retention` old and returns what is left.
    pub fn purge(&mut self, now: DateTime<Utc>) -> &[RemovedEntry] {
        let before = self.entries.len();
        let retention = self.retention;
        self.entries
            .retain(|entry| now.signed_duration_since(entry.removed_at) < retention);
        let expired = before - self.entries.len();
        if expired > 0 {
            tracing::debug!("ledger purge: {} expired, {} kept", expired, self.entries.len());
        }
        &self.entries
    }

    /// Takes the snapshot for `id` out of the ledger.
    pub fn consume(&mut self, id: &str) -> Option<LineItem> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        Some(self.entries.remove(index).line_item)
    }

    pub fn get(&self, id: &str) -> Option<&RemovedEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn entries(&self) -> &[RemovedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::catalog_item;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn line(id: &str, quantity: u32) -> LineItem {
        LineItem::new(catalog_item(id, Decimal::new(1000, 2)), quantity)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_record_replaces_same_id() {
        let mut ledger = RemovedLedger::default();
        ledger.record(line("x", 1), t0());
        ledger.record(line("y", 1), t0());
        ledger.record(line("x", 4), t0() + Duration::seconds(10));

        assert_eq!(ledger.len(), 2);
        let x = ledger.get("x").unwrap();
        assert_eq!(x.line_item.quantity, 4);
        assert_eq!(x.removed_at, t0() + Duration::seconds(10));
        assert_eq!(ledger.entries()[1].id(), "x");
    }

    #[test]
    fn test_purge_boundary() {
        let mut ledger = RemovedLedger::default();
        ledger.record(line("x", 1), t0());

        let kept = ledger.purge(t0() + Duration::minutes(4) + Duration::seconds(59));
        assert_eq!(kept.len(), 1);

        let kept = ledger.purge(t0() + Duration::minutes(5) + Duration::seconds(1));
        assert!(kept.is_empty());
        assert!(ledger.get("x").is_none());
    }

    #[test]
    fn test_purge_drops_exactly_at_window() {
        let mut ledger = RemovedLedger::default();
        ledger.record(line("x", 1), t0());

        assert!(ledger.purge(t0() + Duration::minutes(5)).is_empty());
    }

    #[test]
    fn test_consume_once() {
        let mut ledger = RemovedLedger::default();
        ledger.record(line("x", 3), t0());

        let snapshot = ledger.consume("x").unwrap();
        assert_eq!(snapshot.quantity, 3);
        assert!(ledger.consume("x").is_none());
        assert!(ledger.consume("unknown").is_none());
    }

    #[test]
    fn test_custom_retention() {
        let mut ledger = RemovedLedger::new(Vec::new(), Duration::seconds(30));
        ledger.record(line("x", 1), t0());

        assert_eq!(ledger.purge(t0() + Duration::seconds(29)).len(), 1);
        assert!(ledger.purge(t0() + Duration::seconds(31)).is_empty());
    }
}
