use crate::domain::model::{LineItem, RemovedEntry};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DEFAULT_CART_KEY: &str = "storefrontCart";
pub const DEFAULT_LEDGER_KEY: &str = "storefrontRecentlyRemoved";

/// Mirrors cart and ledger state into a key-value store.
///
/// Loading never fails: a missing or unreadable record comes back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPersistence {
    cart_key: String,
    ledger_key: String,
}

impl Default for CartPersistence {
    fn default() -> Self {
        Self::new(DEFAULT_CART_KEY, DEFAULT_LEDGER_KEY)
    }
}

impl CartPersistence {
    pub fn new(cart_key: impl Into<String>, ledger_key: impl Into<String>) -> Self {
        Self {
            cart_key: cart_key.into(),
            ledger_key: ledger_key.into(),
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<LineItem> {
        normalize(read_list(store, &self.cart_key))
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S, items: &[LineItem]) -> Result<()> {
        write_list(store, &self.cart_key, items)
    }

    pub fn load_ledger<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<RemovedEntry> {
        normalize_ledger(read_list(store, &self.ledger_key))
    }

    pub fn save_ledger<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        entries: &[RemovedEntry],
    ) -> Result<()> {
        write_list(store, &self.ledger_key, entries)
    }
}

fn read_list<S: KeyValueStore + ?Sized, T: DeserializeOwned>(store: &S, key: &str) -> Vec<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("⚠️ Could not read '{}', starting empty: {}", key, e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("⚠️ Malformed record under '{}', starting empty: {}", key, e);
            Vec::new()
        }
    }
}

fn write_list<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    list: &[T],
) -> Result<()> {
    let raw = serde_json::to_string(list)?;
    store.set(key, &raw)
}

/// Drops zero-quantity lines and merges duplicate ids into the first occurrence.
fn normalize(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut normalized: Vec<LineItem> = Vec::with_capacity(items.len());
    for line in items {
        if line.quantity == 0 {
            continue;
        }
        match normalized.iter_mut().find(|existing| existing.id() == line.id()) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => normalized.push(line),
        }
    }
    normalized
}

/// Drops zero-quantity snapshots; for a repeated id the later entry wins.
fn normalize_ledger(entries: Vec<RemovedEntry>) -> Vec<RemovedEntry> {
    let mut normalized: Vec<RemovedEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.line_item.quantity == 0 {
            continue;
        }
        normalized.retain(|existing| existing.id() != entry.id());
        normalized.push(entry);
    }
    normalized
}
