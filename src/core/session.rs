use crate::core::cart::{CartCommand, CartStore, Transition};
use crate::core::ledger::{RemovedLedger, DEFAULT_RETENTION_SECONDS};
use crate::core::persistence::CartPersistence;
use crate::core::pricing::PricingPolicy;
use crate::domain::model::{CatalogItem, LineItem, RemovedEntry};
use crate::domain::ports::{CartObserver, Clock, KeyValueStore};
use chrono::Duration;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub persistence: CartPersistence,
    pub retention: Duration,
    pub pricing: PricingPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persistence: CartPersistence::default(),
            retention: Duration::seconds(DEFAULT_RETENTION_SECONDS),
            pricing: PricingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    Restored(LineItem),
    /// Never recorded, already undone, or expired.
    NotFound,
}

/// A cart bound to its backing store.
///
/// Every state change is written through to the store before the call
/// returns. Removals land in the recently-removed ledger so they can be
/// undone within the retention window.
pub struct CartSession<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    persistence: CartPersistence,
    cart: CartStore,
    ledger: RemovedLedger,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<S: KeyValueStore, C: Clock> CartSession<S, C> {
    /// Rehydrates cart and ledger, dropping expired ledger entries.
    pub fn open(store: S, clock: C, settings: SessionSettings) -> Self {
        let persistence = settings.persistence;
        let items = persistence.load(&store);
        let mut ledger = RemovedLedger::new(persistence.load_ledger(&store), settings.retention);
        let kept = ledger.purge(clock.now()).len();

        tracing::info!(
            "🛒 Cart session opened: {} lines, {} recently removed",
            items.len(),
            kept
        );

        let session = Self {
            store,
            clock,
            persistence,
            cart: CartStore::with_pricing(items, settings.pricing),
            ledger,
            observers: Vec::new(),
        };
        session.save_ledger();
        session
    }

    pub fn subscribe(&mut self, observer: Box<dyn CartObserver>) {
        self.observers.push(observer);
    }

    pub fn add(&mut self, item: CatalogItem) {
        self.apply(CartCommand::Add(item));
    }

    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        self.apply(CartCommand::Remove { id: id.to_string() })
    }

    /// Non-positive quantities remove the line.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Option<LineItem> {
        self.apply(CartCommand::SetQuantity {
            id: id.to_string(),
            quantity,
        })
    }

    pub fn clear(&mut self) {
        self.apply(CartCommand::Clear);
    }

    pub fn undo_remove(&mut self, id: &str) -> UndoOutcome {
        self.ledger.purge(self.clock.now());

        let Some(snapshot) = self.ledger.consume(id) else {
            tracing::debug!("undo {}: nothing to restore", id);
            self.save_ledger();
            return UndoOutcome::NotFound;
        };

        let restored = self.apply_changed(CartCommand::Reinsert(snapshot.clone()));
        self.save_ledger();
        if !restored {
            tracing::debug!("undo {}: snapshot had nothing to restore", id);
            return UndoOutcome::NotFound;
        }
        tracing::info!("↩️ Restored {} (quantity {})", id, snapshot.quantity);
        UndoOutcome::Restored(snapshot)
    }

    fn apply(&mut self, command: CartCommand) -> Option<LineItem> {
        let transition = self.cart.dispatch(command);
        self.after_transition(transition)
    }

    /// Like `apply`, but reports whether the cart changed at all.
    fn apply_changed(&mut self, command: CartCommand) -> bool {
        let transition = self.cart.dispatch(command);
        let changed = transition.changed;
        self.after_transition(transition);
        changed
    }

    fn after_transition(&mut self, transition: Transition) -> Option<LineItem> {
        if !transition.changed {
            return None;
        }

        if let Some(removed) = &transition.removed {
            self.ledger.record(removed.clone(), self.clock.now());
            self.save_ledger();
        }

        self.save_cart();
        for observer in &self.observers {
            observer.cart_changed(self.cart.items());
        }
        transition.removed
    }

    fn save_cart(&self) {
        if let Err(e) = self.persistence.save(&self.store, self.cart.items()) {
            tracing::warn!("⚠️ Failed to persist cart: {}", e);
        }
    }

    fn save_ledger(&self) {
        if let Err(e) = self.persistence.save_ledger(&self.store, self.ledger.entries()) {
            tracing::warn!("⚠️ Failed to persist recently removed items: {}", e);
        }
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn total_quantity(&self) -> u64 {
        self.cart.total_quantity()
    }

    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    pub fn savings(&self) -> Decimal {
        self.cart.savings()
    }

    /// Ledger entries still inside the retention window.
    pub fn recently_removed(&mut self) -> &[RemovedEntry] {
        self.ledger.purge(self.clock.now())
    }
}
