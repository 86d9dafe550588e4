use crate::core::pricing::PricingPolicy;
use crate::domain::model::{CatalogItem, LineItem};
use rust_decimal::Decimal;

/// Mutations accepted by the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    Add(CatalogItem),
    Remove { id: String },
    SetQuantity { id: String, quantity: i64 },
    Clear,
    /// Undo path: restores a removed line with its exact quantity.
    Reinsert(LineItem),
}

impl CartCommand {
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::Add(_) => "add",
            CartCommand::Remove { .. } => "remove",
            CartCommand::SetQuantity { .. } => "set_quantity",
            CartCommand::Clear => "clear",
            CartCommand::Reinsert(_) => "reinsert",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub items: Vec<LineItem>,
    /// The line that left the cart, if the command removed one.
    pub removed: Option<LineItem>,
    pub changed: bool,
}

impl Transition {
    fn unchanged(items: &[LineItem]) -> Self {
        Self {
            items: items.to_vec(),
            removed: None,
            changed: false,
        }
    }

    fn changed(items: Vec<LineItem>) -> Self {
        Self {
            items,
            removed: None,
            changed: true,
        }
    }
}

/// Pure transition function over the line item list.
pub fn reduce(items: &[LineItem], command: CartCommand) -> Transition {
    match command {
        CartCommand::Add(product) => {
            let mut next = items.to_vec();
            match next.iter_mut().find(|line| line.item.id == product.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => next.push(LineItem::new(product, 1)),
            }
            Transition::changed(next)
        }

        CartCommand::Remove { id } => remove_line(items, &id),

        CartCommand::SetQuantity { id, quantity } => {
            if quantity <= 0 {
                return remove_line(items, &id);
            }
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            match items.iter().position(|line| line.id() == id) {
                Some(index) if items[index].quantity != quantity => {
                    let mut next = items.to_vec();
                    next[index].quantity = quantity;
                    Transition::changed(next)
                }
                _ => Transition::unchanged(items),
            }
        }

        CartCommand::Clear => {
            if items.is_empty() {
                Transition::unchanged(items)
            } else {
                Transition::changed(Vec::new())
            }
        }

        CartCommand::Reinsert(snapshot) => {
            if snapshot.quantity == 0 {
                return Transition::unchanged(items);
            }
            let mut next = items.to_vec();
            // 已重新加入的商品以快照取代，保持 id 唯一
            match next.iter_mut().find(|line| line.id() == snapshot.id()) {
                Some(line) => *line = snapshot,
                None => next.push(snapshot),
            }
            Transition::changed(next)
        }
    }
}

fn remove_line(items: &[LineItem], id: &str) -> Transition {
    match items.iter().position(|line| line.id() == id) {
        Some(index) => {
            let mut next = items.to_vec();
            let removed = next.remove(index);
            Transition {
                items: next,
                removed: Some(removed),
                changed: true,
            }
        }
        None => Transition::unchanged(items),
    }
}

/// Canonical cart state plus the derived totals.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<LineItem>,
    pricing: PricingPolicy,
}

impl CartStore {
    pub fn with_pricing(items: Vec<LineItem>, pricing: PricingPolicy) -> Self {
        Self { items, pricing }
    }

    /// Applies a command and returns the resulting transition metadata.
    pub fn dispatch(&mut self, command: CartCommand) -> Transition {
        let name = command.name();
        let transition = reduce(&self.items, command);
        tracing::debug!(
            "cart {}: changed={}, removed={:?}, lines={}",
            name,
            transition.changed,
            transition.removed.as_ref().map(|line| line.id()),
            transition.items.len()
        );
        if transition.changed {
            self.items = transition.items.clone();
        }
        transition
    }

    pub fn add(&mut self, item: CatalogItem) {
        self.dispatch(CartCommand::Add(item));
    }

    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        self.dispatch(CartCommand::Remove { id: id.to_string() }).removed
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Option<LineItem> {
        self.dispatch(CartCommand::SetQuantity {
            id: id.to_string(),
            quantity,
        })
        .removed
    }

    pub fn clear(&mut self) {
        self.dispatch(CartCommand::Clear);
    }

    pub fn reinsert(&mut self, snapshot: LineItem) {
        self.dispatch(CartCommand::Reinsert(snapshot));
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(|line| self.pricing.line_total(line))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn line_total(&self, line: &LineItem) -> Decimal {
        self.pricing.line_total(line)
    }

    /// Amount saved through volume discounts.
    pub fn savings(&self) -> Decimal {
        let subtotal = self
            .items
            .iter()
            .map(|line| self.pricing.line_subtotal(line))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        subtotal.saturating_sub(self.total_price())
    }
}
