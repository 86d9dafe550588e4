use crate::domain::model::LineItem;
use rust_decimal::Decimal;

pub const DEFAULT_BULK_THRESHOLD: u32 = 5;

/// Per-line volume discount: a line whose own quantity reaches the threshold
/// is priced at `unit_price * bulk_multiplier`.
///
/// Amounts saturate at `Decimal::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    pub bulk_threshold: u32,
    pub bulk_multiplier: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            bulk_threshold: DEFAULT_BULK_THRESHOLD,
            bulk_multiplier: Decimal::new(9, 1),
        }
    }
}

impl PricingPolicy {
    /// `rate` is the fraction taken off, so 0.10 means ten percent off.
    pub fn with_discount_rate(bulk_threshold: u32, rate: Decimal) -> Self {
        Self {
            bulk_threshold,
            bulk_multiplier: Decimal::ONE - rate,
        }
    }

    pub fn effective_unit_price(&self, line: &LineItem) -> Decimal {
        if line.quantity >= self.bulk_threshold {
            line.unit_price().saturating_mul(self.bulk_multiplier)
        } else {
            line.unit_price()
        }
    }

    pub fn line_total(&self, line: &LineItem) -> Decimal {
        self.effective_unit_price(line)
            .saturating_mul(Decimal::from(line.quantity))
    }

    /// Total before any volume discount.
    pub fn line_subtotal(&self, line: &LineItem) -> Decimal {
        line.unit_price().saturating_mul(Decimal::from(line.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::catalog_item;

    fn line(price: Decimal, quantity: u32) -> LineItem {
        LineItem::new(catalog_item("1", price), quantity)
    }

    #[test]
    fn test_discount_applies_from_threshold() {
        let policy = PricingPolicy::default();
        let ten = Decimal::new(1000, 2);

        assert_eq!(policy.line_total(&line(ten, 4)), Decimal::new(4000, 2));
        assert_eq!(policy.line_total(&line(ten, 5)), Decimal::new(4500, 2));
        assert_eq!(policy.line_subtotal(&line(ten, 5)), Decimal::new(5000, 2));
    }

    #[test]
    fn test_custom_discount_rate() {
        let policy = PricingPolicy::with_discount_rate(3, Decimal::new(25, 2));
        let ten = Decimal::new(1000, 2);

        assert_eq!(policy.effective_unit_price(&line(ten, 2)), ten);
        assert_eq!(policy.effective_unit_price(&line(ten, 3)), Decimal::new(750, 2));
    }

    #[test]
    fn test_huge_line_saturates() {
        let policy = PricingPolicy::default();
        let huge = Decimal::from_i128_with_scale(10i128.pow(25), 0);

        assert_eq!(policy.line_subtotal(&line(huge, 100_000)), Decimal::MAX);
        assert_eq!(policy.line_total(&line(huge, 100_000)), Decimal::MAX);
    }
}
