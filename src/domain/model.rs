use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as the catalog supplies it. Read-only to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<Decimal>,
    pub currency: String,
    pub image_url: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub on_sale: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_new: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CatalogItem {
    /// Markdown shown next to a sale price, e.g. `33` for "33% OFF".
    pub fn discount_percent(&self) -> Option<u32> {
        if !self.on_sale {
            return None;
        }
        let original = self.original_price?;
        if original <= self.price || original.is_zero() {
            return None;
        }
        ((original - self.price) / original * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
    }
}

/// A catalog item held in the cart. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(item: CatalogItem, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn unit_price(&self) -> Decimal {
        self.item.price
    }
}

/// Snapshot of a line item taken when it left the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedEntry {
    pub line_item: LineItem,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub removed_at: DateTime<Utc>,
}

impl RemovedEntry {
    pub fn id(&self) -> &str {
        self.line_item.id()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::catalog_item;
    use super::*;

    #[test]
    fn test_discount_percent_only_for_sale_items() {
        let mut item = catalog_item("1", Decimal::new(1999, 2));
        item.original_price = Some(Decimal::new(2999, 2));
        assert_eq!(item.discount_percent(), None);

        item.on_sale = true;
        assert_eq!(item.discount_percent(), Some(33));

        item.original_price = Some(Decimal::new(1999, 2));
        assert_eq!(item.discount_percent(), None);
    }

    #[test]
    fn test_line_item_json_is_flat() {
        let line = LineItem::new(catalog_item("7", Decimal::new(1000, 2)), 3);
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["id"], "7");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["price"], 10.0);
        assert_eq!(json["imageUrl"], "/images/7.jpg");
        assert!(json.get("originalPrice").is_none());
    }

    #[test]
    fn test_line_item_reads_client_format() {
        let raw = r#"{
            "id": "2",
            "name": "Slim Fit Denim Jeans",
            "category": "Apparel",
            "price": 49.99,
            "currency": "USD",
            "imageUrl": "/images/jeans.jpg",
            "rating": 4.2,
            "reviewsCount": 98,
            "quantity": 2
        }"#;

        let line: LineItem = serde_json::from_str(raw).unwrap();
        assert_eq!(line.id(), "2");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price(), Decimal::new(4999, 2));
        assert_eq!(line.item.original_price, None);
    }
}
