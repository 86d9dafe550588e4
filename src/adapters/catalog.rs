use crate::domain::model::CatalogItem;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{CartError, Result};
use crate::utils::validation;
use rust_decimal::Decimal;
use std::path::Path;

const SEED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Static, ordered product list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The bundled product list.
    pub fn seeded() -> Result<Self> {
        Self::from_json_str(SEED_CATALOG)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let items: Vec<CatalogItem> = serde_json::from_str(content)?;
        items.iter().try_for_each(validate_item)?;

        let catalog = Self::new(items);
        if catalog.is_empty() {
            tracing::warn!("⚠️ Catalog has no products");
        } else {
            tracing::debug!("Loaded catalog with {} products", catalog.len());
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Like [`CatalogSource::find`], but unknown ids are an error.
    pub fn require(&self, id: &str) -> Result<CatalogItem> {
        self.find(id).ok_or_else(|| CartError::ProductNotFound { id: id.to_string() })
    }
}

/// Prices must not be negative; ratings sit on a 0 to 5 scale.
fn validate_item(item: &CatalogItem) -> Result<()> {
    let prices = [("price", Some(item.price)), ("originalPrice", item.original_price)];
    for (name, price) in prices {
        if let Some(price) = price.filter(|price| *price < Decimal::ZERO) {
            return Err(CartError::InvalidConfigValueError {
                field: format!("catalog[{}].{}", item.id, name),
                value: price.to_string(),
                reason: "Price must not be negative".to_string(),
            });
        }
    }
    validation::validate_range(&format!("catalog[{}].rating", item.id), item.rating, 0.0, 5.0)
}

impl CatalogSource for InMemoryCatalog {
    fn list(&self) -> Vec<CatalogItem> {
        self.items.clone()
    }

    fn find(&self, id: &str) -> Option<CatalogItem> {
        self.items.iter().find(|item| item.id == id).cloned()
    }

    fn by_category(&self, category: &str) -> Vec<CatalogItem> {
        let wanted = category.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.category.to_lowercase() == wanted)
            .cloned()
            .collect()
    }
}
