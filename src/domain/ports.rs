use crate::domain::model::{CatalogItem, LineItem};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Durable string blobs addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait CatalogSource: Send + Sync {
    fn list(&self) -> Vec<CatalogItem>;
    fn find(&self, id: &str) -> Option<CatalogItem>;
    fn by_category(&self, category: &str) -> Vec<CatalogItem>;
}

/// Receives the full item list after every state change of a cart session.
pub trait CartObserver {
    fn cart_changed(&self, items: &[LineItem]);
}
