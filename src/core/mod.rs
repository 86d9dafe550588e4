pub mod cart;
pub mod ledger;
pub mod persistence;
pub mod pricing;
pub mod session;

pub use crate::domain::model::{CatalogItem, LineItem, RemovedEntry};
pub use crate::domain::ports::{CartObserver, CatalogSource, Clock, KeyValueStore};
pub use crate::utils::error::Result;
