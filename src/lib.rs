pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CartCli, CliConfig};
pub use config::TomlConfig;

pub use adapters::{InMemoryCatalog, LocalStorage, ManualClock, MemoryStorage, SystemClock};
pub use core::{
    cart::{CartCommand, CartStore},
    ledger::RemovedLedger,
    persistence::CartPersistence,
    pricing::PricingPolicy,
    session::{CartSession, SessionSettings, UndoOutcome},
};
pub use domain::model::{CatalogItem, LineItem, RemovedEntry};
pub use domain::ports::{CartObserver, CatalogSource, Clock, KeyValueStore};
pub use utils::error::{CartError, Result};
