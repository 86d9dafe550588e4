// Adapters layer: concrete implementations of the domain ports (storage, clock, catalog).

pub mod catalog;
pub mod clock;
pub mod storage;

pub use catalog::InMemoryCatalog;
pub use clock::{ManualClock, SystemClock};
pub use storage::{LocalStorage, MemoryStorage};
