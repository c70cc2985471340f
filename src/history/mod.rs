// Gateway module for MRU history - follows the Train Station Pattern
// All external access must go through this gateway

mod persistence;
mod sanitize;
mod store;

pub use persistence::{FilePersistence, HistoryPersistence, MemoryPersistence};
pub use sanitize::{persisted_ids, sanitize, sanitize_bounded};
pub use store::HistoryStore;

#[cfg(test)]
pub use persistence::MockHistoryPersistence;
