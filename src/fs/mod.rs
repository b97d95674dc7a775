//! Persistence: key-value stores and numbered plan slots.

pub mod slots;
pub mod store;

pub use slots::{
    SlotRecord, SlotState, SlotStore, SlotSummary, DEFAULT_SLOT_COUNT, DEFAULT_SLOT_PREFIX,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};
