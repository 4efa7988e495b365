pub mod casting_in_memory;

pub use casting_in_memory::InMemoryCastingStore;
