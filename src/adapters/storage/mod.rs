//! Implementations of the [`KeyValueStore`](crate::application::ports::KeyValueStore) port.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
