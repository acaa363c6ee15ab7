//! [`Storage`](haven_core::traits::Storage) implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
