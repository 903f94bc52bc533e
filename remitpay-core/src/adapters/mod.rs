//! Adapters - concrete implementations of ports
//!
//! - file: JSON documents in the data directory
//! - memory: process-local map, for tests

pub mod file;
pub mod memory;

#[cfg(test)]
pub(crate) mod flaky;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(test)]
pub(crate) use flaky::FlakyStore;
