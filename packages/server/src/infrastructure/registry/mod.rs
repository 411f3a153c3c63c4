//! Connection registry implementations
//!
//! - `inmemory`: sharded concurrent map, one process

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
