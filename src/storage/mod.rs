//! Store backends.
//!
//! - [`traits::IndexStore`]: the six primitives the indexer needs
//! - [`memory::InMemoryIndexStore`]: DashMap-backed, for tests and embedding
//! - [`redis::RedisIndexStore`]: Redis via a shared `ConnectionManager`

pub mod traits;
pub mod memory;
pub mod redis;
