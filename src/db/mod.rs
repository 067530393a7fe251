pub mod cache;
pub mod core;
mod schema;
pub mod store;

// Re-export the store implementations and the cache
pub use self::cache::{companies_digest, content_hash, ClusterCache};
pub use self::core::Database;
pub use self::store::{KeyValueStore, MemoryStore};
