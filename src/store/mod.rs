//! Persistence layer — durable dedup state for welcomed and thanked users.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use traits::{ThankedUserRecord, TrackingStore, WelcomedUserRecord};
