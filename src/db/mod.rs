//! Record store: the trait handlers depend on and its MongoDB and in-memory backends.

mod memory;
mod mongo;
mod schema;
mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use schema::*;
pub use store::{RecordPage, RecordStore, StoreError};
