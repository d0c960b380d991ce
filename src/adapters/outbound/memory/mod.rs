/// In-memory storage adapters
mod snapshot;
mod store;

pub use snapshot::{StoreSnapshot, SNAPSHOT_VERSION};
pub use store::InMemoryStore;
