/// Filesystem adapters for snapshot persistence
mod snapshot_store;

pub use snapshot_store::SnapshotStore;
