//! Durable record store interface for Roomwarden.
//!
//! Rooms are mirrored to durable storage so a restart can resume in-flight
//! rooms. This crate defines:
//!
//! - [`RoomRecord`] — the serialized mirror of a room's essential fields
//! - [`RecordStore`] — the capability trait the lifecycle core calls
//! - [`MemoryStore`] — an in-process implementation for tests and demos
//!
//! The store is a plain keyed upsert/delete/read-all surface; nothing in
//! the core assumes transactions or ordering beyond a single key.

mod error;
mod memory;
mod record;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::RoomRecord;

/// Capability interface to the durable record store.
///
/// Declared in the desugared `impl Future + Send` form so the lifecycle
/// service can drive a generic store from a spawned task; implementations
/// can still write plain `async fn`.
pub trait RecordStore: Send + Sync + 'static {
    /// Inserts or replaces the record keyed by its room name.
    fn upsert(
        &self,
        record: &RoomRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Removes the record for a room. Removing an absent key is a no-op.
    fn delete(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Reads every stored room record. Called once at startup.
    fn read_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RoomRecord>, StoreError>> + Send;
}
