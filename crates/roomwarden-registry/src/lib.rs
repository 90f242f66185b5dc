//! In-memory room registry for Roomwarden.
//!
//! The single source of truth for "is this room active". Pure data
//! structure, no I/O:
//!
//! - [`Room`] — one transient grouped resource (role + voice channel +
//!   membership)
//! - [`RoomRegistry`] — name-keyed map with lowest-free-index name
//!   allocation and per-owner exclusivity
//! - [`RegistryError`] — what insertion can reject
//!
//! # Concurrency note
//!
//! `RoomRegistry` is NOT thread-safe by itself — it uses a plain
//! `HashMap`, not a concurrent one. This is intentional: the registry is
//! owned by the single lifecycle dispatcher task, so mutations are
//! already serialized and hidden locking would only add overhead.

mod error;
mod registry;
mod room;

pub use error::RegistryError;
pub use registry::RoomRegistry;
pub use room::Room;
