//! # RoomWarden
//!
//! Self-service meeting room lifecycle manager for chat platforms.
//!
//! RoomWarden lets chat members spin up private voice rooms on demand:
//! each room gets a generated `game_room_<n>` name, an access role, and
//! a voice channel under a configured category. Rooms that sit empty
//! past an idle timeout are reclaimed automatically, and every room is
//! mirrored to a durable store so a restart picks up where it left off.
//!
//! The platform itself is behind the [`ChatPlatform`](prelude::ChatPlatform)
//! trait, so the manager runs unchanged against a real gateway client or
//! the bundled in-memory fake.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use roomwarden::prelude::*;
//!
//! # async fn run() -> Result<(), WardenError> {
//! let platform = Arc::new(InMemoryPlatform::new());
//! let category = platform.add_category("Meeting Rooms");
//!
//! let warden = RoomWarden::builder()
//!     .parent_category(category)
//!     .idle_timeout(Duration::from_secs(300))
//!     .build(platform, MemoryStore::new())
//!     .await?;
//!
//! let name = warden.create_room(MemberId(42)).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod warden;

pub use error::WardenError;
pub use warden::{DEFAULT_EVENT_CAPACITY, DEFAULT_IDLE_TIMEOUT, RoomWarden, RoomWardenBuilder};

/// One-stop imports for embedding the room manager.
pub mod prelude {
    pub use crate::{RoomWarden, RoomWardenBuilder, WardenError};
    pub use roomwarden_platform::{
        ChannelRef, ChatPlatform, InMemoryPlatform, MemberId, PresenceUpdate, RoleRef,
    };
    pub use roomwarden_rooms::RoomSummary;
    pub use roomwarden_store::{MemoryStore, RecordStore, RoomRecord};
}
