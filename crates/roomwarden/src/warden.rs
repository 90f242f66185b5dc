//! `RoomWarden` builder and facade.
//!
//! This is the entry point for embedding the room manager in a bot. It
//! validates startup configuration, spawns the lifecycle service, and
//! exposes its commands behind a single cheap-to-clone type.

use std::sync::Arc;
use std::time::Duration;

use roomwarden_platform::{ChannelRef, ChatPlatform, MemberId, PresenceUpdate};
use roomwarden_rooms::{LifecycleHandle, RoomSummary, ServiceConfig, spawn_service};
use roomwarden_store::RecordStore;

use crate::WardenError;

/// Default idle timeout before an empty room is reclaimed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Default capacity of the lifecycle event queue.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Builder for configuring and starting a [`RoomWarden`].
///
/// # Example
///
/// ```rust,ignore
/// use roomwarden::prelude::*;
///
/// let warden = RoomWarden::builder()
///     .parent_category(category)
///     .idle_timeout(Duration::from_secs(60))
///     .build(platform, store)
///     .await?;
/// ```
pub struct RoomWardenBuilder {
    idle_timeout: Duration,
    event_capacity: usize,
    parent_category: Option<ChannelRef>,
}

impl RoomWardenBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            parent_category: None,
        }
    }

    /// Sets how long an empty room survives before teardown.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets the capacity of the lifecycle event queue.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Sets the category channel new room voice channels are created
    /// under. Required.
    pub fn parent_category(mut self, category: ChannelRef) -> Self {
        self.parent_category = Some(category);
        self
    }

    /// Validates the configuration, recovers persisted rooms, and
    /// spawns the lifecycle service.
    ///
    /// A missing or unresolvable parent category is the one fatal
    /// startup error: without somewhere to put voice channels the
    /// manager cannot do anything, so it refuses to start rather than
    /// fail on every later create.
    pub async fn build<P, S>(self, platform: Arc<P>, store: S) -> Result<RoomWarden, WardenError>
    where
        P: ChatPlatform,
        S: RecordStore,
    {
        let parent = self
            .parent_category
            .ok_or_else(|| WardenError::Config("parent category is not set".into()))?;

        match platform.channel_name(parent).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(WardenError::Config(format!(
                    "parent category {parent} does not exist"
                )));
            }
            Err(e) => {
                return Err(WardenError::Config(format!(
                    "parent category {parent} could not be resolved: {e}"
                )));
            }
        }

        let handle = spawn_service(
            platform,
            store,
            ServiceConfig {
                idle_timeout: self.idle_timeout,
                parent_category: parent,
                event_capacity: self.event_capacity,
            },
        );

        tracing::info!(
            idle_timeout_secs = self.idle_timeout.as_secs(),
            parent = %parent,
            "room warden running"
        );

        Ok(RoomWarden { handle })
    }
}

impl Default for RoomWardenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running room manager.
///
/// Cheap to clone; all clones talk to the same lifecycle service.
#[derive(Debug, Clone)]
pub struct RoomWarden {
    handle: LifecycleHandle,
}

impl RoomWarden {
    /// Creates a new builder.
    pub fn builder() -> RoomWardenBuilder {
        RoomWardenBuilder::new()
    }

    /// Creates a room owned by `member` and returns its assigned name.
    pub async fn create_room(&self, member: MemberId) -> Result<String, WardenError> {
        Ok(self.handle.create_room(member).await?)
    }

    /// Tears down a room by name.
    pub async fn delete_room(&self, name: &str) -> Result<(), WardenError> {
        Ok(self.handle.delete_room(name).await?)
    }

    /// Grants an additional member access to a room.
    pub async fn invite_member(&self, name: &str, member: MemberId) -> Result<(), WardenError> {
        Ok(self.handle.invite_member(name, member).await?)
    }

    /// Forwards a voice presence update from the platform's event stream.
    pub async fn presence(&self, update: PresenceUpdate) -> Result<(), WardenError> {
        Ok(self.handle.presence(update).await?)
    }

    /// Returns a snapshot of all active rooms, sorted by name.
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, WardenError> {
        Ok(self.handle.list_rooms().await?)
    }

    /// Stops the lifecycle service. Persisted rooms are recovered on the
    /// next start; outstanding idle timers are re-armed then.
    pub async fn shutdown(&self) -> Result<(), WardenError> {
        Ok(self.handle.shutdown().await?)
    }

    /// The underlying lifecycle handle, for adapters that feed raw
    /// events themselves.
    pub fn handle(&self) -> &LifecycleHandle {
        &self.handle
    }
}
