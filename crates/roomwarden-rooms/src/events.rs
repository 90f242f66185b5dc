//! Typed events consumed by the lifecycle dispatcher, and the handle
//! used to send them.

use roomwarden_platform::{MemberId, PresenceUpdate};
use tokio::sync::{mpsc, oneshot};

use crate::LifecycleError;

/// Inbound events for the lifecycle service.
///
/// Command variants carry a `oneshot::Sender` reply channel — the caller
/// sends the event and awaits the response. Presence and timer events
/// are fire-and-forget.
#[derive(Debug)]
pub enum LifecycleEvent {
    /// A voice presence change from the platform's event stream.
    Presence(PresenceUpdate),

    /// Create a room for `owner` and reply with its name.
    CreateRoom {
        owner: MemberId,
        reply: oneshot::Sender<Result<String, LifecycleError>>,
    },

    /// Tear down a room explicitly (command path, not idle expiry).
    DeleteRoom {
        name: String,
        reply: oneshot::Sender<Result<(), LifecycleError>>,
    },

    /// Grant an additional member access to a room.
    InviteMember {
        name: String,
        member: MemberId,
        reply: oneshot::Sender<Result<(), LifecycleError>>,
    },

    /// An idle timer fired. Sent by the reaper's timer tasks; the
    /// dispatcher re-validates the room before tearing anything down.
    TimerExpired { name: String },

    /// Request a snapshot of all active rooms.
    ListRooms {
        reply: oneshot::Sender<Vec<RoomSummary>>,
    },

    /// Stop the service. Outstanding timers are aborted.
    Shutdown,
}

/// A snapshot of one room's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    /// The room's unique name.
    pub name: String,
    /// The member who created it.
    pub owner: MemberId,
    /// Number of members granted access.
    pub member_count: usize,
    /// `true` if the room is empty and counting down to teardown.
    pub idle: bool,
}

/// Handle to the running lifecycle service.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. All methods
/// return [`LifecycleError::ServiceStopped`] once the service is gone.
#[derive(Debug, Clone)]
pub struct LifecycleHandle {
    sender: mpsc::Sender<LifecycleEvent>,
}

impl LifecycleHandle {
    pub(crate) fn new(sender: mpsc::Sender<LifecycleEvent>) -> Self {
        Self { sender }
    }

    /// Creates a room owned by `owner` and returns its assigned name.
    pub async fn create_room(&self, owner: MemberId) -> Result<String, LifecycleError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LifecycleEvent::CreateRoom {
                owner,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LifecycleError::ServiceStopped)?;
        reply_rx.await.map_err(|_| LifecycleError::ServiceStopped)?
    }

    /// Tears down a room by name.
    pub async fn delete_room(&self, name: &str) -> Result<(), LifecycleError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LifecycleEvent::DeleteRoom {
                name: name.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| LifecycleError::ServiceStopped)?;
        reply_rx.await.map_err(|_| LifecycleError::ServiceStopped)?
    }

    /// Grants `member` access to the named room. Re-inviting an existing
    /// member is a no-op.
    pub async fn invite_member(
        &self,
        name: &str,
        member: MemberId,
    ) -> Result<(), LifecycleError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LifecycleEvent::InviteMember {
                name: name.to_string(),
                member,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LifecycleError::ServiceStopped)?;
        reply_rx.await.map_err(|_| LifecycleError::ServiceStopped)?
    }

    /// Forwards a presence update from the platform's event stream.
    pub async fn presence(&self, update: PresenceUpdate) -> Result<(), LifecycleError> {
        self.sender
            .send(LifecycleEvent::Presence(update))
            .await
            .map_err(|_| LifecycleError::ServiceStopped)
    }

    /// Returns a snapshot of all active rooms, sorted by name.
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, LifecycleError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LifecycleEvent::ListRooms { reply: reply_tx })
            .await
            .map_err(|_| LifecycleError::ServiceStopped)?;
        reply_rx.await.map_err(|_| LifecycleError::ServiceStopped)
    }

    /// Injects a raw event. Escape hatch for platform adapters that
    /// translate gateway traffic into [`LifecycleEvent`]s themselves.
    pub async fn inject(&self, event: LifecycleEvent) -> Result<(), LifecycleError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| LifecycleError::ServiceStopped)
    }

    /// Tells the service to stop.
    pub async fn shutdown(&self) -> Result<(), LifecycleError> {
        self.sender
            .send(LifecycleEvent::Shutdown)
            .await
            .map_err(|_| LifecycleError::ServiceStopped)
    }
}
