//! Error types for the lifecycle core.

use roomwarden_platform::{MemberId, PlatformError};
use roomwarden_registry::RegistryError;
use roomwarden_store::StoreError;

/// Errors returned to callers of the lifecycle service.
///
/// Teardown-side failures (release of an external role or channel, a
/// durable delete) are deliberately *not* represented here: they are
/// logged and teardown proceeds, so a room can never get permanently
/// stuck over an external hiccup.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The member already owns an active room. Nothing was changed.
    #[error("member {0} already owns an active room")]
    DuplicateOwner(MemberId),

    /// Allocating the room's role or voice channel failed. Any partially
    /// created resource was released best-effort and the reserved name
    /// was freed.
    #[error("provisioning room {room} failed: {source}")]
    Provision {
        room: String,
        #[source]
        source: PlatformError,
    },

    /// No active room with this name.
    #[error("room {0} not found")]
    NotFound(String),

    /// The durable mirror rejected a write that creation depends on.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Registry invariant violation surfaced during insertion.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The lifecycle service is no longer running.
    #[error("room lifecycle service stopped")]
    ServiceStopped,
}
