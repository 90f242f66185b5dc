//! Error types for the registry layer.

use roomwarden_platform::MemberId;

/// Errors that can occur when mutating the room registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A room with this name is already registered.
    #[error("room {0} is already registered")]
    NameTaken(String),

    /// The member already owns an active room.
    /// A member can own at most one room at a time.
    #[error("member {0} already owns an active room")]
    DuplicateOwner(MemberId),
}
