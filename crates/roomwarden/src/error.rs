//! Unified error type for the RoomWarden framework.

use roomwarden_platform::PlatformError;
use roomwarden_registry::RegistryError;
use roomwarden_rooms::LifecycleError;
use roomwarden_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `roomwarden` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// Startup configuration is unusable. The only fatal error class:
    /// it is raised before any event is processed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A platform-level error (resource creation, delivery, lookups).
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A store-level error (encode, write, read).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A registry-level error (name or owner conflicts).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A lifecycle-level error (provisioning, lookups, stopped service).
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomwarden_platform::{ChannelRef, MemberId};

    #[test]
    fn test_from_platform_error() {
        let err = PlatformError::UnknownChannel(ChannelRef(7));
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Platform(_)));
        assert!(warden_err.to_string().contains("channel-7"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Write("disk full".into());
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Store(_)));
        assert!(warden_err.to_string().contains("disk full"));
    }

    #[test]
    fn test_from_registry_error() {
        let err = RegistryError::DuplicateOwner(MemberId(3));
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Registry(_)));
    }

    #[test]
    fn test_from_lifecycle_error() {
        let err = LifecycleError::NotFound("game_room_1".into());
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Lifecycle(_)));
        assert!(warden_err.to_string().contains("game_room_1"));
    }
}
