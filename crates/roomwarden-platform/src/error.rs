//! Error types for the platform capability layer.

use crate::{ChannelRef, MemberId, RoleRef};

/// Errors that can occur when talking to the chat platform.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Role creation was rejected by the platform.
    #[error("role creation failed: {0}")]
    RoleCreate(String),

    /// Voice-channel creation was rejected by the platform.
    #[error("channel creation failed: {0}")]
    ChannelCreate(String),

    /// The channel handle does not resolve to a live channel.
    #[error("unknown channel {0}")]
    UnknownChannel(ChannelRef),

    /// The role handle does not resolve to a live role.
    #[error("unknown role {0}")]
    UnknownRole(RoleRef),

    /// A direct message could not be delivered.
    #[error("message delivery to {0} failed")]
    DeliveryFailed(MemberId),

    /// Any other failed platform request (rate limit, network, permissions).
    #[error("platform request failed: {0}")]
    Request(String),
}
