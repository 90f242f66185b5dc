//! Chat-platform capability layer for Roomwarden.
//!
//! Provides the [`ChatPlatform`] trait that abstracts over the external
//! chat service (roles, voice channels, direct messages, presence), plus
//! the identity newtypes that flow through the rest of the workspace.
//!
//! The lifecycle core never talks to a network client directly — it only
//! calls this trait. [`InMemoryPlatform`] is a complete in-process
//! implementation used by the test suites and the demo binary.

mod error;
mod memory;

pub use error::PlatformError;
pub use memory::InMemoryPlatform;

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a chat-platform member.
///
/// Newtype over the platform's numeric id so a `MemberId` can never be
/// confused with a [`RoleRef`] or [`ChannelRef`]. `#[serde(transparent)]`
/// keeps the durable representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member-{}", self.0)
    }
}

/// Opaque handle to a role allocated on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRef(pub u64);

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role-{}", self.0)
    }
}

/// Opaque handle to a channel allocated on the platform.
///
/// Covers both voice channels and the parent grouping ("category") that
/// new voice channels are placed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelRef(pub u64);

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Presence events
// ---------------------------------------------------------------------------

/// A voice presence change reported by the platform's event stream.
///
/// `old_channel` is the voice channel the member was connected to before
/// the change (`None` if they were not in voice), `new_channel` the one
/// after it (`None` if they disconnected entirely).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceUpdate {
    /// The member whose voice state changed.
    pub member: MemberId,
    /// Channel before the change.
    pub old_channel: Option<ChannelRef>,
    /// Channel after the change.
    pub new_channel: Option<ChannelRef>,
}

impl PresenceUpdate {
    /// Returns `true` if the member did not actually change channel.
    ///
    /// Platforms emit presence updates for mute/deafen toggles too; those
    /// carry the same channel on both sides and are ignored upstream.
    pub fn is_noop(&self) -> bool {
        self.old_channel == self.new_channel
    }
}

// ---------------------------------------------------------------------------
// The capability trait
// ---------------------------------------------------------------------------

/// Capability interface to the external chat platform.
///
/// Everything the room lifecycle needs from the outside world: role and
/// voice-channel CRUD, role grants, direct messages, and occupancy
/// queries. Implementations wrap a real platform client; all methods are
/// fallible because every one of them crosses a network boundary.
///
/// Methods are declared in the desugared `impl Future + Send` form so the
/// lifecycle service can drive them from a spawned task over a generic
/// implementation. Implementations can still write plain `async fn`.
pub trait ChatPlatform: Send + Sync + 'static {
    /// Creates a role with the given name.
    fn create_role(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<RoleRef, PlatformError>> + Send;

    /// Deletes a role.
    fn delete_role(
        &self,
        role: RoleRef,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;

    /// Creates a voice channel under `parent`, visible only to holders
    /// of `access`.
    fn create_voice_channel(
        &self,
        name: &str,
        parent: ChannelRef,
        access: RoleRef,
    ) -> impl std::future::Future<Output = Result<ChannelRef, PlatformError>> + Send;

    /// Deletes a channel.
    fn delete_channel(
        &self,
        channel: ChannelRef,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;

    /// Grants a role to a member. Granting an already-held role is a no-op.
    fn grant_role(
        &self,
        member: MemberId,
        role: RoleRef,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;

    /// Sends a direct message to a member.
    fn send_direct_message(
        &self,
        member: MemberId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), PlatformError>> + Send;

    /// Returns the number of members currently connected to a voice channel.
    fn voice_occupancy(
        &self,
        channel: ChannelRef,
    ) -> impl std::future::Future<Output = Result<usize, PlatformError>> + Send;

    /// Resolves a channel handle to its current display name.
    ///
    /// Returns `Ok(None)` when the channel no longer exists on the
    /// platform — callers use this to detect orphaned state.
    fn channel_name(
        &self,
        channel: ChannelRef,
    ) -> impl std::future::Future<Output = Result<Option<String>, PlatformError>> + Send;
}
