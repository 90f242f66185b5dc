//! The durable mirror of a room.

use roomwarden_platform::{ChannelRef, MemberId, RoleRef};
use serde::{Deserialize, Serialize};

/// Essential fields of a room, persisted across restarts.
///
/// Keyed by `name` in the store. Member order is insertion order — kept
/// so restored rooms log membership the same way the live room did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Unique room name (doubles as the role and voice-channel name).
    pub name: String,
    /// The member who created the room.
    pub owner: MemberId,
    /// Handle to the room's access role.
    pub role: RoleRef,
    /// Handle to the room's voice channel.
    pub voice_channel: ChannelRef,
    /// Members granted access, owner first.
    pub members: Vec<MemberId>,
}
