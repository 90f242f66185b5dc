//! The room record held by the registry.

use roomwarden_platform::{ChannelRef, MemberId, RoleRef};
use roomwarden_store::RoomRecord;

/// One transient grouped resource: a role, a voice channel, and the
/// members granted access to them.
///
/// The room's `name` doubles as the external role and voice-channel name
/// and as the registry key. Timer state is deliberately *not* stored
/// here — the idle reaper owns an explicit name→timer table so expiry
/// callbacks validate against the registry instead of trusting captured
/// context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    name: String,
    owner: MemberId,
    role: RoleRef,
    voice_channel: ChannelRef,
    /// Insertion-ordered, duplicates rejected, owner first.
    members: Vec<MemberId>,
}

impl Room {
    /// Creates a room with the owner as its first member.
    pub fn new(name: String, owner: MemberId, role: RoleRef, voice_channel: ChannelRef) -> Self {
        Self {
            name,
            owner,
            role,
            voice_channel,
            members: vec![owner],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> MemberId {
        self.owner
    }

    pub fn role(&self) -> RoleRef {
        self.role
    }

    pub fn voice_channel(&self) -> ChannelRef {
        self.voice_channel
    }

    /// Members granted access, in the order they were added.
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn has_member(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }

    /// Adds a member. Returns `false` (and changes nothing) if the
    /// member already has access.
    pub fn add_member(&mut self, member: MemberId) -> bool {
        if self.has_member(member) {
            return false;
        }
        self.members.push(member);
        true
    }
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        RoomRecord {
            name: room.name.clone(),
            owner: room.owner,
            role: room.role,
            voice_channel: room.voice_channel,
            members: room.members.clone(),
        }
    }
}

impl From<RoomRecord> for Room {
    fn from(record: RoomRecord) -> Self {
        let mut room = Room {
            name: record.name,
            owner: record.owner,
            role: record.role,
            voice_channel: record.voice_channel,
            members: Vec::with_capacity(record.members.len()),
        };
        // Re-apply through add_member so a hand-edited or pre-migration
        // record can't smuggle duplicates back in.
        for member in record.members {
            room.add_member(member);
        }
        if !room.has_member(record.owner) {
            room.members.insert(0, record.owner);
        }
        room
    }
}
