//! In-process [`ChatPlatform`] implementation.
//!
//! Backs the test suites and the demo binary. State lives behind a single
//! mutex; methods take the lock for the duration of the call only, so the
//! fake is safe to share across tasks via `Arc`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{ChannelRef, ChatPlatform, MemberId, PlatformError, PresenceUpdate, RoleRef};

#[derive(Debug)]
struct ChannelState {
    name: String,
    parent: Option<ChannelRef>,
    occupants: Vec<MemberId>,
}

#[derive(Debug)]
struct RoleState {
    name: String,
    members: Vec<MemberId>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    channels: HashMap<ChannelRef, ChannelState>,
    roles: HashMap<RoleRef, RoleState>,
    messages: Vec<(MemberId, String)>,
    deleted_channels: Vec<ChannelRef>,
    deleted_roles: Vec<RoleRef>,
    fail_next_role_create: bool,
    fail_next_channel_create: bool,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// An in-memory chat platform.
///
/// Besides implementing [`ChatPlatform`], it exposes helpers to stage
/// guild state (`add_category`, `join_voice`, `leave_voice`), inject
/// faults, and inspect what the lifecycle did (deleted resources, sent
/// messages). `join_voice`/`leave_voice` return the [`PresenceUpdate`]
/// a real gateway would emit for the move, ready to feed back in.
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    inner: Mutex<Inner>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parent grouping channel (category) and returns its handle.
    pub fn add_category(&self, name: &str) -> ChannelRef {
        let mut inner = self.inner.lock().unwrap();
        let id = ChannelRef(inner.next_id());
        inner.channels.insert(
            id,
            ChannelState {
                name: name.to_string(),
                parent: None,
                occupants: Vec::new(),
            },
        );
        id
    }

    /// Looks up a voice channel by its current name.
    pub fn voice_channel_by_name(&self, name: &str) -> Option<ChannelRef> {
        let inner = self.inner.lock().unwrap();
        inner
            .channels
            .iter()
            .find(|(_, c)| c.name == name && c.parent.is_some())
            .map(|(id, _)| *id)
    }

    /// Looks up a live role by its name.
    pub fn role_by_name(&self, name: &str) -> Option<RoleRef> {
        let inner = self.inner.lock().unwrap();
        inner
            .roles
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(id, _)| *id)
    }

    /// Moves a member into a voice channel, returning the presence update
    /// a gateway would emit for the move.
    ///
    /// # Panics
    /// Panics if the channel does not exist — tests stage channels first.
    pub fn join_voice(&self, member: MemberId, channel: ChannelRef) -> PresenceUpdate {
        let mut inner = self.inner.lock().unwrap();
        let old_channel = Self::current_channel(&inner, member);
        if let Some(old) = old_channel {
            if let Some(c) = inner.channels.get_mut(&old) {
                c.occupants.retain(|m| *m != member);
            }
        }
        let c = inner
            .channels
            .get_mut(&channel)
            .expect("join_voice: channel must exist");
        c.occupants.push(member);
        PresenceUpdate {
            member,
            old_channel,
            new_channel: Some(channel),
        }
    }

    /// Disconnects a member from voice entirely.
    ///
    /// Returns `None` if the member was not connected anywhere.
    pub fn leave_voice(&self, member: MemberId) -> Option<PresenceUpdate> {
        let mut inner = self.inner.lock().unwrap();
        let old = Self::current_channel(&inner, member)?;
        if let Some(c) = inner.channels.get_mut(&old) {
            c.occupants.retain(|m| *m != member);
        }
        Some(PresenceUpdate {
            member,
            old_channel: Some(old),
            new_channel: None,
        })
    }

    /// Renames a live channel in place. Used to exercise the documented
    /// name-binding limitation.
    pub fn rename_channel(&self, channel: ChannelRef, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(c) = inner.channels.get_mut(&channel) {
            c.name = name.to_string();
        }
    }

    /// All direct messages sent so far, in order.
    pub fn direct_messages(&self) -> Vec<(MemberId, String)> {
        self.inner.lock().unwrap().messages.clone()
    }

    /// Direct messages sent to one member, in order.
    pub fn messages_to(&self, member: MemberId) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|(m, _)| *m == member)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Channels deleted through the capability interface, in order.
    pub fn deleted_channels(&self) -> Vec<ChannelRef> {
        self.inner.lock().unwrap().deleted_channels.clone()
    }

    /// Roles deleted through the capability interface, in order.
    pub fn deleted_roles(&self) -> Vec<RoleRef> {
        self.inner.lock().unwrap().deleted_roles.clone()
    }

    /// Number of roles currently live.
    pub fn live_role_count(&self) -> usize {
        self.inner.lock().unwrap().roles.len()
    }

    /// Members holding the given role.
    pub fn role_members(&self, role: RoleRef) -> Vec<MemberId> {
        self.inner
            .lock()
            .unwrap()
            .roles
            .get(&role)
            .map(|r| r.members.clone())
            .unwrap_or_default()
    }

    /// Makes the next `create_role` call fail.
    pub fn fail_next_role_create(&self) {
        self.inner.lock().unwrap().fail_next_role_create = true;
    }

    /// Makes the next `create_voice_channel` call fail.
    pub fn fail_next_channel_create(&self) {
        self.inner.lock().unwrap().fail_next_channel_create = true;
    }

    fn current_channel(inner: &Inner, member: MemberId) -> Option<ChannelRef> {
        inner
            .channels
            .iter()
            .find(|(_, c)| c.occupants.contains(&member))
            .map(|(id, _)| *id)
    }
}

impl ChatPlatform for InMemoryPlatform {
    async fn create_role(&self, name: &str) -> Result<RoleRef, PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_role_create) {
            return Err(PlatformError::RoleCreate("injected failure".into()));
        }
        let id = RoleRef(inner.next_id());
        inner.roles.insert(
            id,
            RoleState {
                name: name.to_string(),
                members: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn delete_role(&self, role: RoleRef) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.roles.remove(&role).is_none() {
            return Err(PlatformError::UnknownRole(role));
        }
        inner.deleted_roles.push(role);
        Ok(())
    }

    async fn create_voice_channel(
        &self,
        name: &str,
        parent: ChannelRef,
        _access: RoleRef,
    ) -> Result<ChannelRef, PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_channel_create) {
            return Err(PlatformError::ChannelCreate("injected failure".into()));
        }
        if !inner.channels.contains_key(&parent) {
            return Err(PlatformError::UnknownChannel(parent));
        }
        let id = ChannelRef(inner.next_id());
        inner.channels.insert(
            id,
            ChannelState {
                name: name.to_string(),
                parent: Some(parent),
                occupants: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn delete_channel(&self, channel: ChannelRef) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.channels.remove(&channel).is_none() {
            return Err(PlatformError::UnknownChannel(channel));
        }
        inner.deleted_channels.push(channel);
        Ok(())
    }

    async fn grant_role(&self, member: MemberId, role: RoleRef) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        let state = inner
            .roles
            .get_mut(&role)
            .ok_or(PlatformError::UnknownRole(role))?;
        if !state.members.contains(&member) {
            state.members.push(member);
        }
        Ok(())
    }

    async fn send_direct_message(
        &self,
        member: MemberId,
        text: &str,
    ) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock().unwrap();
        inner.messages.push((member, text.to_string()));
        Ok(())
    }

    async fn voice_occupancy(&self, channel: ChannelRef) -> Result<usize, PlatformError> {
        let inner = self.inner.lock().unwrap();
        inner
            .channels
            .get(&channel)
            .map(|c| c.occupants.len())
            .ok_or(PlatformError::UnknownChannel(channel))
    }

    async fn channel_name(&self, channel: ChannelRef) -> Result<Option<String>, PlatformError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.channels.get(&channel).map(|c| c.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_resolve_channel() {
        let platform = InMemoryPlatform::new();
        let parent = platform.add_category("Meeting Rooms");
        let role = platform.create_role("game_room_1").await.unwrap();
        let ch = platform
            .create_voice_channel("game_room_1", parent, role)
            .await
            .unwrap();

        assert_eq!(
            platform.channel_name(ch).await.unwrap().as_deref(),
            Some("game_room_1")
        );
        assert_eq!(platform.voice_channel_by_name("game_room_1"), Some(ch));
        assert_eq!(platform.role_by_name("game_room_1"), Some(role));
        assert_eq!(platform.voice_occupancy(ch).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_channel_create_requires_parent() {
        let platform = InMemoryPlatform::new();
        let role = platform.create_role("r").await.unwrap();
        let result = platform
            .create_voice_channel("orphan", ChannelRef(999), role)
            .await;
        assert!(matches!(result, Err(PlatformError::UnknownChannel(_))));
    }

    #[tokio::test]
    async fn test_join_and_leave_update_occupancy() {
        let platform = InMemoryPlatform::new();
        let parent = platform.add_category("rooms");
        let role = platform.create_role("r").await.unwrap();
        let ch = platform
            .create_voice_channel("v", parent, role)
            .await
            .unwrap();

        let joined = platform.join_voice(MemberId(1), ch);
        assert_eq!(joined.old_channel, None);
        assert_eq!(joined.new_channel, Some(ch));
        assert_eq!(platform.voice_occupancy(ch).await.unwrap(), 1);

        let left = platform.leave_voice(MemberId(1)).unwrap();
        assert_eq!(left.old_channel, Some(ch));
        assert_eq!(left.new_channel, None);
        assert_eq!(platform.voice_occupancy(ch).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_move_between_channels_reports_both_sides() {
        let platform = InMemoryPlatform::new();
        let parent = platform.add_category("rooms");
        let role = platform.create_role("r").await.unwrap();
        let a = platform
            .create_voice_channel("a", parent, role)
            .await
            .unwrap();
        let b = platform
            .create_voice_channel("b", parent, role)
            .await
            .unwrap();

        platform.join_voice(MemberId(1), a);
        let moved = platform.join_voice(MemberId(1), b);
        assert_eq!(moved.old_channel, Some(a));
        assert_eq!(moved.new_channel, Some(b));
        assert_eq!(platform.voice_occupancy(a).await.unwrap(), 0);
        assert_eq!(platform.voice_occupancy(b).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_grant_role_is_idempotent() {
        let platform = InMemoryPlatform::new();
        let role = platform.create_role("r").await.unwrap();
        platform.grant_role(MemberId(1), role).await.unwrap();
        platform.grant_role(MemberId(1), role).await.unwrap();
        assert_eq!(platform.role_members(role), vec![MemberId(1)]);
    }

    #[tokio::test]
    async fn test_deleted_channel_resolves_to_none() {
        let platform = InMemoryPlatform::new();
        let parent = platform.add_category("rooms");
        let role = platform.create_role("r").await.unwrap();
        let ch = platform
            .create_voice_channel("v", parent, role)
            .await
            .unwrap();

        platform.delete_channel(ch).await.unwrap();
        assert_eq!(platform.channel_name(ch).await.unwrap(), None);
        assert_eq!(platform.deleted_channels(), vec![ch]);
    }

    #[tokio::test]
    async fn test_injected_failures_fire_once() {
        let platform = InMemoryPlatform::new();
        platform.fail_next_role_create();
        assert!(platform.create_role("r").await.is_err());
        assert!(platform.create_role("r").await.is_ok());
    }
}
