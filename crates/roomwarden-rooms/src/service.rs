//! The lifecycle dispatcher: one task that owns all room state.

use std::sync::Arc;
use std::time::Duration;

use roomwarden_platform::{ChannelRef, ChatPlatform, MemberId, PresenceUpdate};
use roomwarden_registry::{Room, RoomRegistry};
use roomwarden_store::{RecordStore, RoomRecord};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    LifecycleError, LifecycleEvent, LifecycleHandle, Provisioner, Reaper, RoomSummary,
};

/// Configuration for the lifecycle service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How long a room may sit empty before it is reclaimed.
    pub idle_timeout: Duration,
    /// Parent grouping new voice channels are placed under.
    pub parent_category: ChannelRef,
    /// Inbound event channel capacity.
    pub event_capacity: usize,
}

/// Spawns the lifecycle service and returns a handle to it.
///
/// The service first resumes rooms from the durable store (re-arming
/// idle timers for rooms found empty), then processes events until
/// [`LifecycleEvent::Shutdown`] or until every handle is dropped.
pub fn spawn_service<P, S>(platform: Arc<P>, store: S, config: ServiceConfig) -> LifecycleHandle
where
    P: ChatPlatform,
    S: RecordStore,
{
    let (tx, rx) = mpsc::channel(config.event_capacity);
    let service = RoomService {
        provisioner: Provisioner::new(platform, config.parent_category),
        store,
        registry: RoomRegistry::new(),
        reaper: Reaper::new(config.idle_timeout, tx.clone()),
        events: rx,
    };
    tokio::spawn(service.run());
    LifecycleHandle::new(tx)
}

/// The dispatcher state. Runs inside a single Tokio task, so registry
/// and timer mutations are serialized without locks. Handlers that
/// suspend on platform or store calls re-check state after resuming —
/// most importantly, expiry re-checks that its room still exists.
struct RoomService<P: ChatPlatform, S: RecordStore> {
    provisioner: Provisioner<P>,
    store: S,
    registry: RoomRegistry,
    reaper: Reaper,
    events: mpsc::Receiver<LifecycleEvent>,
}

impl<P: ChatPlatform, S: RecordStore> RoomService<P, S> {
    async fn run(mut self) {
        if let Err(e) = self.resume().await {
            warn!(error = %e, "startup recovery failed — continuing with an empty registry");
        }
        info!("room lifecycle service running");

        while let Some(event) = self.events.recv().await {
            match event {
                LifecycleEvent::CreateRoom { owner, reply } => {
                    let result = self.handle_create(owner).await;
                    let _ = reply.send(result);
                }
                LifecycleEvent::DeleteRoom { name, reply } => {
                    let result = self.handle_delete(&name).await;
                    let _ = reply.send(result);
                }
                LifecycleEvent::InviteMember {
                    name,
                    member,
                    reply,
                } => {
                    let result = self.handle_invite(&name, member).await;
                    let _ = reply.send(result);
                }
                LifecycleEvent::Presence(update) => {
                    self.handle_presence(update).await;
                }
                LifecycleEvent::TimerExpired { name } => {
                    self.handle_expiry(&name).await;
                }
                LifecycleEvent::ListRooms { reply } => {
                    let _ = reply.send(self.summaries());
                }
                LifecycleEvent::Shutdown => {
                    info!("room lifecycle service shutting down");
                    break;
                }
            }
        }

        self.reaper.abort_all();
        info!("room lifecycle service stopped");
    }

    // ---------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------

    async fn handle_create(&mut self, owner: MemberId) -> Result<String, LifecycleError> {
        if self.registry.has_room_for_owner(owner) {
            debug!(owner = %owner, "create rejected — owner already has a room");
            return Err(LifecycleError::DuplicateOwner(owner));
        }

        // Reserve the name before suspending on provisioning, so a
        // racing create cannot pick the same index.
        let name = self.registry.reserve_name();

        let (role, channel) = match self.provisioner.create_resources(&name).await {
            Ok(refs) => refs,
            Err(e) => {
                self.registry.release_reservation(&name);
                warn!(room = %name, owner = %owner, error = %e, "room creation failed");
                return Err(e);
            }
        };

        if let Err(e) = self.provisioner.grant_access(&name, role, owner).await {
            warn!(room = %name, owner = %owner, error = %e, "owner grant failed — rolling back");
            self.provisioner.release_resources(&name, role, channel).await;
            self.registry.release_reservation(&name);
            return Err(e);
        }

        let room = Room::new(name.clone(), owner, role, channel);

        // Mirror durably before reporting success; a room the store
        // doesn't know about would vanish on restart.
        if let Err(e) = self.store.upsert(&RoomRecord::from(&room)).await {
            warn!(room = %name, error = %e, "durable save failed — rolling back creation");
            self.provisioner.release_resources(&name, role, channel).await;
            self.registry.release_reservation(&name);
            return Err(e.into());
        }

        // Unreachable while this task is the only registry writer (the
        // reservation holds the name, and the owner check above ran in
        // the same event). Rolled back like the other branches anyway so
        // a refactor can't turn it into a resource leak.
        if let Err(e) = self.registry.insert(room) {
            warn!(room = %name, owner = %owner, error = %e, "registry insert failed — rolling back creation");
            self.provisioner.release_resources(&name, role, channel).await;
            if let Err(del) = self.store.delete(&name).await {
                warn!(room = %name, error = %del, "rollback record delete failed");
            }
            self.registry.release_reservation(&name);
            return Err(e.into());
        }
        info!(room = %name, owner = %owner, "room created");

        self.provisioner
            .notify(
                owner,
                &format!("Your meeting room {name} is ready — join its voice channel to keep it open."),
            )
            .await;

        Ok(name)
    }

    // ---------------------------------------------------------------------
    // Explicit deletion and invites
    // ---------------------------------------------------------------------

    async fn handle_delete(&mut self, name: &str) -> Result<(), LifecycleError> {
        if !self.registry.contains(name) {
            return Err(LifecycleError::NotFound(name.to_string()));
        }
        self.reaper.cancel(name);
        self.teardown(name, "Your meeting room {room} was closed.")
            .await;
        Ok(())
    }

    async fn handle_invite(
        &mut self,
        name: &str,
        member: MemberId,
    ) -> Result<(), LifecycleError> {
        let room = self
            .registry
            .get(name)
            .ok_or_else(|| LifecycleError::NotFound(name.to_string()))?;
        let role = room.role();

        self.provisioner.grant_access(name, role, member).await?;

        let room = self
            .registry
            .get_mut(name)
            .ok_or_else(|| LifecycleError::NotFound(name.to_string()))?;
        if !room.add_member(member) {
            // Already a member; the grant above was a platform no-op too.
            return Ok(());
        }
        let record = RoomRecord::from(&*room);

        if let Err(e) = self.store.upsert(&record).await {
            warn!(room = name, error = %e, "membership mirror update failed");
        }
        info!(room = name, member = %member, "member invited");
        self.provisioner
            .notify(member, &format!("You now have access to meeting room {name}."))
            .await;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Presence / occupancy state machine
    // ---------------------------------------------------------------------

    async fn handle_presence(&mut self, update: PresenceUpdate) {
        if update.is_noop() {
            return;
        }
        if let Some(old) = update.old_channel {
            self.on_channel_departure(old).await;
        }
        if let Some(new) = update.new_channel {
            self.on_channel_arrival(new).await;
        }
    }

    /// A member left `channel`. If it backs a registered room that is
    /// now empty, start the idle countdown.
    async fn on_channel_departure(&mut self, channel: ChannelRef) {
        let Some(name) = self.resolve_room_channel(channel).await else {
            return;
        };
        if self.reaper.is_armed(&name) {
            // Already counting down; nothing to do.
            return;
        }
        let Some(room) = self.registry.get(&name) else {
            return;
        };
        let owner = room.owner();
        let voice_channel = room.voice_channel();

        match self.provisioner.platform().voice_occupancy(voice_channel).await {
            Ok(0) => {
                let timeout = self.reaper.timeout();
                info!(room = %name, "room is empty — idle countdown started");
                self.provisioner
                    .notify(
                        owner,
                        &format!(
                            "Meeting room {name} is empty and will close in {} seconds unless someone joins.",
                            timeout.as_secs()
                        ),
                    )
                    .await;
                // Re-check: the notify suspended; the room may have been
                // deleted or repopulated while we were away.
                if self.registry.contains(&name) && !self.reaper.is_armed(&name) {
                    self.reaper.arm(&name);
                }
            }
            Ok(_) => {}
            Err(e) => {
                debug!(room = %name, error = %e, "occupancy check failed — leaving state unchanged");
            }
        }
    }

    /// A member joined `channel`. If it backs a room that was counting
    /// down, the room is live again.
    async fn on_channel_arrival(&mut self, channel: ChannelRef) {
        let Some(name) = self.resolve_room_channel(channel).await else {
            return;
        };
        if self.reaper.cancel(&name) {
            info!(room = %name, "member joined — idle countdown cancelled");
        }
    }

    /// Maps a presence event's channel handle to a registered room name.
    ///
    /// The binding is by the channel's *current* display name, because
    /// rooms are keyed by name. An external rename therefore silently
    /// breaks the binding — documented limitation.
    async fn resolve_room_channel(&self, channel: ChannelRef) -> Option<String> {
        match self.provisioner.platform().channel_name(channel).await {
            Ok(Some(name)) if self.registry.contains(&name) => Some(name),
            Ok(_) => None,
            Err(e) => {
                debug!(channel = %channel, error = %e, "channel resolution failed — ignoring event");
                None
            }
        }
    }

    // ---------------------------------------------------------------------
    // Expiry and teardown
    // ---------------------------------------------------------------------

    async fn handle_expiry(&mut self, name: &str) {
        // A fired timer's expiry event can sit in the queue behind a
        // cancellation: member joins, arrival cancels the (already
        // completed) timer, then this event arrives. No table entry
        // means the fire is stale, whatever the registry says.
        if !self.reaper.is_armed(name) {
            debug!(room = name, "stale timer fire ignored — timer no longer armed");
            return;
        }
        self.reaper.clear_fired(name);
        if !self.registry.contains(name) {
            // Room already torn down through another path. Stale fire,
            // not an error.
            debug!(room = name, "stale timer fire ignored");
            return;
        }
        info!(room = name, "idle timeout reached — reclaiming room");
        self.teardown(
            name,
            "Your meeting room {room} was closed after sitting empty.",
        )
        .await;
    }

    /// Shared teardown path: release external resources, drop the
    /// durable record, remove the registry entry, notify the owner —
    /// in that order.
    async fn teardown(&mut self, name: &str, owner_message: &str) {
        let Some(room) = self.registry.get(name) else {
            return;
        };
        let owner = room.owner();
        let role = room.role();
        let channel = room.voice_channel();

        self.provisioner.release_resources(name, role, channel).await;

        if let Err(e) = self.store.delete(name).await {
            warn!(room = name, error = %e, "durable record delete failed — continuing teardown");
        }

        self.registry.remove(name);
        info!(room = name, "room torn down");

        self.provisioner
            .notify(owner, &owner_message.replace("{room}", name))
            .await;
    }

    // ---------------------------------------------------------------------
    // Startup recovery
    // ---------------------------------------------------------------------

    /// Rebuilds the registry from the durable store and re-arms idle
    /// timers for rooms found empty. Records whose voice channel no
    /// longer exists are orphans: skipped and purged so they don't
    /// resurface on every restart.
    async fn resume(&mut self) -> Result<(), LifecycleError> {
        let records = self.store.read_all().await?;
        if records.is_empty() {
            return Ok(());
        }
        info!(count = records.len(), "resuming rooms from durable store");

        for record in records {
            let name = record.name.clone();

            match self
                .provisioner
                .platform()
                .channel_name(record.voice_channel)
                .await
            {
                Ok(Some(_)) => {}
                Ok(None) => {
                    warn!(room = %name, "stored room's voice channel is gone — dropping orphaned record");
                    if let Err(e) = self.store.delete(&name).await {
                        warn!(room = %name, error = %e, "orphaned record delete failed");
                    }
                    continue;
                }
                Err(e) => {
                    warn!(room = %name, error = %e, "could not resolve stored room's channel — skipping");
                    continue;
                }
            }

            let room = Room::from(record);
            let owner = room.owner();
            let channel = room.voice_channel();
            if let Err(e) = self.registry.insert(room) {
                warn!(room = %name, error = %e, "stored room conflicts with registry — skipping");
                continue;
            }

            match self.provisioner.platform().voice_occupancy(channel).await {
                Ok(0) => {
                    let timeout = self.reaper.timeout();
                    info!(room = %name, "resumed empty — idle countdown armed");
                    self.provisioner
                        .notify(
                            owner,
                            &format!(
                                "Meeting room {name} is empty and will close in {} seconds unless someone joins.",
                                timeout.as_secs()
                            ),
                        )
                        .await;
                    self.reaper.arm(&name);
                }
                Ok(occupants) => {
                    info!(room = %name, occupants, "resumed active");
                }
                Err(e) => {
                    warn!(room = %name, error = %e, "occupancy check failed on resume — treating as active");
                }
            }
        }
        Ok(())
    }

    fn summaries(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self
            .registry
            .iter()
            .map(|room| RoomSummary {
                name: room.name().to_string(),
                owner: room.owner(),
                member_count: room.member_count(),
                idle: self.reaper.is_armed(room.name()),
            })
            .collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }
}
