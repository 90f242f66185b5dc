//! Resource provisioning: role + voice-channel allocation and release.

use std::sync::Arc;

use roomwarden_platform::{ChannelRef, ChatPlatform, MemberId, RoleRef};
use tracing::warn;

use crate::LifecycleError;

/// Allocates and releases the external resources backing a room.
///
/// A room's role and voice channel are created together and must never
/// be half-created: if the channel fails after the role succeeded, the
/// role is deleted again before the error is surfaced. Release goes the
/// other way — both deletions are attempted independently so one failure
/// cannot strand the other resource.
pub struct Provisioner<P: ChatPlatform> {
    platform: Arc<P>,
    parent: ChannelRef,
}

impl<P: ChatPlatform> Provisioner<P> {
    /// Creates a provisioner placing new voice channels under `parent`.
    pub fn new(platform: Arc<P>, parent: ChannelRef) -> Self {
        Self { platform, parent }
    }

    /// The underlying platform client.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Allocates a role and a voice channel named after the room, the
    /// channel restricted to holders of the role.
    ///
    /// On partial failure the already-created role is deleted; if even
    /// that cleanup fails the leak is logged for operator cleanup.
    pub async fn create_resources(
        &self,
        name: &str,
    ) -> Result<(RoleRef, ChannelRef), LifecycleError> {
        let role = self
            .platform
            .create_role(name)
            .await
            .map_err(|source| LifecycleError::Provision {
                room: name.to_string(),
                source,
            })?;

        match self
            .platform
            .create_voice_channel(name, self.parent, role)
            .await
        {
            Ok(channel) => Ok((role, channel)),
            Err(source) => {
                if let Err(e) = self.platform.delete_role(role).await {
                    warn!(
                        room = name,
                        role = %role,
                        error = %e,
                        "could not clean up role after channel creation failed — manual cleanup needed"
                    );
                }
                Err(LifecycleError::Provision {
                    room: name.to_string(),
                    source,
                })
            }
        }
    }

    /// Grants a member the room's role. Idempotent at the platform level.
    pub async fn grant_access(
        &self,
        name: &str,
        role: RoleRef,
        member: MemberId,
    ) -> Result<(), LifecycleError> {
        self.platform
            .grant_role(member, role)
            .await
            .map_err(|source| LifecycleError::Provision {
                room: name.to_string(),
                source,
            })
    }

    /// Deletes the room's role and voice channel.
    ///
    /// Each deletion is attempted regardless of the other's outcome;
    /// failures are logged, never returned. The orphaned external
    /// resource is a known residual-leak risk flagged for the operator.
    pub async fn release_resources(&self, name: &str, role: RoleRef, channel: ChannelRef) {
        if let Err(e) = self.platform.delete_role(role).await {
            warn!(room = name, role = %role, error = %e, "role release failed");
        }
        if let Err(e) = self.platform.delete_channel(channel).await {
            warn!(room = name, channel = %channel, error = %e, "channel release failed");
        }
    }

    /// Sends a direct message to a member. Fire-and-forget: delivery
    /// failure is logged and never retried.
    pub async fn notify(&self, member: MemberId, text: &str) {
        if let Err(e) = self.platform.send_direct_message(member, text).await {
            warn!(member = %member, error = %e, "owner notification failed");
        }
    }
}
