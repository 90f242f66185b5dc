//! Simulated bot session against the in-memory platform.
//!
//! Walks a room through its whole life: create, invite, members joining
//! and leaving voice, and finally idle reclamation. Run with
//! `RUST_LOG=debug cargo run -p bot-sim` to watch the lifecycle logs.

use std::sync::Arc;
use std::time::Duration;

use roomwarden::prelude::*;
use tracing::info;

const IDLE_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), WardenError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let platform = Arc::new(InMemoryPlatform::new());
    let category = platform.add_category("Meeting Rooms");
    let store = MemoryStore::new();

    let warden = RoomWarden::builder()
        .parent_category(category)
        .idle_timeout(IDLE_TIMEOUT)
        .build(Arc::clone(&platform), store)
        .await?;

    let alice = MemberId(1);
    let bob = MemberId(2);

    let room = warden.create_room(alice).await?;
    info!(%room, "room created");

    warden.invite_member(&room, bob).await?;

    let channel = platform
        .voice_channel_by_name(&room)
        .expect("room channel exists");
    warden.presence(platform.join_voice(alice, channel)).await?;
    warden.presence(platform.join_voice(bob, channel)).await?;
    let rooms = warden.list_rooms().await?;
    info!(?rooms, "both members in voice");

    if let Some(update) = platform.leave_voice(alice) {
        warden.presence(update).await?;
    }
    if let Some(update) = platform.leave_voice(bob) {
        warden.presence(update).await?;
    }
    info!("room is now empty, waiting for idle reclamation");

    tokio::time::sleep(IDLE_TIMEOUT + Duration::from_secs(1)).await;

    let rooms = warden.list_rooms().await?;
    info!(?rooms, "after idle timeout");
    for message in platform.messages_to(alice) {
        info!(to = %alice, %message, "owner notification");
    }

    warden.shutdown().await?;
    Ok(())
}
