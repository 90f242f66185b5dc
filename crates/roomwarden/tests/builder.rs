//! End-to-end tests of the builder and facade.

use std::sync::Arc;
use std::time::Duration;

use roomwarden::prelude::*;

#[tokio::test]
async fn test_build_fails_without_parent_category() {
    let platform = Arc::new(InMemoryPlatform::new());
    let result = RoomWarden::builder()
        .build(platform, MemoryStore::new())
        .await;

    assert!(matches!(result, Err(WardenError::Config(_))));
}

#[tokio::test]
async fn test_build_fails_on_missing_parent_category() {
    let platform = Arc::new(InMemoryPlatform::new());
    let result = RoomWarden::builder()
        .parent_category(ChannelRef(999))
        .build(platform, MemoryStore::new())
        .await;

    match result {
        Err(WardenError::Config(message)) => assert!(message.contains("channel-999")),
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_facade_round_trip() {
    let platform = Arc::new(InMemoryPlatform::new());
    let category = platform.add_category("Meeting Rooms");

    let warden = RoomWarden::builder()
        .parent_category(category)
        .idle_timeout(Duration::from_secs(60))
        .build(Arc::clone(&platform), MemoryStore::new())
        .await
        .unwrap();

    let name = warden.create_room(MemberId(1)).await.unwrap();
    assert_eq!(name, "game_room_1");
    warden.invite_member(&name, MemberId(2)).await.unwrap();

    let rooms = warden.list_rooms().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].member_count, 2);

    warden.delete_room(&name).await.unwrap();
    assert!(warden.list_rooms().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_errors_surface_through_facade() {
    let platform = Arc::new(InMemoryPlatform::new());
    let category = platform.add_category("Meeting Rooms");

    let warden = RoomWarden::builder()
        .parent_category(category)
        .build(platform, MemoryStore::new())
        .await
        .unwrap();

    warden.create_room(MemberId(1)).await.unwrap();
    let err = warden.create_room(MemberId(1)).await.unwrap_err();
    assert!(matches!(err, WardenError::Lifecycle(_)));

    let err = warden.delete_room("game_room_9").await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}
