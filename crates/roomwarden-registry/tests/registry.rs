//! Integration tests for name allocation and registry invariants.

use roomwarden_platform::{ChannelRef, MemberId, RoleRef};
use roomwarden_registry::{RegistryError, Room, RoomRegistry};

fn room(name: &str, owner: u64) -> Room {
    Room::new(
        name.into(),
        MemberId(owner),
        RoleRef(owner + 100),
        ChannelRef(owner + 200),
    )
}

/// Reserves a name and immediately registers a room under it.
fn create(registry: &mut RoomRegistry, owner: u64) -> String {
    let name = registry.reserve_name();
    registry.insert(room(&name, owner)).unwrap();
    name
}

// =========================================================================
// Name allocation
// =========================================================================

#[test]
fn test_names_are_sequential_from_one() {
    let mut registry = RoomRegistry::new();
    assert_eq!(create(&mut registry, 1), "game_room_1");
    assert_eq!(create(&mut registry, 2), "game_room_2");
    assert_eq!(create(&mut registry, 3), "game_room_3");
}

#[test]
fn test_lowest_free_index_is_reused_after_removal() {
    let mut registry = RoomRegistry::new();
    create(&mut registry, 1);
    create(&mut registry, 2);
    create(&mut registry, 3);

    registry.remove("game_room_2");
    assert_eq!(create(&mut registry, 4), "game_room_2");
    // The gap is filled; the next allocation continues past the end.
    assert_eq!(create(&mut registry, 5), "game_room_4");
}

#[test]
fn test_reserved_names_are_not_handed_out_twice() {
    let mut registry = RoomRegistry::new();
    let first = registry.reserve_name();
    let second = registry.reserve_name();
    assert_eq!(first, "game_room_1");
    assert_eq!(second, "game_room_2");
}

#[test]
fn test_released_reservation_frees_the_index() {
    let mut registry = RoomRegistry::new();
    let name = registry.reserve_name();
    registry.release_reservation(&name);
    assert_eq!(registry.reserve_name(), "game_room_1");
}

#[test]
fn test_release_unknown_reservation_is_noop() {
    let mut registry = RoomRegistry::new();
    registry.release_reservation("game_room_9");
    assert_eq!(registry.reserve_name(), "game_room_1");
}

// =========================================================================
// Insertion invariants
// =========================================================================

#[test]
fn test_duplicate_name_rejected() {
    let mut registry = RoomRegistry::new();
    create(&mut registry, 1);
    let result = registry.insert(room("game_room_1", 2));
    assert!(matches!(result, Err(RegistryError::NameTaken(_))));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_duplicate_owner_rejected_and_registry_unchanged() {
    let mut registry = RoomRegistry::new();
    create(&mut registry, 1);

    let name = registry.reserve_name();
    let result = registry.insert(room(&name, 1));
    assert!(matches!(result, Err(RegistryError::DuplicateOwner(m)) if m == MemberId(1)));

    // Exactly one entry for the owner, and it's the original room.
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.room_for_owner(MemberId(1)).unwrap().name(),
        "game_room_1"
    );
}

#[test]
fn test_insert_consumes_reservation() {
    let mut registry = RoomRegistry::new();
    let name = registry.reserve_name();
    registry.insert(room(&name, 1)).unwrap();
    registry.remove(&name);
    // Neither active nor reserved any more — the index comes back.
    assert_eq!(registry.reserve_name(), "game_room_1");
}

// =========================================================================
// Lookups
// =========================================================================

#[test]
fn test_owner_lookup() {
    let mut registry = RoomRegistry::new();
    create(&mut registry, 1);
    assert!(registry.has_room_for_owner(MemberId(1)));
    assert!(!registry.has_room_for_owner(MemberId(2)));
}

#[test]
fn test_remove_returns_the_room() {
    let mut registry = RoomRegistry::new();
    create(&mut registry, 1);
    let removed = registry.remove("game_room_1").unwrap();
    assert_eq!(removed.owner(), MemberId(1));
    assert!(registry.is_empty());
    assert!(registry.remove("game_room_1").is_none());
}

#[test]
fn test_iter_sees_all_rooms() {
    let mut registry = RoomRegistry::new();
    create(&mut registry, 1);
    create(&mut registry, 2);
    let mut names: Vec<_> = registry.iter().map(|r| r.name().to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["game_room_1", "game_room_2"]);
}
