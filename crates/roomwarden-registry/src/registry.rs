//! The room registry: name allocation and active-room bookkeeping.

use std::collections::{HashMap, HashSet};

use roomwarden_platform::MemberId;

use crate::{RegistryError, Room};

/// Prefix for sequentially allocated room names.
pub const NAME_PREFIX: &str = "game_room_";

/// Name-keyed map of active rooms.
///
/// Also tracks *reserved* names: a creation request reserves its name
/// before provisioning external resources, so two racing requests can
/// never pick the same index even though provisioning suspends. A
/// reservation is consumed by [`insert`](Self::insert) or dropped with
/// [`release_reservation`](Self::release_reservation) on failure.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    reserved: HashSet<String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the lowest-numbered `game_room_<n>` not currently active
    /// or reserved, and returns it.
    pub fn reserve_name(&mut self) -> String {
        let mut n = 1usize;
        loop {
            let name = format!("{NAME_PREFIX}{n}");
            if !self.rooms.contains_key(&name) && !self.reserved.contains(&name) {
                self.reserved.insert(name.clone());
                return name;
            }
            n += 1;
        }
    }

    /// Drops a reservation without inserting a room. Safe to call with a
    /// name that was never reserved.
    pub fn release_reservation(&mut self, name: &str) {
        self.reserved.remove(name);
    }

    /// Registers a room, consuming its name reservation.
    ///
    /// # Errors
    /// - [`RegistryError::NameTaken`] if a room with this name exists.
    /// - [`RegistryError::DuplicateOwner`] if the owner already has an
    ///   active room.
    pub fn insert(&mut self, room: Room) -> Result<(), RegistryError> {
        if self.rooms.contains_key(room.name()) {
            return Err(RegistryError::NameTaken(room.name().to_string()));
        }
        if self.has_room_for_owner(room.owner()) {
            return Err(RegistryError::DuplicateOwner(room.owner()));
        }
        self.reserved.remove(room.name());
        self.rooms.insert(room.name().to_string(), room);
        Ok(())
    }

    /// Removes and returns the room with the given name.
    pub fn remove(&mut self, name: &str) -> Option<Room> {
        self.rooms.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rooms.contains_key(name)
    }

    /// Whether the member currently owns an active room.
    ///
    /// Full scan. Fine at the expected scale (tens of rooms); an
    /// owner→name index would be needed well before this shows up in a
    /// profile.
    pub fn has_room_for_owner(&self, owner: MemberId) -> bool {
        self.rooms.values().any(|room| room.owner() == owner)
    }

    /// The room owned by the member, if any.
    pub fn room_for_owner(&self, owner: MemberId) -> Option<&Room> {
        self.rooms.values().find(|room| room.owner() == owner)
    }

    /// Iterates over all active rooms in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
