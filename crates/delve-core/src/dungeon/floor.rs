//! Floor: one generated dungeon level, an arena of rooms keyed by id

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;
use super::room::{Room, RoomId};

/// Structural invariant violated by a floor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloorError {
    #[error("room {0} is referenced but not present")]
    MissingRoom(RoomId),

    #[error("room {from} links {direction} to {to} without a matching return door")]
    Asymmetric {
        from: RoomId,
        direction: Direction,
        to: RoomId,
    },

    #[error("only {reached} of {total} rooms are reachable from the start")]
    Disconnected { reached: usize, total: usize },

    #[error("start and exit are the same room {0}")]
    StartIsExit(RoomId),

    #[error("door {direction} of room {room} is already in use")]
    DoorTaken { room: RoomId, direction: Direction },
}

/// A generated floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub floor_number: u32,
    pub rooms: BTreeMap<RoomId, Room>,
    pub start_room_id: RoomId,
    pub exit_room_id: RoomId,
}

impl Floor {
    /// Empty floor; ids are fixed up once rooms are assigned
    pub fn new(floor_number: u32) -> Self {
        Self {
            floor_number,
            rooms: BTreeMap::new(),
            start_room_id: RoomId(0),
            exit_room_id: RoomId(0),
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn insert(&mut self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    /// Join `a` to `b` through `a`'s door in `direction` and `b`'s opposite door
    ///
    /// Both sides are written or neither is.
    pub fn connect(
        &mut self,
        a: RoomId,
        direction: Direction,
        b: RoomId,
    ) -> Result<(), FloorError> {
        let back = direction.opposite();
        let room_a = self.rooms.get(&a).ok_or(FloorError::MissingRoom(a))?;
        let room_b = self.rooms.get(&b).ok_or(FloorError::MissingRoom(b))?;
        if room_a.connections.contains_key(&direction) {
            return Err(FloorError::DoorTaken {
                room: a,
                direction,
            });
        }
        if room_b.connections.contains_key(&back) {
            return Err(FloorError::DoorTaken {
                room: b,
                direction: back,
            });
        }

        if let Some(room) = self.rooms.get_mut(&a) {
            room.connections.insert(direction, b);
        }
        if let Some(room) = self.rooms.get_mut(&b) {
            room.connections.insert(back, a);
        }
        Ok(())
    }

    /// Hop counts from `from` to every reachable room
    pub fn distances_from(&self, from: RoomId) -> BTreeMap<RoomId, u32> {
        let mut dist = BTreeMap::new();
        if !self.contains(from) {
            return dist;
        }
        let mut queue = VecDeque::new();
        dist.insert(from, 0);
        queue.push_back(from);

        while let Some(id) = queue.pop_front() {
            let d = dist[&id];
            let Some(room) = self.rooms.get(&id) else {
                continue;
            };
            for next in room.connections.values() {
                if self.contains(*next) && !dist.contains_key(next) {
                    dist.insert(*next, d + 1);
                    queue.push_back(*next);
                }
            }
        }
        dist
    }

    /// Room farthest from `from`; ties go to the lowest id
    pub fn farthest_from(&self, from: RoomId) -> Option<(RoomId, u32)> {
        self.distances_from(from)
            .into_iter()
            .fold(None, |best, (id, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((id, d)),
            })
    }

    /// Whether every room is reachable from the start room
    pub fn is_connected(&self) -> bool {
        self.distances_from(self.start_room_id).len() == self.rooms.len()
    }

    /// Ids of rooms whose `discovered` flag is set
    pub fn discovered_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values().filter(|r| r.discovered)
    }

    /// Check connectivity, symmetry and start/exit distinctness
    pub fn validate(&self) -> Result<(), FloorError> {
        if !self.contains(self.start_room_id) {
            return Err(FloorError::MissingRoom(self.start_room_id));
        }
        if !self.contains(self.exit_room_id) {
            return Err(FloorError::MissingRoom(self.exit_room_id));
        }
        if self.start_room_id == self.exit_room_id {
            return Err(FloorError::StartIsExit(self.start_room_id));
        }

        for room in self.rooms.values() {
            for (&direction, &to) in &room.connections {
                let other = self.rooms.get(&to).ok_or(FloorError::MissingRoom(to))?;
                if other.neighbor(direction.opposite()) != Some(room.id) {
                    return Err(FloorError::Asymmetric {
                        from: room.id,
                        direction,
                        to,
                    });
                }
            }
        }

        let reached = self.distances_from(self.start_room_id).len();
        if reached != self.rooms.len() {
            return Err(FloorError::Disconnected {
                reached,
                total: self.rooms.len(),
            });
        }
        Ok(())
    }
}
