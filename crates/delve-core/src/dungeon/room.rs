//! Room types and structures

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::content::RoomContent;
use super::direction::Direction;

/// Room identifier, unique within a floor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Room types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomType {
    /// Where the player enters the floor
    Start,
    /// Leads to the next floor
    Exit,
    /// Exit guarded by a boss
    Boss,
    Treasure,
    Secret,
    Merchant,
    Rest,
    /// Ordinary room with enemies
    #[default]
    Battle,
}

impl RoomType {
    /// Types handed out by weighted sampling to a fraction of ordinary rooms
    pub const SPECIAL: [RoomType; 4] = [
        RoomType::Treasure,
        RoomType::Secret,
        RoomType::Merchant,
        RoomType::Rest,
    ];

    /// Whether the floor ends in this room
    pub const fn is_exit(self) -> bool {
        matches!(self, RoomType::Exit | RoomType::Boss)
    }

    pub const fn is_special(self) -> bool {
        matches!(
            self,
            RoomType::Treasure | RoomType::Secret | RoomType::Merchant | RoomType::Rest
        )
    }

    /// Single-character glyph for text maps
    pub const fn glyph(self) -> char {
        match self {
            RoomType::Start => 'S',
            RoomType::Exit => 'E',
            RoomType::Boss => 'B',
            RoomType::Treasure => 'T',
            RoomType::Secret => '?',
            RoomType::Merchant => 'M',
            RoomType::Rest => 'R',
            RoomType::Battle => 'o',
        }
    }
}

/// A node of the floor graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub grid_x: i32,
    pub grid_y: i32,
    pub room_type: RoomType,
    /// At most one neighbour per direction; kept symmetric by `Floor::connect`
    pub connections: BTreeMap<Direction, RoomId>,
    pub contents: Vec<RoomContent>,
    /// Visible on the map
    pub discovered: bool,
    /// Entered at least once
    pub visited: bool,
}

impl Room {
    pub fn new(id: RoomId, grid_x: i32, grid_y: i32) -> Self {
        Self {
            id,
            grid_x,
            grid_y,
            room_type: RoomType::default(),
            connections: BTreeMap::new(),
            contents: Vec::new(),
            discovered: false,
            visited: false,
        }
    }

    /// Neighbour through the door in `direction`
    pub fn neighbor(&self, direction: Direction) -> Option<RoomId> {
        self.connections.get(&direction).copied()
    }

    /// Direction of the door leading to `other`
    pub fn direction_to(&self, other: RoomId) -> Option<Direction> {
        self.connections
            .iter()
            .find(|(_, id)| **id == other)
            .map(|(dir, _)| *dir)
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    /// Indices of secrets that have not been revealed, in content order
    pub fn hidden_secrets(&self) -> impl Iterator<Item = usize> + '_ {
        self.contents
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_hidden_secret())
            .map(|(i, _)| i)
    }

    pub fn content(&self, index: usize) -> Option<&RoomContent> {
        self.contents.get(index)
    }

    pub fn content_mut(&mut self, index: usize) -> Option<&mut RoomContent> {
        self.contents.get_mut(index)
    }
}
