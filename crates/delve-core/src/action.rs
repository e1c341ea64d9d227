//! Abstract input commands delivered by the input layer

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::Direction;

/// Command decoded from raw key/pointer events by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    Interact,
}

impl Command {
    /// Direction carried by a directional command
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Command::Up => Some(Direction::North),
            Command::Down => Some(Direction::South),
            Command::Left => Some(Direction::West),
            Command::Right => Some(Direction::East),
            _ => None,
        }
    }

    /// Directional command for a direction
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::North => Command::Up,
            Direction::South => Command::Down,
            Direction::West => Command::Left,
            Direction::East => Command::Right,
        }
    }
}
