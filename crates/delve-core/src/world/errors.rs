//! Error types for floor loading, transitions, puzzles and configuration
//!
//! Only [`GenerationError`] is allowed to stop forward progress, and only
//! before the player is committed to a floor. The other errors are
//! recovered where they occur.

use thiserror::Error;

use crate::dungeon::{FloorError, RoomId};

/// Floor generation failed; the floor must not be entered
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid dungeon configuration: {0}")]
    InvalidConfig(String),

    #[error("could not build a floor of {target} rooms after {attempts} attempts")]
    Exhausted { target: usize, attempts: u32 },

    #[error("generated floor is malformed: {0}")]
    Malformed(#[from] FloorError),
}

/// A door led nowhere; the transition is aborted and the player stays put
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("target room {0} does not exist on this floor")]
    UnknownRoom(RoomId),
}

/// Why a puzzle could not be activated
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("another puzzle is already active")]
    AlreadyActive,

    #[error("content {index} in room {room} is not a puzzle")]
    NotAPuzzle { room: RoomId, index: usize },

    #[error("puzzle {index} in room {room} is already solved")]
    AlreadySolved { room: RoomId, index: usize },

    #[error("room {room} has no content {index}")]
    UnknownContent { room: RoomId, index: usize },
}

/// Configuration could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
