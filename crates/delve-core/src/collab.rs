//! Collaborator interfaces: rendering and audio
//!
//! The engine only tells collaborators what happened. Calls are
//! fire-and-forget; whatever a collaborator does with them (including
//! failing to find an asset) never feeds back into game state.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::dungeon::Room;
use crate::puzzle::PuzzleState;

/// Named audio cue
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Cue {
    Victory,
    Discover,
    GoldCollect,
    Heal,
    Fail,
    Door,
    Trap,
    PuzzleStart,
}

/// Render backend
pub trait RoomRenderer {
    /// Start fading the view out over `duration_ms`
    fn fade_out(&mut self, duration_ms: u32);

    /// Start fading the view back in over `duration_ms`
    fn fade_in(&mut self, duration_ms: u32);

    /// Rebuild all visuals (background, doors, content markers) from a room
    fn rebuild_room(&mut self, room: &Room);

    /// Show or refresh the puzzle overlay
    fn show_puzzle(&mut self, _state: &PuzzleState) {}

    fn hide_puzzle(&mut self) {}
}

/// Audio playback
pub trait AudioCues {
    fn play(&mut self, cue: Cue);
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl RoomRenderer for NullRenderer {
    fn fade_out(&mut self, _duration_ms: u32) {}
    fn fade_in(&mut self, _duration_ms: u32) {}
    fn rebuild_room(&mut self, _room: &Room) {}
}

/// Audio sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioCues for SilentAudio {
    fn play(&mut self, _cue: Cue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        assert_eq!(Cue::Victory.to_string(), "victory");
        assert_eq!(Cue::GoldCollect.as_ref(), "goldCollect");
        assert_eq!(
            serde_json::to_string(&Cue::PuzzleStart).unwrap(),
            "\"puzzleStart\""
        );
    }
}
