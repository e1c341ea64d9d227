//! Recording collaborator doubles shared by the integration tests

#![allow(dead_code)]

use delve_core::collab::{AudioCues, Cue, RoomRenderer};
use delve_core::dungeon::{Direction, Floor, Room, RoomContent, RoomId};
use delve_core::puzzle::PuzzleState;
use delve_core::world::{GameState, PlayerStats};

/// One renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    FadeOut(u32),
    FadeIn(u32),
    Rebuild(RoomId),
    ShowPuzzle,
    HidePuzzle,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub last_puzzle: Option<PuzzleState>,
}

impl RoomRenderer for RecordingRenderer {
    fn fade_out(&mut self, duration_ms: u32) {
        self.calls.push(RenderCall::FadeOut(duration_ms));
    }

    fn fade_in(&mut self, duration_ms: u32) {
        self.calls.push(RenderCall::FadeIn(duration_ms));
    }

    fn rebuild_room(&mut self, room: &Room) {
        self.calls.push(RenderCall::Rebuild(room.id));
    }

    fn show_puzzle(&mut self, state: &PuzzleState) {
        self.calls.push(RenderCall::ShowPuzzle);
        self.last_puzzle = Some(state.clone());
    }

    fn hide_puzzle(&mut self) {
        self.calls.push(RenderCall::HidePuzzle);
        self.last_puzzle = None;
    }
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub cues: Vec<Cue>,
}

impl AudioCues for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

/// Rooms 0..n in a west-to-east corridor, start 0, exit n-1
pub fn corridor(n: u32) -> Floor {
    let mut floor = Floor::new(1);
    for i in 0..n {
        floor.insert(Room::new(RoomId(i), i as i32, 0));
    }
    for i in 1..n {
        floor
            .connect(RoomId(i - 1), Direction::East, RoomId(i))
            .unwrap();
    }
    floor.start_room_id = RoomId(0);
    floor.exit_room_id = RoomId(n - 1);
    floor
}

/// Corridor whose start room holds `contents`
pub fn state_with(contents: Vec<RoomContent>) -> GameState {
    let mut floor = corridor(2);
    floor.rooms.get_mut(&RoomId(0)).unwrap().contents = contents;
    GameState::new(floor, PlayerStats::default())
}
