//! End-to-end runs through generated floors via the game loop

mod common;

use common::{RecordingAudio, RecordingRenderer, RenderCall};
use delve_core::action::Command;
use delve_core::collab::Cue;
use delve_core::dungeon::ContentKind;
use delve_core::manager::{DoorActivation, TransitionEvent};
use delve_core::minimap::{MapStyle, MiniMap, Viewport};
use delve_core::world::EngineConfig;
use delve_core::{GameLoop, Interaction, LoopEvent};

type Game = GameLoop<RecordingRenderer, RecordingAudio>;

fn new_game(seed: u64) -> Game {
    GameLoop::new(
        EngineConfig::default(),
        1,
        Some(seed),
        RecordingRenderer::default(),
        RecordingAudio::default(),
    )
    .unwrap()
}

/// Follow the shortest path to the exit room, ticking frames between doors
fn walk_to_exit(game: &mut Game) -> usize {
    let exit = game.state().floor.exit_room_id;
    let dist = game.state().floor.distances_from(exit);
    let mut doors = 0;
    while game.current_room_id() != exit {
        let here = dist[&game.current_room_id()];
        let direction = game
            .state()
            .current_room()
            .unwrap()
            .connections
            .iter()
            .find(|(_, id)| dist[*id] + 1 == here)
            .map(|(d, _)| *d)
            .unwrap();
        assert_eq!(game.use_door(direction), Some(DoorActivation::Started));
        // Input is dropped mid-transition
        assert_eq!(game.handle(Command::Up), LoopEvent::Blocked);

        let mut entered = None;
        while entered.is_none() {
            entered = game.update(16);
        }
        assert!(matches!(entered, Some(TransitionEvent::Entered(_))));
        doors += 1;
    }
    doors
}

#[test]
fn test_walk_to_exit_and_leave() {
    for seed in [1, 7, 23] {
        let mut game = new_game(seed);
        let start = game.current_room_id();
        let doors = walk_to_exit(&mut game);
        let dist = game.state().floor.distances_from(start);
        assert_eq!(doors as u32, dist[&game.current_room_id()]);

        let exit_index = game
            .state()
            .current_room()
            .unwrap()
            .contents
            .iter()
            .position(|c| c.kind == ContentKind::Exit)
            .unwrap();
        assert_eq!(game.interact_content(exit_index), Interaction::ExitReached);
        assert!(game.exit_reached());
        assert!(!game.state().is_frozen());
    }
}

#[test]
fn test_renderer_sees_every_room_entered() {
    let mut game = new_game(5);
    let doors = walk_to_exit(&mut game);
    let rebuilds = game
        .renderer()
        .calls
        .iter()
        .filter(|c| matches!(c, RenderCall::Rebuild(_)))
        .count();
    // Start room plus one per door
    assert_eq!(rebuilds, doors + 1);
    let door_cues = game.audio().cues.iter().filter(|c| **c == Cue::Door).count();
    assert_eq!(door_cues, doors);
}

#[test]
fn test_minimap_tracks_exploration() {
    let mut game = new_game(12);
    let map = game.minimap(Viewport::default());
    let current: Vec<_> = map
        .rooms
        .iter()
        .filter(|r| r.style == MapStyle::Current)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, game.current_room_id());
    let start_degree = game.state().current_room().unwrap().degree();
    assert_eq!(map.rooms.len(), start_degree + 1);
    assert_eq!(map.links.len(), start_degree);

    walk_to_exit(&mut game);
    let map = game.minimap(Viewport::default());
    assert!(map.rooms.iter().any(|r| r.style == MapStyle::Visited));
    let ascii = MiniMap::to_ascii(&game.state().floor, game.current_room_id());
    assert!(!ascii.is_empty());
}

#[test]
fn test_same_seed_same_run() {
    let a = new_game(99);
    let b = new_game(99);
    assert_eq!(a.state().floor, b.state().floor);
}
