//! Game loop facade
//!
//! Owns one floor's worth of engine state and the collaborators, and routes
//! host input and frame ticks to the room manager, puzzle engine and secret
//! discovery.

use tracing::{debug, info};

use crate::action::Command;
use crate::collab::{AudioCues, Cue, RoomRenderer};
use crate::dungeon::{ContentKind, Direction, EnemyTier, PuzzleKind, RoomId, generate};
use crate::manager::{DoorActivation, RoomManager, TransitionEvent};
use crate::minimap::{MiniMap, Viewport};
use crate::puzzle::{PuzzleEngine, PuzzleOutcome};
use crate::rng::GameRng;
use crate::secret::{SecretClaim, SecretDiscovery};
use crate::world::{
    EngineConfig, GameState, GenerationError, Position, PuzzleError, Scheduler, TimerEvent,
};

/// Result of a routed [`Command`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopEvent {
    Moved(Position),
    /// Movement refused; a transition or puzzle holds the player
    Blocked,
    /// Input consumed by the active puzzle
    PuzzleInput,
    PuzzleEnded(PuzzleOutcome),
    SecretFound(usize),
    Ignored,
}

/// Result of interacting with a content entry of the current room
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Gold(u32),
    Damage(u32),
    /// Fight starts; call [`GameLoop::defeat_enemy`] when it is won
    Encounter { tier: EnemyTier },
    Dialogue { name: String, dialogue: String },
    ExitReached,
    Secret(SecretClaim),
    PuzzleStarted(PuzzleKind),
    PuzzleRefused(PuzzleError),
    /// Content already triggered
    AlreadyUsed,
    /// No such content, or a secret that cannot be claimed yet
    Nothing,
    /// A transition is in flight
    Blocked,
}

pub struct GameLoop<R: RoomRenderer, A: AudioCues> {
    config: EngineConfig,
    state: GameState,
    rooms: RoomManager,
    puzzles: PuzzleEngine,
    secrets: SecretDiscovery,
    timers: Scheduler,
    rng: GameRng,
    renderer: R,
    audio: A,
    exit_reached: bool,
}

impl<R: RoomRenderer, A: AudioCues> GameLoop<R, A> {
    /// Generate floor `floor_number` and enter its start room
    pub fn new(
        config: EngineConfig,
        floor_number: u32,
        seed: Option<u64>,
        mut renderer: R,
        audio: A,
    ) -> Result<Self, GenerationError> {
        let mut dungeon = config.dungeon.clone();
        dungeon.floor_number = floor_number;
        let floor = generate(&dungeon, seed)?;
        let start = floor.start_room_id;

        let mut state = GameState::new(floor, config.player);
        state.set_player_pos(Position::new(config.room_width / 2.0, config.room_height / 2.0));
        if let Some(room) = state.current_room() {
            renderer.rebuild_room(room);
        }

        Ok(Self {
            rooms: RoomManager::new(&config, start),
            puzzles: PuzzleEngine::new(&config),
            secrets: SecretDiscovery::new(config.search_radius),
            timers: Scheduler::new(),
            // Separate stream for puzzle draws
            rng: GameRng::from_seed_or_entropy(seed.map(|s| s ^ 0x9e37_79b9_7f4a_7c15)),
            config,
            state,
            renderer,
            audio,
            exit_reached: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn puzzles(&self) -> &PuzzleEngine {
        &self.puzzles
    }

    pub fn nearby_secret(&self) -> Option<usize> {
        self.secrets.nearby()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn exit_reached(&self) -> bool {
        self.exit_reached
    }

    pub fn current_room_id(&self) -> RoomId {
        self.state.current_room_id()
    }

    /// Route one input command
    pub fn handle(&mut self, command: Command) -> LoopEvent {
        if self.puzzles.is_active() {
            return match self.puzzles.handle_input(
                command,
                &mut self.state,
                &mut self.timers,
                &mut self.renderer,
                &mut self.audio,
            ) {
                Some(outcome) => LoopEvent::PuzzleEnded(outcome),
                None => LoopEvent::PuzzleInput,
            };
        }

        if let Some(direction) = command.direction() {
            let (dx, dy) = direction.delta();
            let step = self.config.move_step;
            return self.move_player(dx as f32 * step, dy as f32 * step);
        }
        match command {
            Command::Interact if !self.state.is_frozen() => self
                .secrets
                .discover(&mut self.state, &mut self.renderer, &mut self.audio)
                .map_or(LoopEvent::Ignored, LoopEvent::SecretFound),
            _ => LoopEvent::Ignored,
        }
    }

    /// Move by a pixel offset, clamped to the room, then look for secrets
    pub fn move_player(&mut self, dx: f32, dy: f32) -> LoopEvent {
        if self.state.is_frozen() {
            return LoopEvent::Blocked;
        }
        let pos = self.state.player_pos();
        let next = Position::new(
            (pos.x + dx).clamp(0.0, self.config.room_width),
            (pos.y + dy).clamp(0.0, self.config.room_height),
        );
        self.state.set_player_pos(next);
        self.secrets
            .scan(&self.state, self.config.room_width, self.config.room_height);
        LoopEvent::Moved(next)
    }

    /// Walk through the door in `direction` of the current room
    ///
    /// `None` if the room has no door there.
    pub fn use_door(&mut self, direction: Direction) -> Option<DoorActivation> {
        let target = self.state.current_room()?.neighbor(direction)?;
        let activation = self.rooms.activate_door(
            &mut self.state,
            target,
            direction,
            &mut self.renderer,
            &mut self.audio,
        );
        if let DoorActivation::Finished(event) = activation {
            self.after_transition(event);
        }
        Some(activation)
    }

    /// Use content entry `index` of the current room
    ///
    /// Blocked while a transition or an open puzzle holds the player.
    pub fn interact_content(&mut self, index: usize) -> Interaction {
        if self.rooms.is_transitioning() || self.state.is_frozen() {
            return Interaction::Blocked;
        }
        let room = self.state.current_room_id();
        let Some(content) = self.state.current_room().and_then(|r| r.content(index)) else {
            return Interaction::Nothing;
        };
        let already_used = content.triggered();
        let kind = content.kind.clone();

        match kind {
            ContentKind::Npc { name, dialogue } => Interaction::Dialogue { name, dialogue },
            ContentKind::Secret { .. } => {
                SecretDiscovery::claim(&mut self.state, room, index, &mut self.audio)
                    .map_or(Interaction::Nothing, Interaction::Secret)
            }
            ContentKind::Puzzle { .. } => match self.puzzles.activate(
                &mut self.state,
                room,
                index,
                &mut self.rng,
                &mut self.timers,
                &mut self.renderer,
                &mut self.audio,
            ) {
                Ok(kind) => Interaction::PuzzleStarted(kind),
                Err(err) => {
                    debug!(%room, index, "puzzle refused: {err}");
                    Interaction::PuzzleRefused(err)
                }
            },
            _ if already_used => Interaction::AlreadyUsed,
            ContentKind::Enemy { tier } => Interaction::Encounter { tier },
            ContentKind::Chest { gold } => {
                self.trigger(index);
                self.state.add_gold(gold);
                self.audio.play(Cue::GoldCollect);
                info!(%room, index, gold, "chest opened");
                Interaction::Gold(gold)
            }
            ContentKind::Trap { trap, damage } => {
                self.trigger(index);
                self.state.damage(damage);
                self.audio.play(Cue::Trap);
                info!(%room, index, %trap, damage, health = self.state.health(), "trap sprung");
                Interaction::Damage(damage)
            }
            ContentKind::Exit => {
                self.trigger(index);
                self.exit_reached = true;
                info!(floor = self.state.floor.floor_number, "exit reached");
                Interaction::ExitReached
            }
        }
    }

    /// Mark an enemy of the current room beaten and grant its xp
    ///
    /// Returns the xp granted; `None` for non-enemies and enemies already
    /// beaten.
    pub fn defeat_enemy(&mut self, index: usize) -> Option<u32> {
        let content = self.state.current_room_mut()?.content_mut(index)?;
        let ContentKind::Enemy { tier } = content.kind else {
            return None;
        };
        if !content.trigger() {
            return None;
        }
        let xp = self.config.tier_xp.for_tier(tier);
        self.state.add_xp(xp);
        self.audio.play(Cue::Victory);
        info!(index, %tier, xp, "enemy defeated");
        Some(xp)
    }

    /// Advance the clock: fire due timers, progress the transition
    pub fn update(&mut self, dt_ms: u32) -> Option<TransitionEvent> {
        for (handle, event) in self.timers.advance(dt_ms) {
            match event {
                TimerEvent::HideSequencePattern => {
                    self.puzzles.on_timer(handle, &mut self.renderer);
                }
            }
        }
        let event = self.rooms.update(&mut self.state, dt_ms, &mut self.renderer)?;
        self.after_transition(event);
        Some(event)
    }

    pub fn minimap(&self, viewport: Viewport) -> MiniMap {
        MiniMap::project(&self.state.floor, self.state.current_room_id(), viewport)
    }

    fn after_transition(&mut self, event: TransitionEvent) {
        if let TransitionEvent::Entered(_) = event {
            self.secrets.clear();
            self.secrets
                .scan(&self.state, self.config.room_width, self.config.room_height);
        }
    }

    fn trigger(&mut self, index: usize) -> bool {
        self.state
            .current_room_mut()
            .and_then(|r| r.content_mut(index))
            .is_some_and(|c| c.trigger())
    }
}
