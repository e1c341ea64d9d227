//! Puzzle engine
//!
//! Runs at most one puzzle at a time. A puzzle being active and the player
//! being frozen for it always change together: activation sets both, and
//! every way of closing (solve, fail, abandon) clears both exactly once.

mod riddle;
mod sequence;

pub use riddle::Riddle;
pub use sequence::SequenceLock;

use serde::Serialize;
use tracing::{debug, info};

use crate::action::Command;
use crate::collab::{AudioCues, Cue, RoomRenderer};
use crate::dungeon::{ContentKind, PuzzleKind, RoomId};
use crate::rng::GameRng;
use crate::world::{
    EngineConfig, Freeze, GameState, PuzzleError, Reward, Scheduler, TimerEvent, TimerHandle,
};

/// Ephemeral state of the active puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PuzzleState {
    Riddle(Riddle),
    SequenceLock(SequenceLock),
}

impl PuzzleState {
    pub fn kind(&self) -> PuzzleKind {
        match self {
            PuzzleState::Riddle(_) => PuzzleKind::Riddle,
            PuzzleState::SequenceLock(_) => PuzzleKind::Sequence,
        }
    }
}

/// How a puzzle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleOutcome {
    /// Reward actually granted; zero if the content was already triggered
    Solved(Reward),
    Failed,
    Abandoned,
}

/// The running puzzle and the content node it came from
#[derive(Debug, Clone)]
pub struct ActivePuzzle {
    pub room: RoomId,
    pub index: usize,
    pub state: PuzzleState,
    hide_timer: Option<TimerHandle>,
}

/// Puzzle state machine host
#[derive(Debug, Clone)]
pub struct PuzzleEngine {
    active: Option<ActivePuzzle>,
    memorize_ms: u32,
    sequence_length: usize,
    riddle_reward: Reward,
    sequence_reward: Reward,
}

impl PuzzleEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            active: None,
            memorize_ms: config.memorize_ms,
            sequence_length: config.sequence_length,
            riddle_reward: config.riddle_reward,
            sequence_reward: config.sequence_reward,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActivePuzzle> {
        self.active.as_ref()
    }

    pub fn state(&self) -> Option<&PuzzleState> {
        self.active.as_ref().map(|a| &a.state)
    }

    /// Start the puzzle stored at `contents[index]` of `room`
    #[allow(clippy::too_many_arguments)]
    pub fn activate(
        &mut self,
        ctx: &mut GameState,
        room: RoomId,
        index: usize,
        rng: &mut GameRng,
        timers: &mut Scheduler,
        renderer: &mut dyn RoomRenderer,
        audio: &mut dyn AudioCues,
    ) -> Result<PuzzleKind, PuzzleError> {
        if self.active.is_some() {
            return Err(PuzzleError::AlreadyActive);
        }
        let content = ctx
            .floor
            .room(room)
            .and_then(|r| r.content(index))
            .ok_or(PuzzleError::UnknownContent { room, index })?;
        let ContentKind::Puzzle { kind } = content.kind else {
            return Err(PuzzleError::NotAPuzzle { room, index });
        };
        if content.triggered() {
            return Err(PuzzleError::AlreadySolved { room, index });
        }

        let (state, hide_timer) = match kind {
            PuzzleKind::Riddle => (PuzzleState::Riddle(Riddle::random(rng)), None),
            PuzzleKind::Sequence => {
                let lock = SequenceLock::random(rng, self.sequence_length);
                let timer =
                    timers.schedule_after(self.memorize_ms, TimerEvent::HideSequencePattern);
                (PuzzleState::SequenceLock(lock), Some(timer))
            }
        };

        ctx.freeze(Freeze::PUZZLE);
        renderer.show_puzzle(&state);
        self.active = Some(ActivePuzzle {
            room,
            index,
            state,
            hide_timer,
        });
        audio.play(Cue::PuzzleStart);
        info!(%room, index, %kind, "puzzle activated");
        Ok(kind)
    }

    /// Feed one input to the active puzzle
    ///
    /// Inputs that mean nothing in the current state are ignored.
    pub fn handle_input(
        &mut self,
        command: Command,
        ctx: &mut GameState,
        timers: &mut Scheduler,
        renderer: &mut dyn RoomRenderer,
        audio: &mut dyn AudioCues,
    ) -> Option<PuzzleOutcome> {
        let active = self.active.as_mut()?;
        if command == Command::Cancel {
            return self.abandon(ctx, timers, renderer);
        }

        let verdict = match &mut active.state {
            PuzzleState::Riddle(riddle) => match command {
                Command::Up => {
                    riddle.select_previous();
                    None
                }
                Command::Down => {
                    riddle.select_next();
                    None
                }
                Command::Confirm => Some(riddle.is_correct()),
                _ => None,
            },
            PuzzleState::SequenceLock(lock) => command.direction().and_then(|d| lock.push(d)),
        };

        let Some(solved) = verdict else {
            renderer.show_puzzle(&active.state);
            return None;
        };

        let reward = match active.state.kind() {
            PuzzleKind::Riddle => self.riddle_reward,
            PuzzleKind::Sequence => self.sequence_reward,
        };
        let closed = self.close(ctx, timers, renderer)?;

        if !solved {
            audio.play(Cue::Fail);
            info!(room = %closed.room, index = closed.index, "puzzle failed");
            return Some(PuzzleOutcome::Failed);
        }

        let first_solve = ctx
            .floor
            .room_mut(closed.room)
            .and_then(|r| r.content_mut(closed.index))
            .is_some_and(|c| c.trigger());
        let granted = if first_solve { reward } else { Reward::default() };
        ctx.add_gold(granted.gold);
        ctx.add_xp(granted.xp);
        audio.play(Cue::Victory);
        info!(
            room = %closed.room,
            index = closed.index,
            gold = granted.gold,
            xp = granted.xp,
            "puzzle solved"
        );
        Some(PuzzleOutcome::Solved(granted))
    }

    /// Close the active puzzle without reward
    pub fn abandon(
        &mut self,
        ctx: &mut GameState,
        timers: &mut Scheduler,
        renderer: &mut dyn RoomRenderer,
    ) -> Option<PuzzleOutcome> {
        let closed = self.close(ctx, timers, renderer)?;
        debug!(room = %closed.room, index = closed.index, "puzzle abandoned");
        Some(PuzzleOutcome::Abandoned)
    }

    /// Handle a fired timer; stale handles are ignored
    pub fn on_timer(&mut self, handle: TimerHandle, renderer: &mut dyn RoomRenderer) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.hide_timer != Some(handle) {
            return false;
        }
        active.hide_timer = None;
        if let PuzzleState::SequenceLock(lock) = &mut active.state {
            lock.hide();
        }
        renderer.show_puzzle(&active.state);
        true
    }

    /// Tear down the active puzzle: cancel its timer, release the freeze
    fn close(
        &mut self,
        ctx: &mut GameState,
        timers: &mut Scheduler,
        renderer: &mut dyn RoomRenderer,
    ) -> Option<ActivePuzzle> {
        let mut closed = self.active.take()?;
        if let Some(timer) = closed.hide_timer.take() {
            timers.cancel(timer);
        }
        ctx.unfreeze(Freeze::PUZZLE);
        renderer.hide_puzzle();
        Some(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{NullRenderer, SilentAudio};
    use crate::dungeon::{Floor, Room, RoomContent};
    use crate::world::PlayerStats;

    fn state_with(kinds: Vec<ContentKind>) -> GameState {
        let mut floor = Floor::new(1);
        let mut room = Room::new(RoomId(0), 0, 0);
        for kind in kinds {
            room.contents.push(RoomContent::new(kind, 0.5, 0.5));
        }
        floor.insert(room);
        floor.insert(Room::new(RoomId(1), 1, 0));
        floor
            .connect(RoomId(0), crate::dungeon::Direction::East, RoomId(1))
            .unwrap();
        floor.exit_room_id = RoomId(1);
        GameState::new(floor, PlayerStats::default())
    }

    struct Fixture {
        engine: PuzzleEngine,
        timers: Scheduler,
        rng: GameRng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                engine: PuzzleEngine::new(&EngineConfig::default()),
                timers: Scheduler::new(),
                rng: GameRng::new(5),
            }
        }

        fn activate(
            &mut self,
            ctx: &mut GameState,
            index: usize,
        ) -> Result<PuzzleKind, PuzzleError> {
            self.engine.activate(
                ctx,
                RoomId(0),
                index,
                &mut self.rng,
                &mut self.timers,
                &mut NullRenderer,
                &mut SilentAudio,
            )
        }

        fn input(&mut self, ctx: &mut GameState, cmd: Command) -> Option<PuzzleOutcome> {
            self.engine
                .handle_input(cmd, ctx, &mut self.timers, &mut NullRenderer, &mut SilentAudio)
        }
    }

    #[test]
    fn test_activation_freezes() {
        let mut ctx = state_with(vec![ContentKind::Puzzle { kind: PuzzleKind::Riddle }]);
        let mut f = Fixture::new();
        assert_eq!(f.activate(&mut ctx, 0), Ok(PuzzleKind::Riddle));
        assert!(f.engine.is_active());
        assert!(ctx.frozen().contains(Freeze::PUZZLE));
    }

    #[test]
    fn test_refusals_do_not_freeze() {
        let mut ctx = state_with(vec![ContentKind::Chest { gold: 1 }]);
        let mut f = Fixture::new();
        assert_eq!(
            f.activate(&mut ctx, 0),
            Err(PuzzleError::NotAPuzzle { room: RoomId(0), index: 0 })
        );
        assert_eq!(
            f.activate(&mut ctx, 5),
            Err(PuzzleError::UnknownContent { room: RoomId(0), index: 5 })
        );
        assert!(!ctx.is_frozen());
        assert!(!f.engine.is_active());
    }

    #[test]
    fn test_second_activation_refused() {
        let mut ctx = state_with(vec![
            ContentKind::Puzzle { kind: PuzzleKind::Riddle },
            ContentKind::Puzzle { kind: PuzzleKind::Sequence },
        ]);
        let mut f = Fixture::new();
        f.activate(&mut ctx, 0).unwrap();
        assert_eq!(f.activate(&mut ctx, 1), Err(PuzzleError::AlreadyActive));
        assert_eq!(f.engine.active().unwrap().index, 0);
    }

    #[test]
    fn test_wrong_riddle_answer_fails_once() {
        let mut ctx = state_with(vec![ContentKind::Puzzle { kind: PuzzleKind::Riddle }]);
        let mut f = Fixture::new();
        f.activate(&mut ctx, 0).unwrap();
        let Some(PuzzleState::Riddle(riddle)) = f.engine.state().cloned() else {
            panic!("expected riddle");
        };
        // Selection starts at 0; step off it when 0 is the answer
        if riddle.correct_index == 0 {
            assert_eq!(f.input(&mut ctx, Command::Down), None);
        }
        assert_eq!(f.input(&mut ctx, Command::Confirm), Some(PuzzleOutcome::Failed));
        assert!(!f.engine.is_active());
        assert!(!ctx.is_frozen());
        assert_eq!(ctx.gold(), 0);
        assert!(!ctx.floor.rooms[&RoomId(0)].contents[0].triggered());
    }

    #[test]
    fn test_sequence_timer_cancelled_on_abandon() {
        let mut ctx = state_with(vec![ContentKind::Puzzle { kind: PuzzleKind::Sequence }]);
        let mut f = Fixture::new();
        f.activate(&mut ctx, 0).unwrap();
        assert_eq!(f.timers.pending_count(), 1);
        assert_eq!(f.input(&mut ctx, Command::Cancel), Some(PuzzleOutcome::Abandoned));
        assert_eq!(f.timers.pending_count(), 0);
        assert!(!ctx.is_frozen());
        assert_eq!(f.input(&mut ctx, Command::Cancel), None);
    }

    #[test]
    fn test_stale_timer_ignored() {
        let mut ctx = state_with(vec![ContentKind::Puzzle { kind: PuzzleKind::Sequence }]);
        let mut f = Fixture::new();
        f.activate(&mut ctx, 0).unwrap();
        f.input(&mut ctx, Command::Cancel);
        let stale = f.timers.schedule_after(0, TimerEvent::HideSequencePattern);
        assert!(!f.engine.on_timer(stale, &mut NullRenderer));
    }

    #[test]
    fn test_solved_puzzle_cannot_restart() {
        let mut ctx = state_with(vec![ContentKind::Puzzle { kind: PuzzleKind::Sequence }]);
        let mut f = Fixture::new();
        f.activate(&mut ctx, 0).unwrap();
        for (handle, _) in f.timers.advance(EngineConfig::default().memorize_ms) {
            assert!(f.engine.on_timer(handle, &mut NullRenderer));
        }
        let Some(PuzzleState::SequenceLock(lock)) = f.engine.state().cloned() else {
            panic!("expected sequence lock");
        };
        assert!(!lock.show_pattern);
        let mut outcome = None;
        for dir in lock.pattern {
            outcome = f.input(&mut ctx, Command::from_direction(dir));
        }
        let reward = EngineConfig::default().sequence_reward;
        assert_eq!(outcome, Some(PuzzleOutcome::Solved(reward)));
        assert_eq!(ctx.gold(), reward.gold);
        assert_eq!(
            f.activate(&mut ctx, 0),
            Err(PuzzleError::AlreadySolved { room: RoomId(0), index: 0 })
        );
    }
}
