//! Room manager: door transitions
//!
//! A transition fades the view out, swaps the current room, then fades back
//! in. Only one transition runs at a time; door activations arriving while
//! one is in flight, or while the player is frozen, are dropped.

use tracing::{debug, info, warn};

use crate::collab::{AudioCues, Cue, RoomRenderer};
use crate::dungeon::{Direction, RoomId};
use crate::world::{EngineConfig, Freeze, GameState, Position, TransitionError};

/// Fade half of a transition with time spent in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FadingOut { elapsed_ms: u32 },
    FadingIn { elapsed_ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle(RoomId),
    Transitioning {
        from: RoomId,
        to: RoomId,
        direction: Direction,
        phase: Phase,
    },
}

/// Result of a door activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorActivation {
    Started,
    /// Zero-length fades: the transition already ended
    Finished(TransitionEvent),
    /// Another transition was running or the player was frozen
    Dropped,
}

/// What a call to [`RoomManager::update`] finished, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Now in the target room
    Entered(RoomId),
    /// Target was invalid; still in the original room
    Aborted(TransitionError),
}

#[derive(Debug, Clone)]
pub struct RoomManager {
    state: TransitionState,
    fade_ms: u32,
    room_width: f32,
    room_height: f32,
    door_margin: f32,
}

impl RoomManager {
    pub fn new(config: &EngineConfig, start: RoomId) -> Self {
        Self {
            state: TransitionState::Idle(start),
            fade_ms: config.fade_ms,
            room_width: config.room_width,
            room_height: config.room_height,
            door_margin: config.door_margin,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning { .. })
    }

    /// Begin moving through the door in `direction` towards `target`
    ///
    /// With a zero fade duration the whole transition completes here.
    pub fn activate_door(
        &mut self,
        ctx: &mut GameState,
        target: RoomId,
        direction: Direction,
        renderer: &mut dyn RoomRenderer,
        audio: &mut dyn AudioCues,
    ) -> DoorActivation {
        let TransitionState::Idle(from) = self.state else {
            debug!(%target, "door ignored, transition in flight");
            return DoorActivation::Dropped;
        };
        if ctx.is_frozen() {
            debug!(%target, frozen = ?ctx.frozen(), "door ignored, player frozen");
            return DoorActivation::Dropped;
        }

        ctx.freeze(Freeze::TRANSITION);
        self.state = TransitionState::Transitioning {
            from,
            to: target,
            direction,
            phase: Phase::FadingOut { elapsed_ms: 0 },
        };
        renderer.fade_out(self.fade_ms);
        audio.play(Cue::Door);
        debug!(%from, %target, %direction, "transition started");

        if self.fade_ms == 0 {
            // Fade out, then fade in
            let event = self
                .update(ctx, 0, renderer)
                .or_else(|| self.update(ctx, 0, renderer));
            if let Some(event) = event {
                return DoorActivation::Finished(event);
            }
        }
        DoorActivation::Started
    }

    /// Advance the running transition by `dt_ms`
    pub fn update(
        &mut self,
        ctx: &mut GameState,
        dt_ms: u32,
        renderer: &mut dyn RoomRenderer,
    ) -> Option<TransitionEvent> {
        let TransitionState::Transitioning {
            from,
            to,
            direction,
            phase,
        } = self.state
        else {
            return None;
        };

        match phase {
            Phase::FadingOut { elapsed_ms } => {
                let elapsed_ms = elapsed_ms.saturating_add(dt_ms);
                if elapsed_ms < self.fade_ms {
                    self.set_phase(Phase::FadingOut { elapsed_ms });
                    return None;
                }
                if !ctx.set_current_room(to) {
                    let err = TransitionError::UnknownRoom(to);
                    warn!(%from, %direction, "transition aborted: {err}");
                    renderer.fade_in(self.fade_ms);
                    ctx.unfreeze(Freeze::TRANSITION);
                    self.state = TransitionState::Idle(from);
                    return Some(TransitionEvent::Aborted(err));
                }
                ctx.mark_visited(to);
                if let Some(room) = ctx.current_room() {
                    renderer.rebuild_room(room);
                }
                ctx.set_player_pos(self.entry_position(direction));
                renderer.fade_in(self.fade_ms);
                self.set_phase(Phase::FadingIn { elapsed_ms: 0 });
                None
            }
            Phase::FadingIn { elapsed_ms } => {
                let elapsed_ms = elapsed_ms.saturating_add(dt_ms);
                if elapsed_ms < self.fade_ms {
                    self.set_phase(Phase::FadingIn { elapsed_ms });
                    return None;
                }
                ctx.unfreeze(Freeze::TRANSITION);
                self.state = TransitionState::Idle(to);
                info!(%from, %to, "entered room");
                Some(TransitionEvent::Entered(to))
            }
        }
    }

    /// Where the player stands after walking through a door heading
    /// `direction`: just inside the opposite wall
    pub fn entry_position(&self, direction: Direction) -> Position {
        let (w, h, m) = (self.room_width, self.room_height, self.door_margin);
        match direction.opposite() {
            Direction::North => Position::new(w / 2.0, m),
            Direction::South => Position::new(w / 2.0, h - m),
            Direction::West => Position::new(m, h / 2.0),
            Direction::East => Position::new(w - m, h / 2.0),
        }
    }

    fn set_phase(&mut self, next: Phase) {
        if let TransitionState::Transitioning { phase, .. } = &mut self.state {
            *phase = next;
        }
    }
}
