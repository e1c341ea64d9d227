//! World state
//!
//! Contains the engine configuration, the per-run game state, timers and
//! error types.

pub mod config;
pub mod errors;
mod state;
pub mod timeout;

pub use config::{EngineConfig, PlayerStats, Reward};
pub use errors::{ConfigError, GenerationError, PuzzleError, TransitionError};
pub use state::{Freeze, GameState, Position};
pub use timeout::{Scheduler, TimerEvent, TimerHandle};
