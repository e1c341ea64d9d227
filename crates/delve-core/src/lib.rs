//! delve-core: Dungeon engine for the Delve mini-game
//!
//! This crate contains the procedural floor generator, the room/floor data
//! model, room transitions, puzzles, secrets and the minimap projection.
//! It performs no rendering, audio or persistence itself; those are reached
//! through the collaborator traits in [`collab`].

pub mod action;
pub mod collab;
pub mod dungeon;
pub mod manager;
pub mod minimap;
pub mod puzzle;
pub mod secret;
pub mod world;

mod consts;
mod gameloop;
mod rng;

pub use consts::*;
pub use gameloop::{GameLoop, Interaction, LoopEvent};
pub use rng::GameRng;
