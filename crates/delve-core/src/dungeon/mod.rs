//! Dungeon system
//!
//! Contains the floor graph, rooms, room content and the floor generator.

mod content;
mod direction;
mod floor;
mod generation;
mod population;
mod room;
mod tier;

pub use content::{ContentKind, PuzzleKind, RoomContent, SecretReward, TrapKind};
pub use direction::Direction;
pub use floor::{Floor, FloorError};
pub use generation::{DungeonConfig, SpecialWeights, generate};
pub use population::populate_room;
pub use room::{Room, RoomId, RoomType};
pub use tier::{EnemyTier, TierBand, default_tier_bands, tier_pool};
