//! Engine configuration
//!
//! Every struct uses `#[serde(default)]`, so a JSON config file only needs
//! the keys it wants to change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dungeon::{DungeonConfig, EnemyTier};
use crate::{DOOR_MARGIN, FADE_MS, MEMORIZE_MS, MOVE_STEP, ROOM_HEIGHT, ROOM_WIDTH};
use crate::{SEARCH_RADIUS, SEQUENCE_LENGTH};

use super::errors::ConfigError;

/// Gold and xp granted together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reward {
    pub gold: u32,
    pub xp: u32,
}

impl Reward {
    pub const fn new(gold: u32, xp: u32) -> Self {
        Self { gold, xp }
    }
}

/// Player stats at floor entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub health: u32,
    pub max_health: u32,
    pub gold: u32,
    pub xp: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 30,
            max_health: 30,
            gold: 0,
            xp: 0,
        }
    }
}

/// Xp granted for defeating an enemy of each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierXp {
    pub low: u32,
    pub mid: u32,
    pub high: u32,
    pub boss: u32,
}

impl Default for TierXp {
    fn default() -> Self {
        Self {
            low: 5,
            mid: 12,
            high: 25,
            boss: 60,
        }
    }
}

impl TierXp {
    pub const fn for_tier(&self, tier: EnemyTier) -> u32 {
        match tier {
            EnemyTier::Low => self.low,
            EnemyTier::Mid => self.mid,
            EnemyTier::High => self.high,
            EnemyTier::Boss => self.boss,
        }
    }
}

/// Everything the engine needs besides the floor itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dungeon: DungeonConfig,

    // Room geometry (pixels)
    pub room_width: f32,
    pub room_height: f32,
    /// Entry offset from the wall when arriving through a door
    pub door_margin: f32,
    pub move_step: f32,

    /// Duration of each half of a room transition (ms)
    pub fade_ms: u32,

    // Secrets
    pub search_radius: f32,

    // Puzzles
    pub memorize_ms: u32,
    pub sequence_length: usize,
    pub riddle_reward: Reward,
    pub sequence_reward: Reward,

    pub tier_xp: TierXp,
    pub player: PlayerStats,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dungeon: DungeonConfig::default(),
            room_width: ROOM_WIDTH,
            room_height: ROOM_HEIGHT,
            door_margin: DOOR_MARGIN,
            move_step: MOVE_STEP,
            fade_ms: FADE_MS,
            search_radius: SEARCH_RADIUS,
            memorize_ms: MEMORIZE_MS,
            sequence_length: SEQUENCE_LENGTH,
            riddle_reward: Reward::new(25, 15),
            sequence_reward: Reward::new(40, 20),
            tier_xp: TierXp::default(),
            player: PlayerStats::default(),
        }
    }
}

impl EngineConfig {
    /// Load options from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and validate a JSON config
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        if self.room_width <= 0.0 || self.room_height <= 0.0 {
            return invalid("room size must be positive");
        }
        if self.door_margin < 0.0
            || self.door_margin * 2.0 > self.room_width.min(self.room_height)
        {
            return invalid("door_margin must fit inside half the room");
        }
        if self.move_step <= 0.0 {
            return invalid("move_step must be positive");
        }
        if self.search_radius < 0.0 {
            return invalid("search_radius must not be negative");
        }
        if self.sequence_length == 0 {
            return invalid("sequence_length must be at least 1");
        }
        if self.player.max_health == 0 {
            return invalid("player max_health must be positive");
        }
        self.dungeon
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
