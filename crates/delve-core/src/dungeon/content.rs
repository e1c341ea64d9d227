//! Interactive room content
//!
//! Content entries are a closed set of variants. Each one sits at a
//! normalized `(x, y)` position inside its room and carries a `triggered`
//! flag that only ever goes from false to true.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::tier::EnemyTier;

/// Trap flavour; damage is rolled at generation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TrapKind {
    Spikes,
    Darts,
    Poison,
}

impl TrapKind {
    /// Damage dice as (count, sides)
    pub const fn damage_dice(self) -> (u32, u32) {
        match self {
            TrapKind::Spikes => (1, 6),
            TrapKind::Darts => (2, 3),
            TrapKind::Poison => (1, 4),
        }
    }
}

/// What claiming a secret grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecretReward {
    Gold,
    Xp,
    Treasure,
    /// Restores health to the maximum; grants no gold or xp
    FullHeal,
}

/// Puzzle variant attached to a content node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PuzzleKind {
    Riddle,
    Sequence,
}

/// Content variant with its own fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentKind {
    Enemy {
        tier: EnemyTier,
    },
    Chest {
        gold: u32,
    },
    Trap {
        trap: TrapKind,
        damage: u32,
    },
    Npc {
        name: String,
        dialogue: String,
    },
    Exit,
    Secret {
        reward: SecretReward,
        gold: Option<u32>,
        xp: Option<u32>,
        discovered: bool,
        name: String,
    },
    Puzzle {
        kind: PuzzleKind,
    },
}

impl ContentKind {
    /// Short lowercase tag, used by renderers and logs
    pub const fn tag(&self) -> &'static str {
        match self {
            ContentKind::Enemy { .. } => "enemy",
            ContentKind::Chest { .. } => "chest",
            ContentKind::Trap { .. } => "trap",
            ContentKind::Npc { .. } => "npc",
            ContentKind::Exit => "exit",
            ContentKind::Secret { .. } => "secret",
            ContentKind::Puzzle { .. } => "puzzle",
        }
    }
}

/// A content entry placed in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomContent {
    pub kind: ContentKind,
    /// Normalized room-relative position in `[0, 1]`
    pub x: f32,
    pub y: f32,
    triggered: bool,
}

impl RoomContent {
    pub fn new(kind: ContentKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            triggered: false,
        }
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    /// Mark as used up. Returns false if already triggered or if this is
    /// an NPC, which can be talked to any number of times.
    pub fn trigger(&mut self) -> bool {
        if self.triggered || matches!(self.kind, ContentKind::Npc { .. }) {
            return false;
        }
        self.triggered = true;
        true
    }

    pub fn is_secret(&self) -> bool {
        matches!(self.kind, ContentKind::Secret { .. })
    }

    /// Whether this is a secret that has not been revealed yet
    pub fn is_hidden_secret(&self) -> bool {
        matches!(self.kind, ContentKind::Secret { discovered: false, .. })
    }

    /// Reveal a hidden secret. Returns false for non-secrets and secrets
    /// already revealed.
    pub fn reveal(&mut self) -> bool {
        match &mut self.kind {
            ContentKind::Secret { discovered, .. } if !*discovered => {
                *discovered = true;
                true
            }
            _ => false,
        }
    }

    /// Absolute position inside a room of the given pixel size
    pub fn position_in(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x * width, self.y * height)
    }

    /// Euclidean distance between normalized positions
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> RoomContent {
        RoomContent::new(
            ContentKind::Secret {
                reward: SecretReward::Gold,
                gold: Some(10),
                xp: None,
                discovered: false,
                name: "Loose Brick".to_string(),
            },
            0.5,
            0.5,
        )
    }

    #[test]
    fn test_trigger_is_monotonic() {
        let mut chest = RoomContent::new(ContentKind::Chest { gold: 5 }, 0.2, 0.2);
        assert!(!chest.triggered());
        assert!(chest.trigger());
        assert!(chest.triggered());
        assert!(!chest.trigger());
        assert!(chest.triggered());
    }

    #[test]
    fn test_npc_never_triggers() {
        let mut npc = RoomContent::new(
            ContentKind::Npc {
                name: "Merchant".to_string(),
                dialogue: "Wares for sale.".to_string(),
            },
            0.5,
            0.5,
        );
        assert!(!npc.trigger());
        assert!(!npc.triggered());
    }

    #[test]
    fn test_reveal_is_separate_from_trigger() {
        let mut s = secret();
        assert!(s.is_hidden_secret());
        assert!(s.reveal());
        assert!(!s.is_hidden_secret());
        assert!(!s.triggered());
        assert!(!s.reveal());
    }

    #[test]
    fn test_position_clamped() {
        let c = RoomContent::new(ContentKind::Exit, 1.5, -0.2);
        assert_eq!((c.x, c.y), (1.0, 0.0));
        assert_eq!(c.position_in(200.0, 100.0), (200.0, 0.0));
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_value(secret()).unwrap();
        assert_eq!(json["kind"]["type"], "secret");
        assert_eq!(json["kind"]["reward"], "gold");
        assert_eq!(json["triggered"], false);
    }
}
