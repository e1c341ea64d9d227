//! Room population
//!
//! Decides which content entries a room gets from its type and the floor
//! number, and scatters them over the room without overlap.

use tracing::debug;

use crate::MAX_PLACEMENT_TRIES;
use crate::rng::GameRng;

use super::content::{ContentKind, PuzzleKind, RoomContent, SecretReward, TrapKind};
use super::generation::DungeonConfig;
use super::room::{Room, RoomType};
use super::tier::{EnemyTier, tier_pool};

const SECRET_NAMES: [&str; 8] = [
    "Loose Brick",
    "Hidden Alcove",
    "Cracked Tile",
    "Forgotten Cache",
    "Whispering Stone",
    "Dusty Shrine",
    "False Panel",
    "Buried Coffer",
];

const MERCHANTS: [(&str, &str); 3] = [
    ("Tamsin the Trader", "Coin for wares, wares for coin. Nothing for free."),
    ("Old Gregor", "Mind the stairs down there. Buy a torch?"),
    ("Pell", "I found these on the last fellow who went deeper."),
];

const HEALERS: [(&str, &str); 2] = [
    ("Sister Ilse", "Rest a while. The dark can wait."),
    ("The Hermit", "Sit by the fire. Nothing hunts here."),
];

/// Rejection sampler for content positions within one room
struct Placer {
    taken: Vec<(f32, f32)>,
    separation: f32,
    lo: f32,
    hi: f32,
}

impl Placer {
    fn new(separation: f32, margin: f32) -> Self {
        Self {
            taken: Vec::new(),
            separation,
            lo: margin,
            hi: 1.0 - margin,
        }
    }

    fn is_clear(&self, x: f32, y: f32) -> bool {
        self.taken
            .iter()
            .all(|&(tx, ty)| ((tx - x).powi(2) + (ty - y).powi(2)).sqrt() >= self.separation)
    }

    /// Reserve a fixed spot regardless of separation
    fn reserve(&mut self, x: f32, y: f32) -> (f32, f32) {
        self.taken.push((x, y));
        (x, y)
    }

    /// Random spot at least `separation` from every reserved spot
    fn sample(&mut self, rng: &mut GameRng) -> Option<(f32, f32)> {
        for _ in 0..MAX_PLACEMENT_TRIES {
            let x = rng.range_f32(self.lo, self.hi);
            let y = rng.range_f32(self.lo, self.hi);
            if self.is_clear(x, y) {
                return Some(self.reserve(x, y));
            }
        }
        None
    }
}

/// Fill a room with content appropriate to its type
///
/// Required entries (exit marker, boss, the room's signature item) are
/// always attempted; optional ones are capped at `config.max_contents`.
pub fn populate_room(room: &mut Room, config: &DungeonConfig, rng: &mut GameRng) {
    let floor = config.floor_number.max(1);
    let pool = tier_pool(&config.tier_bands, floor);
    let mut required = Vec::new();
    let mut optional = Vec::new();

    match room.room_type {
        RoomType::Start => return,
        RoomType::Exit => {
            required.push(ContentKind::Exit);
            if rng.one_in(2) {
                optional.push(enemy(pool, rng));
            }
        }
        RoomType::Boss => {
            required.push(ContentKind::Exit);
            let tier = if pool.contains(&EnemyTier::Boss) {
                EnemyTier::Boss
            } else {
                pool.iter().copied().max().unwrap_or_default()
            };
            required.push(ContentKind::Enemy { tier });
            if rng.one_in(2) {
                optional.push(enemy(pool, rng));
            }
        }
        RoomType::Treasure => {
            required.push(chest(floor, rng));
            if rng.one_in(2) {
                optional.push(chest(floor, rng));
            }
            if rng.percent(25) {
                optional.push(trap(floor, rng));
            }
        }
        RoomType::Secret => {
            required.push(secret(floor, rng));
            if rng.percent(40) {
                optional.push(puzzle(rng));
            }
        }
        RoomType::Merchant => {
            required.push(npc(&MERCHANTS, rng));
        }
        RoomType::Rest => {
            required.push(npc(&HEALERS, rng));
            if rng.one_in(2) {
                optional.push(secret_with(SecretReward::FullHeal, floor, rng));
            }
        }
        RoomType::Battle => {
            for _ in 0..rng.roll(3) {
                optional.push(enemy(pool, rng));
            }
            if rng.percent(25) {
                optional.push(trap(floor, rng));
            }
            if rng.percent(20) {
                optional.push(puzzle(rng));
            }
            if rng.percent(15) {
                optional.push(secret(floor, rng));
            }
        }
    }
    optional.truncate(config.max_contents.saturating_sub(required.len()));

    let mut placer = Placer::new(config.content_separation, config.content_margin);
    for kind in required.into_iter().chain(optional) {
        let spot = if matches!(kind, ContentKind::Exit) {
            Some(placer.reserve(0.5, 0.5))
        } else {
            placer.sample(rng)
        };
        match spot {
            Some((x, y)) => room.contents.push(RoomContent::new(kind, x, y)),
            None => debug!(room = %room.id, kind = kind.tag(), "no free spot, content dropped"),
        }
    }
}

fn enemy(pool: &[EnemyTier], rng: &mut GameRng) -> ContentKind {
    ContentKind::Enemy {
        tier: rng.choose(pool).copied().unwrap_or_default(),
    }
}

fn chest(floor: u32, rng: &mut GameRng) -> ContentKind {
    ContentKind::Chest {
        gold: rng.dice(2, 6).saturating_mul(floor).saturating_add(10),
    }
}

fn trap(floor: u32, rng: &mut GameRng) -> ContentKind {
    let trap = *rng
        .choose(&[TrapKind::Spikes, TrapKind::Darts, TrapKind::Poison])
        .unwrap_or(&TrapKind::Spikes);
    let (n, m) = trap.damage_dice();
    ContentKind::Trap {
        trap,
        damage: rng.dice(n, m).saturating_add(floor / 3),
    }
}

fn npc(roster: &[(&str, &str)], rng: &mut GameRng) -> ContentKind {
    let (name, dialogue) = rng.choose(roster).copied().unwrap_or(("Stranger", "..."));
    ContentKind::Npc {
        name: name.to_string(),
        dialogue: dialogue.to_string(),
    }
}

fn puzzle(rng: &mut GameRng) -> ContentKind {
    let kind = if rng.one_in(2) {
        PuzzleKind::Riddle
    } else {
        PuzzleKind::Sequence
    };
    ContentKind::Puzzle { kind }
}

fn secret(floor: u32, rng: &mut GameRng) -> ContentKind {
    let rewards = [
        SecretReward::Gold,
        SecretReward::Xp,
        SecretReward::Treasure,
        SecretReward::FullHeal,
    ];
    let reward = rewards[rng.weighted_index(&[3, 3, 2, 2]).unwrap_or(0)];
    secret_with(reward, floor, rng)
}

fn secret_with(reward: SecretReward, floor: u32, rng: &mut GameRng) -> ContentKind {
    let scaled = floor.saturating_mul(5);
    let gold = scaled.saturating_add(20 + rng.below(10));
    let xp = scaled.saturating_add(10);
    let (gold, xp) = match reward {
        SecretReward::Gold => (Some(gold), None),
        SecretReward::Xp => (None, Some(xp)),
        SecretReward::Treasure => (Some(gold.saturating_mul(2)), Some(xp)),
        SecretReward::FullHeal => (None, None),
    };
    ContentKind::Secret {
        reward,
        gold,
        xp,
        discovered: false,
        name: rng.choose(&SECRET_NAMES).copied().unwrap_or("Secret").to_string(),
    }
}
