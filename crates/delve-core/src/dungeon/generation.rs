//! Floor generation
//!
//! Grows a room graph on a bounded abstract grid with a randomized
//! expansion walk, assigns room types by distance from the start, then
//! places content in every room except the start.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::rng::GameRng;
use crate::world::errors::GenerationError;
use crate::{MAX_GENERATION_ATTEMPTS, MIN_FLOOR_ROOMS};

use super::direction::Direction;
use super::floor::{Floor, FloorError};
use super::population::populate_room;
use super::room::{Room, RoomId, RoomType};
use super::tier::{TierBand, default_tier_bands};

/// Relative weights for special room types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialWeights {
    pub treasure: u32,
    pub secret: u32,
    pub merchant: u32,
    pub rest: u32,
}

impl Default for SpecialWeights {
    fn default() -> Self {
        Self {
            treasure: 4,
            secret: 2,
            merchant: 2,
            rest: 2,
        }
    }
}

impl SpecialWeights {
    /// Weights in `RoomType::SPECIAL` order
    pub const fn as_array(&self) -> [u32; 4] {
        [self.treasure, self.secret, self.merchant, self.rest]
    }
}

/// Floor generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub floor_number: u32,
    /// Room-count target is drawn from `min_rooms..=max_rooms`
    pub min_rooms: usize,
    /// Raised to `min_rooms` when lower
    pub max_rooms: usize,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Chance (0-1) that a step branches off an older room instead of
    /// extending the walk head
    pub branching: f32,
    /// Maximum doors a room may grow during the walk (2-4)
    pub branching_factor: usize,
    /// Percent chance to join two adjacent rooms that the walk left apart
    pub loop_chance: u32,
    /// Fraction (0-1) of ordinary rooms that become special rooms
    pub special_fraction: f32,
    pub special_weights: SpecialWeights,
    /// Every Nth floor ends in a boss room; 0 disables bosses
    pub boss_interval: u32,
    /// Upper bound on optional content entries per room
    pub max_contents: usize,
    /// Minimum normalized distance between two entries of a room
    pub content_separation: f32,
    /// Normalized distance kept clear along the room walls
    pub content_margin: f32,
    pub tier_bands: Vec<TierBand>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            floor_number: 1,
            min_rooms: 6,
            max_rooms: 10,
            grid_width: 9,
            grid_height: 9,
            branching: 0.35,
            branching_factor: 3,
            loop_chance: 10,
            special_fraction: 0.3,
            special_weights: SpecialWeights::default(),
            boss_interval: 5,
            max_contents: 4,
            content_separation: 0.15,
            content_margin: 0.12,
            tier_bands: default_tier_bands(),
        }
    }
}

impl DungeonConfig {
    /// Default parameters for a given floor
    pub fn for_floor(floor_number: u32) -> Self {
        Self {
            floor_number,
            ..Self::default()
        }
    }

    pub fn grid_cells(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Whether this floor's farthest room is a boss room
    pub fn ends_in_boss(&self) -> bool {
        self.boss_interval > 0 && self.floor_number % self.boss_interval == 0
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: &str| -> Result<(), GenerationError> {
            Err(GenerationError::InvalidConfig(msg.to_string()))
        };

        if self.floor_number == 0 {
            return invalid("floors are numbered from 1");
        }
        if self.grid_cells() < MIN_FLOOR_ROOMS {
            return invalid("grid must hold at least two rooms");
        }
        if !(0.0..=1.0).contains(&self.branching) {
            return invalid("branching must be within 0..=1");
        }
        if !(2..=4).contains(&self.branching_factor) {
            return invalid("branching_factor must be within 2..=4");
        }
        if self.loop_chance > 100 {
            return invalid("loop_chance is a percentage");
        }
        if !(0.0..=1.0).contains(&self.special_fraction) {
            return invalid("special_fraction must be within 0..=1");
        }
        if !(0.0..0.5).contains(&self.content_margin) {
            return invalid("content_margin must be within 0..0.5");
        }
        if self.content_separation.is_nan() || self.content_separation < 0.0 {
            return invalid("content_separation must not be negative");
        }
        if self.tier_bands.is_empty() || self.tier_bands.iter().any(|b| b.tiers.is_empty()) {
            return invalid("every tier band needs at least one tier");
        }
        Ok(())
    }
}

/// Generate a floor
///
/// Identical `(config, seed)` pairs produce identical floors. Without a seed
/// the RNG is seeded from entropy.
pub fn generate(config: &DungeonConfig, seed: Option<u64>) -> Result<Floor, GenerationError> {
    config.validate()?;
    let mut rng = GameRng::from_seed_or_entropy(seed);

    let lo = config.min_rooms.max(MIN_FLOOR_ROOMS);
    let hi = config.max_rooms.max(lo);
    let mut target = rng.between(lo as u32, hi as u32) as usize;
    if target > config.grid_cells() {
        warn!(
            target,
            cells = config.grid_cells(),
            "room target exceeds grid capacity"
        );
        target = config.grid_cells();
    }

    let mut attempts = 0;
    loop {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            attempts += 1;
            let Some(mut floor) = grow_layout(config, target, &mut rng) else {
                debug!(target, attempts, "expansion walk stalled");
                continue;
            };

            add_loops(&mut floor, config, &mut rng);
            assign_room_types(&mut floor, config, &mut rng)?;
            for room in floor.rooms.values_mut() {
                if room.room_type != RoomType::Start {
                    populate_room(room, config, &mut rng);
                }
            }
            floor.validate()?;

            info!(
                floor = config.floor_number,
                rooms = floor.len(),
                seed = rng.seed(),
                attempts,
                "generated floor"
            );
            return Ok(floor);
        }

        if target <= MIN_FLOOR_ROOMS {
            return Err(GenerationError::Exhausted { target, attempts });
        }
        target -= 1;
        warn!(target, "shrinking room target");
    }
}

/// Run one expansion walk; `None` if it stalls before reaching `target`
fn grow_layout(config: &DungeonConfig, target: usize, rng: &mut GameRng) -> Option<Floor> {
    let width = config.grid_width as i32;
    let height = config.grid_height as i32;
    let in_bounds = |x: i32, y: i32| x >= 0 && y >= 0 && x < width && y < height;

    let mut floor = Floor::new(config.floor_number);
    let mut occupied: HashMap<(i32, i32), RoomId> = HashMap::new();

    let start = Room::new(RoomId(0), width / 2, height / 2);
    occupied.insert((start.grid_x, start.grid_y), start.id);
    floor.insert(start);
    let mut head = RoomId(0);

    while floor.len() < target {
        let free_dirs = |room: &Room| -> Vec<Direction> {
            Direction::ALL
                .into_iter()
                .filter(|d| {
                    let (x, y) = d.step(room.grid_x, room.grid_y);
                    in_bounds(x, y) && !occupied.contains_key(&(x, y))
                })
                .collect()
        };

        let frontier: Vec<RoomId> = floor
            .rooms
            .values()
            .filter(|r| r.degree() < config.branching_factor && !free_dirs(r).is_empty())
            .map(|r| r.id)
            .collect();
        if frontier.is_empty() {
            return None;
        }

        let source = if frontier.contains(&head) && rng.unit() >= config.branching {
            head
        } else {
            // Rooms already on a path are favoured so the walk forks
            let weights: Vec<u32> = frontier
                .iter()
                .map(|id| 1 + floor.rooms[id].degree() as u32)
                .collect();
            frontier[rng.weighted_index(&weights).unwrap_or(0)]
        };

        let room = &floor.rooms[&source];
        let dirs = free_dirs(room);
        // Cells with fewer occupied neighbours spread the floor out
        let weights: Vec<u32> = dirs
            .iter()
            .map(|d| {
                let (x, y) = d.step(room.grid_x, room.grid_y);
                let crowd = Direction::ALL
                    .into_iter()
                    .filter(|n| occupied.contains_key(&n.step(x, y)))
                    .count() as u32;
                5u32.saturating_sub(crowd)
            })
            .collect();
        let direction = dirs[rng.weighted_index(&weights).unwrap_or(0)];
        let (x, y) = direction.step(room.grid_x, room.grid_y);

        let id = RoomId(floor.len() as u32);
        floor.insert(Room::new(id, x, y));
        occupied.insert((x, y), id);
        floor.connect(source, direction, id).ok()?;
        head = id;
    }

    Some(floor)
}

/// Join some grid-adjacent rooms the walk did not connect
fn add_loops(floor: &mut Floor, config: &DungeonConfig, rng: &mut GameRng) {
    if config.loop_chance == 0 {
        return;
    }
    let by_cell: HashMap<(i32, i32), RoomId> = floor
        .rooms
        .values()
        .map(|r| ((r.grid_x, r.grid_y), r.id))
        .collect();

    let mut candidates = Vec::new();
    for room in floor.rooms.values() {
        // East and south only, so each pair is considered once
        for direction in [Direction::East, Direction::South] {
            if room.neighbor(direction).is_some() {
                continue;
            }
            if let Some(&other) = by_cell.get(&direction.step(room.grid_x, room.grid_y)) {
                candidates.push((room.id, direction, other));
            }
        }
    }

    for (a, direction, b) in candidates {
        if rng.percent(config.loop_chance) && floor.connect(a, direction, b).is_ok() {
            debug!(%a, %b, "added loop");
        }
    }
}

/// Start, exit/boss, then weighted special rooms; the rest are battles
fn assign_room_types(
    floor: &mut Floor,
    config: &DungeonConfig,
    rng: &mut GameRng,
) -> Result<(), GenerationError> {
    let start = RoomId(0);
    let (exit, distance) = floor
        .farthest_from(start)
        .filter(|(id, _)| *id != start)
        .ok_or(FloorError::StartIsExit(start))?;

    floor.start_room_id = start;
    floor.exit_room_id = exit;
    let exit_type = if config.ends_in_boss() {
        RoomType::Boss
    } else {
        RoomType::Exit
    };

    let mut others: Vec<RoomId> = floor
        .rooms
        .keys()
        .copied()
        .filter(|id| *id != start && *id != exit)
        .collect();
    rng.shuffle(&mut others);
    let special_count = (others.len() as f32 * config.special_fraction).round() as usize;
    let weights = config.special_weights.as_array();
    let mut remaining = weights;

    for (i, id) in others.iter().enumerate() {
        let room_type = if i < special_count {
            // Each type is drawn once before any repeats
            if remaining.iter().all(|w| *w == 0) {
                remaining = weights;
            }
            match rng.weighted_index(&remaining) {
                Some(w) => {
                    remaining[w] = 0;
                    RoomType::SPECIAL[w]
                }
                None => RoomType::Battle,
            }
        } else {
            RoomType::Battle
        };
        if let Some(room) = floor.room_mut(*id) {
            room.room_type = room_type;
        }
    }
    if let Some(room) = floor.room_mut(start) {
        room.room_type = RoomType::Start;
    }
    if let Some(room) = floor.room_mut(exit) {
        room.room_type = exit_type;
    }

    debug!(%exit, distance, special_count, "assigned room types");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{ContentKind, EnemyTier};

    #[test]
    fn test_default_config_is_valid() {
        assert!(DungeonConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut cfg = DungeonConfig::default();
        cfg.grid_width = 1;
        cfg.grid_height = 1;
        assert!(matches!(
            generate(&cfg, Some(1)),
            Err(GenerationError::InvalidConfig(_))
        ));

        let mut cfg = DungeonConfig::default();
        cfg.branching_factor = 1;
        assert!(cfg.validate().is_err());

        let mut cfg = DungeonConfig::default();
        cfg.tier_bands.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = DungeonConfig::default();
        cfg.special_fraction = 1.5;
        assert!(cfg.validate().is_err());

        assert!(DungeonConfig::for_floor(0).validate().is_err());
    }

    #[test]
    fn test_floor_zero_is_not_a_boss_floor() {
        assert!(matches!(
            generate(&DungeonConfig::for_floor(0), Some(2)),
            Err(GenerationError::InvalidConfig(_))
        ));
        assert!(DungeonConfig::for_floor(5).ends_in_boss());
        assert!(!DungeonConfig::for_floor(4).ends_in_boss());
    }

    #[test]
    fn test_special_types_drawn_without_replacement() {
        let mut cfg = DungeonConfig::default();
        cfg.min_rooms = 12;
        cfg.max_rooms = 12;
        cfg.special_fraction = 1.0;
        for seed in 0..20 {
            let floor = generate(&cfg, Some(seed)).unwrap();
            let count = |t: RoomType| floor.rooms.values().filter(|r| r.room_type == t).count();
            let specials: usize = RoomType::SPECIAL.iter().map(|t| count(*t)).sum();
            let (lo, hi) = (specials / 4, specials.div_ceil(4));
            for t in RoomType::SPECIAL {
                assert!((lo..=hi).contains(&count(t)), "seed {seed}: {t} x{}", count(t));
            }
        }
    }

    #[test]
    fn test_generate_basic_invariants() {
        for seed in 0..20 {
            let floor = generate(&DungeonConfig::default(), Some(seed)).unwrap();
            assert!(floor.len() >= 6 && floor.len() <= 10, "seed {seed}");
            assert!(floor.validate().is_ok());
            assert_ne!(floor.start_room_id, floor.exit_room_id);
            assert_eq!(floor.rooms[&floor.start_room_id].room_type, RoomType::Start);
            assert!(floor.rooms[&floor.start_room_id].contents.is_empty());
        }
    }

    #[test]
    fn test_exit_is_farthest_room() {
        let floor = generate(&DungeonConfig::default(), Some(11)).unwrap();
        let dist = floor.distances_from(floor.start_room_id);
        let max = dist.values().copied().max().unwrap();
        assert_eq!(dist[&floor.exit_room_id], max);
        assert!(floor.rooms[&floor.exit_room_id].room_type.is_exit());
    }

    #[test]
    fn test_boss_floor() {
        let cfg = DungeonConfig::for_floor(5);
        let floor = generate(&cfg, Some(3)).unwrap();
        let exit = &floor.rooms[&floor.exit_room_id];
        assert_eq!(exit.room_type, RoomType::Boss);
        assert!(exit.contents.iter().any(|c| matches!(c.kind, ContentKind::Exit)));
        assert!(
            exit.contents
                .iter()
                .any(|c| matches!(c.kind, ContentKind::Enemy { tier: EnemyTier::Mid }))
        );
    }

    #[test]
    fn test_target_shrinks_to_grid_capacity() {
        let mut cfg = DungeonConfig::default();
        cfg.grid_width = 2;
        cfg.grid_height = 2;
        cfg.min_rooms = 10;
        cfg.max_rooms = 10;
        cfg.branching_factor = 4;
        let floor = generate(&cfg, Some(5)).unwrap();
        assert!(floor.len() <= 4);
        assert!(floor.len() >= MIN_FLOOR_ROOMS);
        assert!(floor.validate().is_ok());
    }

    #[test]
    fn test_snake_walk_still_terminates() {
        let mut cfg = DungeonConfig::default();
        cfg.branching_factor = 2;
        cfg.branching = 0.0;
        cfg.loop_chance = 0;
        cfg.grid_width = 3;
        cfg.grid_height = 3;
        cfg.min_rooms = 9;
        cfg.max_rooms = 9;
        let floor = generate(&cfg, Some(17)).unwrap();
        assert!(floor.len() >= MIN_FLOOR_ROOMS && floor.len() <= 9);
        for room in floor.rooms.values() {
            assert!(room.degree() <= 2);
        }
    }

    #[test]
    fn test_no_special_rooms_when_fraction_zero() {
        let mut cfg = DungeonConfig::default();
        cfg.special_fraction = 0.0;
        let floor = generate(&cfg, Some(8)).unwrap();
        assert!(floor.rooms.values().all(|r| !r.room_type.is_special()));
    }
}
