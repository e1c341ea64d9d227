//! Per-run dungeon state
//!
//! `GameState` is the single mutable context of a dungeon run. It is built
//! when a floor is entered and passed explicitly to every operation that
//! reads or changes it.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dungeon::{Floor, Room, RoomId};

use super::config::PlayerStats;

bitflags! {
    /// Reasons the player cannot move or use doors
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Freeze: u8 {
        const TRANSITION = 0x01;
        const PUZZLE     = 0x02;
    }
}

/// Player position in room pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

/// Dungeon slice of the game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub floor: Floor,
    current_room_id: RoomId,
    player_gold: u32,
    player_xp: u32,
    player_health: u32,
    player_max_health: u32,
    player_pos: Position,
    frozen: Freeze,
}

impl GameState {
    /// Enter a floor at its start room
    ///
    /// The start room is marked visited and its neighbours discovered.
    pub fn new(floor: Floor, stats: PlayerStats) -> Self {
        let start = floor.start_room_id;
        let max_health = stats.max_health.max(1);
        let mut state = Self {
            floor,
            current_room_id: start,
            player_gold: stats.gold,
            player_xp: stats.xp,
            player_health: stats.health.min(max_health),
            player_max_health: max_health,
            player_pos: Position::default(),
            frozen: Freeze::empty(),
        };
        state.mark_visited(start);
        info!(
            floor = state.floor.floor_number,
            rooms = state.floor.len(),
            "entered floor"
        );
        state
    }

    // --- Room pointer ---

    pub fn current_room_id(&self) -> RoomId {
        self.current_room_id
    }

    /// Point at another room; `false` if it does not exist
    pub fn set_current_room(&mut self, id: RoomId) -> bool {
        if !self.floor.contains(id) {
            return false;
        }
        self.current_room_id = id;
        true
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.floor.room(self.current_room_id)
    }

    pub fn current_room_mut(&mut self) -> Option<&mut Room> {
        self.floor.room_mut(self.current_room_id)
    }

    /// Mark a room visited and discovered, and its neighbours discovered
    pub fn mark_visited(&mut self, id: RoomId) {
        let neighbors: Vec<RoomId> = match self.floor.room_mut(id) {
            Some(room) => {
                room.visited = true;
                room.discovered = true;
                room.connections.values().copied().collect()
            }
            None => return,
        };
        for n in neighbors {
            if let Some(room) = self.floor.room_mut(n) {
                room.discovered = true;
            }
        }
    }

    // --- Player resources ---

    pub fn gold(&self) -> u32 {
        self.player_gold
    }

    pub fn xp(&self) -> u32 {
        self.player_xp
    }

    pub fn health(&self) -> u32 {
        self.player_health
    }

    pub fn max_health(&self) -> u32 {
        self.player_max_health
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.player_gold = self.player_gold.saturating_add(amount);
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.player_xp = self.player_xp.saturating_add(amount);
    }

    /// Restore up to `amount` health, capped at the maximum
    pub fn heal(&mut self, amount: u32) {
        self.player_health = self
            .player_health
            .saturating_add(amount)
            .min(self.player_max_health);
    }

    pub fn heal_full(&mut self) {
        self.player_health = self.player_max_health;
    }

    /// Lose health, never below zero
    pub fn damage(&mut self, amount: u32) {
        self.player_health = self.player_health.saturating_sub(amount);
    }

    pub fn set_health(&mut self, health: u32) {
        self.player_health = health.min(self.player_max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.player_health == 0
    }

    // --- Position and freezing ---

    pub fn player_pos(&self) -> Position {
        self.player_pos
    }

    pub fn set_player_pos(&mut self, pos: Position) {
        self.player_pos = pos;
    }

    pub fn freeze(&mut self, reason: Freeze) {
        self.frozen.insert(reason);
    }

    pub fn unfreeze(&mut self, reason: Freeze) {
        self.frozen.remove(reason);
    }

    pub fn is_frozen(&self) -> bool {
        !self.frozen.is_empty()
    }

    pub fn frozen(&self) -> Freeze {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Direction, Room};

    fn state() -> GameState {
        let mut floor = Floor::new(1);
        for i in 0..3 {
            floor.insert(Room::new(RoomId(i), i as i32, 0));
        }
        floor.connect(RoomId(0), Direction::East, RoomId(1)).unwrap();
        floor.connect(RoomId(1), Direction::East, RoomId(2)).unwrap();
        floor.exit_room_id = RoomId(2);
        GameState::new(floor, PlayerStats::default())
    }

    #[test]
    fn test_entry_marks_start_and_neighbours() {
        let s = state();
        let rooms = &s.floor.rooms;
        assert!(rooms[&RoomId(0)].visited && rooms[&RoomId(0)].discovered);
        assert!(rooms[&RoomId(1)].discovered && !rooms[&RoomId(1)].visited);
        assert!(!rooms[&RoomId(2)].discovered);
    }

    #[test]
    fn test_set_current_room_rejects_unknown() {
        let mut s = state();
        assert!(!s.set_current_room(RoomId(9)));
        assert_eq!(s.current_room_id(), RoomId(0));
        assert!(s.set_current_room(RoomId(2)));
        assert_eq!(s.current_room_id(), RoomId(2));
    }

    #[test]
    fn test_health_bounds() {
        let mut s = state();
        s.damage(100);
        assert_eq!(s.health(), 0);
        assert!(s.is_dead());
        s.heal(5);
        assert_eq!(s.health(), 5);
        s.heal(1000);
        assert_eq!(s.health(), s.max_health());
        s.set_health(3);
        s.heal_full();
        assert_eq!(s.health(), s.max_health());
    }

    #[test]
    fn test_freeze_reasons_are_independent() {
        let mut s = state();
        s.freeze(Freeze::TRANSITION);
        s.freeze(Freeze::PUZZLE);
        s.unfreeze(Freeze::TRANSITION);
        assert!(s.is_frozen());
        s.unfreeze(Freeze::PUZZLE);
        assert!(!s.is_frozen());
        s.unfreeze(Freeze::PUZZLE);
        assert!(!s.is_frozen());
    }

    #[test]
    fn test_resources_saturate() {
        let mut s = state();
        s.add_gold(u32::MAX);
        s.add_gold(10);
        assert_eq!(s.gold(), u32::MAX);
        s.add_xp(7);
        assert_eq!(s.xp(), 7);
    }
}
