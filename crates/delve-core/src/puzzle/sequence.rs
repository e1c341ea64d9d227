//! Sequence lock: memorize a pattern of directions, then repeat it

use serde::Serialize;

use crate::dungeon::Direction;
use crate::rng::GameRng;

/// Sequence lock in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceLock {
    pub pattern: Vec<Direction>,
    pub inputs: Vec<Direction>,
    /// Pattern is on screen; inputs are not accepted yet
    pub show_pattern: bool,
}

impl SequenceLock {
    pub fn new(pattern: Vec<Direction>) -> Self {
        Self {
            pattern,
            inputs: Vec::new(),
            show_pattern: true,
        }
    }

    pub fn random(rng: &mut GameRng, length: usize) -> Self {
        let pattern = (0..length.max(1))
            .map(|_| Direction::ALL[rng.below(4) as usize])
            .collect();
        Self::new(pattern)
    }

    pub fn hide(&mut self) {
        self.show_pattern = false;
    }

    /// Record one input
    ///
    /// Returns `Some(matched)` once the input length reaches the pattern
    /// length, `None` while incomplete or while the pattern is still shown.
    pub fn push(&mut self, direction: Direction) -> Option<bool> {
        if self.show_pattern || self.is_complete() {
            return None;
        }
        self.inputs.push(direction);
        self.is_complete().then(|| self.inputs == self.pattern)
    }

    pub fn is_complete(&self) -> bool {
        self.inputs.len() >= self.pattern.len()
    }
}
