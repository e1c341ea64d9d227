//! Riddle puzzle: pick the right answer from a short list

use serde::Serialize;

use crate::rng::GameRng;

/// (question, answers, index of the right answer)
const RIDDLES: [(&str, [&str; 4], usize); 8] = [
    (
        "The more you take, the more you leave behind. What am I?",
        ["Footsteps", "Gold", "Time", "Shadows"],
        0,
    ),
    (
        "What has keys but can't open locks?",
        ["A jailer", "A piano", "A chest", "A map"],
        1,
    ),
    (
        "I speak without a mouth and hear without ears. What am I?",
        ["A ghost", "A bell", "An echo", "A scroll"],
        2,
    ),
    (
        "What can fill a room but takes up no space?",
        ["Water", "Smoke", "Silence", "Light"],
        3,
    ),
    (
        "What has a neck but no head?",
        ["A bottle", "A snake", "A sword", "A tower"],
        0,
    ),
    (
        "The more of me there is, the less you see. What am I?",
        ["Fog", "Darkness", "Dust", "Water"],
        1,
    ),
    (
        "What gets wetter the more it dries?",
        ["A sponge", "Sand", "A towel", "A cloak"],
        2,
    ),
    (
        "What runs but never walks, has a bed but never sleeps?",
        ["A hound", "A thief", "A wheel", "A river"],
        3,
    ),
];

/// Riddle in progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Riddle {
    pub question: &'static str,
    pub options: Vec<&'static str>,
    pub correct_index: usize,
    pub selected_index: usize,
}

impl Riddle {
    /// Random riddle with its answers shuffled
    pub fn random(rng: &mut GameRng) -> Self {
        let (question, answers, correct) = RIDDLES[rng.below(RIDDLES.len() as u32) as usize];
        let answer = answers[correct];
        let mut options = answers.to_vec();
        rng.shuffle(&mut options);
        let correct_index = options.iter().position(|o| *o == answer).unwrap_or(0);
        Self {
            question,
            options,
            correct_index,
            selected_index: 0,
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let last = self.options.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(last);
    }

    pub fn is_correct(&self) -> bool {
        self.selected_index == self.correct_index
    }
}
