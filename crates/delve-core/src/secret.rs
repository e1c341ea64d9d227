//! Secret discovery
//!
//! Hidden secrets are found by walking close to them. Only one candidate is
//! tracked at a time: the first hidden secret, in content order, that lies
//! within the search radius of the player.

use tracing::{debug, info};

use crate::collab::{AudioCues, Cue, RoomRenderer};
use crate::dungeon::{ContentKind, RoomId, SecretReward};
use crate::world::{GameState, Reward};

/// What claiming a secret gave the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretClaim {
    /// Gold and xp added
    Reward(Reward),
    /// Health restored to maximum
    FullHeal,
}

#[derive(Debug, Clone, Default)]
pub struct SecretDiscovery {
    radius: f32,
    nearby: Option<usize>,
}

impl SecretDiscovery {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            nearby: None,
        }
    }

    /// Content index of the current candidate, if any
    pub fn nearby(&self) -> Option<usize> {
        self.nearby
    }

    pub fn clear(&mut self) {
        self.nearby = None;
    }

    /// Recompute the candidate from the player position
    ///
    /// Room size is needed to turn normalized content positions into pixels.
    pub fn scan(&mut self, ctx: &GameState, room_width: f32, room_height: f32) -> Option<usize> {
        let pos = ctx.player_pos();
        let found = ctx.current_room().and_then(|room| {
            room.hidden_secrets().find(|&i| {
                let (x, y) = room.contents[i].position_in(room_width, room_height);
                pos.distance_to(x, y) <= self.radius
            })
        });
        if found != self.nearby {
            debug!(candidate = ?found, "secret candidate changed");
        }
        self.nearby = found;
        found
    }

    /// Reveal the current candidate
    ///
    /// Returns the revealed content index, or `None` when nothing is nearby.
    pub fn discover(
        &mut self,
        ctx: &mut GameState,
        renderer: &mut dyn RoomRenderer,
        audio: &mut dyn AudioCues,
    ) -> Option<usize> {
        let index = self.nearby.take()?;
        let room = ctx.current_room_mut()?;
        if !room.content_mut(index).is_some_and(|c| c.reveal()) {
            return None;
        }
        renderer.rebuild_room(room);
        audio.play(Cue::Discover);
        info!(room = %room.id, index, "secret discovered");
        Some(index)
    }

    /// Grant a revealed secret's reward
    ///
    /// No-op for hidden, already-claimed or non-secret content.
    pub fn claim(
        ctx: &mut GameState,
        room: RoomId,
        index: usize,
        audio: &mut dyn AudioCues,
    ) -> Option<SecretClaim> {
        let content = ctx.floor.room_mut(room)?.content_mut(index)?;
        let ContentKind::Secret {
            reward,
            gold,
            xp,
            discovered: true,
            ..
        } = content.kind
        else {
            return None;
        };
        if !content.trigger() {
            return None;
        }

        let claim = match reward {
            SecretReward::FullHeal => {
                ctx.heal_full();
                audio.play(Cue::Heal);
                SecretClaim::FullHeal
            }
            _ => {
                let granted = Reward::new(gold.unwrap_or(0), xp.unwrap_or(0));
                ctx.add_gold(granted.gold);
                ctx.add_xp(granted.xp);
                audio.play(Cue::GoldCollect);
                SecretClaim::Reward(granted)
            }
        };
        info!(%room, index, %reward, "secret claimed");
        Some(claim)
    }
}
