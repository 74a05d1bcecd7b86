//! Calls out of the simulation core
//!
//! Audio, layer/section bookkeeping, animation and the standard NPC routines
//! live outside this crate. Every call is fire-and-forget; defaults do nothing.

use super::location::Location;
use super::npc::{Npc, NpcId};
use super::player::PlayerId;
use crate::audio::SoundEffect;

pub trait Host {
    /// Positional sound
    fn play_sound(&mut self, _sound: SoundEffect, _at: &Location) {}

    /// Re-sync layer membership after `npc.layer` or its position changed
    fn sync_layer(&mut self, _npc: NpcId) {}

    /// Recompute which level section the NPC belongs to
    fn recompute_section(&mut self, _npc: NpcId) {}

    /// Standard animation step
    fn npc_frames(&mut self, _npc: &mut Npc) {}

    /// Wrap the NPC around a section with horizontal wrapping
    fn npc_section_wrap(&mut self, _npc: &mut Npc) {}

    /// NPC-vs-NPC collision; may set `npc.turn_around`
    fn npc_collide(&mut self, _id: NpcId, _npc: &mut Npc) {}

    /// Raccoon tail hitbox; `strong` on the damaging frames
    fn tail_swipe(&mut self, _player: PlayerId, _strong: bool) {}

    /// Link's sword stab
    fn char5_stab(&mut self, _player: PlayerId) {}
}

/// Host that ignores every call
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl Host for NullHost {}

/// Host that records what the core asked for
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub sounds: Vec<SoundEffect>,
    pub layer_syncs: Vec<NpcId>,
    pub section_checks: Vec<NpcId>,
    pub frames: usize,
    pub tail_swipes: Vec<(PlayerId, bool)>,
    pub stabs: Vec<PlayerId>,
    /// Collisions report a bump on these ticks (by call count)
    pub bump_on_collide: Vec<usize>,
    pub collide_calls: usize,
}

#[cfg(test)]
impl Host for RecordingHost {
    fn play_sound(&mut self, sound: SoundEffect, _at: &Location) {
        self.sounds.push(sound);
    }

    fn sync_layer(&mut self, npc: NpcId) {
        self.layer_syncs.push(npc);
    }

    fn recompute_section(&mut self, npc: NpcId) {
        self.section_checks.push(npc);
    }

    fn npc_frames(&mut self, _npc: &mut Npc) {
        self.frames += 1;
    }

    fn npc_collide(&mut self, _id: NpcId, npc: &mut Npc) {
        if self.bump_on_collide.contains(&self.collide_calls) {
            npc.turn_around = true;
        }
        self.collide_calls += 1;
    }

    fn tail_swipe(&mut self, player: PlayerId, strong: bool) {
        self.tail_swipes.push((player, strong));
    }

    fn char5_stab(&mut self, player: PlayerId) {
        self.stabs.push(player);
    }
}
