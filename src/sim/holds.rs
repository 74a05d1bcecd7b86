//! Player-holds-NPC relation
//!
//! One relation object instead of a pair of back-references: a player holds at
//! most one NPC, an NPC is held by at most one player, and every mutation
//! updates both directions together.

use std::collections::BTreeMap;

use super::npc::NpcId;
use super::player::PlayerId;

#[derive(Debug, Clone, Default)]
pub struct HoldTable {
    by_player: BTreeMap<PlayerId, NpcId>,
    by_npc: BTreeMap<NpcId, PlayerId>,
}

impl HoldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `player` hold `npc`, dropping whatever either side held before
    pub fn grab(&mut self, player: PlayerId, npc: NpcId) {
        self.release_player(player);
        self.release_npc(npc);
        self.by_player.insert(player, npc);
        self.by_npc.insert(npc, player);
    }

    /// Drop what `player` holds; returns it
    pub fn release_player(&mut self, player: PlayerId) -> Option<NpcId> {
        let npc = self.by_player.remove(&player)?;
        self.by_npc.remove(&npc);
        Some(npc)
    }

    /// Free `npc` from whoever holds it; returns the holder
    pub fn release_npc(&mut self, npc: NpcId) -> Option<PlayerId> {
        let player = self.by_npc.remove(&npc)?;
        self.by_player.remove(&player);
        Some(player)
    }

    /// NPC held by `player`
    pub fn held_by(&self, player: PlayerId) -> Option<NpcId> {
        self.by_player.get(&player).copied()
    }

    /// Player holding `npc`
    pub fn holder_of(&self, npc: NpcId) -> Option<PlayerId> {
        self.by_npc.get(&npc).copied()
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}
