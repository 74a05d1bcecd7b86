//! World state: entity registries, terrain and spatial indexes
//!
//! `World` exclusively owns everything the core mutates. External systems see
//! NPCs only through [`NpcId`] handles.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::holds::HoldTable;
use super::location::Location;
use super::npc::{Npc, NpcId, NpcTable};
use super::physics::MazeZone;
use super::player::{Player, PlayerId};
use super::spatial::{SortMode, SpatialGrid};
use super::traits::{NpcTraits, TraitTable};
use crate::num::{FRAC_BITS, Num};
use crate::settings::SimConfig;

/// Terrain block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub location: Location,
    pub kind: u16,
    /// Invisible until hit from below
    pub invis: bool,
    /// On a hidden layer
    pub hidden: bool,
    /// Sizable (semi-solid from above only)
    pub sizable: bool,
}

impl Block {
    pub fn solid(location: Location) -> Self {
        Self {
            location,
            kind: 1,
            invis: false,
            hidden: false,
            sizable: false,
        }
    }
}

/// Block address: level table or temporary table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockRef {
    Level(usize),
    Temp(usize),
}

#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    pub traits: TraitTable,
    pub npcs: NpcTable,
    pub players: Vec<Player>,
    pub holds: HoldTable,
    pub blocks: Vec<Block>,
    pub temp_blocks: Vec<Block>,
    pub maze_zones: Vec<MazeZone>,
    /// A cutscene is driving the controls
    pub forced_controls: bool,
    pub tick_count: u64,
    rng: Pcg32,
    block_tree: SpatialGrid,
    temp_block_tree: SpatialGrid,
    npc_tree: SpatialGrid,
}

impl World {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let npcs = NpcTable::with_capacity(config.max_npcs);
        Self {
            config,
            traits: TraitTable::standard(),
            npcs,
            players: Vec::new(),
            holds: HoldTable::new(),
            blocks: Vec::new(),
            temp_blocks: Vec::new(),
            maze_zones: Vec::new(),
            forced_controls: false,
            tick_count: 0,
            rng: Pcg32::seed_from_u64(seed),
            block_tree: SpatialGrid::new(),
            temp_block_tree: SpatialGrid::new(),
            npc_tree: SpatialGrid::new(),
        }
    }

    pub fn with_traits(mut self, traits: TraitTable) -> Self {
        self.traits = traits;
        self
    }

    // === Players ===

    pub fn add_player(&mut self, player: Player) -> PlayerId {
        self.players.push(player);
        PlayerId(self.players.len() - 1)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.0)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + use<> {
        (0..self.players.len()).map(PlayerId)
    }

    /// Nearest live player to `loc` by centre distance; ties go to the lower id
    pub fn target_player(&self, loc: &Location) -> Option<PlayerId> {
        let (cx, cy) = (loc.center_x(), loc.center_y());
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .min_by_key(|(i, p)| {
                let d = Num::dist(p.location.center_x() - cx, p.location.center_y() - cy);
                (d, *i)
            })
            .map(|(i, _)| PlayerId(i))
    }

    // === NPCs ===

    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id)
    }

    pub fn npc_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(id)
    }

    /// Static traits of an NPC's type
    pub fn npc_traits(&self, id: NpcId) -> Option<&NpcTraits> {
        let kind = self.npcs.get(id)?.kind;
        Some(self.traits.get(kind))
    }

    /// Whether player-driven spawns are still allowed
    pub fn has_spawn_headroom(&self) -> bool {
        self.npcs.len() < self.config.spawn_limit()
    }

    /// Append an NPC and index it
    pub fn spawn_npc(&mut self, npc: Npc) -> Option<NpcId> {
        let loc = npc.location;
        let id = self.npcs.spawn(npc)?;
        let index = self.npcs.len() - 1;
        self.npc_tree.insert(index, &loc);
        log::trace!("spawned npc {:?} in slot {} ({} live)", id, index, self.npcs.len());
        Some(id)
    }

    /// Re-index an NPC after it moved
    pub fn refresh_npc(&mut self, id: NpcId) {
        if let (Some(index), Some(npc)) = (self.npcs.index_of(id), self.npcs.get(id)) {
            self.npc_tree.update(index, &npc.location);
        }
    }

    /// Remove an NPC and release every reference to it. The last slot moves
    /// into the hole and keeps its handle.
    pub fn destroy_npc(&mut self, id: NpcId) -> Option<Npc> {
        let last = self.npcs.len().checked_sub(1)?;
        let (removed, moved) = self.npcs.remove(id)?;
        self.holds.release_npc(id);
        for p in &mut self.players {
            if p.standing_on_npc == Some(id) {
                p.standing_on_npc = None;
            }
            if p.pet_mouth == Some(id) {
                p.pet_mouth = None;
            }
        }

        self.npc_tree.remove(last);
        if let Some(moved) = moved {
            self.refresh_npc(moved);
        }
        Some(removed)
    }

    /// NPC candidates overlapping `region`
    pub fn query_npcs(&self, region: &Location, sort: SortMode) -> impl Iterator<Item = NpcId> + '_ {
        self.npc_tree
            .query(region, sort)
            .filter_map(|i| self.npcs.id_at(i))
    }

    // === Terrain ===

    pub fn add_block(&mut self, block: Block) -> BlockRef {
        let index = self.blocks.len();
        self.block_tree.insert(index, &block.location);
        self.blocks.push(block);
        BlockRef::Level(index)
    }

    pub fn add_temp_block(&mut self, block: Block) -> BlockRef {
        let index = self.temp_blocks.len();
        self.temp_block_tree.insert(index, &block.location);
        self.temp_blocks.push(block);
        BlockRef::Temp(index)
    }

    pub fn clear_temp_blocks(&mut self) {
        self.temp_blocks.clear();
        self.temp_block_tree.clear();
    }

    pub fn block(&self, block: BlockRef) -> Option<&Block> {
        match block {
            BlockRef::Level(i) => self.blocks.get(i),
            BlockRef::Temp(i) => self.temp_blocks.get(i),
        }
    }

    /// Level block candidates overlapping `region`
    pub fn query_blocks(&self, region: &Location, sort: SortMode) -> impl Iterator<Item = BlockRef> + use<> {
        self.block_tree.query(region, sort).map(BlockRef::Level)
    }

    /// Temporary block candidates overlapping `region`
    pub fn query_temp_blocks(&self, region: &Location, sort: SortMode) -> impl Iterator<Item = BlockRef> + use<> {
        self.temp_block_tree.query(region, sort).map(BlockRef::Temp)
    }

    pub fn add_maze_zone(&mut self, location: Location) -> usize {
        self.maze_zones.push(MazeZone { location });
        self.maze_zones.len()
    }

    // === Deterministic randomness ===

    /// Uniform integer in `0..n`
    pub fn random_int(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }

    /// Uniform value in `[0, 1)`
    pub fn random_unit(&mut self) -> Num {
        Num::from_raw(self.rng.random_range(0..(1i64 << FRAC_BITS)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::Character;
    use crate::sim::traits::NpcType;

    fn world() -> World {
        World::new(SimConfig::default(), 7)
    }

    #[test]
    fn test_target_player_nearest_alive() {
        let mut w = world();
        let far = w.add_player(Player::new(Character::Mario, Location::new(1000, 0, 24, 32)));
        let near = w.add_player(Player::new(Character::Luigi, Location::new(100, 0, 24, 32)));
        let seeker = Location::new(0, 0, 32, 32);
        assert_eq!(w.target_player(&seeker), Some(near));

        w.players[near.0].dead = true;
        assert_eq!(w.target_player(&seeker), Some(far));

        w.players[far.0].time_to_live = 5;
        assert_eq!(w.target_player(&seeker), None);
    }

    #[test]
    fn test_query_npcs_after_move() {
        let mut w = world();
        let id = w
            .spawn_npc(Npc::new(NpcType::Walker).at(Location::new(0, 0, 32, 32)))
            .unwrap();
        w.npc_mut(id).unwrap().location.x = Num::from_int(5000);
        w.refresh_npc(id);
        assert_eq!(w.query_npcs(&Location::new(0, 0, 32, 32), SortMode::None).count(), 0);
        let hits: Vec<_> = w.query_npcs(&Location::new(5000, 0, 32, 32), SortMode::None).collect();
        assert_eq!(hits, vec![id]);
    }

    #[test]
    fn test_destroy_releases_and_reindexes() {
        let mut w = world();
        let p = w.add_player(Player::new(Character::Peach, Location::new(0, 0, 24, 54)));
        let a = w.spawn_npc(Npc::new(NpcType::Walker).at(Location::new(0, 0, 32, 32))).unwrap();
        let b = w.spawn_npc(Npc::new(NpcType::Bomb).at(Location::new(300, 0, 28, 28))).unwrap();

        w.holds.grab(p, b);
        w.players[p.0].standing_on_npc = Some(a);

        w.destroy_npc(a).unwrap();
        assert_eq!(w.players[p.0].standing_on_npc, None);
        assert!(w.npc(a).is_none());

        assert_eq!(w.holds.held_by(p), Some(b));
        assert_eq!(w.npcs.index_of(b), Some(0));
        assert_eq!(w.npc(b).unwrap().kind, NpcType::Bomb);

        let hits: Vec<_> = w.query_npcs(&Location::new(300, 0, 28, 28), SortMode::None).collect();
        assert_eq!(hits, vec![b]);
        assert_eq!(w.query_npcs(&Location::new(0, 0, 32, 32), SortMode::None).count(), 0);

        w.destroy_npc(b).unwrap();
        assert!(w.holds.is_empty());
        assert!(w.npcs.is_empty());
    }

    #[test]
    fn test_headroom() {
        let mut config = SimConfig::default();
        config.max_npcs = 103;
        let mut w = World::new(config, 1);
        for _ in 0..3 {
            assert!(w.has_spawn_headroom());
            w.spawn_npc(Npc::new(NpcType::Walker)).unwrap();
        }
        assert!(!w.has_spawn_headroom());
    }

    #[test]
    fn test_random_unit_range() {
        let mut w = world();
        for _ in 0..100 {
            let r = w.random_unit();
            assert!(r >= Num::ZERO && r < Num::ONE);
            let i = w.random_int(2);
            assert!(i == 0 || i == 1);
        }
    }
}
