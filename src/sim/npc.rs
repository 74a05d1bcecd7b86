//! NPC records, effect overlays and the NPC table
//!
//! The table is a dense arena addressed by generation-checked [`NpcId`]
//! handles. Spawning appends a slot; destroying swap-removes. A destroyed
//! NPC's handle resolves to `None` even after its key slot is reused.

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use super::location::Location;
use super::physics::MazeStatus;
use super::player::PlayerId;
use super::traits::NpcType;
use crate::num::Num;

new_key_type! {
    /// Generation-checked NPC handle
    pub struct NpcId;
}

/// Layer membership
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u16);

impl LayerId {
    pub const DEFAULT: LayerId = LayerId(0);
    /// Layer NPCs are moved to after leaving a warp generator
    pub const SPAWNED_NPCS: LayerId = LayerId(2);
}

/// Horizontal/vertical leg of a warp exit (legacy codes 1..4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpDir {
    Up = 1,
    Left = 2,
    Down = 3,
    Right = 4,
}

/// Item dropping out of the reserve box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropItem {
    /// Steering toward a point above `player`.
    /// `timer` above the hover length means "still approaching".
    Bound { player: PlayerId, timer: i32 },
    /// Plain falling with a 4-frame blink
    Free { frame: i32 },
}

/// Secondary behaviour overlay. Each variant carries only what that state
/// uses; leaving an effect means assigning `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcEffect {
    #[default]
    Normal,
    /// Rising out of a block
    EmergeUp { progress: i32 },
    /// Falling out of a block
    EmergeDown { progress: i32 },
    /// Trapped inside a boss case
    Encased,
    DropItem(DropItem),
    /// Leaving a warp generator; `target` is a y for vertical legs, x otherwise
    Warp { dir: WarpDir, target: Num },
    /// On a pet's tongue
    PetTongue { carrier: PlayerId, remaining: i32 },
    /// In a pet's mouth
    PetInside { carrier: PlayerId },
    /// Holding pattern
    Waiting { remaining: i32 },
    /// Travelling a maze corridor; `zone` is 1-based, 0 once it has left
    Maze { zone: usize, status: MazeStatus },
}

impl NpcEffect {
    pub fn is_normal(&self) -> bool {
        matches!(self, NpcEffect::Normal)
    }

    /// Freshly started bound item drop
    pub fn drop_to(player: PlayerId) -> Self {
        NpcEffect::DropItem(DropItem::Bound {
            player,
            timer: crate::consts::DROP_HOVER_TICKS + 1,
        })
    }

    /// The legacy `(Effect2, Effect3)` counter pair; `(0, 0)` outside any overlay
    pub fn counters(&self) -> (i32, i32) {
        match *self {
            NpcEffect::Normal | NpcEffect::Encased => (0, 0),
            NpcEffect::EmergeUp { progress } | NpcEffect::EmergeDown { progress } => (progress, 0),
            NpcEffect::DropItem(DropItem::Bound { player, .. }) => (0, player.number()),
            NpcEffect::DropItem(DropItem::Free { frame }) => (frame, 0),
            NpcEffect::Warp { dir, .. } => (0, dir as i32),
            NpcEffect::PetTongue { carrier, remaining } => (carrier.number(), remaining),
            NpcEffect::PetInside { carrier } => (carrier.number(), 0),
            NpcEffect::Waiting { remaining } => (remaining, 0),
            NpcEffect::Maze { zone, status } => (zone as i32, status.bits() as i32),
        }
    }
}

/// A non-player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub kind: NpcType,
    pub location: Location,
    pub effect: NpcEffect,
    /// -1 left, +1 right, 0 undecided
    pub direction: i32,
    pub active: bool,
    pub time_left: i32,
    pub layer: LayerId,
    pub section: usize,
    pub frame: i32,
    pub projectile: bool,
    /// Ticks since leaving water (0 = dry)
    pub wet: i32,
    pub quicksand: bool,
    pub hidden: bool,
    pub shadow: bool,
    /// Ticks during which the thrower cannot be hurt
    pub cant_hurt: i32,
    pub cant_hurt_player: Option<PlayerId>,
    /// Set by collision when the NPC bumps into something
    pub turn_around: bool,
    /// Dies if inside a wall within this many ticks
    pub wall_death: i32,
    /// Thrower's character number, or palette for player balls
    pub special: i32,
    pub boomerang_owner: Option<PlayerId>,
    pub boomerang_direction: i32,
    /// Low gravity and no fall-speed cap (balls thrown up while swimming)
    pub low_gravity: bool,
    /// Suppresses bouncing for this many contacts
    pub bounce_lock: i32,
    /// Airborne grace after a vertical maze exit
    pub launch_grace: i32,
}

impl Npc {
    pub fn new(kind: NpcType) -> Self {
        Self {
            kind,
            location: Location::default(),
            effect: NpcEffect::Normal,
            direction: 0,
            active: true,
            time_left: 0,
            layer: LayerId::DEFAULT,
            section: 0,
            frame: 0,
            projectile: false,
            wet: 0,
            quicksand: false,
            hidden: false,
            shadow: false,
            cant_hurt: 0,
            cant_hurt_player: None,
            turn_around: false,
            wall_death: 0,
            special: 0,
            boomerang_owner: None,
            boomerang_direction: 0,
            low_gravity: false,
            bounce_lock: 0,
            launch_grace: 0,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_effect(mut self, effect: NpcEffect) -> Self {
        self.effect = effect;
        self
    }
}

/// Dense NPC storage with generational handles.
///
/// Slot order is spawn order; destroying swap-removes the NPC so the last
/// slot fills the hole. Handles stay valid across that move.
#[derive(Debug, Clone)]
pub struct NpcTable {
    slots: SlotMap<NpcId, usize>,
    handles: Vec<NpcId>,
    npcs: Vec<Npc>,
    capacity: usize,
}

impl NpcTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_key(),
            handles: Vec::new(),
            npcs: Vec::new(),
            capacity,
        }
    }

    /// Live-slot count (`numNPCs`)
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a new slot. `None` when the table is full.
    pub fn spawn(&mut self, npc: Npc) -> Option<NpcId> {
        let index = self.npcs.len();
        if index >= self.capacity {
            return None;
        }
        self.npcs.push(npc);
        let id = self.slots.insert(index);
        self.handles.push(id);
        Some(id)
    }

    /// Handle of the NPC in a slot
    pub fn id_at(&self, index: usize) -> Option<NpcId> {
        self.handles.get(index).copied()
    }

    /// Slot currently holding `id`
    pub fn index_of(&self, id: NpcId) -> Option<usize> {
        self.slots.get(id).copied()
    }

    pub fn is_live(&self, id: NpcId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        let index = self.index_of(id)?;
        self.npcs.get(index)
    }

    pub fn get_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        let index = self.index_of(id)?;
        self.npcs.get_mut(index)
    }

    /// Remove an NPC; the last slot moves into its place.
    /// Returns the NPC and the handle of the one that moved, if any.
    pub fn remove(&mut self, id: NpcId) -> Option<(Npc, Option<NpcId>)> {
        let index = self.slots.remove(id)?;
        let removed = self.npcs.swap_remove(index);
        let removed_handle = self.handles.swap_remove(index);
        debug_assert_eq!(removed_handle, id);

        let moved = self.handles.get(index).copied();
        if let Some(slot) = moved.and_then(|m| self.slots.get_mut(m)) {
            *slot = index;
        }
        Some((removed, moved))
    }

    /// Handles of all live slots in ascending order
    pub fn ids(&self) -> impl Iterator<Item = NpcId> + '_ {
        self.handles.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NpcId, &Npc)> + '_ {
        self.ids().zip(self.npcs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_until_full() {
        let mut table = NpcTable::with_capacity(2);
        assert!(table.spawn(Npc::new(NpcType::Walker)).is_some());
        assert!(table.spawn(Npc::new(NpcType::Walker)).is_some());
        assert!(table.spawn(Npc::new(NpcType::Walker)).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_remove_swaps_last_into_hole() {
        let mut table = NpcTable::with_capacity(10);
        let a = table.spawn(Npc::new(NpcType::Walker)).unwrap();
        let b = table.spawn(Npc::new(NpcType::Bomb)).unwrap();
        let c = table.spawn(Npc::new(NpcType::Bullet)).unwrap();

        let (removed, moved) = table.remove(a).unwrap();
        assert_eq!(removed.kind, NpcType::Walker);
        assert_eq!(moved, Some(c));

        assert!(table.get(a).is_none());
        assert_eq!(table.index_of(c), Some(0));
        assert_eq!(table.index_of(b), Some(1));
        assert_eq!(table.get(c).unwrap().kind, NpcType::Bullet);
        assert_eq!(table.ids().collect::<Vec<_>>(), vec![c, b]);

        // Reusing the freed key slot must not revive the old handle
        let d = table.spawn(Npc::new(NpcType::Walker)).unwrap();
        assert_ne!(d, a);
        assert!(table.get(a).is_none());
        assert_eq!(table.index_of(d), Some(2));
    }

    #[test]
    fn test_remove_last_slot() {
        let mut table = NpcTable::with_capacity(10);
        let a = table.spawn(Npc::new(NpcType::Walker)).unwrap();
        let (_, moved) = table.remove(a).unwrap();
        assert!(moved.is_none());
        assert!(table.is_empty());
        assert!(table.remove(a).is_none());
    }

    #[test]
    fn test_counters_zero_when_normal() {
        assert_eq!(NpcEffect::Normal.counters(), (0, 0));
        assert_eq!(NpcEffect::Waiting { remaining: 3 }.counters(), (3, 0));
    }
}
