//! Static per-type NPC data
//!
//! Lookup is always explicit: read `npc.kind`, then index the table.

use serde::{Deserialize, Serialize};

use crate::num::Num;

/// NPC types the simulation core gives special treatment to.
/// Anything else is `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NpcType {
    Generic,
    Walker,
    /// Super leaf
    LeafPower,
    /// Mushroom (SMB3)
    PowerS3,
    /// 1-up (SMB3)
    LifeS3,
    Poison,
    /// Mushroom (SMB1)
    PowerS1,
    /// Mushroom (SMW)
    PowerS4,
    /// 1-up (SMB1)
    LifeS1,
    /// 1-up (SMW)
    LifeS4,
    BruteSquished,
    BigGuy,
    /// Item buried in the ground
    ItemBuried,
    /// Vertical platform (SMB1)
    PlatformS1,
    /// Case around an encased boss
    BossCase,
    Bullet,
    PlrFireball,
    PlrIceball,
    Swordbeam,
    /// Hammer
    PlrHeavy,
    /// Peach's vegetable
    Char3Heavy,
    /// Toad's boomerang
    Char4Heavy,
    Bomb,
}

/// Number of [`NpcType`] variants
pub const TYPE_COUNT: usize = 23;

impl NpcType {
    pub const ALL: [NpcType; TYPE_COUNT] = [
        NpcType::Generic,
        NpcType::Walker,
        NpcType::LeafPower,
        NpcType::PowerS3,
        NpcType::LifeS3,
        NpcType::Poison,
        NpcType::PowerS1,
        NpcType::PowerS4,
        NpcType::LifeS1,
        NpcType::LifeS4,
        NpcType::BruteSquished,
        NpcType::BigGuy,
        NpcType::ItemBuried,
        NpcType::PlatformS1,
        NpcType::BossCase,
        NpcType::Bullet,
        NpcType::PlrFireball,
        NpcType::PlrIceball,
        NpcType::Swordbeam,
        NpcType::PlrHeavy,
        NpcType::Char3Heavy,
        NpcType::Char4Heavy,
        NpcType::Bomb,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Power-ups and brutes that walk out of warps at mushroom speed
    pub fn warps_at_mushroom_speed(self) -> bool {
        matches!(
            self,
            NpcType::PowerS3
                | NpcType::LifeS3
                | NpcType::Poison
                | NpcType::PowerS1
                | NpcType::PowerS4
                | NpcType::LifeS1
                | NpcType::LifeS4
                | NpcType::BruteSquished
                | NpcType::BigGuy
        )
    }

    pub fn is_player_ball(self) -> bool {
        matches!(self, NpcType::PlrFireball | NpcType::PlrIceball)
    }
}

/// Static traits of one NPC type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpcTraits {
    pub width: Num,
    pub height: Num,
    /// Graphic height when it differs from the hitbox (0 = same)
    pub height_gfx: Num,
    pub can_walk_on: bool,
    pub no_clipping: bool,
}

impl NpcTraits {
    const fn sized(width: i32, height: i32) -> Self {
        Self {
            width: Num::from_int(width),
            height: Num::from_int(height),
            height_gfx: Num::ZERO,
            can_walk_on: false,
            no_clipping: false,
        }
    }

    const fn walk_on(mut self) -> Self {
        self.can_walk_on = true;
        self
    }

    const fn no_clip(mut self) -> Self {
        self.no_clipping = true;
        self
    }
}

/// Immutable, type-indexed trait table
#[derive(Debug, Clone, PartialEq)]
pub struct TraitTable {
    entries: [NpcTraits; TYPE_COUNT],
}

impl Default for TraitTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TraitTable {
    /// Built-in defaults
    pub fn standard() -> Self {
        let entries = NpcType::ALL.map(|kind| match kind {
            NpcType::Generic | NpcType::Walker => NpcTraits::sized(32, 32),
            NpcType::LeafPower => NpcTraits::sized(32, 32),
            NpcType::PowerS3 | NpcType::PowerS1 | NpcType::PowerS4 => NpcTraits::sized(32, 32),
            NpcType::LifeS3 | NpcType::LifeS1 | NpcType::LifeS4 => NpcTraits::sized(32, 32),
            NpcType::Poison => NpcTraits::sized(32, 32),
            NpcType::BruteSquished => NpcTraits::sized(32, 32),
            NpcType::BigGuy => NpcTraits::sized(48, 64),
            NpcType::ItemBuried => NpcTraits::sized(32, 32),
            NpcType::PlatformS1 => NpcTraits::sized(96, 16).walk_on().no_clip(),
            NpcType::BossCase => NpcTraits::sized(64, 64).walk_on(),
            NpcType::Bullet => NpcTraits::sized(32, 28).no_clip(),
            NpcType::PlrFireball | NpcType::PlrIceball => NpcTraits::sized(16, 16),
            NpcType::Swordbeam => NpcTraits::sized(16, 16).no_clip(),
            NpcType::PlrHeavy => NpcTraits::sized(32, 32),
            NpcType::Char3Heavy => NpcTraits::sized(32, 32),
            NpcType::Char4Heavy => NpcTraits::sized(32, 32).no_clip(),
            NpcType::Bomb => NpcTraits::sized(28, 28),
        });
        Self { entries }
    }

    pub fn get(&self, kind: NpcType) -> &NpcTraits {
        &self.entries[kind.index()]
    }

    /// Copy with one entry replaced
    pub fn with(mut self, kind: NpcType, traits: NpcTraits) -> Self {
        self.entries[kind.index()] = traits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_types_indexed_in_order() {
        for (i, kind) in NpcType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_override_entry() {
        let custom = NpcTraits {
            height_gfx: Num::from_int(48),
            ..*TraitTable::standard().get(NpcType::Walker)
        };
        let table = TraitTable::standard().with(NpcType::Walker, custom);
        assert_eq!(table.get(NpcType::Walker).height_gfx, 48);
        assert_eq!(table.get(NpcType::Generic).height_gfx, Num::ZERO);
    }

    #[test]
    fn test_mushroom_speed_list() {
        assert!(NpcType::BigGuy.warps_at_mushroom_speed());
        assert!(!NpcType::Walker.warps_at_mushroom_speed());
    }
}
