//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity slot)
//! - No rendering, audio or platform dependencies (see [`Host`])

pub mod actions;
pub mod effects;
pub mod holds;
pub mod host;
pub mod location;
pub mod npc;
pub mod physics;
pub mod player;
pub mod spatial;
pub mod tick;
pub mod traits;
pub mod world;

pub use actions::{
    player_char4_heavy_out, player_pound_logic, player_shoot_char5_beam, player_throw_ball, player_throw_bomb,
    player_throw_heavy, player_throw_item_maze, player_thrown_npc_maze_check, power_ups, tanooki,
};
pub use effects::npc_effects;
pub use holds::HoldTable;
pub use host::{Host, NullHost};
pub use location::{Location, check_collision};
pub use npc::{DropItem, LayerId, Npc, NpcEffect, NpcId, NpcTable, WarpDir};
pub use physics::{MazeDir, MazeStatus, MazeZone, maze_step, maze_zone_at};
pub use player::{Character, Controls, Mount, Player, PlayerEffect, PlayerId, PowerState};
pub use spatial::{Query, SortMode, SpatialGrid};
pub use tick::{TickInput, tick};
pub use traits::{NpcTraits, NpcType, TraitTable};
pub use world::{Block, BlockRef, World};
