//! Platcore - entity simulation core for a 2D platform-game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (NPC effects, player actions, spatial index)
//! - `num`: Fixed-point scalar used for all positions and speeds
//! - `settings`: Data-driven configuration flags and physics constants
//! - `fader`: Screen transition state machine
//! - `audio`: Sound identifiers handed to the host

pub mod audio;
pub mod fader;
pub mod num;
pub mod settings;
pub mod sim;

pub use num::Num;
pub use settings::{ConfigError, Physics, SimConfig};

/// Engine-wide constants
pub mod consts {
    /// Default size of the NPC table
    pub const MAX_NPCS: usize = 5000;
    /// Spawning stops when fewer than this many slots remain
    pub const NPC_HEADROOM: usize = 100;

    /// `time_left` given to freshly spawned projectiles and carried NPCs
    pub const NPC_FRESH_TIME: i32 = 100;

    /// EMERGE_DOWN lasts exactly this many ticks
    pub const EMERGE_DOWN_TICKS: i32 = 32;
    /// Height used after EMERGE_DOWN when the emerge-size fix is off
    pub const EMERGE_DOWN_LEGACY_HEIGHT: i32 = 32;

    /// Bound DROP_ITEM hover duration once the item reaches its target
    pub const DROP_HOVER_TICKS: i32 = 66;
    /// Bound DROP_ITEM hover height above the player's feet
    pub const DROP_HOVER_HEIGHT: i32 = 192;
    /// Free-falling DROP_ITEM animation length
    pub const DROP_FRAME_COUNT: i32 = 4;

    /// Grace counter set on NPCs launched vertically out of a maze zone
    pub const MAZE_LAUNCH_GRACE: i32 = 128;

    /// Ground pound rebound speed
    pub const POUND_REBOUND_SPEED: i32 = -4;

    /// Petrification: blinking starts here
    pub const STONE_BLINK_TICKS: i32 = 180;
    /// Petrification: forced revert here
    pub const STONE_MAX_TICKS: i32 = 240;
    /// Cooldown after a forced revert
    pub const STONE_COOLDOWN: i32 = 60;

    /// Tail swipe animation wraps at this count
    pub const TAIL_SWIPE_LENGTH: i32 = 25;
}
