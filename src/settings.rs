//! Simulation configuration
//!
//! Read-only during ticks. Loaded once from JSON; any field missing from the
//! file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_NPCS, NPC_HEADROOM};
use crate::num::Num;

/// Number of playable characters
pub const CHARACTER_COUNT: usize = 5;
/// Number of power states
pub const POWER_STATE_COUNT: usize = 8;

/// Per-character, per-state table (`[character][state]`)
pub type GrabSpotTable = [[i32; POWER_STATE_COUNT]; CHARACTER_COUNT];

/// Errors from loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("npc_headroom ({headroom}) must be smaller than max_npcs ({max})")]
    Capacity { max: usize, headroom: usize },
}

/// Physics constants shared by NPC and player logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Horizontal warp speed for mushroom-like power-ups
    pub npc_mushroom_speed: Num,
    /// Horizontal warp speed for ordinary walkers
    pub npc_walking_speed: Num,
    /// `time_left` granted to NPCs spawned by the player
    pub npc_time_off_screen: i32,
    /// Horizontal offset of a thrown item from the player's left edge
    pub grab_spot_x: GrabSpotTable,
    /// Vertical offset of a thrown item from the player's top edge
    pub grab_spot_y: GrabSpotTable,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            npc_mushroom_speed: Num::ratio(18, 10),
            npc_walking_speed: Num::ratio(12, 10),
            npc_time_off_screen: 180,
            grab_spot_x: [
                [18, 16, 16, 16, 16, 16, 16, 16],
                [18, 16, 16, 16, 16, 16, 16, 16],
                [18, 18, 18, 18, 18, 18, 18, 18],
                [18, 18, 18, 18, 18, 18, 18, 18],
                [18, 18, 18, 18, 18, 18, 18, 18],
            ],
            grab_spot_y: [
                [-2, 16, 16, 16, 16, 16, 16, 16],
                [-2, 16, 16, 16, 16, 16, 16, 16],
                [-4, 12, 12, 12, 12, 12, 12, 12],
                [-4, 6, 6, 6, 6, 6, 6, 6],
                [0, 10, 10, 10, 10, 10, 10, 10],
            ],
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ground pound is triggered by alt-run instead of down
    pub pound_by_alt_run: bool,
    /// Cheat: faster, unlimited projectile throwing
    pub flamethrower: bool,
    /// EMERGE_DOWN restores the type's own height instead of 32
    pub fix_npc_emerge_size: bool,
    /// Spawned projectiles are drawn as shadows
    pub shadow_mode: bool,
    /// NPC table size
    pub max_npcs: usize,
    /// Spawning stops when this few slots remain
    pub npc_headroom: usize,
    pub physics: Physics,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pound_by_alt_run: false,
            flamethrower: false,
            fix_npc_emerge_size: true,
            shadow_mode: false,
            max_npcs: MAX_NPCS,
            npc_headroom: NPC_HEADROOM,
            physics: Physics::default(),
        }
    }
}

impl SimConfig {
    /// Parse from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.npc_headroom >= self.max_npcs {
            return Err(ConfigError::Capacity {
                max: self.max_npcs,
                headroom: self.npc_headroom,
            });
        }
        Ok(())
    }

    /// Highest live-NPC count at which player spawns are still allowed
    pub fn spawn_limit(&self) -> usize {
        self.max_npcs.saturating_sub(self.npc_headroom)
    }
}
