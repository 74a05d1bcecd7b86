//! Player records and per-tick control snapshot

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::npc::NpcId;
use super::physics::MazeStatus;
use crate::num::Num;

/// Player handle (slot in the player table; players are never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl PlayerId {
    /// 1-based number used by legacy counters
    pub fn number(self) -> i32 {
        self.0 as i32 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    Mario = 1,
    Luigi = 2,
    Peach = 3,
    Toad = 4,
    Link = 5,
}

impl Character {
    pub fn number(self) -> i32 {
        self as i32
    }

    pub(crate) fn table_index(self) -> usize {
        self as usize - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    Small = 1,
    Big = 2,
    Fire = 3,
    Leaf = 4,
    Tanooki = 5,
    Hammer = 6,
    Ice = 7,
    Polar = 8,
}

impl PowerState {
    pub(crate) fn table_index(self) -> usize {
        self as usize - 1
    }

    pub fn throws_ice(self) -> bool {
        matches!(self, PowerState::Ice | PowerState::Polar)
    }
}

/// Ridden mount; ordering matters (`mount <= Boot` checks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mount {
    #[default]
    None = 0,
    Boot = 1,
    Clown = 2,
    Pet = 3,
}

/// Pet colour with the ground-pound ability
pub const POUND_PET_TYPE: u8 = 6;

/// Player-level transition requested by action logic, applied elsewhere
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEffect {
    #[default]
    Normal,
    /// Toggle petrification
    Stone,
}

/// Control snapshot for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub alt_jump: bool,
    pub run: bool,
    pub alt_run: bool,
}

/// A player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub location: Location,
    /// -1 left, +1 right
    pub direction: i32,
    pub character: Character,
    pub state: PowerState,
    pub mount: Mount,
    pub mount_type: u8,
    pub controls: Controls,
    pub effect: PlayerEffect,
    pub dead: bool,
    pub time_to_live: i32,
    pub section: usize,
    /// Top edge of this player's viewport in level coordinates
    pub view_top: Num,

    // release latches: set while the key is up, consumed by actions
    pub run_release: bool,
    pub alt_run_release: bool,
    pub duck_release: bool,

    pub fire_ball_cd: i32,
    pub fire_ball_cd2: i32,

    pub ground_pound: bool,
    /// Rebound pending
    pub ground_pound2: bool,
    pub can_pound: bool,

    pub can_jump: bool,
    /// Remaining jump boost ticks
    pub jump: i32,
    pub can_fly: bool,
    pub can_fly2: bool,
    pub fly_count: i32,

    pub standing_on_npc: Option<NpcId>,
    pub slope: i32,
    pub duck: bool,
    pub slide: bool,
    pub vine: i32,
    pub spin_jump: bool,
    pub spin_fire_dir: i32,
    pub slippy: bool,
    pub aquatic_swim: bool,
    pub swim_count: i32,
    pub fairy: bool,

    pub bombs: i32,
    pub sword_poke: i32,
    pub tail_count: i32,
    pub frame: i32,
    pub frame_count: i32,

    pub stoned: bool,
    pub stoned_cd: i32,
    pub stoned_time: i32,
    pub immune: i32,
    /// Blink phase while immune
    pub immune2: bool,

    /// 1-based maze zone the player is inside (0 = none)
    pub cur_maze_zone: usize,
    pub maze_zone_status: MazeStatus,

    /// NPC inside the pet's mouth
    pub pet_mouth: Option<NpcId>,
}

impl Player {
    pub fn new(character: Character, location: Location) -> Self {
        Self {
            location,
            direction: 1,
            character,
            state: PowerState::Big,
            mount: Mount::None,
            mount_type: 0,
            controls: Controls::default(),
            effect: PlayerEffect::Normal,
            dead: false,
            time_to_live: 0,
            section: 0,
            view_top: Num::MIN,
            run_release: false,
            alt_run_release: false,
            duck_release: false,
            fire_ball_cd: 0,
            fire_ball_cd2: 0,
            ground_pound: false,
            ground_pound2: false,
            can_pound: false,
            can_jump: false,
            jump: 0,
            can_fly: false,
            can_fly2: false,
            fly_count: 0,
            standing_on_npc: None,
            slope: 0,
            duck: false,
            slide: false,
            vine: 0,
            spin_jump: false,
            spin_fire_dir: 0,
            slippy: false,
            aquatic_swim: false,
            swim_count: 0,
            fairy: false,
            bombs: 0,
            sword_poke: 0,
            tail_count: 0,
            frame: 1,
            frame_count: 0,
            stoned: false,
            stoned_cd: 0,
            stoned_time: 0,
            immune: 0,
            immune2: false,
            cur_maze_zone: 0,
            maze_zone_status: MazeStatus::default(),
            pet_mouth: None,
        }
    }

    /// Alive, not in a transition effect
    pub fn is_normal(&self) -> bool {
        !self.dead && self.time_to_live == 0 && self.effect == PlayerEffect::Normal
    }

    /// Targetable by NPCs
    pub fn is_alive(&self) -> bool {
        !self.dead && self.time_to_live == 0
    }

    pub fn in_air(&self) -> bool {
        !self.location.speed_y.is_zero() && self.slope == 0 && self.standing_on_npc.is_none()
    }

    /// Refresh release latches from the current controls.
    /// Runs after the player's actions so the next tick sees press edges.
    pub fn latch_releases(&mut self) {
        self.run_release = !self.controls.run;
        self.alt_run_release = !self.controls.alt_run;
        self.duck_release = !self.controls.down;
    }
}
