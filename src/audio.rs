//! Sound identifiers
//!
//! The simulation never mixes audio. It names the effect and hands it to the
//! host together with the emitter's location; playback is fire-and-forget.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Sword beam (Link, hammer state)
    HeroSwordBeam,
    /// Ice rod (Link, ice/polar state)
    HeroIce,
    /// Fire rod (Link, any other state)
    HeroFireRod,
    /// Bomb placed on the ground
    Grab,
    /// Peach picks up her own heavy
    Grab2,
    /// Generic throw
    Throw,
    /// Hammer throw
    Hammer,
    Fireball,
    Iceball,
    /// Raccoon tail swipe
    Whip,
}
