//! Physics and environment integration
//!
//! Position integration plus the maze-zone corridor stepper used by both NPC
//! effects and thrown projectiles.

use serde::{Deserialize, Serialize};

use super::location::Location;
use crate::num::Num;

/// Corridor travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeDir {
    Up = 0,
    Left = 1,
    Down = 2,
    Right = 3,
}

impl MazeDir {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => MazeDir::Up,
            1 => MazeDir::Left,
            2 => MazeDir::Down,
            _ => MazeDir::Right,
        }
    }

    pub fn reversed(self) -> Self {
        MazeDir::from_bits(self as u8 + 2)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, MazeDir::Up | MazeDir::Down)
    }

    /// Unit step as (dx, dy)
    pub fn delta(self) -> (i32, i32) {
        match self {
            MazeDir::Up => (0, -1),
            MazeDir::Left => (-1, 0),
            MazeDir::Down => (0, 1),
            MazeDir::Right => (1, 0),
        }
    }
}

/// Maze travel status: direction in the low two bits, bit 2 requests a flip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeStatus(u8);

impl MazeStatus {
    pub const FLIP_BIT: u8 = 4;

    pub fn new(dir: MazeDir) -> Self {
        MazeStatus(dir as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn dir(self) -> MazeDir {
        MazeDir::from_bits(self.0)
    }

    pub fn flip_requested(self) -> bool {
        self.0 & Self::FLIP_BIT != 0
    }

    /// Ask the next maze step to reverse direction
    pub fn request_flip(&mut self) {
        self.0 = (self.0 & 3) ^ Self::FLIP_BIT;
    }

    /// Plain direction with no pending flip
    pub fn is(self, dir: MazeDir) -> bool {
        self.0 == dir as u8
    }
}

/// Rectangular region restricting movement to 4-directional corridors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MazeZone {
    pub location: Location,
}

/// 1-based number of the maze zone containing the entity's centre (0 = none)
pub fn maze_zone_at(loc: &Location, zones: &[MazeZone]) -> usize {
    let (cx, cy) = (loc.center_x(), loc.center_y());
    zones
        .iter()
        .position(|z| z.location.contains_point(cx, cy))
        .map_or(0, |i| i + 1)
}

/// Move by the current speed
pub fn integrate(loc: &mut Location) {
    loc.x += loc.speed_x;
    loc.y += loc.speed_y;
}

/// Advance one tick along a maze corridor.
///
/// `zone` is the 1-based zone number and is cleared to 0 once the entity's
/// centre leaves the zone. `blocked` reports whether a rectangle would run
/// into solid terrain; the entity reverses instead of entering it.
pub fn maze_step(
    loc: &mut Location,
    zone: &mut usize,
    status: &mut MazeStatus,
    zones: &[MazeZone],
    speed: Num,
    mut blocked: impl FnMut(&Location) -> bool,
) {
    let Some(bounds) = zone.checked_sub(1).and_then(|i| zones.get(i)) else {
        *zone = 0;
        return;
    };

    let mut dir = status.dir();
    if status.flip_requested() {
        dir = dir.reversed();
    }

    let (dx, dy) = dir.delta();
    loc.speed_x = speed * dx;
    loc.speed_y = speed * dy;

    let mut next = *loc;
    integrate(&mut next);
    if blocked(&next) {
        dir = dir.reversed();
        loc.speed_x = -loc.speed_x;
        loc.speed_y = -loc.speed_y;
    } else {
        *loc = next;
    }
    *status = MazeStatus::new(dir);

    if !bounds.location.contains_point(loc.center_x(), loc.center_y()) {
        *zone = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Vec<MazeZone> {
        vec![MazeZone {
            location: Location::new(0, 0, 320, 32),
        }]
    }

    #[test]
    fn test_status_bits() {
        let mut status = MazeStatus::new(MazeDir::Left);
        assert!(status.is(MazeDir::Left));
        status.request_flip();
        assert_eq!(status.bits(), 1 | MazeStatus::FLIP_BIT);
        assert_eq!(status.dir(), MazeDir::Left);
        assert!(!status.is(MazeDir::Left));
        assert_eq!(MazeDir::Right.reversed(), MazeDir::Left);
        assert_eq!(MazeDir::Down.reversed(), MazeDir::Up);
    }

    #[test]
    fn test_maze_step_moves_and_exits() {
        let zones = corridor();
        let mut loc = Location::new(280, 8, 16, 16);
        let mut zone = 1;
        let mut status = MazeStatus::new(MazeDir::Right);

        maze_step(&mut loc, &mut zone, &mut status, &zones, Num::from_int(4), |_| false);
        assert_eq!(loc.x, 284);
        assert_eq!(loc.speed_x, 4);
        assert_eq!(zone, 1);

        for _ in 0..10 {
            maze_step(&mut loc, &mut zone, &mut status, &zones, Num::from_int(4), |_| false);
        }
        assert_eq!(zone, 0);
    }

    #[test]
    fn test_maze_step_flip_and_wall() {
        let zones = corridor();
        let mut loc = Location::new(100, 8, 16, 16);
        let mut zone = 1;
        let mut status = MazeStatus::new(MazeDir::Right);
        status.request_flip();

        maze_step(&mut loc, &mut zone, &mut status, &zones, Num::from_int(2), |_| false);
        assert_eq!(loc.x, 98);
        assert!(status.is(MazeDir::Left));

        maze_step(&mut loc, &mut zone, &mut status, &zones, Num::from_int(2), |_| true);
        assert_eq!(loc.x, 98);
        assert!(status.is(MazeDir::Right));
    }

    #[test]
    fn test_unknown_zone_clears() {
        let mut loc = Location::new(0, 0, 16, 16);
        let mut zone = 7;
        let mut status = MazeStatus::new(MazeDir::Up);
        maze_step(&mut loc, &mut zone, &mut status, &corridor(), Num::ONE, |_| false);
        assert_eq!(zone, 0);
    }

    #[test]
    fn test_zone_lookup() {
        let zones = corridor();
        assert_eq!(maze_zone_at(&Location::new(10, 4, 8, 8), &zones), 1);
        assert_eq!(maze_zone_at(&Location::new(400, 4, 8, 8), &zones), 0);
    }

    #[test]
    fn test_integrate() {
        let mut loc = Location::new(10, 20, 8, 8);
        loc.speed_x = Num::ratio(3, 2);
        loc.speed_y = Num::from_int(-2);
        integrate(&mut loc);
        integrate(&mut loc);
        assert_eq!(loc.x, 13);
        assert_eq!(loc.y, 16);
        assert_eq!(loc.width, 8);
    }
}
