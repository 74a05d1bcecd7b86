//! Axis-aligned rectangles with velocity

use serde::{Deserialize, Serialize};

use crate::num::Num;

/// Position, size and speed of an entity (level coordinates, y grows down)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: Num,
    pub y: Num,
    pub width: Num,
    pub height: Num,
    pub speed_x: Num,
    pub speed_y: Num,
}

impl Location {
    pub fn new(x: impl Into<Num>, y: impl Into<Num>, width: impl Into<Num>, height: impl Into<Num>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            width: width.into(),
            height: height.into(),
            speed_x: Num::ZERO,
            speed_y: Num::ZERO,
        }
    }

    pub fn right(&self) -> Num {
        self.x + self.width
    }

    pub fn bottom(&self) -> Num {
        self.y + self.height
    }

    pub fn center_x(&self) -> Num {
        self.x + self.width / 2
    }

    pub fn center_y(&self) -> Num {
        self.y + self.height / 2
    }

    /// Resize vertically while keeping the bottom edge in place
    pub fn set_height_keep_bottom(&mut self, height: Num) {
        let bottom = self.bottom();
        self.height = height;
        self.y = bottom - height;
    }

    /// Whether a point lies inside (edges inclusive on the top-left only)
    pub fn contains_point(&self, x: Num, y: Num) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Strict overlap test; touching edges do not collide
pub fn check_collision(a: &Location, b: &Location) -> bool {
    a.y + a.height > b.y && a.y < b.y + b.height && a.x < b.x + b.width && a.x + a.width > b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touching() {
        let a = Location::new(0, 0, 32, 32);
        let b = Location::new(16, 16, 32, 32);
        let c = Location::new(32, 0, 32, 32);
        assert!(check_collision(&a, &b));
        assert!(!check_collision(&a, &c));
    }

    #[test]
    fn test_set_height_keep_bottom() {
        let mut loc = Location::new(0, 100, 32, 10);
        loc.set_height_keep_bottom(Num::from_int(32));
        assert_eq!(loc.bottom(), 110);
        assert_eq!(loc.y, 78);
    }

    #[test]
    fn test_contains_point() {
        let loc = Location::new(10, 10, 20, 20);
        assert!(loc.contains_point(Num::from_int(10), Num::from_int(29)));
        assert!(!loc.contains_point(Num::from_int(30), Num::from_int(15)));
    }
}
