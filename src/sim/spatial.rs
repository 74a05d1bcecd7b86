//! Uniform-grid spatial index
//!
//! Answers "which entries might overlap this region". Results are candidates
//! whose grid cells touch the region; callers confirm with
//! [`check_collision`](super::location::check_collision) because the legacy
//! filtering rules (hidden, invisible, sizable) differ per caller.

use std::collections::{BTreeSet, HashMap};

use super::location::Location;
use crate::num::Num;

/// Edge length of one grid cell in level units
pub const CELL_SIZE: i32 = 128;

/// Result ordering for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Whatever order the index yields; stable for a given index state
    None,
    /// Ascending entry key (table order, the legacy "compat" order)
    Index,
    /// Ascending left edge, then top edge, then key
    Location,
}

type Cell = (i32, i32);

/// Grid index over entries keyed by table slot
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cells: HashMap<Cell, Vec<usize>>,
    entries: HashMap<usize, (Location, Cell, Cell)>,
}

fn cell_of(v: Num) -> i32 {
    v.floor().to_int().div_euclid(CELL_SIZE)
}

fn cell_span(loc: &Location) -> (Cell, Cell) {
    let lo = (cell_of(loc.x), cell_of(loc.y));
    let hi = (cell_of(loc.right()), cell_of(loc.bottom()));
    (lo, hi)
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
    }

    pub fn contains(&self, key: usize) -> bool {
        self.entries.contains_key(&key)
    }

    /// Insert or move an entry
    pub fn update(&mut self, key: usize, loc: &Location) {
        let (lo, hi) = cell_span(loc);
        if let Some((_, old_lo, old_hi)) = self.entries.get(&key).copied() {
            if old_lo == lo && old_hi == hi {
                self.entries.insert(key, (*loc, lo, hi));
                return;
            }
            self.unlink(key, old_lo, old_hi);
        }
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                self.cells.entry((cx, cy)).or_default().push(key);
            }
        }
        self.entries.insert(key, (*loc, lo, hi));
    }

    /// Alias of [`update`](Self::update) for freshly created entries
    pub fn insert(&mut self, key: usize, loc: &Location) {
        self.update(key, loc);
    }

    pub fn remove(&mut self, key: usize) {
        if let Some((_, lo, hi)) = self.entries.remove(&key) {
            self.unlink(key, lo, hi);
        }
    }

    fn unlink(&mut self, key: usize, lo: Cell, hi: Cell) {
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                if let Some(bucket) = self.cells.get_mut(&(cx, cy)) {
                    bucket.retain(|&k| k != key);
                    if bucket.is_empty() {
                        self.cells.remove(&(cx, cy));
                    }
                }
            }
        }
    }

    /// Entries whose cells touch `region`, in the requested order
    pub fn query(&self, region: &Location, sort: SortMode) -> Query {
        let (lo, hi) = cell_span(region);
        let mut seen = BTreeSet::new();
        let mut keys = Vec::new();
        for cy in lo.1..=hi.1 {
            for cx in lo.0..=hi.0 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    for &key in bucket {
                        if seen.insert(key) {
                            keys.push(key);
                        }
                    }
                }
            }
        }

        match sort {
            SortMode::None => {}
            SortMode::Index => keys.sort_unstable(),
            SortMode::Location => keys.sort_by_key(|k| {
                let loc = &self.entries[k].0;
                (loc.x, loc.y, *k)
            }),
        }

        Query {
            keys: keys.into_iter(),
        }
    }
}

/// Lazy, finite, single-pass query result
#[derive(Debug)]
pub struct Query {
    keys: std::vec::IntoIter<usize>,
}

impl Iterator for Query {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl ExactSizeIterator for Query {}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(locs: &[Location]) -> SpatialGrid {
        let mut grid = SpatialGrid::new();
        for (i, loc) in locs.iter().enumerate() {
            grid.insert(i, loc);
        }
        grid
    }

    #[test]
    fn test_query_finds_nearby_only() {
        let grid = grid_with(&[
            Location::new(0, 0, 32, 32),
            Location::new(1000, 1000, 32, 32),
            Location::new(64, 0, 32, 32),
        ]);
        let hits: Vec<_> = grid.query(&Location::new(10, 10, 16, 16), SortMode::Index).collect();
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn test_sort_by_location() {
        let grid = grid_with(&[
            Location::new(96, 0, 32, 32),
            Location::new(0, 32, 32, 32),
            Location::new(0, 0, 32, 32),
        ]);
        let hits: Vec<_> = grid
            .query(&Location::new(0, 0, 127, 127), SortMode::Location)
            .collect();
        assert_eq!(hits, vec![2, 1, 0]);
    }

    #[test]
    fn test_update_moves_entry() {
        let mut grid = grid_with(&[Location::new(0, 0, 32, 32)]);
        grid.update(0, &Location::new(2000, 0, 32, 32));
        assert_eq!(grid.query(&Location::new(0, 0, 32, 32), SortMode::None).count(), 0);
        assert_eq!(grid.query(&Location::new(2000, 0, 32, 32), SortMode::None).count(), 1);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_remove_and_negative_coordinates() {
        let mut grid = grid_with(&[Location::new(-200, -200, 32, 32)]);
        assert_eq!(grid.query(&Location::new(-190, -190, 4, 4), SortMode::None).count(), 1);
        grid.remove(0);
        assert!(grid.is_empty());
        assert_eq!(grid.query(&Location::new(-190, -190, 4, 4), SortMode::None).count(), 0);
    }

    #[test]
    fn test_entry_spanning_cells_reported_once() {
        let grid = grid_with(&[Location::new(100, 100, 300, 300)]);
        let hits: Vec<_> = grid.query(&Location::new(0, 0, 600, 600), SortMode::None).collect();
        assert_eq!(hits, vec![0]);
    }
}
