//! Battlefield grid: occupancy, distance math, movement and attack legality.
//!
//! The grid stores which player occupies each cell, never which unit. Unit
//! identity lives in the [`Challenge`](crate::Challenge); the grid only needs
//! ownership to decide blocking and tanking.
//!
//! Occupancy has two layers:
//! - committed `locations`, mutated only when an action is applied
//! - a transient overlay of temporary moves, consulted first by
//!   [`Grid::player_at`] while a batch of moves is being validated
//!
//! The overlay is scoped through [`Grid::scoped`], whose guard clears it on
//! drop so no validation pass can leak temporary state into the next action.

mod attack;
mod path;
mod point;
mod queue;

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::ops::{Deref, DerefMut};

use arrayvec::ArrayVec;

pub use attack::TANK_MARGIN;
pub use point::{Area, Point};
pub use queue::PriorityQueue;

/// Player-ownership map of a rectangular battlefield anchored at (0, 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    locations: Vec<Option<usize>>,
    temp_locations: HashMap<usize, Option<usize>>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            locations: vec![None; cells],
            temp_locations: HashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    // ========================================================================
    // Coordinates
    // ========================================================================

    pub fn index_to_point(&self, index: usize) -> Point {
        let width = (self.width as usize).max(1);
        Point::new((index % width) as i32, (index / width) as i32)
    }

    /// Linear index of `point`, or `None` when it lies outside the grid.
    pub fn point_to_index(&self, point: Point) -> Option<usize> {
        if !self.is_valid_point(point) {
            return None;
        }
        Some(point.y as usize * self.width as usize + point.x as usize)
    }

    /// Bounds check only; occupancy is not considered.
    pub fn is_valid_point(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && i64::from(point.x) < i64::from(self.width)
            && i64::from(point.y) < i64::from(self.height)
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.locations.len()
    }

    // ========================================================================
    // Distance & angle math
    // ========================================================================

    /// Manhattan distance between two cells.
    pub fn move_distance(&self, a: usize, b: usize) -> u32 {
        let (a, b) = (self.index_to_point(a), self.index_to_point(b));
        a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
    }

    /// Euclidean distance between two cell centres.
    pub fn attack_distance(&self, a: usize, b: usize) -> f64 {
        let (a, b) = (self.index_to_point(a), self.index_to_point(b));
        f64::from(a.x - b.x).hypot(f64::from(a.y - b.y))
    }

    /// Bearing from the centre of cell `from` to a continuous point,
    /// normalised to `[0, 2π)`.
    pub fn angle(&self, from: usize, to: (f64, f64)) -> f64 {
        let (cx, cy) = self.index_to_point(from).center();
        (to.1 - cy).atan2(to.0 - cx).rem_euclid(TAU)
    }

    // ========================================================================
    // Occupancy
    // ========================================================================

    /// Player occupying `index`, consulting temporary moves first.
    pub fn player_at(&self, index: usize) -> Option<usize> {
        if let Some(&temp) = self.temp_locations.get(&index) {
            return temp;
        }
        self.locations.get(index).copied().flatten()
    }

    /// Committed occupant, ignoring temporary moves.
    pub fn committed_player_at(&self, index: usize) -> Option<usize> {
        self.locations.get(index).copied().flatten()
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.player_at(index).is_some()
    }

    /// Marks `index` as occupied by `player`. Returns `false` when the cell is
    /// out of bounds or already taken.
    pub fn place(&mut self, index: usize, player: usize) -> bool {
        match self.locations.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(player);
                true
            }
            _ => false,
        }
    }

    /// Frees `index`, returning the previous occupant.
    pub fn vacate(&mut self, index: usize) -> Option<usize> {
        self.locations.get_mut(index).and_then(Option::take)
    }

    /// Commits a move of whatever occupies `start` to `dest`.
    pub fn relocate(&mut self, start: usize, dest: usize) -> bool {
        if start == dest {
            return self.committed_player_at(start).is_some();
        }
        if self.committed_player_at(dest).is_some() {
            return false;
        }
        match self.vacate(start) {
            Some(player) => self.place(dest, player),
            None => false,
        }
    }

    /// Orthogonal neighbours that are in bounds and either empty or held by
    /// `player`.
    ///
    /// Same-player cells are allowed because the occupant may move out of the
    /// way later in the same action; the caller's temporary-move bookkeeping
    /// disambiguates.
    pub fn valid_moves(&self, index: usize, player: usize) -> ArrayVec<usize, 4> {
        let origin = self.index_to_point(index);
        let mut moves = ArrayVec::new();

        for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
            let Some(neighbour) = self.point_to_index(Point::new(origin.x + dx, origin.y + dy))
            else {
                continue;
            };
            match self.player_at(neighbour) {
                None => moves.push(neighbour),
                Some(owner) if owner == player => moves.push(neighbour),
                Some(_) => {}
            }
        }

        moves
    }

    // ========================================================================
    // Temporary moves
    // ========================================================================

    /// Records a tentative move: `start` reads as empty and `dest` as held by
    /// the player who was at `start`.
    pub fn temp_move(&mut self, start: usize, dest: usize) {
        if start == dest {
            return;
        }
        let player = self.player_at(start);
        self.temp_locations.insert(start, None);
        self.temp_locations.insert(dest, player);
    }

    pub fn clear_temp_moves(&mut self) {
        self.temp_locations.clear();
    }

    pub fn has_temp_moves(&self) -> bool {
        !self.temp_locations.is_empty()
    }

    /// Opens a validation scope. Temporary moves made through the returned
    /// guard are discarded when it drops, whatever the outcome.
    pub fn scoped(&mut self) -> TempMoves<'_> {
        TempMoves { grid: self }
    }
}

/// Guard over a [`Grid`] whose temporary-move overlay is cleared on drop.
pub struct TempMoves<'a> {
    grid: &'a mut Grid,
}

impl Deref for TempMoves<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        self.grid
    }
}

impl DerefMut for TempMoves<'_> {
    fn deref_mut(&mut self) -> &mut Grid {
        self.grid
    }
}

impl Drop for TempMoves<'_> {
    fn drop(&mut self) {
        self.grid.clear_temp_moves();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_point_round_trip() {
        let grid = Grid::new(7, 5);
        for index in 0..grid.len() {
            let point = grid.index_to_point(index);
            assert!(grid.is_valid_point(point));
            assert_eq!(grid.point_to_index(point), Some(index));
        }
        assert_eq!(grid.point_to_index(Point::new(-1, 0)), None);
        assert_eq!(grid.point_to_index(Point::new(7, 0)), None);
        assert_eq!(grid.point_to_index(Point::new(0, 5)), None);
    }

    #[test]
    fn distances() {
        let grid = Grid::new(10, 10);
        let a = grid.point_to_index(Point::new(1, 1)).unwrap();
        let b = grid.point_to_index(Point::new(4, 5)).unwrap();
        assert_eq!(grid.move_distance(a, b), 7);
        assert_eq!(grid.attack_distance(a, b), 5.0);
    }

    #[test]
    fn angle_is_normalised() {
        let grid = Grid::new(4, 4);
        let origin = grid.point_to_index(Point::new(1, 1)).unwrap();
        let right = grid.angle(origin, Point::new(2, 1).center());
        let up = grid.angle(origin, Point::new(1, 0).center());
        assert!(right.abs() < 1e-9);
        assert!((up - 3.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn valid_moves_skip_enemies_and_edges() {
        let mut grid = Grid::new(3, 3);
        let corner = grid.point_to_index(Point::new(0, 0)).unwrap();
        let right = grid.point_to_index(Point::new(1, 0)).unwrap();
        let below = grid.point_to_index(Point::new(0, 1)).unwrap();
        grid.place(corner, 0);
        grid.place(right, 1);
        grid.place(below, 0);

        let moves = grid.valid_moves(corner, 0);
        assert_eq!(moves.as_slice(), &[below]);
    }

    #[test]
    fn scoped_overlay_is_cleared_on_drop() {
        let mut grid = Grid::new(3, 1);
        grid.place(0, 0);
        {
            let mut scope = grid.scoped();
            scope.temp_move(0, 2);
            assert_eq!(scope.player_at(0), None);
            assert_eq!(scope.player_at(2), Some(0));
        }
        assert!(!grid.has_temp_moves());
        assert_eq!(grid.player_at(0), Some(0));
        assert_eq!(grid.player_at(2), None);
    }

    #[test]
    fn relocate_rejects_occupied_destination() {
        let mut grid = Grid::new(3, 1);
        grid.place(0, 0);
        grid.place(2, 1);
        assert!(!grid.relocate(0, 2));
        assert!(grid.relocate(0, 1));
        assert_eq!(grid.committed_player_at(0), None);
        assert_eq!(grid.committed_player_at(1), Some(0));
    }
}
