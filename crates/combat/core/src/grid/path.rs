//! A* movement search.

use std::collections::HashMap;

use super::{Grid, PriorityQueue};

impl Grid {
    /// Number of single-step moves needed to go from `start` to `dest`, or
    /// `None` when the move is impossible within `moves_allowed` steps.
    ///
    /// Checks run cheapest first: a no-op move costs 0, a Manhattan distance
    /// beyond the allowance fails immediately, the destination must be free
    /// (temporary moves included) and the start must be occupied. Units with
    /// `special` movement skip the search and pay the Manhattan distance.
    /// Otherwise the step count of the path found by A* is returned, which can
    /// exceed the Manhattan distance when units force a detour.
    pub fn is_valid_move(
        &self,
        start: usize,
        dest: usize,
        moves_allowed: u32,
        special: bool,
    ) -> Option<u32> {
        if !self.is_valid_index(start) || !self.is_valid_index(dest) {
            return None;
        }
        if start == dest {
            return Some(0);
        }

        let manhattan = self.move_distance(start, dest);
        if manhattan > moves_allowed {
            return None;
        }
        if self.is_occupied(dest) {
            return None;
        }
        let player = self.player_at(start)?;

        if special {
            return Some(manhattan);
        }

        self.search(start, dest, player, moves_allowed)
    }

    fn search(&self, start: usize, dest: usize, player: usize, moves_allowed: u32) -> Option<u32> {
        let mut frontier = PriorityQueue::new();
        let mut steps: HashMap<usize, u32> = HashMap::new();
        let mut parents: HashMap<usize, usize> = HashMap::new();
        let mut closed = vec![false; self.len()];

        steps.insert(start, 0);
        frontier.insert(i64::from(self.move_distance(start, dest)), start);

        while let Some(current) = frontier.extract_min() {
            if closed[current] {
                continue;
            }
            closed[current] = true;

            if current == dest {
                return Some(self.path_length(&parents, start, dest));
            }

            let taken = steps.get(&current).copied().unwrap_or(0);
            let next_steps = taken + 1;
            if next_steps > moves_allowed {
                continue;
            }

            for neighbour in self.valid_moves(current, player) {
                if closed[neighbour] {
                    continue;
                }
                if steps.get(&neighbour).is_some_and(|&known| known <= next_steps) {
                    continue;
                }
                steps.insert(neighbour, next_steps);
                parents.insert(neighbour, current);
                let estimate = next_steps + self.move_distance(neighbour, dest);
                frontier.insert(i64::from(estimate), neighbour);
            }
        }

        None
    }

    fn path_length(&self, parents: &HashMap<usize, usize>, start: usize, dest: usize) -> u32 {
        let mut length = 0;
        let mut cursor = dest;
        while cursor != start {
            match parents.get(&cursor) {
                Some(&parent) => {
                    cursor = parent;
                    length += 1;
                }
                None => break,
            }
        }
        length
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Grid, Point};

    fn index(grid: &Grid, x: i32, y: i32) -> usize {
        grid.point_to_index(Point::new(x, y)).unwrap()
    }

    #[test]
    fn open_grid_costs_manhattan_distance() {
        let mut grid = Grid::new(8, 8);
        let start = index(&grid, 1, 1);
        grid.place(start, 0);

        for (x, y) in [(1, 1), (5, 1), (1, 6), (7, 7), (0, 0), (3, 4)] {
            let dest = index(&grid, x, y);
            let manhattan = grid.move_distance(start, dest);
            assert_eq!(grid.is_valid_move(start, dest, manhattan, false), Some(manhattan));
            assert_eq!(grid.is_valid_move(start, dest, manhattan + 3, false), Some(manhattan));
        }
    }

    #[test]
    fn fails_fast_beyond_allowance() {
        let mut grid = Grid::new(8, 8);
        let start = index(&grid, 0, 0);
        grid.place(start, 0);
        assert_eq!(grid.is_valid_move(start, index(&grid, 3, 3), 5, false), None);
        assert_eq!(grid.is_valid_move(start, index(&grid, 3, 3), 5, true), None);
    }

    #[test]
    fn requires_free_destination_and_occupied_start() {
        let mut grid = Grid::new(4, 1);
        grid.place(0, 0);
        grid.place(3, 1);
        assert_eq!(grid.is_valid_move(0, 3, 5, false), None);
        assert_eq!(grid.is_valid_move(1, 2, 5, false), None);
        assert_eq!(grid.is_valid_move(1, 1, 5, false), Some(0));
    }

    #[test]
    fn detours_around_enemy_wall() {
        // . . . . .
        // S E E E D
        // . . . . .
        let mut grid = Grid::new(5, 3);
        let start = index(&grid, 0, 1);
        let dest = index(&grid, 4, 1);
        grid.place(start, 0);
        for x in 1..4 {
            grid.place(index(&grid, x, 1), 1);
        }

        assert_eq!(grid.is_valid_move(start, dest, 10, false), Some(6));
        assert_eq!(grid.is_valid_move(start, dest, 5, false), None);
    }

    #[test]
    fn special_movement_ignores_blockers() {
        let mut grid = Grid::new(5, 1);
        grid.place(0, 0);
        for x in 1..4 {
            grid.place(x, 1);
        }
        assert_eq!(grid.is_valid_move(0, 4, 4, false), None);
        assert_eq!(grid.is_valid_move(0, 4, 4, true), Some(4));
    }

    #[test]
    fn enclosed_destination_is_unreachable() {
        let mut grid = Grid::new(3, 3);
        let start = index(&grid, 0, 0);
        grid.place(start, 0);
        // enemy units seal off the bottom-right corner
        grid.place(index(&grid, 2, 1), 1);
        grid.place(index(&grid, 1, 2), 1);
        assert_eq!(grid.is_valid_move(start, index(&grid, 2, 2), 20, false), None);
    }

    #[test]
    fn temporary_moves_free_cells_for_chained_moves() {
        let mut grid = Grid::new(3, 1);
        grid.place(0, 0);
        grid.place(1, 0);

        let mut scope = grid.scoped();
        assert_eq!(scope.is_valid_move(0, 1, 3, false), None);
        assert_eq!(scope.is_valid_move(1, 2, 3, false), Some(1));
        scope.temp_move(1, 2);
        assert_eq!(scope.is_valid_move(0, 1, 3, false), Some(1));
    }

    #[test]
    fn own_units_do_not_block_paths() {
        let mut grid = Grid::new(3, 1);
        grid.place(0, 0);
        grid.place(1, 0);
        assert_eq!(grid.is_valid_move(0, 2, 2, false), Some(2));
    }
}
