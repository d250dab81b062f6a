use combat_core::{Grid, Point};

fn occupied(width: u32, height: u32, cells: &[(i32, i32, usize)]) -> Grid {
    let mut grid = Grid::new(width, height);
    for &(x, y, player) in cells {
        let index = grid.point_to_index(Point::new(x, y)).expect("in bounds");
        assert!(grid.place(index, player));
    }
    grid
}

#[test]
fn index_and_point_are_a_bijection() {
    for (width, height) in [(1, 1), (3, 7), (10, 10), (16, 2)] {
        let grid = Grid::new(width, height);
        for index in 0..grid.len() {
            let point = grid.index_to_point(index);
            assert!(grid.is_valid_point(point));
            assert_eq!(grid.point_to_index(point), Some(index));
        }
        assert_eq!(grid.point_to_index(Point::new(-1, 0)), None);
        assert_eq!(grid.point_to_index(Point::new(width as i32, 0)), None);
    }
}

#[test]
fn open_grid_moves_cost_manhattan_distance() {
    let grid = occupied(6, 5, &[(2, 2, 0)]);
    let start = grid.point_to_index(Point::new(2, 2)).expect("in bounds");

    for dest in 0..grid.len() {
        let manhattan = grid.move_distance(start, dest);
        assert_eq!(
            grid.is_valid_move(start, dest, manhattan, false),
            Some(manhattan),
            "dest {}",
            grid.index_to_point(dest)
        );
        if manhattan > 0 {
            assert_eq!(grid.is_valid_move(start, dest, manhattan - 1, false), None);
        }
    }
}

#[test]
fn special_movement_ignores_every_blocker() {
    // A full enemy column between start and the right half of the grid.
    let mut cells = vec![(0, 2, 0)];
    cells.extend((0..5).map(|y| (3, y, 1)));
    let grid = occupied(7, 5, &cells);
    let start = grid.point_to_index(Point::new(0, 2)).expect("in bounds");

    for x in 4..7 {
        for y in 0..5 {
            let dest = grid.point_to_index(Point::new(x, y)).expect("in bounds");
            let manhattan = grid.move_distance(start, dest);
            assert_eq!(grid.is_valid_move(start, dest, 20, true), Some(manhattan));
            assert_eq!(grid.is_valid_move(start, dest, 20, false), None);
        }
    }
}

#[test]
fn attacks_beyond_range_are_always_rejected() {
    let grid = occupied(9, 9, &[(4, 4, 0)]);
    let start = grid.point_to_index(Point::new(4, 4)).expect("in bounds");

    for range in [1.0, 2.5, 4.0] {
        for target in 0..grid.len() {
            if target == start {
                continue;
            }
            let far = grid.attack_distance(start, target) > range;
            for special in [false, true] {
                assert_eq!(
                    grid.is_valid_attack(start, &[target], range, special),
                    !far,
                    "target {} range {range}",
                    grid.index_to_point(target)
                );
            }
        }
    }
}

#[test]
fn blocker_toggles_attack_legality() {
    let attacker = Point::new(1, 4);
    let target = Point::new(5, 4);
    let blocker = Point::new(4, 4);

    let open = occupied(8, 8, &[(attacker.x, attacker.y, 0), (target.x, target.y, 1)]);
    let blocked = occupied(
        8,
        8,
        &[
            (attacker.x, attacker.y, 0),
            (target.x, target.y, 1),
            (blocker.x, blocker.y, 1),
        ],
    );

    let start = open.point_to_index(attacker).expect("in bounds");
    let dest = open.point_to_index(target).expect("in bounds");
    assert!(open.is_valid_attack(start, &[dest], 5.0, false));
    assert!(!blocked.is_valid_attack(start, &[dest], 5.0, false));
}
