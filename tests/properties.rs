//! Randomized checks of path optimality and neighbor wiring.

use lattice_astar::{AStar, Direction, Grid, GridPolicy, NodeId, SteppedSearch};
use pathfinding::prelude::dijkstra;
use proptest::prelude::*;

fn hops(policy: GridPolicy, size: &[usize], start: &[usize], goal: &[usize]) -> usize {
    let mut search = AStar::new(Grid::new(size, policy).unwrap());
    search.prepare(start, goal).unwrap();
    let hops = search.calculate_all().unwrap().len() - 1;
    assert!(search.is_solvable());
    hops
}

fn deltas(start: &[usize], goal: &[usize]) -> Vec<usize> {
    start.iter().zip(goal).map(|(a, b)| a.abs_diff(*b)).collect()
}

fn plane() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, Vec<usize>)> {
    (1usize..10, 1usize..10).prop_flat_map(|(w, h)| {
        (Just(vec![w, h]), (0..w, 0..h), (0..w, 0..h))
            .prop_map(|(size, s, g)| (size, vec![s.0, s.1], vec![g.0, g.1]))
    })
}

fn cube() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, Vec<usize>)> {
    (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(w, h, d)| {
        (
            Just(vec![w, h, d]),
            (0..w, 0..h, 0..d),
            (0..w, 0..h, 0..d),
        )
            .prop_map(|(size, s, g)| (size, vec![s.0, s.1, s.2], vec![g.0, g.1, g.2]))
    })
}

fn walled_plane() -> impl Strategy<Value = (usize, usize, Vec<bool>, usize, usize)> {
    (2usize..9, 2usize..9).prop_flat_map(|(w, h)| {
        (
            Just(w),
            Just(h),
            prop::collection::vec(prop::bool::weighted(0.3), w * h),
            0..w * h,
            0..w * h,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn orthogonal_plane_paths_take_manhattan_hops((size, start, goal) in plane()) {
        let d = deltas(&start, &goal);
        prop_assert_eq!(hops(GridPolicy::orthogonal_2d(), &size, &start, &goal), d[0] + d[1]);
    }

    #[test]
    fn diagonal_plane_paths_take_chebyshev_hops((size, start, goal) in plane()) {
        let d = deltas(&start, &goal);
        prop_assert_eq!(hops(GridPolicy::diagonal_2d(), &size, &start, &goal), d[0].max(d[1]));
    }

    #[test]
    fn orthogonal_cube_paths_take_manhattan_hops((size, start, goal) in cube()) {
        let d = deltas(&start, &goal);
        prop_assert_eq!(hops(GridPolicy::orthogonal_3d(), &size, &start, &goal), d.iter().sum::<usize>());
    }

    #[test]
    fn diagonal_cube_paths_take_chebyshev_hops((size, start, goal) in cube()) {
        let d = deltas(&start, &goal);
        let expected = d.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(hops(GridPolicy::diagonal_3d(), &size, &start, &goal), expected);
    }

    #[test]
    fn walled_search_agrees_with_dijkstra((w, h, blocked, start, goal) in walled_plane()) {
        let mut grid = Grid::new(&[w, h], GridPolicy::orthogonal_2d()).unwrap();
        for (i, &wall) in blocked.iter().enumerate() {
            grid.set_passable(&[i % w, i / w], !wall).unwrap();
        }
        let mut search = AStar::new(grid);
        search.prepare_flat(start, goal).unwrap();
        let result = search.calculate_all().unwrap().to_vec();

        let grid = search.grid();
        let reference = dijkstra(
            &NodeId(start),
            |&id: &NodeId| {
                grid[id]
                    .linked_neighbors()
                    .filter(|&n| grid[n].is_passable())
                    .map(|n| (n, 1u32))
                    .collect::<Vec<_>>()
            },
            |&id| id == NodeId(goal),
        );

        prop_assert!(!result.is_empty());
        prop_assert_eq!(result.last().copied(), Some(NodeId(start)));
        match reference {
            Some((_, cost)) => {
                prop_assert!(search.is_solvable());
                prop_assert_eq!(result.len() - 1, cost as usize);
                prop_assert_eq!(result[0], NodeId(goal));
            }
            None => {
                prop_assert!(!search.is_solvable());
                prop_assert_eq!(search.path(), None);
            }
        }
        for pair in result.windows(2) {
            prop_assert!(grid[pair[0]].is_passable());
            prop_assert!(grid[pair[1]].linked_neighbors().any(|n| n == pair[0]));
        }
    }

    #[test]
    fn every_diagonal_cube_direction_is_geometric((size, cell, _) in cube()) {
        let grid = Grid::new(&size, GridPolicy::diagonal_3d()).unwrap();
        let id = grid.index(&cell).unwrap();
        let node = &grid[id];
        prop_assert_eq!(node.neighbors().len(), 26);

        let mut seen = Vec::new();
        for direction in Direction::ALL {
            let target: Option<Vec<usize>> = cell
                .iter()
                .zip(direction.offset())
                .zip(&size)
                .map(|((&i, o), &extent)| i.checked_add_signed(o).filter(|&m| m < extent))
                .collect();
            let expected = target.map(|t| grid.index(&t).unwrap());
            prop_assert_eq!(node.neighbor(direction), expected, "{:?}", direction);
            if let Some(n) = expected {
                prop_assert!(n != id);
                prop_assert!(!seen.contains(&n), "{:?} repeats a neighbor", direction);
                seen.push(n);
            }
        }
    }

    #[test]
    fn runs_are_deterministic((size, start, goal) in cube()) {
        let mut grid = Grid::new(&size, GridPolicy::diagonal_3d()).unwrap();
        // wall off the center cell unless it is an endpoint
        let center: Vec<usize> = size.iter().map(|e| e / 2).collect();
        if center != start && center != goal {
            grid.set_passable(&center, false).unwrap();
        }
        let mut search = AStar::new(grid);
        search.prepare(&start, &goal).unwrap();
        let first = search.calculate_all().unwrap().to_vec();
        search.prepare(&start, &goal).unwrap();
        prop_assert_eq!(search.calculate_all().unwrap(), &first[..]);
    }
}
