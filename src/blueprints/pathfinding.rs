//! Bounded breadth-first search for room connection tunnels
//!
//! Every step costs the same (one dug cell), so plain BFS gives a shortest
//! path. The search is multi-source (the whole painted region) and
//! multi-goal (anything already on the colony's network), and it stops with
//! an error once it has expanded `max_expansions` cells.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::core::error::PathError;
use crate::core::types::GridPos;
use crate::world::grid::WorldGrid;

/// Find the shortest tunnel from any of `starts` to a cell for which
/// `is_goal` holds, moving 4-way through air or dirt.
///
/// The returned path excludes both the start cell and the goal cell and is
/// ordered from the region outward. An empty path means a start cell already
/// touches the network.
pub fn find_connection_path(
    world: &WorldGrid,
    starts: &[GridPos],
    is_goal: impl Fn(GridPos) -> bool,
    max_expansions: usize,
) -> Result<Vec<GridPos>, PathError> {
    if let Some(&cell) = starts.iter().find(|p| !world.in_bounds(**p)) {
        return Err(PathError::OutOfBounds {
            cell,
            cols: world.cols(),
            rows: world.rows(),
        });
    }

    let start_set: AHashSet<GridPos> = starts.iter().copied().collect();
    let mut came_from: AHashMap<GridPos, GridPos> = AHashMap::new();
    let mut visited: AHashSet<GridPos> = start_set.clone();
    let mut frontier: VecDeque<GridPos> = starts.iter().copied().collect();
    let mut expanded = 0;

    while let Some(current) = frontier.pop_front() {
        expanded += 1;
        if expanded > max_expansions {
            return Err(PathError::Exhausted { cap: max_expansions });
        }

        for neighbor in current.neighbors4() {
            if !world.in_bounds(neighbor) || start_set.contains(&neighbor) {
                continue;
            }
            if is_goal(neighbor) {
                return Ok(reconstruct_path(&came_from, current));
            }
            if visited.contains(&neighbor) {
                continue;
            }
            let routable = world.get(neighbor).is_some_and(|t| t.is_routable());
            if !routable {
                continue;
            }
            visited.insert(neighbor);
            came_from.insert(neighbor, current);
            frontier.push_back(neighbor);
        }
    }

    Err(PathError::Unreachable)
}

/// Walk back from `current` to the start cell (which is not included)
fn reconstruct_path(came_from: &AHashMap<GridPos, GridPos>, mut current: GridPos) -> Vec<GridPos> {
    let mut path = Vec::new();
    while let Some(&prev) = came_from.get(&current) {
        path.push(current);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::terrain::Terrain;

    #[test]
    fn test_straight_tunnel() {
        let world = WorldGrid::new(10, 3, Terrain::Dirt);
        let goal = GridPos::new(6, 1);
        let path =
            find_connection_path(&world, &[GridPos::new(1, 1)], |p| p == goal, 1_000).unwrap();

        assert_eq!(
            path,
            vec![
                GridPos::new(2, 1),
                GridPos::new(3, 1),
                GridPos::new(4, 1),
                GridPos::new(5, 1)
            ]
        );
    }

    #[test]
    fn test_adjacent_region_needs_no_tunnel() {
        let world = WorldGrid::new(5, 5, Terrain::Dirt);
        let goal = GridPos::new(2, 3);
        let path =
            find_connection_path(&world, &[GridPos::new(2, 2)], |p| p == goal, 10).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_routes_around_rock() {
        let mut world = WorldGrid::new(7, 5, Terrain::Dirt);
        for y in 0..4 {
            world.set(GridPos::new(3, y), Terrain::Rock);
        }
        let goal = GridPos::new(5, 0);
        let path =
            find_connection_path(&world, &[GridPos::new(1, 0)], |p| p == goal, 1_000).unwrap();

        assert!(path.iter().all(|p| world.get(*p).unwrap().is_routable()));
        assert!(path.contains(&GridPos::new(3, 4)));
    }

    #[test]
    fn test_walled_off_is_unreachable() {
        let mut world = WorldGrid::new(5, 5, Terrain::Dirt);
        world.place_hardite(GridPos::new(2, 2), 5);
        world.set(GridPos::new(0, 0), Terrain::Dirt);
        let goal = GridPos::new(4, 4);
        let result = find_connection_path(&world, &[GridPos::new(0, 0)], |p| p == goal, 1_000);
        assert_eq!(result, Err(PathError::Unreachable));
    }

    #[test]
    fn test_expansion_cap_is_enforced() {
        let world = WorldGrid::new(60, 60, Terrain::Dirt);
        let goal = GridPos::new(59, 59);
        let result = find_connection_path(&world, &[GridPos::new(0, 0)], |p| p == goal, 50);
        assert_eq!(result, Err(PathError::Exhausted { cap: 50 }));
    }

    #[test]
    fn test_out_of_bounds_start_is_explicit() {
        let world = WorldGrid::new(5, 5, Terrain::Dirt);
        let result = find_connection_path(&world, &[GridPos::new(9, 9)], |_| true, 10);
        assert!(matches!(result, Err(PathError::OutOfBounds { .. })));
    }
}
