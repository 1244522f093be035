//! A* pathfinding over a 4-connected tile grid.
//!
//! Callers work in pixel coordinates; tiles only exist inside this module.
//! The returned path excludes the start tile and ends at the goal's tile
//! center.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::shared::TILE_SIZE;

pub type Tile = (i32, i32);

pub fn pixel_to_tile(x: f32, y: f32) -> Tile {
    ((x / TILE_SIZE).floor() as i32, (y / TILE_SIZE).floor() as i32)
}

pub fn tile_center(tile: Tile) -> (f32, f32) {
    (
        tile.0 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        tile.1 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}

fn manhattan(a: Tile, b: Tile) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// A* from one pixel position to another. `passable` filters tiles; pass
/// `None` for an all-walkable grid. Returns pixel waypoints (tile centers)
/// excluding the start tile, or an empty path when the goal is unreachable.
pub fn find_path(
    from: (f32, f32),
    to: (f32, f32),
    width: i32,
    height: i32,
    passable: Option<&dyn Fn(Tile) -> bool>,
) -> Vec<(f32, f32)> {
    let start = pixel_to_tile(from.0, from.1);
    let goal = pixel_to_tile(to.0, to.1);
    if start == goal {
        return Vec::new();
    }

    let in_bounds = |t: Tile| t.0 >= 0 && t.1 >= 0 && t.0 < width && t.1 < height;
    let walkable = |t: Tile| in_bounds(t) && passable.map(|p| p(t)).unwrap_or(true);
    if !in_bounds(start) || !walkable(goal) {
        return Vec::new();
    }

    // Expansion is bounded by the grid area, so the loop always terminates.
    let mut open: BinaryHeap<Reverse<(i32, Tile)>> = BinaryHeap::new();
    let mut came_from: HashMap<Tile, Tile> = HashMap::new();
    let mut g_score: HashMap<Tile, i32> = HashMap::new();

    g_score.insert(start, 0);
    open.push(Reverse((manhattan(start, goal), start)));

    while let Some(Reverse((_, current))) = open.pop() {
        if current == goal {
            let mut path = Vec::new();
            let mut tile = goal;
            while tile != start {
                path.push(tile_center(tile));
                tile = came_from[&tile];
            }
            path.reverse();
            return path;
        }

        let g = g_score[&current];
        let neighbors = [
            (current.0 + 1, current.1),
            (current.0 - 1, current.1),
            (current.0, current.1 + 1),
            (current.0, current.1 - 1),
        ];
        for next in neighbors {
            if !walkable(next) {
                continue;
            }
            let tentative = g + 1;
            if tentative < g_score.get(&next).copied().unwrap_or(i32::MAX) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                open.push(Reverse((tentative + manhattan(next, goal), next)));
            }
        }
    }

    Vec::new()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_tile_conversion() {
        assert_eq!(pixel_to_tile(0.0, 0.0), (0, 0));
        assert_eq!(pixel_to_tile(31.9, 31.9), (0, 0));
        assert_eq!(pixel_to_tile(32.0, 64.0), (1, 2));
        assert_eq!(tile_center((0, 0)), (16.0, 16.0));
        assert_eq!(tile_center((2, 1)), (80.0, 48.0));
    }

    #[test]
    fn test_straight_line_excludes_start() {
        let path = find_path((16.0, 16.0), (112.0, 16.0), 10, 10, None);
        assert_eq!(
            path,
            vec![(48.0, 16.0), (80.0, 16.0), (112.0, 16.0)],
            "three steps east, start tile omitted"
        );
    }

    #[test]
    fn test_same_tile_is_empty() {
        let path = find_path((5.0, 5.0), (20.0, 20.0), 10, 10, None);
        assert!(path.is_empty());
    }

    #[test]
    fn test_manhattan_length_on_open_grid() {
        let path = find_path((16.0, 16.0), (16.0 + 4.0 * 32.0, 16.0 + 3.0 * 32.0), 20, 20, None);
        assert_eq!(path.len(), 7, "4 east + 3 south");
    }

    #[test]
    fn test_routes_around_wall() {
        // Vertical wall at x=2 with a gap at y=4
        let wall = |t: Tile| t.0 != 2 || t.1 == 4;
        let path = find_path(
            tile_center((0, 0)).into(),
            tile_center((4, 0)).into(),
            8,
            8,
            Some(&wall),
        );
        assert!(!path.is_empty());
        assert!(path.contains(&tile_center((2, 4))), "must use the gap");
        // Detour: down to the gap, across, back up
        assert_eq!(path.len(), 4 + 4 + 4);
    }

    #[test]
    fn test_unreachable_goal() {
        // Solid wall at x=2
        let wall = |t: Tile| t.0 != 2;
        let path = find_path(
            tile_center((0, 0)).into(),
            tile_center((4, 0)).into(),
            8,
            8,
            Some(&wall),
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let path = find_path((-50.0, 16.0), (16.0, 16.0), 4, 4, None);
        assert!(path.is_empty());
    }
}
