use rand::{Rng, rngs::StdRng};

use super::{passage_neighbors, random_passage_cell, wall_between};
use crate::maze::{Coord, Grid};

/// The two passage cells a wall cell separates.
fn wall_sides(wall: Coord) -> (Coord, Coord) {
    let (row, col) = wall;
    if row % 2 == 1 {
        // Wall between two cells of the same row
        ((row, col - 1), (row, col + 1))
    } else {
        ((row - 1, col), (row + 1, col))
    }
}

/// Adds the walls between `cell` and its uncarved passage neighbors to the frontier.
/// A wall enters the frontier at most once.
fn add_frontier_walls(
    grid: &Grid,
    cell: Coord,
    in_maze: &[bool],
    queued: &mut [bool],
    frontier: &mut Vec<Coord>,
) {
    for neighbor in passage_neighbors(grid, cell) {
        if in_maze[grid.index_of(neighbor)] {
            continue;
        }
        let wall = wall_between(cell, neighbor);
        let idx = grid.index_of(wall);
        if !queued[idx] {
            queued[idx] = true;
            frontier.push(wall);
        }
    }
}

/// Randomized Prim's algorithm.
///
/// Grows the maze from a random cell. The frontier holds walls next to exactly one
/// carved cell; a uniformly random one is taken each round, and if its far side is
/// still uncarved the wall and that cell are opened.
pub fn randomized_prim(grid: &mut Grid, rng: &mut StdRng) {
    let mut in_maze = vec![false; grid.len()];
    let mut queued = vec![false; grid.len()];

    let start = random_passage_cell(grid, rng);
    grid.set_wall(start, false);
    in_maze[grid.index_of(start)] = true;

    let mut frontier = Vec::new();
    add_frontier_walls(grid, start, &in_maze, &mut queued, &mut frontier);

    while !frontier.is_empty() {
        // Randomly select a wall from the frontier
        let wall = frontier.swap_remove(rng.random_range(0..frontier.len()));

        let (a, b) = wall_sides(wall);
        let next = match (in_maze[grid.index_of(a)], in_maze[grid.index_of(b)]) {
            (true, false) => b,
            (false, true) => a,
            // Both sides already joined, opening it would close a loop
            _ => continue,
        };

        grid.set_wall(wall, false);
        grid.set_wall(next, false);
        in_maze[grid.index_of(next)] = true;
        add_frontier_walls(grid, next, &in_maze, &mut queued, &mut frontier);
    }
}
