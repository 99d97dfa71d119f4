use rand::{rngs::StdRng, seq::SliceRandom};

use super::{disjoint_set::DisjointSet, wall_between};
use crate::maze::{Coord, Grid};

/// Wall edge between two adjacent passage cells
#[derive(Clone, Copy)]
struct Edge {
    cell1: Coord,
    cell2: Coord,
}

/// Index of an odd-coordinate cell among the passage cells, row-major.
fn passage_index(grid: &Grid, cell: Coord) -> usize {
    (cell.0 / 2) * (grid.cols() / 2) + cell.1 / 2
}

/// Randomized Kruskal's algorithm.
///
/// Every passage cell starts in its own set. Walls between neighboring passage
/// cells are visited in random order and removed only when they join two
/// different sets, so no loop is ever closed.
pub fn randomized_kruskal(grid: &mut Grid, rng: &mut StdRng) {
    let rows = grid.rows();
    let cols = grid.cols();

    let passages = (1..rows)
        .step_by(2)
        .flat_map(|row| (1..cols).step_by(2).map(move |col| (row, col)))
        .collect::<Vec<_>>();
    passages.iter().for_each(|&cell| grid.set_wall(cell, false));

    let mut sets = DisjointSet::new((rows / 2) * (cols / 2));

    // Collect all walls to the right of and below each passage cell
    let mut edges: Vec<Edge> = passages
        .iter()
        .flat_map(|&(row, col)| {
            [
                (col + 2 < cols).then(|| Edge {
                    cell1: (row, col),
                    cell2: (row, col + 2),
                }),
                (row + 2 < rows).then(|| Edge {
                    cell1: (row, col),
                    cell2: (row + 2, col),
                }),
            ]
        })
        .flatten()
        .collect();

    // Shuffle edges randomly
    edges.shuffle(rng);

    for edge in edges {
        let idx1 = passage_index(grid, edge.cell1);
        let idx2 = passage_index(grid, edge.cell2);

        // If cells are not yet connected, remove the wall between them
        if sets.union(idx1, idx2) {
            grid.set_wall(wall_between(edge.cell1, edge.cell2), false);
        }
    }
}
