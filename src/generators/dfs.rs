use rand::{rngs::StdRng, seq::SliceRandom};

use super::{PASSAGE_STEPS, carve_between, passage_step, random_passage_cell};
use crate::maze::{Coord, Grid};

/// One level of the depth-first walk: a cell and its directions in shuffled order.
struct Frame {
    cell: Coord,
    steps: [(isize, isize); 4],
    next: usize,
}

impl Frame {
    fn new(cell: Coord, rng: &mut StdRng) -> Self {
        let mut steps = PASSAGE_STEPS;
        steps.shuffle(rng);
        Frame {
            cell,
            steps,
            next: 0,
        }
    }
}

/// Randomized depth-first carving.
///
/// Each cell shuffles its four directions once and tries them in that order,
/// descending into every neighbor that is still uncarved. The explicit stack of
/// frames walks cells in the same order a recursive carve would, without the
/// call-stack depth.
pub fn randomized_dfs(grid: &mut Grid, rng: &mut StdRng) {
    let mut carved = vec![false; grid.len()];

    let start = random_passage_cell(grid, rng);
    grid.set_wall(start, false);
    carved[grid.index_of(start)] = true;

    let mut stack = vec![Frame::new(start, rng)];

    while let Some(frame) = stack.last_mut() {
        let Some(&step) = frame.steps.get(frame.next) else {
            // All four directions tried, return to the previous cell
            stack.pop();
            continue;
        };
        frame.next += 1;
        let cell = frame.cell;

        let Some(neighbor) = passage_step(grid, cell, step) else {
            continue;
        };
        let idx = grid.index_of(neighbor);
        if carved[idx] {
            continue;
        }

        carve_between(grid, cell, neighbor);
        carved[idx] = true;
        stack.push(Frame::new(neighbor, rng));
    }
}
