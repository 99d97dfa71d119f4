use std::collections::VecDeque;

use super::{Search, Step, found};
use crate::maze::{Coord, Grid};

/// Breadth-first search. Cells are expanded in order of their distance from the
/// start, so the first path to reach the end is a shortest one.
pub struct BreadthFirst {
    queue: VecDeque<Coord>,
    end: Coord,
}

impl BreadthFirst {
    pub fn new(grid: &mut Grid, start: Coord, end: Coord) -> Self {
        grid.cell_mut(start).distance = Some(0);
        grid.mark_frontier(start);
        Self {
            queue: VecDeque::from([start]),
            end,
        }
    }
}

impl Search for BreadthFirst {
    fn step(&mut self, grid: &mut Grid) -> Step {
        let Some(current) = self.queue.pop_front() else {
            return Step::Exhausted;
        };

        grid.mark_visited(current);
        if current == self.end {
            return found(grid, current);
        }

        let parent = grid.index_of(current);
        let depth = grid[current].distance.map_or(1, |d| d + 1);
        let neighbors = grid.open_neighbors(current).collect::<Vec<_>>();
        for neighbor in neighbors {
            // A distance means the cell was already discovered
            if grid[neighbor].distance.is_some() {
                continue;
            }
            let cell = grid.cell_mut(neighbor);
            cell.distance = Some(depth);
            cell.parent = Some(parent);
            grid.mark_frontier(neighbor);
            self.queue.push_back(neighbor);
        }
        Step::Visited(current)
    }
}
