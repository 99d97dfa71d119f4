use super::{Search, Step, found};
use crate::maze::{Coord, Grid};

/// Depth-first search with an explicit stack.
///
/// Neighbors are pushed in the order up, down, left, right, so the last one pushed is
/// expanded first. A cell keeps the parent that first discovered it.
pub struct DepthFirst {
    stack: Vec<Coord>,
    end: Coord,
}

impl DepthFirst {
    pub fn new(grid: &mut Grid, start: Coord, end: Coord) -> Self {
        grid.mark_frontier(start);
        Self {
            stack: vec![start],
            end,
        }
    }
}

impl Search for DepthFirst {
    fn step(&mut self, grid: &mut Grid) -> Step {
        // A cell can sit on the stack several times; skip the copies already expanded
        let current = loop {
            match self.stack.pop() {
                Some(coord) if grid[coord].visited => continue,
                Some(coord) => break coord,
                None => return Step::Exhausted,
            }
        };

        grid.mark_visited(current);
        if current == self.end {
            return found(grid, current);
        }

        let parent = grid.index_of(current);
        let neighbors = grid.open_neighbors(current).collect::<Vec<_>>();
        for neighbor in neighbors {
            if grid[neighbor].visited {
                continue;
            }
            let cell = grid.cell_mut(neighbor);
            if cell.parent.is_none() {
                cell.parent = Some(parent);
            }
            grid.mark_frontier(neighbor);
            self.stack.push(neighbor);
        }
        Step::Visited(current)
    }
}
