use super::{Search, Step, found, priority_queue::PriorityQueue};
use crate::maze::{Coord, Grid};

/// Manhattan distance, admissible for four-way movement with unit cost.
fn heuristic(a: Coord, b: Coord) -> u32 {
    (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}

/// A* search ordered by `g + h`, where `g` is the distance walked from the start
/// and `h` the Manhattan distance to the end.
///
/// When a queued cell is reached more cheaply it is pushed again with the better
/// score; the outdated entry is skipped when it surfaces.
pub struct AStar {
    open_set: PriorityQueue<Coord>,
    end: Coord,
}

impl AStar {
    pub fn new(grid: &mut Grid, start: Coord, end: Coord) -> Self {
        let f_score = heuristic(start, end);
        let cell = grid.cell_mut(start);
        cell.distance = Some(0);
        cell.f_score = Some(f_score);
        grid.mark_frontier(start);

        let mut open_set = PriorityQueue::new();
        open_set.push(start, f_score);
        Self { open_set, end }
    }
}

impl Search for AStar {
    fn step(&mut self, grid: &mut Grid) -> Step {
        // Visited cells form the closed set
        let current = loop {
            match self.open_set.pop() {
                Some((coord, _)) if grid[coord].visited => continue,
                Some((coord, _)) => break coord,
                None => return Step::Exhausted,
            }
        };

        grid.mark_visited(current);
        if current == self.end {
            return found(grid, current);
        }

        let Some(g_score) = grid[current].distance else {
            return Step::Visited(current);
        };
        let tentative = g_score + 1;
        let parent = grid.index_of(current);
        let end = self.end;
        let neighbors = grid.open_neighbors(current).collect::<Vec<_>>();
        for neighbor in neighbors {
            let cell = grid.cell_mut(neighbor);
            if cell.visited || cell.distance.is_some_and(|d| d <= tentative) {
                continue;
            }
            let f_score = tentative + heuristic(neighbor, end);
            cell.distance = Some(tentative);
            cell.f_score = Some(f_score);
            cell.parent = Some(parent);
            grid.mark_frontier(neighbor);
            self.open_set.push(neighbor, f_score);
        }
        Step::Visited(current)
    }
}
