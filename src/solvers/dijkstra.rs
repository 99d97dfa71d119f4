use super::{Search, Step, found, priority_queue::PriorityQueue};
use crate::maze::{Coord, Grid};

/// Dijkstra's algorithm on a grid with uniform step cost.
pub struct Dijkstra {
    pq: PriorityQueue<Coord>,
    end: Coord,
}

impl Dijkstra {
    pub fn new(grid: &mut Grid, start: Coord, end: Coord) -> Self {
        let mut pq = PriorityQueue::new();
        pq.push(start, 0);
        grid.cell_mut(start).distance = Some(0);
        grid.mark_frontier(start);
        Self { pq, end }
    }
}

impl Search for Dijkstra {
    fn step(&mut self, grid: &mut Grid) -> Step {
        let (current, distance) = loop {
            match self.pq.pop() {
                // Outdated entry for a cell that was already settled at a lower cost
                Some((coord, _)) if grid[coord].visited => continue,
                Some(entry) => break entry,
                None => return Step::Exhausted,
            }
        };

        grid.mark_visited(current);
        if current == self.end {
            return found(grid, current);
        }

        let parent = grid.index_of(current);
        let new_cost = distance + 1; // Uniform cost for each step
        let neighbors = grid.open_neighbors(current).collect::<Vec<_>>();
        for neighbor in neighbors {
            let cell = grid.cell_mut(neighbor);
            if cell.visited || cell.distance.is_some_and(|d| d <= new_cost) {
                continue;
            }
            cell.distance = Some(new_cost);
            cell.parent = Some(parent);
            grid.mark_frontier(neighbor);
            self.pq.push(neighbor, new_cost);
        }
        Step::Visited(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_each_cell_once() {
        let mut grid = Grid::new(4, 4);
        grid.clear();
        grid.set_start((0, 0));
        grid.set_end((3, 3));
        grid.set_wall((1, 1), true);
        grid.set_wall((2, 2), true);
        let mut dijkstra = Dijkstra::new(&mut grid, (0, 0), (3, 3));

        let mut settled = Vec::new();
        let path = loop {
            match dijkstra.step(&mut grid) {
                Step::Visited(coord) => settled.push(coord),
                Step::Found(path) => break path,
                step => panic!("unexpected {:?}", step),
            }
        };
        let mut unique = settled.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), settled.len());
        assert_eq!(path.len(), 7);
        assert_eq!(grid[(3, 3)].distance, Some(6));
    }

    #[test]
    fn test_exhausted_when_unreachable() {
        let mut grid = Grid::new(3, 3);
        grid.clear();
        grid.set_start((0, 0));
        grid.set_end((2, 2));
        grid.set_wall((1, 2), true);
        grid.set_wall((2, 1), true);
        let mut dijkstra = Dijkstra::new(&mut grid, (0, 0), (2, 2));
        let mut count = 0;
        while let Step::Visited(_) = dijkstra.step(&mut grid) {
            count += 1;
        }
        assert_eq!(count, 6);
        assert!(!grid[(2, 2)].visited);
    }
}
