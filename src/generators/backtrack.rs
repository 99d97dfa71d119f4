use rand::{Rng, rngs::StdRng};

use super::{carve_between, passage_neighbors, random_passage_cell};
use crate::maze::Grid;

/// Iterative backtracker.
///
/// Keeps the current carving path on a stack. From the top cell a random uncarved
/// neighbor is chosen and pushed; a dead end pops back to the previous cell.
pub fn iterative_backtrack(grid: &mut Grid, rng: &mut StdRng) {
    let mut carved = vec![false; grid.len()];

    let start = random_passage_cell(grid, rng);
    grid.set_wall(start, false);
    carved[grid.index_of(start)] = true;

    // The stack holds the path carved so far
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let neighbors = passage_neighbors(grid, current)
            .filter(|&n| !carved[grid.index_of(n)])
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            // Dead end, backtrack
            stack.pop();
            continue;
        }

        let next = neighbors[rng.random_range(0..neighbors.len())];
        carve_between(grid, current, next);
        carved[grid.index_of(next)] = true;
        stack.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{fill_walls, get_rng};

    #[test]
    fn test_iterative_backtrack() {
        let mut grid = Grid::new(9, 13);
        let mut rng = get_rng(Some(5));
        fill_walls(&mut grid);
        iterative_backtrack(&mut grid, &mut rng);
        // 4 x 6 passage cells and 23 carved walls
        assert_eq!(grid.open_cell_count(), 24 + 23);
        assert!(grid.has_valid_path());
    }

    #[test]
    fn test_even_dimensions_reach_last_row() {
        let mut grid = Grid::new(6, 6);
        let mut rng = get_rng(Some(9));
        fill_walls(&mut grid);
        iterative_backtrack(&mut grid, &mut rng);
        // Passage cells sit on odd coordinates, including the last row and column
        assert!(!grid.is_wall((5, 5)));
        assert!(!grid.is_wall((1, 5)));
        assert!(grid.is_wall((0, 0)));
    }
}
