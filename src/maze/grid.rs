use std::collections::VecDeque;

use super::cell::{Cell, Role};

/// Grid coordinate as `(row, col)`.
pub type Coord = (usize, usize);

/// Largest number of cells a grid may hold, 1024x1024.
pub const MAX_CELLS: usize = 1 << 20;

/// Owns every cell of an R×C maze in a flat arena indexed by `row * cols + col`.
///
/// Start and end are kept as coordinates into that arena and are dropped or
/// recomputed whenever the grid is reinitialized or cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Box<[Cell]>,
    rows: usize,
    cols: usize,
    start: Option<Coord>,
    end: Option<Coord>,
}

impl Grid {
    /// Number of cells in a `rows` x `cols` grid, or `None` if it would exceed
    /// [`MAX_CELLS`].
    pub fn cell_count(rows: usize, cols: usize) -> Option<usize> {
        rows.checked_mul(cols).filter(|&count| count <= MAX_CELLS)
    }

    /// Creates a grid of empty cells with the default start and end.
    /// Callers with untrusted dimensions check them with [`Grid::cell_count`] first.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut grid = Grid {
            cells: Box::new([]),
            rows: 0,
            cols: 0,
            start: None,
            end: None,
        };
        grid.initialize(rows, cols);
        grid
    }

    /// Reallocates the grid as `rows` x `cols` empty cells.
    ///
    /// The default start sits at `(1, 1)` and the default end at `(rows - 2, cols - 2)`,
    /// one cell away from the border. Both are clamped into small grids, and the end
    /// is left unset when it would land on the start.
    pub fn initialize(&mut self, rows: usize, cols: usize) {
        self.cells = vec![Cell::EMPTY; rows * cols].into_boxed_slice();
        self.rows = rows;
        self.cols = cols;
        self.start = None;
        self.end = None;

        if self.is_empty() {
            return;
        }
        let start = (1.min(rows - 1), 1.min(cols - 1));
        let end = (rows.saturating_sub(2), cols.saturating_sub(2));
        self.set_start(start);
        if end != start {
            self.set_end(end);
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    /// Flat arena index of an in-bounds coordinate.
    pub fn index_of(&self, coord: Coord) -> usize {
        coord.0 * self.cols + coord.1
    }

    /// Coordinate of a flat arena index.
    pub fn coord_of(&self, index: usize) -> Coord {
        (index / self.cols, index % self.cols)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.is_in_bounds(coord)
            .then(|| &self.cells[self.index_of(coord)])
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let idx = self.index_of(coord);
        &mut self.cells[idx]
    }

    /// Iterates over all cells in row-major order together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.coord_of(i), cell))
    }

    pub fn is_wall(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|cell| cell.is_wall)
    }

    /// Coordinates of every wall cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = Coord> {
        self.iter()
            .filter(|(_, cell)| cell.is_wall)
            .map(|(coord, _)| coord)
    }

    /// Number of cells that are not walls.
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_wall).count()
    }

    /// Sets or clears a wall. Ignored on the start and end cells and out of bounds.
    pub fn set_wall(&mut self, coord: Coord, is_wall: bool) {
        if !self.is_in_bounds(coord) {
            return;
        }
        let cell = self.cell_mut(coord);
        if cell.is_endpoint() {
            return;
        }
        cell.is_wall = is_wall;
    }

    /// Moves the start role to `coord`.
    /// Ignored if the target is out of bounds, a wall, or the end cell.
    pub fn set_start(&mut self, coord: Coord) {
        self.assign_role(coord, Role::Start);
    }

    /// Moves the end role to `coord`.
    /// Ignored if the target is out of bounds, a wall, or the start cell.
    pub fn set_end(&mut self, coord: Coord) {
        self.assign_role(coord, Role::End);
    }

    fn assign_role(&mut self, coord: Coord, role: Role) {
        let Some(target) = self.cell(coord) else {
            return;
        };
        if target.is_wall || (target.is_endpoint() && target.role != role) {
            return;
        }

        let holder = match role {
            Role::Start => &mut self.start,
            Role::End => &mut self.end,
            Role::None => return,
        };
        if let Some(previous) = holder.replace(coord) {
            let idx = previous.0 * self.cols + previous.1;
            self.cells[idx].role = Role::None;
        }
        self.cell_mut(coord).role = role;
    }

    pub fn has_start_and_end(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Get neighbors of a cell.
    /// Orthogonal neighbors come first in the fixed order up, down, left, right,
    /// followed by up-left, up-right, down-left, down-right when diagonals are requested.
    pub fn neighbors(
        &self,
        coord: Coord,
        include_diagonals: bool,
    ) -> impl Iterator<Item = Coord> {
        let neighbors: Vec<Coord> = if self.is_in_bounds(coord) {
            let (r, c) = coord;
            // Wrapping below zero lands on usize::MAX, which the bounds filter drops
            let (up, down) = (r.wrapping_sub(1), r.saturating_add(1));
            let (left, right) = (c.wrapping_sub(1), c.saturating_add(1));
            let mut neighbors = vec![(up, c), (down, c), (r, left), (r, right)];
            if include_diagonals {
                neighbors.extend([(up, left), (up, right), (down, left), (down, right)]);
            }
            neighbors
        } else {
            // No neighbors if the coordinate is out of bounds
            vec![]
        };

        neighbors
            .into_iter()
            .filter(move |&n| self.is_in_bounds(n))
    }

    /// Orthogonal neighbors that are not walls, in the fixed neighbor order.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        self.neighbors(coord, false).filter(move |&n| !self.is_wall(n))
    }

    /// Checks whether the end is reachable from the start through non-wall cells.
    /// Uses its own scratch set, so solver marks on the grid are left untouched.
    pub fn has_valid_path(&self) -> bool {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return false;
        };

        let mut seen = vec![false; self.len()];
        seen[self.index_of(start)] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == end {
                return true;
            }
            for neighbor in self.open_neighbors(current) {
                let idx = self.index_of(neighbor);
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        false
    }

    /// Clears visited, frontier, path, cost and parent fields on every cell.
    /// Walls and start/end are kept.
    pub fn reset_visited(&mut self) {
        self.cells
            .iter_mut()
            .for_each(|cell| cell.reset_search_state());
    }

    /// Full wipe: removes walls, start, end and all solve state.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.start = None;
        self.end = None;
    }

    /// Keeps walls but removes start, end and all solve state.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|cell| {
            cell.reset_search_state();
            cell.role = Role::None;
        });
        self.start = None;
        self.end = None;
    }

    /// Marks a cell as expanded, clearing its frontier mark.
    pub(crate) fn mark_visited(&mut self, coord: Coord) {
        let cell = self.cell_mut(coord);
        cell.visited = true;
        cell.frontier = false;
    }

    /// Marks a cell as discovered, unless it was already expanded.
    pub(crate) fn mark_frontier(&mut self, coord: Coord) {
        let cell = self.cell_mut(coord);
        if !cell.visited {
            cell.frontier = true;
        }
    }

    pub(crate) fn mark_path(&mut self, path: &[Coord]) {
        path.iter()
            .for_each(|&coord| self.cell_mut(coord).in_path = true);
    }

    /// Walks parent links back from `target` to the start and returns the cells
    /// from start to `target` inclusive.
    ///
    /// Returns `None` if the chain stops before reaching the start, or if it runs
    /// longer than the number of cells in the grid (a parent cycle).
    pub fn reconstruct_path(&self, target: Coord) -> Option<Vec<Coord>> {
        let start = self.start?;
        if !self.is_in_bounds(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != start {
            if path.len() > self.len() {
                tracing::warn!("Parent chain from {:?} does not terminate", target);
                return None;
            }
            let parent = self.cells[self.index_of(current)].parent?;
            current = self.coord_of(parent);
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[self.index_of(index)]
    }
}
