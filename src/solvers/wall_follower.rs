use super::{Search, Step};
use crate::maze::{Coord, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    fn turn_left(self) -> Self {
        self.turn_right().turn_right().turn_right()
    }

    fn reverse(self) -> Self {
        self.turn_right().turn_right()
    }

    /// The in-bounds cell one step from `coord` in this direction.
    fn step_from(self, grid: &Grid, coord: Coord) -> Option<Coord> {
        let (r, c) = coord;
        let next = match self {
            Direction::Up => (r.checked_sub(1)?, c),
            Direction::Right => (r, c + 1),
            Direction::Down => (r + 1, c),
            Direction::Left => (r, c.checked_sub(1)?),
        };
        grid.is_in_bounds(next).then_some(next)
    }
}

/// Right-hand wall follower.
///
/// Starts facing right. On every move it tries to turn right, then to go straight,
/// then to turn left, and turns around in place at a dead end. The walk gives up
/// after `max_moves` moves, which is how it reports an unreachable end.
///
/// The reported path is the walk with its dead-end detours cut out: stepping back
/// onto a cell already on the trail truncates the trail to that cell.
pub struct WallFollower {
    current: Coord,
    facing: Direction,
    end: Coord,
    trail: Vec<Coord>,
    /// Position of each cell on the trail, indexed like the grid
    trail_index: Vec<Option<usize>>,
    moves: usize,
    max_moves: usize,
    started: bool,
}

impl WallFollower {
    pub fn new(grid: &mut Grid, start: Coord, end: Coord, max_moves: usize) -> Self {
        let mut trail_index = vec![None; grid.len()];
        trail_index[grid.index_of(start)] = Some(0);
        grid.mark_frontier(start);
        Self {
            current: start,
            facing: Direction::Right,
            end,
            trail: vec![start],
            trail_index,
            moves: 0,
            max_moves,
            started: false,
        }
    }

    fn advance(&mut self, grid: &mut Grid, next: Coord) -> Step {
        self.current = next;
        let idx = grid.index_of(next);
        match self.trail_index[idx] {
            Some(position) => {
                for dropped in self.trail.drain(position + 1..) {
                    self.trail_index[grid.index_of(dropped)] = None;
                }
            }
            None => {
                self.trail_index[idx] = Some(self.trail.len());
                self.trail.push(next);
            }
        }

        let first_visit = !grid[next].visited;
        grid.mark_visited(next);
        if next == self.end {
            Step::Found(self.trail.clone())
        } else if first_visit {
            Step::Visited(next)
        } else {
            Step::Moved(next)
        }
    }
}

impl Search for WallFollower {
    fn step(&mut self, grid: &mut Grid) -> Step {
        if !self.started {
            self.started = true;
            grid.mark_visited(self.current);
            return Step::Visited(self.current);
        }
        if self.moves >= self.max_moves {
            tracing::warn!(
                "Wall follower gave up after {} moves at {:?}",
                self.moves,
                self.current
            );
            return Step::Exhausted;
        }
        self.moves += 1;

        let options = [
            self.facing.turn_right(),
            self.facing,
            self.facing.turn_left(),
        ];
        for direction in options {
            let Some(next) = direction.step_from(grid, self.current) else {
                continue;
            };
            if !grid.is_wall(next) {
                self.facing = direction;
                return self.advance(grid, next);
            }
        }

        // Dead end
        self.facing = self.facing.reverse();
        Step::Moved(self.current)
    }
}
