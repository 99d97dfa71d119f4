use rand::{Rng, SeedableRng, rngs::StdRng};

mod backtrack;
mod dfs;
pub mod disjoint_set;
mod kruskal;
mod prim;

use backtrack::iterative_backtrack;
use dfs::randomized_dfs;
use kruskal::randomized_kruskal;
use prim::randomized_prim;

use crate::{
    error::MazeError,
    maze::{Coord, Grid},
};

/// Probability that each direct neighbor of the start and end is opened after carving.
pub const ENDPOINT_OPENING_PROBABILITY: f64 = 0.7;

/// Steps of two cells (up, down, left, right) between passage cells.
const PASSAGE_STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Dfs,
    Prim,
    Kruskal,
    Backtracking,
}

impl Generator {
    pub const ALL: [Generator; 4] = [
        Generator::Dfs,
        Generator::Prim,
        Generator::Kruskal,
        Generator::Backtracking,
    ];

    /// The selector name accepted by [`str::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Dfs => "dfs",
            Generator::Prim => "prim",
            Generator::Kruskal => "kruskal",
            Generator::Backtracking => "backtracking",
        }
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Dfs => write!(f, "Randomized Depth-First Search (DFS)"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
            Generator::Backtracking => write!(f, "Iterative Backtracking"),
        }
    }
}

impl std::str::FromStr for Generator {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Generator::ALL
            .into_iter()
            .find(|generator| generator.name() == s)
            .ok_or_else(|| MazeError::UnknownGenerator(s.to_string()))
    }
}

/// Carves a maze and opens up the cells around the start and end.
///
/// The start and end cells are never walled. With the same seed and grid contents
/// the result is identical.
pub fn generate_maze(grid: &mut Grid, generator: Generator, seed: Option<u64>) {
    let mut rng = get_rng(seed);
    tracing::info!(
        "Generating {}x{} maze with {}",
        grid.rows(),
        grid.cols(),
        generator
    );
    carve_passages(grid, generator, &mut rng);
    open_endpoints(grid, &mut rng, ENDPOINT_OPENING_PROBABILITY);
    tracing::debug!("Maze has {} open cells", grid.open_cell_count());
}

/// Fills the grid with walls, then carves a spanning tree of passages over the
/// odd-coordinate cells.
pub fn carve_passages(grid: &mut Grid, generator: Generator, rng: &mut StdRng) {
    grid.reset_visited();
    fill_walls(grid);
    if grid.rows() < 2 || grid.cols() < 2 {
        return;
    }

    match generator {
        Generator::Dfs => randomized_dfs(grid, rng),
        Generator::Prim => randomized_prim(grid, rng),
        Generator::Kruskal => randomized_kruskal(grid, rng),
        Generator::Backtracking => iterative_backtrack(grid, rng),
    }
}

/// Clears the start and end cells and opens each of their direct neighbors
/// independently with the given probability.
pub fn open_endpoints(grid: &mut Grid, rng: &mut StdRng, probability: f64) {
    for endpoint in [grid.start(), grid.end()].into_iter().flatten() {
        grid.cell_mut(endpoint).is_wall = false;
        let neighbors = grid.neighbors(endpoint, false).collect::<Vec<_>>();
        for neighbor in neighbors {
            if rng.random_bool(probability) {
                grid.set_wall(neighbor, false);
            }
        }
    }
}

/// Clears an L-shaped corridor from the start to the end: along the start's row to
/// the end's column, then along that column to the end's row.
///
/// The corridor may close a loop in a perfect maze.
pub fn carve_fallback_path(grid: &mut Grid) {
    let (Some(start), Some(end)) = (grid.start(), grid.end()) else {
        return;
    };

    let (mut row, mut col) = start;
    while col != end.1 {
        col = if col < end.1 { col + 1 } else { col - 1 };
        grid.set_wall((row, col), false);
    }
    while row != end.0 {
        row = if row < end.0 { row + 1 } else { row - 1 };
        grid.set_wall((row, col), false);
    }
}

/// Carves the fallback corridor if the end is not reachable from the start.
/// Returns whether a corridor was carved.
pub fn ensure_path(grid: &mut Grid) -> bool {
    if !grid.has_start_and_end() || grid.has_valid_path() {
        return false;
    }
    tracing::warn!("Start and end are disconnected, carving a fallback path");
    carve_fallback_path(grid);
    true
}

fn fill_walls(grid: &mut Grid) {
    (0..grid.rows()).for_each(|row| {
        (0..grid.cols()).for_each(|col| grid.set_wall((row, col), true));
    });
}

/// Picks a uniformly random odd-coordinate cell.
fn random_passage_cell(grid: &Grid, rng: &mut StdRng) -> Coord {
    (
        rng.random_range(0..grid.rows() / 2) * 2 + 1,
        rng.random_range(0..grid.cols() / 2) * 2 + 1,
    )
}

/// The in-bounds cell two steps from `coord` in the given direction.
fn passage_step(grid: &Grid, coord: Coord, step: (isize, isize)) -> Option<Coord> {
    let row = coord.0.checked_add_signed(step.0)?;
    let col = coord.1.checked_add_signed(step.1)?;
    grid.is_in_bounds((row, col)).then_some((row, col))
}

/// Passage cells two steps away, in the order up, down, left, right.
fn passage_neighbors(grid: &Grid, coord: Coord) -> impl Iterator<Item = Coord> {
    PASSAGE_STEPS
        .into_iter()
        .filter_map(move |step| passage_step(grid, coord, step))
}

/// The wall cell separating two passage cells two steps apart.
fn wall_between(a: Coord, b: Coord) -> Coord {
    ((a.0 + b.0) / 2, (a.1 + b.1) / 2)
}

/// Opens the wall between `from` and `to`, and `to` itself.
fn carve_between(grid: &mut Grid, from: Coord, to: Coord) {
    grid.set_wall(wall_between(from, to), false);
    grid.set_wall(to, false);
}
