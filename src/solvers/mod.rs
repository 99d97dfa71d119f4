use std::time::{Duration, Instant};

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
pub mod priority_queue;
mod wall_follower;

use astar::AStar;
use bfs::BreadthFirst;
use dfs::DepthFirst;
use dijkstra::Dijkstra;
use wall_follower::WallFollower;

use crate::{
    animation::{Frame, UpdateSink},
    error::MazeError,
    maze::{Coord, Grid},
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Dfs,
    Bfs,
    Dijkstra,
    AStar,
    WallFollower,
}

impl Solver {
    pub const ALL: [Solver; 5] = [
        Solver::Dfs,
        Solver::Bfs,
        Solver::Dijkstra,
        Solver::AStar,
        Solver::WallFollower,
    ];

    /// The selector name accepted by [`str::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            Solver::Dfs => "dfs",
            Solver::Bfs => "bfs",
            Solver::Dijkstra => "dijkstra",
            Solver::AStar => "astar",
            Solver::WallFollower => "wall-follower",
        }
    }

    /// Whether the solver always reports a shortest path when one exists.
    pub fn finds_shortest_path(&self) -> bool {
        matches!(self, Solver::Bfs | Solver::Dijkstra | Solver::AStar)
    }

    /// Builds the step-by-step search state for this solver.
    /// `grid` must already have its solve state reset.
    pub fn search(
        &self,
        grid: &mut Grid,
        start: Coord,
        end: Coord,
        max_moves: usize,
    ) -> Box<dyn Search> {
        match self {
            Solver::Dfs => Box::new(DepthFirst::new(grid, start, end)),
            Solver::Bfs => Box::new(BreadthFirst::new(grid, start, end)),
            Solver::Dijkstra => Box::new(Dijkstra::new(grid, start, end)),
            Solver::AStar => Box::new(AStar::new(grid, start, end)),
            Solver::WallFollower => Box::new(WallFollower::new(grid, start, end, max_moves)),
        }
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::WallFollower => write!(f, "Wall Follower (right hand)"),
        }
    }
}

impl std::str::FromStr for Solver {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Solver::ALL
            .into_iter()
            .find(|solver| solver.name() == s)
            .ok_or_else(|| MazeError::UnknownSolver(s.to_string()))
    }
}

/// Result of a single search step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A cell was expanded for the first time.
    Visited(Coord),
    /// The search moved or turned without reaching a new cell.
    Moved(Coord),
    /// The end was reached. Holds the path from start to end inclusive.
    Found(Vec<Coord>),
    /// Nothing left to explore, or the move cap ran out.
    Exhausted,
}

/// A search driven one expansion at a time.
///
/// The search keeps its frontier as plain data between calls, so the caller decides
/// when the next step happens.
pub trait Search {
    fn step(&mut self, grid: &mut Grid) -> Step;
}

/// Step for a search that has just expanded `end`: rebuild the path from parent links.
fn found(grid: &Grid, end: Coord) -> Step {
    match grid.reconstruct_path(end) {
        Some(path) => Step::Found(path),
        None => {
            tracing::error!("Reached {:?} but its parent chain does not lead to the start", end);
            Step::Exhausted
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    NoPath,
    Cancelled,
}

/// Final statistics of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub solver: Solver,
    pub outcome: Outcome,
    /// Cells expanded, in the order they were expanded.
    pub visited: Vec<Coord>,
    /// Path from start to end inclusive, if one was found.
    pub path: Option<Vec<Coord>>,
    pub elapsed: Duration,
}

impl SolveReport {
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of moves along the path, zero when no path was found.
    pub fn path_length(&self) -> usize {
        self.path
            .as_ref()
            .map_or(0, |path| path.len().saturating_sub(1))
    }
}

/// Marks the path one cell per frame, waiting half the step delay between cells.
///
/// Stopping the session during the reveal skips the remaining waits and frames, but
/// the whole path is still marked and the last frame always carries all of it.
fn reveal_path<S: UpdateSink + ?Sized>(
    grid: &mut Grid,
    path: &[Coord],
    visited: &[Coord],
    session: &Session,
    sink: &mut S,
) {
    let delay = session.step_delay().map(|delay| delay / 2);
    for shown in 1..=path.len() {
        grid.mark_path(&path[shown - 1..shown]);
        let is_last = shown == path.len();
        if !is_last && !session.is_solving() {
            continue;
        }
        sink.update(Frame {
            grid,
            visited,
            path: Some(&path[..shown]),
        });
        if let (false, Some(delay)) = (is_last, delay) {
            std::thread::sleep(delay);
        }
    }
}

/// Solves the maze with the selected algorithm, one step at a time.
///
/// Before each step the session's solving flag is checked; clearing it from another
/// clone of the session cancels the solve, which then reports the cells visited so
/// far and no path. After each step `sink` receives the current frame and the
/// session's step delay is waited out. Once found, the path is marked on the grid
/// cell by cell, each growing prefix sent to the sink as its own frame.
///
/// Fails without touching the grid if the start or end is missing, or if the
/// session is already running a solve. An unreachable end is reported as
/// [`Outcome::NoPath`], not as an error.
pub fn solve_maze<S: UpdateSink + ?Sized>(
    grid: &mut Grid,
    solver: Solver,
    session: &Session,
    sink: &mut S,
) -> Result<SolveReport, MazeError> {
    let (Some(start), Some(end)) = (grid.start(), grid.end()) else {
        return Err(MazeError::MissingEndpoints);
    };
    session.begin_solving()?;

    tracing::info!("Solving {}x{} maze with {}", grid.rows(), grid.cols(), solver);
    let started = Instant::now();

    grid.reset_visited();
    let max_moves = session.wall_follower_step_cap(grid);
    let mut search = solver.search(grid, start, end, max_moves);
    let mut visited = Vec::new();

    let (outcome, path) = loop {
        if !session.is_solving() {
            break (Outcome::Cancelled, None);
        }

        match search.step(grid) {
            Step::Visited(coord) => visited.push(coord),
            Step::Moved(_) => {}
            Step::Found(path) => {
                visited.push(end);
                reveal_path(grid, &path, &visited, session, sink);
                break (Outcome::Found, Some(path));
            }
            Step::Exhausted => break (Outcome::NoPath, None),
        }

        sink.update(Frame {
            grid,
            visited: &visited,
            path: None,
        });
        if let Some(delay) = session.step_delay() {
            std::thread::sleep(delay);
        }
    };
    session.finish_solving();

    let report = SolveReport {
        solver,
        outcome,
        visited,
        path,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        "{} finished: {:?}, visited {} cells, path length {}, took {:?}",
        solver,
        report.outcome,
        report.visited_count(),
        report.path_length(),
        report.elapsed
    );
    Ok(report)
}
