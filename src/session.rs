use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
    time::Duration,
};

use crate::{
    animation::{self, UpdateSink},
    error::MazeError,
    generators::{Generator, ensure_path, generate_maze},
    maze::{Coord, Grid},
    solvers::{SolveReport, Solver, solve_maze},
};

/// Step the speed changes by on [`Session::speed_up`] and [`Session::slow_down`].
const SPEED_STEP: u8 = 10;

/// Drawing tool applied to a cell by [`Session::apply_tool`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Wall,
    Erase,
    Start,
    End,
}

/// State shared between the caller, the running solve, and any input handler.
///
/// Clones share the solving flag and the animation speed, so another thread holding
/// a clone can cancel a solve or change its pace while it runs.
#[derive(Debug, Clone)]
pub struct Session {
    solving: Arc<AtomicBool>,
    speed: Arc<AtomicU8>,
    tool: Tool,
    headless: bool,
    max_wall_follower_steps: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            solving: Arc::new(AtomicBool::new(false)),
            speed: Arc::new(AtomicU8::new(animation::DEFAULT_SPEED)),
            tool: Tool::default(),
            headless: false,
            max_wall_follower_steps: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that never waits between steps, for tests and profiling.
    pub fn headless() -> Self {
        Self {
            headless: true,
            ..Self::default()
        }
    }

    pub fn with_speed(self, speed: u8) -> Self {
        self.set_speed(speed);
        self
    }

    /// Caps the number of moves the wall follower may make before giving up.
    pub fn with_max_wall_follower_steps(mut self, steps: usize) -> Self {
        self.max_wall_follower_steps = Some(steps);
        self
    }

    /// Move cap for the wall follower on `grid`, four moves per cell unless set.
    pub fn wall_follower_step_cap(&self, grid: &Grid) -> usize {
        self.max_wall_follower_steps
            .unwrap_or_else(|| grid.len().saturating_mul(4))
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::Relaxed)
    }

    /// Asks a running solve to stop before its next step.
    pub fn stop_solving(&self) {
        if self.solving.swap(false, Ordering::Relaxed) {
            tracing::info!("Solve cancellation requested");
        }
    }

    /// Raises the solving flag. Fails if a solve is already running.
    pub(crate) fn begin_solving(&self) -> Result<(), MazeError> {
        self.solving
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .map(|_| ())
            .map_err(|_| MazeError::Busy)
    }

    pub(crate) fn finish_solving(&self) {
        self.solving.store(false, Ordering::Relaxed);
    }

    pub fn speed(&self) -> u8 {
        self.speed.load(Ordering::Relaxed)
    }

    pub fn set_speed(&self, speed: u8) {
        let speed = speed.clamp(animation::MIN_SPEED, animation::MAX_SPEED);
        self.speed.store(speed, Ordering::Relaxed);
    }

    pub fn speed_up(&self) {
        self.set_speed(self.speed().saturating_add(SPEED_STEP));
    }

    pub fn slow_down(&self) {
        self.set_speed(self.speed().saturating_sub(SPEED_STEP));
    }

    /// Time to wait after each solver step, `None` when headless.
    pub fn step_delay(&self) -> Option<Duration> {
        (!self.headless).then(|| animation::step_delay(self.speed()))
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Applies the current drawing tool to a cell.
    /// Editing is refused while a solve is running.
    pub fn apply_tool(&self, grid: &mut Grid, coord: Coord) -> Result<(), MazeError> {
        if self.is_solving() {
            return Err(MazeError::Busy);
        }
        match self.tool {
            Tool::Wall => grid.set_wall(coord, true),
            Tool::Erase => grid.set_wall(coord, false),
            Tool::Start => grid.set_start(coord),
            Tool::End => grid.set_end(coord),
        }
        Ok(())
    }

    /// Generates a maze in place and guarantees the end is reachable, carving the
    /// fallback corridor when it is not. Returns whether the corridor was needed.
    pub fn generate(
        &self,
        grid: &mut Grid,
        generator: Generator,
        seed: Option<u64>,
    ) -> Result<bool, MazeError> {
        if self.is_solving() {
            return Err(MazeError::Busy);
        }
        generate_maze(grid, generator, seed);
        Ok(ensure_path(grid))
    }

    /// Solves the maze, reporting each step to `sink`. See [`solve_maze`].
    pub fn solve<S: UpdateSink>(
        &self,
        grid: &mut Grid,
        solver: Solver,
        sink: &mut S,
    ) -> Result<SolveReport, MazeError> {
        solve_maze(grid, solver, self, sink)
    }
}
