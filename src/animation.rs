//! Incremental progress reporting for solvers.
//!
//! A solve calls its [`UpdateSink`] once per expansion step, then waits [`step_delay`]
//! before the next step. A found path is revealed one cell per frame at half that delay.

use std::time::Duration;

use crate::maze::{Coord, Grid};

/// Slowest accepted animation speed.
pub const MIN_SPEED: u8 = 1;
/// Fastest accepted animation speed.
pub const MAX_SPEED: u8 = 100;
/// Animation speed a new session starts with.
pub const DEFAULT_SPEED: u8 = 50;

/// One observable state of a running solve.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// The grid, carrying the visited/frontier/path marks of this step.
    pub grid: &'a Grid,
    /// Every cell expanded so far, in expansion order.
    pub visited: &'a [Coord],
    /// The part of the solution path revealed so far, starting at the start cell.
    pub path: Option<&'a [Coord]>,
}

/// Receives solver progress, typically to redraw the maze.
pub trait UpdateSink {
    fn update(&mut self, frame: Frame<'_>);
}

impl<F> UpdateSink for F
where
    F: FnMut(Frame<'_>),
{
    fn update(&mut self, frame: Frame<'_>) {
        self(frame)
    }
}

/// A sink that ignores every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl UpdateSink for NoopSink {
    fn update(&mut self, _frame: Frame<'_>) {}
}

/// Delay between two solver steps for an animation speed.
/// The scale is inverted: speed 100 waits 1 ms, speed 1 waits 100 ms.
pub fn step_delay(speed: u8) -> Duration {
    let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    Duration::from_millis(u64::from(MAX_SPEED - speed) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_delay_is_inverted() {
        assert_eq!(step_delay(100), Duration::from_millis(1));
        assert_eq!(step_delay(50), Duration::from_millis(51));
        assert_eq!(step_delay(1), Duration::from_millis(100));
        assert!(step_delay(80) < step_delay(20));
    }

    #[test]
    fn test_step_delay_clamps() {
        assert_eq!(step_delay(0), step_delay(1));
        assert_eq!(step_delay(255), step_delay(100));
    }

    #[test]
    fn test_closure_sink() {
        let grid = Grid::new(3, 3);
        let mut seen = Vec::new();
        let mut sink = |frame: Frame<'_>| seen.push(frame.visited.len());
        sink.update(Frame {
            grid: &grid,
            visited: &[(1, 1)],
            path: None,
        });
        assert_eq!(seen, vec![1]);
    }
}
