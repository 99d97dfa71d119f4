use std::time::{Duration, Instant};

use mazeviz::{Generator, Grid, MazeError, Outcome, Session, Solver, animation::NoopSink};
use tracing_subscriber::EnvFilter;

/// Profiling mode: generate and solve repeatedly without drawing or delays.
///
/// Usage: profile [iterations] [rows] [cols]
fn main() -> Result<(), MazeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MAZEVIZ_LOG")
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let rows = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(255);
    let cols = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(rows);

    let session = Session::headless();
    for generator in Generator::ALL {
        for solver in Solver::ALL {
            let mut generate_time = Duration::ZERO;
            let mut solve_time = Duration::ZERO;
            let mut visited = 0;
            let mut solved = 0;
            for iteration in 0..num_iters {
                let mut grid = Grid::new(rows, cols);
                let started = Instant::now();
                session.generate(&mut grid, generator, Some(iteration as u64))?;
                generate_time += started.elapsed();

                let report = session.solve(&mut grid, solver, &mut NoopSink)?;
                solve_time += report.elapsed;
                visited += report.visited_count();
                if report.outcome == Outcome::Found {
                    solved += 1;
                }
            }
            println!(
                "{:<14} {:<14} generate {:>10.2?}  solve {:>10.2?}  visited {:>9}  solved {}/{}",
                generator.name(),
                solver.name(),
                generate_time,
                solve_time,
                visited,
                solved,
                num_iters
            );
        }
    }
    Ok(())
}
