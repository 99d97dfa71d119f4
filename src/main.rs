use std::{
    io::{Stdout, Write},
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    execute,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mazeviz::{
    Cell, Generator, Grid, MazeError, Outcome, Session, SolveReport, Solver, animation,
    maze::MAX_CELLS, render,
};

const DEFAULT_ROWS: usize = 21;
const DEFAULT_COLS: usize = 31;
const LOG_FILE: &str = "mazeviz.log";
const USAGE: &str = "usage: mazeviz [rows] [cols] [generator] [solver] [speed] [seed] \
                     [--import PATH] [--export PATH]";

#[derive(Debug, PartialEq)]
struct Args {
    rows: usize,
    cols: usize,
    generator: Generator,
    solver: Solver,
    speed: u8,
    seed: Option<u64>,
    import: Option<PathBuf>,
    export: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            generator: Generator::Dfs,
            solver: Solver::AStar,
            speed: animation::DEFAULT_SPEED,
            seed: None,
            import: None,
            export: None,
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, MazeError> {
    value
        .parse()
        .map_err(|_| MazeError::InvalidArgument(format!("{} must be a number, got '{}'", name, value)))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, MazeError> {
    let mut parsed = Args::default();
    let mut positional = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--import" | "--export" => {
                let path = args.next().map(PathBuf::from).ok_or_else(|| {
                    MazeError::InvalidArgument(format!("{} expects a file path", arg))
                })?;
                if arg == "--import" {
                    parsed.import = Some(path);
                } else {
                    parsed.export = Some(path);
                }
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    if let Some(value) = positional.next() {
        parsed.rows = parse_number(&value, "rows")?;
    }
    if let Some(value) = positional.next() {
        parsed.cols = parse_number(&value, "cols")?;
    }
    if let Some(value) = positional.next() {
        parsed.generator = value.parse()?;
    }
    if let Some(value) = positional.next() {
        parsed.solver = value.parse()?;
    }
    if let Some(value) = positional.next() {
        parsed.speed = parse_number(&value, "speed")?;
    }
    if let Some(value) = positional.next() {
        parsed.seed = Some(parse_number(&value, "seed")?);
    }
    if let Some(extra) = positional.next() {
        return Err(MazeError::InvalidArgument(format!("unexpected argument '{}'", extra)));
    }

    if parsed.rows < 2 || parsed.cols < 2 {
        return Err(MazeError::InvalidArgument(
            "rows and cols must be at least 2".to_string(),
        ));
    }
    if Grid::cell_count(parsed.rows, parsed.cols).is_none() {
        return Err(MazeError::InvalidArgument(format!(
            "a {}x{} maze exceeds the limit of {} cells",
            parsed.rows, parsed.cols, MAX_CELLS
        )));
    }
    Ok(parsed)
}

/// Log to a file, since the terminal is used for drawing.
/// The returned guard flushes pending log lines when dropped.
fn init_logging() -> std::io::Result<WorkerGuard> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_env("MAZEVIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    Ok(guard)
}

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    Ok(())
}

fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Listen for key presses while the solve runs: Esc stops it, Up/Down change speed.
/// Returns once `done` is set.
fn listen_to_user_input(session: Session, done: &AtomicBool) -> std::io::Result<()> {
    loop {
        if done.load(Ordering::Relaxed) {
            return Ok(());
        }
        // Poll with a timeout so the done flag is checked regularly
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let event::Event::Key(key_event) = event::read()? {
            if key_event.kind != event::KeyEventKind::Press {
                continue;
            }
            match key_event.code {
                KeyCode::Esc => session.stop_solving(),
                KeyCode::Up => session.speed_up(),
                KeyCode::Down => session.slow_down(),
                _ => {}
            }
        }
    }
}

/// Wait for the user to press the Esc key
fn wait_for_esc() -> std::io::Result<()> {
    loop {
        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                break;
            }
        }
    }
    Ok(())
}

fn summary(report: &SolveReport) -> String {
    let result = match report.outcome {
        Outcome::Found => format!("path found, length {}", report.path_length()),
        Outcome::NoPath => "no path found".to_string(),
        Outcome::Cancelled => "cancelled".to_string(),
    };
    format!(
        "{}: {}, visited {} cells in {:.2?}",
        report.solver,
        result,
        report.visited_count(),
        report.elapsed
    )
}

/// Draw the maze, solve it with animation, and wait for Esc.
fn animate(
    stdout: &mut Stdout,
    grid: &mut Grid,
    session: &Session,
    solver: Solver,
) -> Result<SolveReport, MazeError> {
    let done = Arc::new(AtomicBool::new(false));
    let input_session = session.clone();
    let input_done = done.clone();
    // Spawn a thread to listen for user input
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(input_session, &input_done)
    });

    let mut sink = render::TerminalSink::new(std::io::stdout(), session.clone());
    sink.draw_grid(grid)?;
    let report = session.solve(grid, solver, &mut sink);
    done.store(true, Ordering::Relaxed);
    match input_thread_handle.join() {
        Ok(result) => result?,
        Err(_) => tracing::error!("Input thread panicked"),
    }
    if let Some(e) = sink.take_error() {
        return Err(e.into());
    }
    let report = report?;

    execute!(
        stdout,
        cursor::MoveTo(0, grid.rows() as u16 + 1),
        style::PrintStyledContent(
            format!("{}\r\n", summary(&report))
                .with(Color::Green)
                .attribute(Attribute::Bold)
        ),
        style::PrintStyledContent(
            "Press Esc to exit...\r\n"
                .with(Color::Blue)
                .attribute(Attribute::Bold)
        )
    )?;
    wait_for_esc()?;
    Ok(report)
}

/// Check if the terminal can show the maze, printing a message if it cannot.
fn check_terminal_size(rows: usize, cols: usize) -> std::io::Result<bool> {
    if render::fits_terminal(rows, cols)? {
        return Ok(true);
    }
    eprintln!(
        "Terminal is too small for a {}x{} maze ({} columns needed). Please resize the terminal.",
        rows,
        cols,
        cols.saturating_mul(Cell::CELL_WIDTH as usize)
    );
    Ok(false)
}

fn run(args: Args) -> Result<(), MazeError> {
    let session = Session::new().with_speed(args.speed);

    let mut grid = match &args.import {
        Some(path) => {
            tracing::info!("Importing maze from {}", path.display());
            let grid = Grid::from_json(&std::fs::read_to_string(path)?)?;
            if !check_terminal_size(grid.rows(), grid.cols())? {
                return Ok(());
            }
            grid
        }
        None => {
            // Checked before allocating, so an oversized request fails fast
            if !check_terminal_size(args.rows, args.cols)? {
                return Ok(());
            }
            let mut grid = Grid::new(args.rows, args.cols);
            session.generate(&mut grid, args.generator, args.seed)?;
            grid
        }
    };

    let mut stdout = std::io::stdout();
    setup_terminal(&mut stdout)?;
    let result = animate(&mut stdout, &mut grid, &session, args.solver);
    restore_terminal(&mut stdout)?;
    let report = result?;
    println!("{}", summary(&report));

    if let Some(path) = &args.export {
        std::fs::write(path, grid.to_json()?)?;
        tracing::info!("Exported maze to {}", path.display());
        println!("Maze exported to {}", path.display());
    }
    stdout.flush()?;
    Ok(())
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    let guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Could not open {}: {}, logging disabled", LOG_FILE, e);
            None
        }
    };

    let result = run(args);
    if let Err(e) = &result {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
    }
    // Flush the log before a possible exit, which skips destructors
    drop(guard);
    if result.is_err() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, MazeError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_positional_and_flags() {
        let parsed = args(&[
            "15", "25", "kruskal", "--export", "out.json", "bfs", "80", "7",
        ])
        .unwrap();
        assert_eq!(parsed.rows, 15);
        assert_eq!(parsed.cols, 25);
        assert_eq!(parsed.generator, Generator::Kruskal);
        assert_eq!(parsed.solver, Solver::Bfs);
        assert_eq!(parsed.speed, 80);
        assert_eq!(parsed.seed, Some(7));
        assert_eq!(parsed.export, Some(PathBuf::from("out.json")));
        assert_eq!(parsed.import, None);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(matches!(args(&["ten"]), Err(MazeError::InvalidArgument(_))));
        assert!(matches!(args(&["1", "5"]), Err(MazeError::InvalidArgument(_))));
        assert!(matches!(
            args(&["5", "5", "maze"]),
            Err(MazeError::UnknownGenerator(_))
        ));
        assert!(matches!(
            args(&["5", "5", "dfs", "greedy"]),
            Err(MazeError::UnknownSolver(_))
        ));
        assert!(matches!(args(&["--import"]), Err(MazeError::InvalidArgument(_))));
        assert!(matches!(
            args(&["5", "5", "dfs", "dfs", "10", "1", "extra"]),
            Err(MazeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_mazes() {
        assert!(matches!(
            args(&["100000", "100000"]),
            Err(MazeError::InvalidArgument(_))
        ));
        assert!(matches!(
            args(&["18446744073709551615", "2"]),
            Err(MazeError::InvalidArgument(_))
        ));
        assert!(matches!(args(&["1025", "1024"]), Err(MazeError::InvalidArgument(_))));
        let parsed = args(&["1024", "1024"]).unwrap();
        assert_eq!((parsed.rows, parsed.cols), (1024, 1024));
    }
}
