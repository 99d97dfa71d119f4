use std::{collections::VecDeque, time::Duration};

use mazeviz::{
    Coord, Generator, Grid, MazeError, Outcome, Session, Solver,
    animation::NoopSink,
    generators::{carve_passages, get_rng},
    solve_maze,
};

fn open_cells(grid: &Grid) -> Vec<Coord> {
    grid.iter()
        .filter(|(_, cell)| !cell.is_wall)
        .map(|(coord, _)| coord)
        .collect()
}

/// Number of open cells reachable from `from`.
fn component_size(grid: &Grid, from: Coord) -> usize {
    let mut seen = vec![false; grid.len()];
    seen[grid.index_of(from)] = true;
    let mut queue = VecDeque::from([from]);
    let mut count = 0;
    while let Some(current) = queue.pop_front() {
        count += 1;
        for neighbor in grid.open_neighbors(current) {
            let idx = grid.index_of(neighbor);
            if !seen[idx] {
                seen[idx] = true;
                queue.push_back(neighbor);
            }
        }
    }
    count
}

/// Adjacent pairs of open cells.
fn open_edges(grid: &Grid) -> usize {
    open_cells(grid)
        .into_iter()
        .map(|(r, c)| {
            [(r + 1, c), (r, c + 1)]
                .into_iter()
                .filter(|&n| grid.is_in_bounds(n) && !grid.is_wall(n))
                .count()
        })
        .sum()
}

/// 5x5 grid with a wall down column 2 on rows 0-3, start (0, 0), end (0, 4).
fn divided_grid() -> Grid {
    let mut grid = Grid::new(5, 5);
    grid.clear();
    (0..4).for_each(|row| grid.set_wall((row, 2), true));
    grid.set_start((0, 0));
    grid.set_end((0, 4));
    grid
}

#[test]
fn generated_mazes_connect_start_and_end() {
    let session = Session::headless();
    for generator in Generator::ALL {
        for seed in 0..10 {
            for (rows, cols) in [(21, 21), (10, 14), (3, 5), (2, 9)] {
                let mut grid = Grid::new(rows, cols);
                session.generate(&mut grid, generator, Some(seed)).unwrap();
                assert!(grid.has_valid_path(), "{} {}x{} seed {}", generator, rows, cols, seed);

                let report = solve_maze(&mut grid, Solver::Bfs, &session, &mut NoopSink).unwrap();
                assert_eq!(report.outcome, Outcome::Found);
            }
        }
    }
}

#[test]
fn carved_passages_form_a_spanning_tree() {
    for generator in Generator::ALL {
        for seed in 0..5 {
            let mut grid = Grid::new(15, 21);
            let mut rng = get_rng(Some(seed));
            carve_passages(&mut grid, generator, &mut rng);

            let open = open_cells(&grid);
            // Every odd-coordinate cell is a passage
            assert_eq!(open.iter().filter(|(r, c)| r % 2 == 1 && c % 2 == 1).count(), 7 * 10);
            assert_eq!(open_edges(&grid), open.len() - 1, "{} seed {}", generator, seed);
            assert_eq!(component_size(&grid, (1, 1)), open.len());
        }
    }
}

#[test]
fn optimal_solvers_agree_on_path_length() {
    let session = Session::headless();
    for generator in Generator::ALL {
        for seed in 0..5 {
            let mut grid = Grid::new(17, 23);
            grid.set_start((0, 0));
            grid.set_end((16, 22));
            session.generate(&mut grid, generator, Some(seed)).unwrap();

            let lengths = [Solver::Bfs, Solver::Dijkstra, Solver::AStar]
                .map(|solver| {
                    let report = solve_maze(&mut grid, solver, &session, &mut NoopSink).unwrap();
                    assert_eq!(report.outcome, Outcome::Found);
                    report.path_length()
                });
            assert_eq!(lengths[0], lengths[1], "{} seed {}", generator, seed);
            assert_eq!(lengths[0], lengths[2], "{} seed {}", generator, seed);

            for solver in [Solver::Dfs, Solver::WallFollower] {
                let report = solve_maze(&mut grid, solver, &session, &mut NoopSink).unwrap();
                assert_eq!(report.outcome, Outcome::Found, "{}", solver);
                assert!(report.path_length() >= lengths[0]);
            }
        }
    }
}

#[test]
fn every_visited_cell_leads_back_to_start() {
    let session = Session::headless();
    for generator in Generator::ALL {
        for seed in 0..3 {
            let mut grid = Grid::new(15, 19);
            session.generate(&mut grid, generator, Some(seed)).unwrap();
            let start = grid.start().unwrap();

            for solver in [Solver::Dfs, Solver::Bfs, Solver::Dijkstra, Solver::AStar] {
                let report = solve_maze(&mut grid, solver, &session, &mut NoopSink).unwrap();
                assert_eq!(report.outcome, Outcome::Found);
                for &cell in &report.visited {
                    let path = grid.reconstruct_path(cell);
                    let path = path.unwrap_or_else(|| panic!("{} {} seed {}: {:?}", solver, generator, seed, cell));
                    assert_eq!(path.first(), Some(&start));
                    assert_eq!(path.last(), Some(&cell));
                    // Each link in the chain is a step between open neighbors
                    assert!(path.windows(2).all(|pair| grid.open_neighbors(pair[0]).any(|n| n == pair[1])));
                }
            }
        }
    }
}

#[test]
fn divided_grid_shortest_path() {
    let session = Session::headless();
    for solver in [Solver::Bfs, Solver::Dijkstra, Solver::AStar] {
        let mut grid = divided_grid();
        let report = solve_maze(&mut grid, solver, &session, &mut NoopSink).unwrap();
        let path = report.path.as_deref().unwrap();
        assert_eq!(report.path_length(), 12);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(0, 4)));
        // Any shortest route has to pass under the divider
        assert!(path.contains(&(4, 2)));
    }
}

#[test]
fn reset_restores_the_unsolved_grid() {
    let session = Session::headless();
    let mut grid = Grid::new(15, 15);
    session.generate(&mut grid, Generator::Prim, Some(3)).unwrap();
    let unsolved = grid.clone();

    for solver in Solver::ALL {
        solve_maze(&mut grid, solver, &session, &mut NoopSink).unwrap();
        assert_ne!(grid, unsolved);
        grid.reset_visited();
        assert_eq!(grid, unsolved);
        grid.reset_visited();
        assert_eq!(grid, unsolved);
    }
}

#[test]
fn export_import_round_trip() {
    let session = Session::headless();
    let mut grid = Grid::new(11, 19);
    grid.set_end((0, 18));
    session.generate(&mut grid, Generator::Kruskal, Some(9)).unwrap();

    let json = grid.to_json().unwrap();
    let restored = Grid::from_json(&json).unwrap();
    assert_eq!(restored, grid);

    // Importing over an existing grid replaces it entirely
    let mut other = Grid::new(4, 4);
    other.import_json(&json).unwrap();
    assert_eq!(other, grid);
}

#[test]
fn failed_import_leaves_grid_untouched() {
    let mut grid = divided_grid();
    let before = grid.clone();
    let bad = r#"{"rows": 5, "cols": 5, "walls": [[9, 9]], "start": [0, 0], "end": [4, 4]}"#;
    assert!(matches!(grid.import_json(bad), Err(MazeError::InvalidFormat(_))));
    assert!(matches!(grid.import_json("{"), Err(MazeError::Json(_))));
    assert_eq!(grid, before);
}

#[test]
fn unreachable_end_reports_reachable_component() {
    // Start boxed into the top-left 3x3 corner
    let mut grid = Grid::new(8, 8);
    grid.clear();
    (0..4).for_each(|i| {
        grid.set_wall((3, i), true);
        grid.set_wall((i, 3), true);
    });
    grid.set_start((1, 1));
    grid.set_end((6, 6));
    assert!(!grid.has_valid_path());

    let session = Session::headless();
    for solver in [Solver::Dfs, Solver::Bfs, Solver::Dijkstra, Solver::AStar] {
        let report = solve_maze(&mut grid, solver, &session, &mut NoopSink).unwrap();
        assert_eq!(report.outcome, Outcome::NoPath, "{}", solver);
        assert_eq!(report.path, None);
        assert_eq!(report.path_length(), 0);
        assert_eq!(report.visited_count(), 9, "{}", solver);
    }

    let report = solve_maze(&mut grid, Solver::WallFollower, &session, &mut NoopSink).unwrap();
    assert_eq!(report.outcome, Outcome::NoPath);
    assert!(report.visited_count() <= 9);
    assert!(grid.iter().all(|(_, cell)| !cell.in_path));
}

#[test]
fn missing_end_is_an_error_not_a_no_path() {
    let mut grid = Grid::new(5, 5);
    grid.reset();
    grid.set_start((0, 0));
    let result = solve_maze(&mut grid, Solver::AStar, &Session::headless(), &mut NoopSink);
    assert!(matches!(result, Err(MazeError::MissingEndpoints)));
}

#[test]
fn stop_from_another_thread_cancels_solve() {
    let mut grid = Grid::new(31, 31);
    grid.clear();
    grid.set_start((0, 0));
    grid.set_end((30, 30));
    // Slowest speed waits 100 ms per step
    let session = Session::new().with_speed(1);
    let handle = session.clone();
    let stopper = std::thread::spawn(move || {
        while !handle.is_solving() {
            std::thread::yield_now();
        }
        std::thread::sleep(Duration::from_millis(250));
        handle.stop_solving();
    });

    let report = solve_maze(&mut grid, Solver::Dijkstra, &session, &mut NoopSink).unwrap();
    stopper.join().unwrap();
    assert_eq!(report.outcome, Outcome::Cancelled);
    assert!(report.visited_count() < grid.len());
    assert_eq!(report.path_length(), 0);
    assert!(!session.is_solving());

    // The session is usable again after a cancelled solve
    let report = solve_maze(&mut grid, Solver::Bfs, &Session::headless(), &mut NoopSink).unwrap();
    assert_eq!(report.path_length(), 60);
}
