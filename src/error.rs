use thiserror::Error;

/// Errors surfaced by maze editing, generation, solving and import.
///
/// A maze with no path between start and end is not an error: solvers report it
/// as a normal outcome.
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("the maze must have a start cell and an end cell")]
    MissingEndpoints,
    #[error("invalid maze data: {0}")]
    InvalidFormat(String),
    #[error("malformed maze JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown maze generator '{0}' (expected one of: dfs, prim, kruskal, backtracking)")]
    UnknownGenerator(String),
    #[error("unknown maze solver '{0}' (expected one of: dfs, bfs, dijkstra, astar, wall-follower)")]
    UnknownSolver(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("a solve is in progress")]
    Busy,
}
