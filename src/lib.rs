pub mod animation;
pub mod error;
pub mod generators;
pub mod maze;
pub mod render;
pub mod session;
pub mod solvers;

pub use error::MazeError;
pub use generators::Generator;
pub use maze::{Cell, Coord, Grid};
pub use session::{Session, Tool};
pub use solvers::{Outcome, SolveReport, Solver, solve_maze};
