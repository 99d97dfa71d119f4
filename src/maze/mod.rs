pub mod cell;
pub mod grid;
pub mod snapshot;

pub use cell::{Cell, Role};
pub use grid::{Coord, Grid, MAX_CELLS};
pub use snapshot::MazeData;
