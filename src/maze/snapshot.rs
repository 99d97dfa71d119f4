use serde::{Deserialize, Serialize};

use super::grid::{Coord, Grid, MAX_CELLS};
use crate::error::MazeError;

/// Sparse-wall serialized form of a maze. Empty cells are omitted.
///
/// Square mazes exported with a single `size` field are accepted on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<usize>,
    #[serde(default)]
    pub walls: Vec<[usize; 2]>,
    pub start: Option<[usize; 2]>,
    pub end: Option<[usize; 2]>,
}

impl MazeData {
    /// Resolves `(rows, cols)` from either explicit dimensions or `size`.
    fn dimensions(&self) -> Result<(usize, usize), MazeError> {
        let (rows, cols) = match (self.rows, self.cols, self.size) {
            (Some(rows), Some(cols), _) => (rows, cols),
            (None, None, Some(size)) => (size, size),
            _ => {
                return Err(MazeError::InvalidFormat(
                    "missing maze dimensions (expected rows and cols, or size)".to_string(),
                ));
            }
        };
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidFormat(format!(
                "maze dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if Grid::cell_count(rows, cols).is_none() {
            return Err(MazeError::InvalidFormat(format!(
                "a {}x{} maze exceeds the limit of {} cells",
                rows, cols, MAX_CELLS
            )));
        }
        Ok((rows, cols))
    }
}

fn to_coord(pair: [usize; 2]) -> Coord {
    (pair[0], pair[1])
}

impl Grid {
    /// Serializes walls, start and end.
    pub fn export(&self) -> MazeData {
        MazeData {
            size: None,
            rows: Some(self.rows()),
            cols: Some(self.cols()),
            walls: self.walls().map(|(r, c)| [r, c]).collect(),
            start: self.start().map(|(r, c)| [r, c]),
            end: self.end().map(|(r, c)| [r, c]),
        }
    }

    /// Replaces this grid with the maze described by `data`.
    ///
    /// Everything is validated and applied to a freshly initialized grid first,
    /// so on error `self` is left exactly as it was.
    pub fn import(&mut self, data: &MazeData) -> Result<(), MazeError> {
        let (rows, cols) = data.dimensions()?;
        let in_bounds = |(r, c): Coord| r < rows && c < cols;

        let start = data
            .start
            .map(to_coord)
            .ok_or_else(|| MazeError::InvalidFormat("missing start cell".to_string()))?;
        let end = data
            .end
            .map(to_coord)
            .ok_or_else(|| MazeError::InvalidFormat("missing end cell".to_string()))?;
        if !in_bounds(start) {
            return Err(MazeError::InvalidFormat(format!(
                "start {:?} is outside the {}x{} grid",
                start, rows, cols
            )));
        }
        if !in_bounds(end) {
            return Err(MazeError::InvalidFormat(format!(
                "end {:?} is outside the {}x{} grid",
                end, rows, cols
            )));
        }
        if start == end {
            return Err(MazeError::InvalidFormat(format!(
                "start and end share the cell {:?}",
                start
            )));
        }
        if let Some(wall) = data.walls.iter().copied().map(to_coord).find(|&w| !in_bounds(w)) {
            return Err(MazeError::InvalidFormat(format!(
                "wall {:?} is outside the {}x{} grid",
                wall, rows, cols
            )));
        }

        let mut grid = Grid::new(rows, cols);
        grid.clear();
        // Endpoints go first so that walls listed on them are ignored
        grid.set_start(start);
        grid.set_end(end);
        data.walls
            .iter()
            .for_each(|&pair| grid.set_wall(to_coord(pair), true));

        tracing::debug!(
            "Imported {}x{} maze with {} walls",
            rows,
            cols,
            grid.walls().count()
        );
        *self = grid;
        Ok(())
    }

    /// Exports the maze as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MazeError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Parses JSON and imports it into this grid. The grid is untouched on error.
    pub fn import_json(&mut self, json: &str) -> Result<(), MazeError> {
        let data: MazeData = serde_json::from_str(json)?;
        self.import(&data)
    }

    /// Builds a new grid from exported JSON.
    pub fn from_json(json: &str) -> Result<Grid, MazeError> {
        let mut grid = Grid::new(0, 0);
        grid.import_json(json)?;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_shape() {
        let mut grid = Grid::new(4, 6);
        grid.set_wall((0, 3), true);
        grid.set_wall((2, 1), true);
        let data = grid.export();
        assert_eq!(data.rows, Some(4));
        assert_eq!(data.cols, Some(6));
        assert_eq!(data.walls, vec![[0, 3], [2, 1]]);
        assert_eq!(data.start, Some([1, 1]));
        assert_eq!(data.end, Some([2, 4]));

        let json = grid.to_json().unwrap();
        assert!(!json.contains("size"));
    }

    #[test]
    fn test_import_square_size_field() {
        let json = r#"{"size": 5, "walls": [[0, 0], [2, 2]], "start": [4, 0], "end": [0, 4]}"#;
        let grid = Grid::from_json(json).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (5, 5));
        assert_eq!(grid.start(), Some((4, 0)));
        assert_eq!(grid.end(), Some((0, 4)));
        assert_eq!(grid.walls().collect::<Vec<_>>(), vec![(0, 0), (2, 2)]);
        // The default endpoints of a fresh grid are gone
        assert!(!grid[(1, 1)].is_endpoint());
    }

    #[test]
    fn test_import_wall_on_default_endpoint() {
        let json = r#"{"rows": 5, "cols": 5, "walls": [[1, 1], [3, 3]], "start": [0, 0], "end": [4, 4]}"#;
        let grid = Grid::from_json(json).unwrap();
        assert!(grid.is_wall((1, 1)));
        assert!(grid.is_wall((3, 3)));
    }

    #[test]
    fn test_import_ignores_wall_on_endpoint() {
        let json = r#"{"rows": 3, "cols": 3, "walls": [[0, 0], [1, 1]], "start": [0, 0], "end": [2, 2]}"#;
        let grid = Grid::from_json(json).unwrap();
        assert!(!grid.is_wall((0, 0)));
        assert!(grid.is_wall((1, 1)));
        assert!(grid[(0, 0)].is_start());
    }

    #[test]
    fn test_import_rejections_leave_grid_untouched() {
        let mut grid = Grid::new(5, 5);
        grid.set_wall((2, 2), true);
        let before = grid.clone();

        let bad_inputs = [
            r#"{"walls": [], "start": [0, 0], "end": [1, 1]}"#,
            r#"{"rows": 5, "walls": [], "start": [0, 0], "end": [1, 1]}"#,
            r#"{"rows": 0, "cols": 5, "walls": [], "start": [0, 0], "end": [1, 1]}"#,
            r#"{"rows": 5, "cols": 5, "walls": [], "end": [1, 1]}"#,
            r#"{"rows": 5, "cols": 5, "walls": [], "start": [0, 0]}"#,
            r#"{"rows": 5, "cols": 5, "walls": [], "start": [5, 0], "end": [1, 1]}"#,
            r#"{"rows": 5, "cols": 5, "walls": [], "start": [0, 0], "end": [1, 9]}"#,
            r#"{"rows": 5, "cols": 5, "walls": [[1, 2], [7, 7]], "start": [0, 0], "end": [1, 1]}"#,
            r#"{"rows": 5, "cols": 5, "walls": [], "start": [2, 3], "end": [2, 3]}"#,
            r#"{"rows": 5, "cols": 5, "walls": "none", "start": [0, 0], "end": [1, 1]}"#,
            r#"not json"#,
            r#"{"rows": 4294967296, "cols": 4294967296, "walls": [], "start": [0, 0], "end": [0, 1]}"#,
            r#"{"rows": 100000, "cols": 100000, "walls": [], "start": [0, 0], "end": [0, 1]}"#,
            r#"{"size": 18446744073709551615, "walls": [], "start": [0, 0], "end": [0, 1]}"#,
        ];
        for input in bad_inputs {
            let result = grid.import_json(input);
            assert!(result.is_err(), "accepted {}", input);
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn test_oversized_dimensions_are_format_errors() {
        let mut grid = Grid::new(3, 3);
        let json = r#"{"rows": 4294967296, "cols": 4294967296, "walls": [], "start": [0, 0], "end": [0, 1]}"#;
        assert!(matches!(grid.import_json(json), Err(MazeError::InvalidFormat(_))));

        // Exactly at the limit is accepted
        let json = r#"{"rows": 1024, "cols": 1024, "walls": [], "start": [0, 0], "end": [0, 1]}"#;
        grid.import_json(json).unwrap();
        assert_eq!(grid.len(), MAX_CELLS);
        let json = r#"{"rows": 1025, "cols": 1024, "walls": [], "start": [0, 0], "end": [0, 1]}"#;
        assert!(matches!(grid.import_json(json), Err(MazeError::InvalidFormat(_))));
    }

    #[test]
    fn test_json_errors_are_distinguished() {
        let mut grid = Grid::new(3, 3);
        assert!(matches!(grid.import_json("{"), Err(MazeError::Json(_))));
        assert!(matches!(
            grid.import_json(r#"{"rows": 3, "cols": 3, "start": [0, 0]}"#),
            Err(MazeError::InvalidFormat(_))
        ));
    }
}
