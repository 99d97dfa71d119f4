use std::io::Write;

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    animation::{Frame, UpdateSink},
    maze::{Cell, Grid},
    session::Session,
};

/// Check if the terminal can show a grid of the given size plus the status line.
pub fn fits_terminal(rows: usize, cols: usize) -> std::io::Result<bool> {
    let (term_width, term_height) = terminal::size()?;
    let width = cols.saturating_mul(Cell::CELL_WIDTH as usize);
    Ok(width <= term_width as usize && rows < term_height as usize)
}

/// Draws solver frames to a terminal.
///
/// Only cells that changed since the previous frame are redrawn. The line below the
/// maze shows the visited count, path length and current speed.
pub struct TerminalSink<W: Write> {
    out: W,
    session: Session,
    /// Cells as they were last drawn, empty until the first full draw
    drawn: Vec<Cell>,
    /// First I/O error hit while drawing. Later frames are skipped.
    error: Option<std::io::Error>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, session: Session) -> Self {
        Self {
            out,
            session,
            drawn: Vec::new(),
            error: None,
        }
    }

    /// Draws the whole grid and an empty status line.
    pub fn draw_grid(&mut self, grid: &Grid) -> std::io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                self.out.queue(style::Print(grid[(row, col)]))?;
            }
            self.out.queue(style::Print("\r\n"))?;
        }
        self.drawn = grid.iter().map(|(_, cell)| *cell).collect();
        self.draw_status(grid, 0, None)?;
        self.out.flush()
    }

    fn draw_frame(&mut self, frame: Frame<'_>) -> std::io::Result<()> {
        let grid = frame.grid;
        if self.drawn.len() != grid.len() {
            return self.draw_grid(grid);
        }

        for (coord, cell) in grid.iter() {
            let idx = grid.index_of(coord);
            if self.drawn[idx] == *cell {
                continue;
            }
            self.drawn[idx] = *cell;
            queue!(
                self.out,
                cursor::MoveTo(coord.1 as u16 * Cell::CELL_WIDTH, coord.0 as u16),
                style::Print(cell)
            )?;
        }
        let path_length = frame.path.map(|path| path.len().saturating_sub(1));
        self.draw_status(grid, frame.visited.len(), path_length)?;
        self.out.flush()
    }

    fn draw_status(
        &mut self,
        grid: &Grid,
        visited: usize,
        path_length: Option<usize>,
    ) -> std::io::Result<()> {
        let path = path_length.map_or_else(|| "-".to_string(), |len| len.to_string());
        let status = format!(
            "Visited: {:<6} Path: {:<6} Speed: {:<3} (Up/Down to change, Esc to stop)",
            visited,
            path,
            self.session.speed()
        );
        queue!(
            self.out,
            cursor::MoveTo(0, grid.rows() as u16),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(Color::Cyan).attribute(Attribute::Bold))
        )
    }

    /// Returns the first drawing error, if any, and resumes drawing.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UpdateSink for TerminalSink<W> {
    fn update(&mut self, frame: Frame<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.draw_frame(frame) {
            tracing::error!("Failed to draw frame: {}", e);
            self.error = Some(e);
        }
    }
}
