use crossterm::style::{Color, Stylize};

use std::fmt;

/// The endpoint role a cell may hold. Start and end are mutually exclusive.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[default]
    None,
    Start,
    End,
}

/// A single grid position together with the bookkeeping solvers leave on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub is_wall: bool,
    pub role: Role,
    /// Expanded by the current solve pass.
    pub visited: bool,
    /// Discovered but not yet expanded.
    pub frontier: bool,
    /// Part of the reported solution path.
    pub in_path: bool,
    /// Accumulated cost from the start (distance / gScore). `None` stands for +∞.
    pub distance: Option<u32>,
    /// A* estimate `gScore + heuristic`. `None` stands for +∞.
    pub f_score: Option<u32>,
    /// Flat index of the cell this one was reached from.
    pub parent: Option<usize>,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        is_wall: false,
        role: Role::None,
        visited: false,
        frontier: false,
        in_path: false,
        distance: None,
        f_score: None,
        parent: None,
    };
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn is_start(&self) -> bool {
        self.role == Role::Start
    }

    pub fn is_end(&self) -> bool {
        self.role == Role::End
    }

    /// Whether the cell holds the start or end role.
    pub fn is_endpoint(&self) -> bool {
        self.role != Role::None
    }

    /// Clears every solve-pass mark, keeping wall and role.
    pub(crate) fn reset_search_state(&mut self) {
        self.visited = false;
        self.frontier = false;
        self.in_path = false;
        self.distance = None;
        self.f_score = None;
        self.parent = None;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Roles win over search marks, walls win over everything else
        let styled_symbol = if self.is_wall {
            "⬜".with(Color::White)
        } else {
            match self.role {
                Role::Start => "🟩".with(Color::Green),
                Role::End => "🟥".with(Color::Red),
                Role::None if self.in_path => "🟨".with(Color::Yellow),
                Role::None if self.visited => "* ".with(Color::Blue),
                Role::None if self.frontier => "+ ".with(Color::Cyan),
                Role::None => "  ".with(Color::Reset),
            }
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Cell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
