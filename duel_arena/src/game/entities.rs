//! Board primitives.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{BOARD_CELLS, WIN_LINES};

/// Symbol owned by one participant for the duration of a match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}

/// A single board position.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        Self::Marked(mark)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "."),
            Self::Marked(mark) => write!(f, "{mark}"),
        }
    }
}

/// The nine cells of a match, in row-major order.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    /// Returns `None` for an index outside the board.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub(super) fn set(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark.into();
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Whether `mark` holds any of the eight winning lines.
    #[must_use]
    pub fn has_line(&self, mark: Mark) -> bool {
        let cell = Cell::from(mark);
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == cell))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(marks: &[(usize, Mark)]) -> Board {
        let mut board = Board::new();
        for &(i, mark) in marks {
            board.set(i, mark);
        }
        board
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        assert_eq!(board.filled(), 0);
        assert!(!board.is_full());
        assert!(!board.has_line(Mark::X));
        assert!(!board.has_line(Mark::O));
    }

    #[test]
    fn test_every_win_line_detected() {
        for line in WIN_LINES {
            let board = board_from(&[(line[0], Mark::O), (line[1], Mark::O), (line[2], Mark::O)]);
            assert!(board.has_line(Mark::O), "line {line:?} should win");
            assert!(!board.has_line(Mark::X));
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = board_from(&[(0, Mark::X), (1, Mark::O), (2, Mark::X)]);
        assert!(!board.has_line(Mark::X));
        assert!(!board.has_line(Mark::O));
    }

    #[test]
    fn test_get_out_of_range() {
        let board = Board::new();
        assert_eq!(board.get(8), Some(Cell::Empty));
        assert_eq!(board.get(9), None);
    }

    #[test]
    fn test_display() {
        let board = board_from(&[(0, Mark::X), (4, Mark::O)]);
        assert_eq!(board.to_string(), "X..\n.O.\n...\n");
    }
}
