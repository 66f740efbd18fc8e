//! Board representation.
//!
//! A board is nine cells in row-major order. Boards are small `Copy`
//! values: every move produces a new board and leaves the old one intact,
//! so search children never alias their parent.

use super::mark::Mark;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// The eight winning lines: three rows, three columns, two diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A 3x3 tic-tac-toe position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    /// Creates a board with every cell empty.
    pub const fn empty() -> Self {
        Board {
            cells: [None; CELL_COUNT],
        }
    }

    /// Creates a board from explicit cell contents.
    pub const fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Board { cells }
    }

    /// Returns the mark at `cell`, or `None` if the cell is empty or out of range.
    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.cells.get(cell).copied().flatten()
    }

    /// Returns a copy of this board with `mark` placed at `cell`.
    ///
    /// Returns `None` if the cell is out of range or already filled.
    pub fn place(&self, cell: usize, mark: Mark) -> Option<Board> {
        match self.cells.get(cell) {
            Some(None) => Some(self.with_mark(cell, mark)),
            _ => None,
        }
    }

    /// Copy-and-set without an occupancy check. Callers guarantee `cell` is empty.
    pub(crate) fn with_mark(&self, cell: usize, mark: Mark) -> Board {
        debug_assert!(self.cells[cell].is_none(), "cell {} already filled", cell);
        let mut next = *self;
        next.cells[cell] = Some(mark);
        next
    }

    /// Iterates over the indices of empty cells in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| if c.is_none() { Some(i) } else { None })
    }

    /// Returns true if no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Counts the cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// Counts the filled cells.
    pub fn filled(&self) -> usize {
        CELL_COUNT - self.empty_cells().count()
    }

    /// Guesses whose turn it is from the mark counts.
    ///
    /// The side with fewer marks moves; on equal counts X moves. Games that
    /// opened with O need the mover passed explicitly.
    pub fn inferred_mover(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            let c = match cell {
                Some(mark) => mark.as_char(),
                None => '.',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
