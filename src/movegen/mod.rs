//! Legal move generation.
//!
//! A legal move fills one empty cell with the mover's mark. Children are
//! produced lazily in ascending cell order, each as a fresh board copy.

use rand::Rng;

use crate::board::{Board, Mark, CELL_COUNT};

/// Lazy iterator over `(child_board, cell)` pairs for one mover.
#[derive(Debug, Clone)]
pub struct Children {
    board: Board,
    mover: Mark,
    next: usize,
}

impl Iterator for Children {
    type Item = (Board, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < CELL_COUNT {
            let cell = self.next;
            self.next += 1;
            if self.board.get(cell).is_none() {
                return Some((self.board.with_mark(cell, self.mover), cell));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(CELL_COUNT - self.next))
    }
}

/// Enumerates every successor of `board` reachable by `mover` in one move.
///
/// Yields nothing on a full board. Does not check for a winner: callers
/// stop at terminal boards themselves.
pub fn children(board: &Board, mover: Mark) -> Children {
    Children {
        board: *board,
        mover,
        next: 0,
    }
}

/// Picks a uniformly random empty cell, or `None` if the board is full.
pub fn random_move(board: &Board, rng: &mut impl Rng) -> Option<usize> {
    let empty: Vec<usize> = board.empty_cells().collect();
    if empty.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..empty.len());
    Some(empty[idx])
}
