//! Quarter-turn rotation of a board snapshot.
//!
//! Rotation collapses the eight lines of the board into three canonical
//! ones: the top row, middle column and main diagonal in four orientations
//! cover every row, column and diagonal. The engine rotates a private copy
//! and maps the pattern-local answer back with [`QuarterTurns::to_board`].
//!
//! ```text
//!  [0][1][2]         [6][3][0]
//!  [3][4][5]   -->   [7][4][1]
//!  [6][7][8]         [8][5][2]
//! ```

use crate::position::Position;
use crate::types::{Board, Cell};

impl Position {
    /// Where this cell lands after a 90 degree clockwise turn.
    ///
    /// Corners cycle 0 -> 2 -> 8 -> 6, sides cycle 1 -> 5 -> 7 -> 3, and the
    /// center stays put.
    pub fn rotated_clockwise(self) -> Self {
        Self::ALL[self.col() * 3 + (2 - self.row())]
    }

    /// Inverse of [`Position::rotated_clockwise`].
    pub fn rotated_counter_clockwise(self) -> Self {
        Self::ALL[(2 - self.col()) * 3 + self.row()]
    }
}

/// Rotates a board a quarter turn clockwise.
///
/// Takes the board by value and returns a new one; applying it four times
/// yields the original.
pub fn rotate_clockwise(board: Board) -> Board {
    let mut cells = [Cell::Empty; 9];
    for pos in Position::ALL {
        cells[pos.rotated_clockwise().index()] = board.get(pos);
    }
    Board::from_cells(cells)
}

/// Number of clockwise quarter turns applied to a snapshot (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    /// The unrotated orientation.
    pub const IDENTITY: QuarterTurns = QuarterTurns(0);

    /// Creates a rotation count, reduced modulo four.
    pub fn new(turns: u8) -> Self {
        Self(turns % 4)
    }

    /// Returns the number of quarter turns.
    pub fn count(self) -> u8 {
        self.0
    }

    /// Maps a position on the rotated snapshot back to the real board.
    pub fn to_board(self, pos: Position) -> Position {
        (0..self.0).fold(pos, |p, _| p.rotated_counter_clockwise())
    }

    /// Maps a real board position onto the rotated snapshot.
    pub fn to_snapshot(self, pos: Position) -> Position {
        (0..self.0).fold(pos, |p, _| p.rotated_clockwise())
    }
}

/// The four orientations of a snapshot, starting with the board as given.
pub fn rotations(board: Board) -> impl Iterator<Item = (QuarterTurns, Board)> {
    std::iter::successors(Some((QuarterTurns::IDENTITY, board)), |&(turns, snapshot)| {
        (turns.count() < 3).then(|| (QuarterTurns::new(turns.count() + 1), rotate_clockwise(snapshot)))
    })
}
