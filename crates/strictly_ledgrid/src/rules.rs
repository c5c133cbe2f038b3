//! Win and tie detection.
//!
//! Pure functions over [`Board`] values. The device derives the outcome
//! from a board snapshot on demand instead of storing it alongside.

use crate::position::Position;
use crate::types::{Board, Cell, Outcome, Player};
use tracing::instrument;

/// The eight lines of three: rows, columns, diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns true if `player` holds all three cells of any line.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn is_winner(board: &Board, player: Player) -> bool {
    let mark = Cell::Occupied(player);
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == mark))
}

/// Derives the game outcome from the board.
///
/// Player 1 is checked before Player 2; a board where both hold a line
/// cannot arise from alternating play.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn evaluate_outcome(board: &Board) -> Outcome {
    if is_winner(board, Player::Player1) {
        Outcome::Won(Player::Player1)
    } else if is_winner(board, Player::Player2) {
        Outcome::Won(Player::Player2)
    } else if board.is_full() {
        Outcome::Tie
    } else {
        Outcome::InProgress
    }
}
