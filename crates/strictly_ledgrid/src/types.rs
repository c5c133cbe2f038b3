//! Core domain types for the LED tic-tac-toe board.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Player {
    /// Player 1 (moves first, green lamp).
    #[strum(serialize = "Player 1")]
    Player1,
    /// Player 2 (red lamp, the automated opponent in single-player mode).
    #[strum(serialize = "Player 2")]
    Player2,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    /// One-byte encoding shared with [`Cell::to_byte`].
    pub fn to_byte(self) -> u8 {
        match self {
            Player::Player1 => 1,
            Player::Player2 => 2,
        }
    }

    /// Decodes [`Player::to_byte`]; any other byte is `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Player::Player1),
            2 => Some(Player::Player2),
            _ => None,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Not played yet.
    #[default]
    Empty,
    /// Claimed by a player. Never reverts to `Empty` within a game.
    Occupied(Player),
}

impl Cell {
    /// Encodes the cell in one byte: 0 empty, 1 player 1, 2 player 2.
    ///
    /// A single byte is the unit the device shares between the game loop
    /// and the display refresh, so a write is never observed half-done.
    pub fn to_byte(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(player) => player.to_byte(),
        }
    }

    /// Decodes [`Cell::to_byte`].
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Cell::Empty),
            other => Player::from_byte(other).map(Cell::Occupied),
        }
    }

    /// Returns the owning player, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

/// Error returned when a move targets a cell that is already played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlaceError {
    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(Position),
}

impl std::error::Error for PlaceError {}

/// 3x3 board, cells in row-major order (0-8).
///
/// `Board` is a plain value: copying it is how the decision engine takes
/// the snapshot it rotates, so the game-truth board is never aliased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Builds a board from raw cells.
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Self { cells }
    }

    /// Builds a board from the one-byte cell encoding.
    ///
    /// Returns `None` if any byte is not a valid cell.
    pub fn from_bytes(bytes: [u8; 9]) -> Option<Self> {
        let mut cells = [Cell::Empty; 9];
        for (cell, byte) in cells.iter_mut().zip(bytes) {
            *cell = Cell::from_byte(byte)?;
        }
        Some(Self { cells })
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Places a mark, refusing cells that are already played.
    #[instrument(skip(self))]
    pub fn place(&mut self, pos: Position, player: Player) -> Result<(), PlaceError> {
        if !self.is_empty(pos) {
            return Err(PlaceError::Occupied(pos));
        }
        self.cells[pos.index()] = Cell::Occupied(player);
        Ok(())
    }

    /// Returns a copy with `player` placed at `pos`, without validation.
    ///
    /// Used by the engine to probe hypothetical moves on a snapshot.
    pub fn with(&self, pos: Position, player: Player) -> Self {
        let mut next = *self;
        next.cells[pos.index()] = Cell::Occupied(player);
        next
    }

    /// Returns all cells as an array.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Iterates the empty positions in index order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        Position::ALL.into_iter().filter(|&pos| self.is_empty(pos))
    }

    /// Checks if every cell is played.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let symbol = match self.cells[row * 3 + col] {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::Player1) => '1',
                    Cell::Occupied(Player::Player2) => '2',
                };
                result.push(symbol);
            }
            if row < 2 {
                result.push('/');
            }
        }
        result
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Game is ongoing.
    InProgress,
    /// A player completed a line.
    Won(Player),
    /// Board full with no completed line.
    Tie,
}

impl Outcome {
    /// Returns true once the game can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "In progress"),
            Outcome::Won(player) => write!(f, "{} wins", player),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}
