//! Game state shared between the game loop and the display refresh.
//!
//! Each cell and the turn marker is a single atomic byte. The game loop is
//! the only writer; the refresh task only reads. A reader therefore sees a
//! cell either before or after a move, never in between, and no lock is
//! needed.

use std::sync::atomic::{AtomicU8, Ordering};
use strictly_ledgrid::{Board, Cell, Outcome, PlaceError, Player, Position, evaluate_outcome};
use tracing::{info, instrument};

use crate::error::DeviceError;

/// The game-truth board.
#[derive(Debug)]
pub struct SharedBoard {
    cells: [AtomicU8; 9],
}

impl SharedBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| AtomicU8::new(Cell::Empty.to_byte())),
        }
    }

    /// Reads one cell.
    pub fn cell(&self, pos: Position) -> Cell {
        // Only `claim` stores, and it stores valid bytes.
        Cell::from_byte(self.cells[pos.index()].load(Ordering::Acquire)).unwrap_or_default()
    }

    /// Checks if a cell is still unplayed.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Empty
    }

    /// Copies the board into an independent value.
    pub fn snapshot(&self) -> Board {
        let mut cells = [Cell::Empty; 9];
        for pos in Position::ALL {
            cells[pos.index()] = self.cell(pos);
        }
        Board::from_cells(cells)
    }

    /// Marks an empty cell for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::Occupied`] if the cell is already played; a
    /// played cell is never overwritten.
    pub fn claim(&self, pos: Position, player: Player) -> Result<(), PlaceError> {
        self.cells[pos.index()]
            .compare_exchange(
                Cell::Empty.to_byte(),
                player.to_byte(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|_| PlaceError::Occupied(pos))
    }
}

impl Default for SharedBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Board plus whose turn it is.
#[derive(Debug)]
pub struct SharedGame {
    board: SharedBoard,
    turn: AtomicU8,
}

impl SharedGame {
    /// Creates a new game with Player 1 to move.
    pub fn new() -> Self {
        Self {
            board: SharedBoard::new(),
            turn: AtomicU8::new(Player::Player1.to_byte()),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    /// Returns the player to move.
    pub fn turn(&self) -> Player {
        Player::from_byte(self.turn.load(Ordering::Acquire)).unwrap_or(Player::Player1)
    }

    /// Derives the outcome from a snapshot of the board.
    pub fn outcome(&self) -> Outcome {
        evaluate_outcome(&self.board.snapshot())
    }

    /// Plays `pos` for the player to move and hands the turn over.
    ///
    /// # Errors
    ///
    /// Fails if the game is over or the cell is taken. The turn does not
    /// change on failure.
    #[instrument(skip(self), fields(player = %self.turn()))]
    pub fn play(&self, pos: Position) -> Result<Outcome, DeviceError> {
        self.play_as(pos, self.turn())
    }

    /// Plays `pos` for `player`, who must be the player to move.
    ///
    /// # Errors
    ///
    /// Fails if it is not `player`'s turn, the game is over, or the cell is
    /// taken.
    #[instrument(skip(self))]
    pub fn play_as(&self, pos: Position, player: Player) -> Result<Outcome, DeviceError> {
        if self.turn() != player {
            return Err(DeviceError::WrongPlayer(player));
        }
        let before = self.outcome();
        if before.is_terminal() {
            return Err(DeviceError::GameOver(before));
        }
        self.board.claim(pos, player)?;
        self.turn.store(player.opponent().to_byte(), Ordering::Release);

        let outcome = self.outcome();
        info!(position = %pos, %player, %outcome, board = %self.board.snapshot().display(), "Move played");
        Ok(outcome)
    }
}

impl Default for SharedGame {
    fn default() -> Self {
        Self::new()
    }
}
