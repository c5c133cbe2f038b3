//! Priority-ordered move selection for the automated player.
//!
//! Rules are tried in order and the first that yields a cell wins:
//!
//! 1. win now
//! 2. block a loss
//! 3. fork
//! 4. block the opponent's fork
//! 5. center
//! 6. corner opposite the opponent, else any corner
//! 7. side
//!
//! Rules 1-4 test canonical patterns against each quarter-turn of a board
//! snapshot, so each pattern is written once. The same routines answer
//! "can I" and "can they" by taking the role as a parameter.

use crate::error::EngineError;
use crate::position::Position;
use crate::rotation::rotations;
use crate::rules::LINES;
use crate::types::{Board, Cell, Player};
use tracing::{debug, instrument, warn};

/// Top row, middle column and main diagonal. Their four orientations cover
/// all eight lines.
const CANONICAL_LINES: [[Position; 3]; 3] = [
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopLeft, Position::Center, Position::BottomRight],
];

/// Canonical corner for fork search and the lines through it.
const FORK_CORNER: Position = Position::BottomLeft;
const FORK_CORNER_LINES: [[Position; 3]; 3] = [
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Canonical side for fork search and the lines through it.
const FORK_SIDE: Position = Position::BottomCenter;
const FORK_SIDE_LINES: [[Position; 3]; 2] = [
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
];

const CENTER_LINES: [[Position; 3]; 4] = [
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// The rule that produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Rule {
    /// Completes one of our lines.
    WinNow,
    /// Fills the cell that would complete an opponent line.
    BlockLoss,
    /// Opens two lines at once.
    Fork,
    /// Takes away the opponent's fork.
    BlockFork,
    /// Takes the center.
    Center,
    /// Takes the corner opposite an opponent corner.
    OppositeCorner,
    /// Takes any free corner.
    Corner,
    /// Takes a free side.
    Side,
}

/// A chosen move and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    position: Position,
    rule: Rule,
}

impl Decision {
    /// The cell to play.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The rule that fired.
    pub fn rule(&self) -> Rule {
        self.rule
    }
}

/// Picks the cell `me` should play.
///
/// Callers only ask while the game is in progress, so an empty cell exists.
///
/// # Errors
///
/// Returns [`EngineError::NoLegalMove`] if no rule produces a cell. That
/// only happens on a full board and means the caller broke its contract.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn choose_move(board: &Board, me: Player) -> Result<Position, EngineError> {
    decide(board, me).map(|decision| decision.position())
}

/// Like [`choose_move`] but also reports which rule fired.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn decide(board: &Board, me: Player) -> Result<Decision, EngineError> {
    let decision = first_applicable(board, me).ok_or_else(|| {
        warn!("No rule produced a move");
        EngineError::NoLegalMove
    })?;
    debug!(rule = %decision.rule, position = %decision.position, "Move chosen");
    Ok(decision)
}

fn first_applicable(board: &Board, me: Player) -> Option<Decision> {
    let opponent = me.opponent();
    let found = |rule: Rule| move |position: Position| Decision { position, rule };

    completing_cell(board, me)
        .map(found(Rule::WinNow))
        .or_else(|| completing_cell(board, opponent).map(found(Rule::BlockLoss)))
        .or_else(|| fork_cells(board, me).first().copied().map(found(Rule::Fork)))
        .or_else(|| counter_fork(board, me).map(found(Rule::BlockFork)))
        .or_else(|| {
            board
                .is_empty(Position::Center)
                .then_some(Position::Center)
                .map(found(Rule::Center))
        })
        .or_else(|| opposite_corner(board, opponent).map(found(Rule::OppositeCorner)))
        .or_else(|| free_corner(board).map(found(Rule::Corner)))
        .or_else(|| free_side(board).map(found(Rule::Side)))
}

/// Finds a cell that completes a line for `role`.
///
/// Scans the canonical lines in each orientation of a private snapshot and
/// maps the hit back to the real board.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn completing_cell(board: &Board, role: Player) -> Option<Position> {
    rotations(*board).find_map(|(turns, snapshot)| {
        CANONICAL_LINES
            .iter()
            .find_map(|line| completion(&snapshot, line, role))
            .map(|pos| turns.to_board(pos))
    })
}

/// Finds every cell where `role` would open two lines at once.
///
/// The canonical corner and side are checked in each orientation; the
/// center is its own orientation class and is checked once.
#[instrument(skip(board), fields(board = %board.display()))]
pub fn fork_cells(board: &Board, role: Player) -> Vec<Position> {
    let mut cells = Vec::new();
    for (turns, snapshot) in rotations(*board) {
        let candidates: [(Position, &[[Position; 3]]); 2] = [
            (FORK_CORNER, &FORK_CORNER_LINES),
            (FORK_SIDE, &FORK_SIDE_LINES),
        ];
        for (cell, lines) in candidates {
            if forks_at(&snapshot, cell, lines, role) {
                let real = turns.to_board(cell);
                if !cells.contains(&real) {
                    cells.push(real);
                }
            }
        }
    }
    if forks_at(board, Position::Center, &CENTER_LINES, role) {
        cells.push(Position::Center);
    }
    cells
}

/// Rule 4: answer an opponent fork.
///
/// Prefers a fork cell whose occupation leaves the opponent no fork at all.
/// Otherwise makes a two-in-a-row whose forced reply is not an opponent
/// fork cell. Otherwise takes an open side.
fn counter_fork(board: &Board, me: Player) -> Option<Position> {
    let opponent = me.opponent();
    let forks = fork_cells(board, opponent);
    if forks.is_empty() {
        return None;
    }

    if let Some(&cell) = forks
        .iter()
        .find(|&&cell| fork_cells(&board.with(cell, me), opponent).is_empty())
    {
        debug!(cell = %cell, "Structural fork counter");
        return Some(cell);
    }

    let forcing = Position::SIDES
        .into_iter()
        .chain(Position::CORNERS)
        .filter(|&cell| board.is_empty(cell))
        .find(|&cell| {
            let next = board.with(cell, me);
            let replies = threat_cells(&next, me);
            let their_forks = fork_cells(&next, opponent);
            !replies.is_empty() && replies.iter().all(|reply| !their_forks.contains(reply))
        });
    if let Some(cell) = forcing {
        debug!(cell = %cell, "Forcing fork counter");
        return Some(cell);
    }

    debug!("No structural fork counter, falling back to a side");
    free_side(board)
}

/// Every cell that would complete a line for `role`, over all eight lines.
fn threat_cells(board: &Board, role: Player) -> Vec<Position> {
    let mut cells = Vec::new();
    for line in &LINES {
        if let Some(pos) = completion(board, line, role)
            && !cells.contains(&pos)
        {
            cells.push(pos);
        }
    }
    cells
}

/// The empty cell of a line holding two `role` marks, if any.
fn completion(board: &Board, line: &[Position; 3], role: Player) -> Option<Position> {
    let mark = Cell::Occupied(role);
    let owned = line.iter().filter(|&&pos| board.get(pos) == mark).count();
    let mut empty = line.iter().copied().filter(|&pos| board.is_empty(pos));
    match (owned, empty.next(), empty.next()) {
        (2, Some(pos), None) => Some(pos),
        _ => None,
    }
}

/// True if `line` holds one `role` mark and two empty cells.
fn opens(board: &Board, line: &[Position; 3], role: Player) -> bool {
    let mark = Cell::Occupied(role);
    let owned = line.iter().filter(|&&pos| board.get(pos) == mark).count();
    let empty = line.iter().filter(|&&pos| board.is_empty(pos)).count();
    owned == 1 && empty == 2
}

fn forks_at(board: &Board, cell: Position, lines: &[[Position; 3]], role: Player) -> bool {
    board.is_empty(cell) && lines.iter().filter(|line| opens(board, line, role)).count() >= 2
}

fn opposite_corner(board: &Board, opponent: Player) -> Option<Position> {
    Position::CORNERS.into_iter().find(|&corner| {
        board.is_empty(corner) && board.get(corner.opposite()) == Cell::Occupied(opponent)
    })
}

fn free_corner(board: &Board) -> Option<Position> {
    Position::CORNERS.into_iter().find(|&corner| board.is_empty(corner))
}

fn free_side(board: &Board) -> Option<Position> {
    Position::SIDES.into_iter().find(|&side| board.is_empty(side))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(bytes: [u8; 9]) -> Board {
        Board::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_completing_cell_finds_every_line() {
        for line in LINES {
            for gap in 0..3 {
                let mut b = Board::new();
                for (i, &pos) in line.iter().enumerate() {
                    if i != gap {
                        b.place(pos, Player::Player1).unwrap();
                    }
                }
                assert_eq!(completing_cell(&b, Player::Player1), Some(line[gap]));
                assert_eq!(completing_cell(&b, Player::Player2), None);
            }
        }
    }

    #[test]
    fn test_completing_cell_ignores_blocked_line() {
        let b = board([1, 1, 2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(completing_cell(&b, Player::Player1), None);
    }

    #[test]
    fn test_fork_cells_two_adjacent_sides() {
        // Sides 5 and 7 meet at corner 8.
        let b = board([0, 0, 0, 0, 2, 1, 0, 1, 0]);
        assert_eq!(fork_cells(&b, Player::Player1), vec![Position::BottomRight]);
    }

    #[test]
    fn test_fork_cells_opposite_corners() {
        let b = board([1, 0, 0, 0, 2, 0, 0, 0, 1]);
        let mut forks = fork_cells(&b, Player::Player1);
        forks.sort();
        assert_eq!(forks, vec![Position::TopRight, Position::BottomLeft]);
    }

    #[test]
    fn test_fork_cells_center() {
        // Player 1 on 1 and 3: center opens 1-4-7 and 3-4-5.
        let b = board([2, 1, 0, 1, 0, 0, 0, 0, 2]);
        assert!(fork_cells(&b, Player::Player1).contains(&Position::Center));
    }

    #[test]
    fn test_threat_cells_lists_each_gap_once() {
        let b = board([1, 1, 0, 1, 0, 0, 0, 0, 0]);
        let mut threats = threat_cells(&b, Player::Player1);
        threats.sort();
        assert_eq!(threats, vec![Position::TopRight, Position::BottomLeft]);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board([1, 2, 1, 1, 2, 2, 2, 1, 1]);
        assert_eq!(choose_move(&b, Player::Player2), Err(EngineError::NoLegalMove));
    }
}
