//! Named board positions and the matrix coordinate map.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the board (0-8, row-major).
///
/// ```text
///  [0][1][2]      [0,0][0,1][0,2]
///  [3][4][5]      [1,0][1,1][1,2]
///  [6][7][8]      [2,0][2,1][2,2]
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Corners in the order the engine tries them.
    pub const CORNERS: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomRight,
        Position::BottomLeft,
    ];

    /// Sides in the order the engine tries them: top, right, bottom, left.
    pub const SIDES: [Position; 4] = [
        Position::TopCenter,
        Position::MiddleRight,
        Position::BottomCenter,
        Position::MiddleLeft,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row of this position (0-2).
    pub fn row(self) -> usize {
        self.index() / 3
    }

    /// Column of this position (0-2).
    pub fn col(self) -> usize {
        self.index() % 3
    }

    /// Returns true for the four corner cells.
    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    /// Returns true for the four edge (non-corner, non-center) cells.
    pub fn is_side(self) -> bool {
        Self::SIDES.contains(&self)
    }

    /// Reflection through the center: 0 <-> 8, 2 <-> 6, 1 <-> 7, 3 <-> 5.
    pub fn opposite(self) -> Self {
        Self::ALL[8 - self.index()]
    }
}

/// Maps a matrix coordinate to a board position.
///
/// Returns `None` (the "invalid" sentinel) unless both `row` and `col`
/// are in `0..3`. Callers check before indexing.
#[instrument]
pub fn location_of(row: usize, col: usize) -> Option<Position> {
    if row < 3 && col < 3 {
        Position::from_index(row * 3 + col)
    } else {
        None
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.index())
    }
}
