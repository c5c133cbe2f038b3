//! Device error types.

use crate::config::ConfigError;
use strictly_ledgrid::{EngineError, Outcome, PlaceError, Player};

/// Errors surfaced by the device core.
///
/// None of these occur in normal play: the scanner only offers empty
/// cells and the engine is only consulted on an open board. Seeing one
/// means an invariant broke, and the game loop stops.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum DeviceError {
    /// A move targeted a played cell.
    #[display("{}", _0)]
    #[from]
    Place(PlaceError),

    /// The decision engine found no move.
    #[display("Automated player failed: {}", _0)]
    #[from]
    Engine(EngineError),

    /// A move arrived after the game ended.
    #[display("Game is already over ({})", _0)]
    GameOver(Outcome),

    /// A move arrived for the player not on turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),

    /// Timing configuration was rejected.
    #[display("{}", _0)]
    #[from]
    Config(ConfigError),
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Place(err) => Some(err),
            DeviceError::Engine(err) => Some(err),
            DeviceError::Config(err) => Some(err),
            DeviceError::GameOver(_) | DeviceError::WrongPlayer(_) => None,
        }
    }
}
