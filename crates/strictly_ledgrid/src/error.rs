//! Decision engine errors.

/// Errors from the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// No rule produced a cell. The caller asked on a finished board.
    #[display("No legal move found")]
    NoLegalMove,
}

impl std::error::Error for EngineError {}
