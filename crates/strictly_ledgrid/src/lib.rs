//! Tic-tac-toe logic for a standalone LED matrix device.
//!
//! # Architecture
//!
//! - **Board model**: cells, named positions, win and tie detection
//! - **Rotation**: quarter-turn snapshots that reduce eight lines to three
//!   canonical patterns
//! - **Strategy**: the priority-ordered decision engine for the automated
//!   player
//!
//! Everything here is pure: boards are plain values and nothing performs
//! I/O. The device crate shares the board with its display refresh.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod position;
mod rotation;
mod rules;
mod strategy;
mod types;

pub use error::EngineError;
pub use position::{Position, location_of};
pub use rotation::{QuarterTurns, rotate_clockwise, rotations};
pub use rules::{LINES, evaluate_outcome, is_winner};
pub use strategy::{Decision, Rule, choose_move, completing_cell, decide, fork_cells};
pub use types::{Board, Cell, Outcome, PlaceError, Player};
