//! Collaborator interfaces for the lamp and button hardware.
//!
//! The core never touches pins. It talks to an [`IndicatorSurface`] that
//! lights one lamp at a time and a [`ButtonMatrix`] that is scanned one
//! drive line at a time. Electrical addressing lives behind these traits.

use std::time::Duration;
use strictly_ledgrid::{Player, Position};

/// One multiplexed line of the lamp grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorLine {
    /// The red/green pair behind a board cell.
    Cell(Position),
    /// The pair of whose-turn / who-won lamps.
    Status,
}

/// The lamp colour within a selected line, one per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Lamp {
    /// Player 1's lamp (green).
    Player1,
    /// Player 2's lamp (red).
    Player2,
}

impl From<Player> for Lamp {
    fn from(player: Player) -> Self {
        match player {
            Player::Player1 => Lamp::Player1,
            Player::Player2 => Lamp::Player2,
        }
    }
}

/// Lamp output driven by the display multiplexer.
///
/// Only one line is selected at a time. `pulse` lights a lamp on the
/// selected line for `width` and turns it off again before returning.
pub trait IndicatorSurface: Send {
    /// Selects a line, deselecting any other.
    fn select(&mut self, line: IndicatorLine);

    /// Lights `lamp` on the selected line for `width`.
    fn pulse(&mut self, lamp: Lamp, width: Duration);

    /// Deselects the current line.
    fn deselect(&mut self);

    /// Releases every line; called once at the end of each refresh cycle.
    fn blank(&mut self);
}

/// A 3x3 matrix of momentary contacts.
///
/// The scanner drives one column at a time and senses the rows crossing it.
pub trait ButtonMatrix: Send {
    /// Drives `column` (0-2) active, releasing the others.
    fn drive(&mut self, column: usize);

    /// Returns true if the contact between the driven column and `row`
    /// (0-2) is closed.
    fn is_active(&self, row: usize) -> bool;

    /// Releases all columns.
    fn release(&mut self);
}

/// The power-on mode switch, read once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PlayMode {
    /// One human against the automated player.
    Automated,
    /// Two humans sharing the buttons.
    TwoPlayer,
}
