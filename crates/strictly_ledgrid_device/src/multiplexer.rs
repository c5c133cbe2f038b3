//! Time-multiplexed lamp refresh.
//!
//! One call to [`Multiplexer::refresh`] is one tick: each of the nine cell
//! lines is selected in turn and the owner's lamp pulsed, then the status
//! line shows the winner (steady) or whose turn it is (slow blink).

use std::time::Duration;
use strictly_ledgrid::{Outcome, Player, Position};
use tracing::{debug, trace};

use crate::config::TimingConfig;
use crate::hardware::{IndicatorLine, IndicatorSurface, Lamp};
use crate::shared::SharedGame;

/// Slow blink counter for the whose-turn lamp.
///
/// Advances once per tick while the game is in progress and flips every
/// `period` ticks. Starts dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPhase {
    count: u16,
    period: u16,
    lit: bool,
}

impl BlinkPhase {
    /// Creates a phase that toggles every `period` ticks (at least one).
    pub fn new(period: u16) -> Self {
        Self {
            count: 0,
            period: period.max(1),
            lit: false,
        }
    }

    /// Counts one tick and returns whether the lamp is lit afterwards.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            self.lit = !self.lit;
            debug!(lit = self.lit, "Turn lamp toggled");
        }
        self.lit
    }

    /// Whether the lamp is currently lit.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

/// Drives an [`IndicatorSurface`] from the shared game state.
#[derive(Debug)]
pub struct Multiplexer<S> {
    surface: S,
    blink: BlinkPhase,
    pulse_width: Duration,
}

impl<S: IndicatorSurface> Multiplexer<S> {
    /// Creates a multiplexer with the configured pulse width and blink rate.
    pub fn new(surface: S, config: &TimingConfig) -> Self {
        Self {
            surface,
            blink: BlinkPhase::new(*config.blink_ticks()),
            pulse_width: config.pulse_width(),
        }
    }

    /// Runs one full refresh cycle.
    ///
    /// Reads the board cell by cell and never writes to it.
    pub fn refresh(&mut self, game: &SharedGame) {
        for pos in Position::ALL {
            self.surface.select(IndicatorLine::Cell(pos));
            if let Some(owner) = game.board().cell(pos).owner() {
                self.surface.pulse(owner.into(), self.pulse_width);
            }
            self.surface.deselect();
        }

        self.surface.select(IndicatorLine::Status);
        let outcome = game.outcome();
        match outcome {
            Outcome::Won(winner) => self.surface.pulse(winner.into(), self.pulse_width),
            Outcome::Tie => {
                self.surface.pulse(Lamp::Player2, self.pulse_width);
                self.surface.pulse(Lamp::Player1, self.pulse_width);
            }
            Outcome::InProgress => {
                if self.blink.tick() {
                    let turn: Player = game.turn();
                    self.surface.pulse(turn.into(), self.pulse_width);
                }
            }
        }
        self.surface.deselect();
        self.surface.blank();
        trace!(%outcome, blink = self.blink.is_lit(), "Refresh cycle complete");
    }

    /// Returns the blink state.
    pub fn blink(&self) -> &BlinkPhase {
        &self.blink
    }

    /// Returns the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consumes the multiplexer, returning the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
