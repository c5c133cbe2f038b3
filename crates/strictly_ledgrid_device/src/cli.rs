//! Command-line interface for the host build of the device.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use strictly_ledgrid::Player;
use strictly_ledgrid_device::PlayMode;

/// Strictly Ledgrid - tic-tac-toe on a multiplexed lamp grid
#[derive(Parser, Debug)]
#[command(name = "strictly_ledgrid")]
#[command(about = "Tic-tac-toe device core driven from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a timing config file (TOML). Reference timings if omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Two humans share the buttons; no automated player
    #[arg(long)]
    pub two_player: bool,

    /// Side the automated player takes
    #[arg(long, value_enum, default_value_t = Seat::Player2)]
    pub automated_player: Seat,

    /// How long a typed digit holds its button, in milliseconds
    #[arg(long, default_value = "150")]
    pub key_hold_ms: u64,
}

impl Cli {
    /// The mode switch position.
    pub fn mode(&self) -> PlayMode {
        if self.two_player {
            PlayMode::TwoPlayer
        } else {
            PlayMode::Automated
        }
    }

    /// Button hold per typed digit.
    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}

/// A side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Seat {
    /// Moves first
    Player1,
    /// Moves second
    Player2,
}

impl From<Seat> for Player {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::Player1 => Player::Player1,
            Seat::Player2 => Player::Player2,
        }
    }
}
