//! Device core for a standalone tic-tac-toe board with a multiplexed lamp
//! grid and a 3x3 button matrix.
//!
//! # Architecture
//!
//! - **Shared state**: atomic cells and turn marker, written by the game
//!   loop and read by the display refresh without locks
//! - **Hardware**: the [`IndicatorSurface`] and [`ButtonMatrix`] seams
//! - **Multiplexer**: one lamp line at a time, once per tick
//! - **Scanner**: column-driven, debounced button polling
//! - **Opponent**: the automated player, backed by [`strictly_ledgrid`]
//! - **Runtime**: the refresh task and the foreground game loop
//! - **Console**: terminal stand-ins for the hardware

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod console;
mod error;
mod hardware;
mod multiplexer;
mod opponent;
mod runtime;
mod scanner;
mod shared;

pub use config::{ConfigError, PULSE_HEADROOM, TimingConfig};
pub use console::{
    Contacts, LampFrame, TerminalIndicators, VirtualMatrix, key_position, spawn_keyboard,
};
pub use error::DeviceError;
pub use hardware::{ButtonMatrix, IndicatorLine, IndicatorSurface, Lamp, PlayMode};
pub use multiplexer::{BlinkPhase, Multiplexer};
pub use opponent::AutomatedOpponent;
pub use runtime::{GameLoop, Halted, power_on, spawn_refresh};
pub use scanner::Scanner;
pub use shared::{SharedBoard, SharedGame};
