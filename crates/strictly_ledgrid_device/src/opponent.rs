//! The automated player.

use std::time::Duration;
use strictly_ledgrid::{Outcome, Player, choose_move};
use tracing::{debug, info, instrument};

use crate::config::TimingConfig;
use crate::error::DeviceError;
use crate::hardware::PlayMode;
use crate::shared::SharedGame;

/// Plays one side of the board with the decision engine.
#[derive(Debug, Clone)]
pub struct AutomatedOpponent {
    player: Player,
    think_delay: Duration,
}

impl AutomatedOpponent {
    /// Creates an opponent playing as `player`.
    pub fn new(player: Player, config: &TimingConfig) -> Self {
        Self {
            player,
            think_delay: config.think_delay(),
        }
    }

    /// Creates an opponent only when the mode switch asks for one.
    pub fn for_mode(mode: PlayMode, player: Player, config: &TimingConfig) -> Option<Self> {
        match mode {
            PlayMode::Automated => Some(Self::new(player, config)),
            PlayMode::TwoPlayer => None,
        }
    }

    /// The side this opponent plays.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Waits the thinking delay, then plays the engine's move.
    ///
    /// The decision itself is instant; the pause only keeps the reply from
    /// landing the moment the human lets go of the button. The display
    /// keeps refreshing while it waits.
    ///
    /// # Errors
    ///
    /// [`DeviceError::Engine`] if the engine finds no move, which the game
    /// loop rules out by only calling this on an open board.
    #[instrument(skip(self, game), fields(player = %self.player))]
    pub async fn take_turn(&self, game: &SharedGame) -> Result<Outcome, DeviceError> {
        debug!(delay = ?self.think_delay, "Thinking");
        tokio::time::sleep(self.think_delay).await;

        let snapshot = game.board().snapshot();
        let position = choose_move(&snapshot, self.player)?;
        info!(%position, "Automated player moves");
        game.play_as(position, self.player)
    }
}
