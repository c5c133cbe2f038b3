//! Periodic display refresh and the foreground game loop.
//!
//! Two activities share the [`SharedGame`]: a refresh task that redraws the
//! lamps on a fixed tick, and the game loop that scans buttons and applies
//! moves. Every wait in the game loop is an async sleep, so on any executor
//! the refresh gets its turn while the loop debounces, thinks or idles.

use std::sync::Arc;
use std::time::Duration;

use derive_new::new;
use strictly_ledgrid::{Outcome, Player};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};

use crate::config::TimingConfig;
use crate::error::DeviceError;
use crate::hardware::{ButtonMatrix, IndicatorSurface, PlayMode};
use crate::multiplexer::Multiplexer;
use crate::opponent::AutomatedOpponent;
use crate::scanner::Scanner;
use crate::shared::SharedGame;

/// Spawns the periodic refresh task.
///
/// The first cycle runs immediately. A cycle that overruns its tick pushes
/// the next one back by a full period instead of firing a burst to catch
/// up. The task runs until aborted.
#[instrument(skip(multiplexer, game))]
pub fn spawn_refresh<S>(
    mut multiplexer: Multiplexer<S>,
    game: Arc<SharedGame>,
    period: Duration,
) -> JoinHandle<()>
where
    S: IndicatorSurface + 'static,
{
    debug!("Starting display refresh");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            multiplexer.refresh(&game);
        }
    })
}

/// The foreground loop: scan, play, let the automated player answer.
#[derive(Debug, new)]
pub struct GameLoop<M> {
    game: Arc<SharedGame>,
    scanner: Scanner<M>,
    opponent: Option<AutomatedOpponent>,
    scan_interval: Duration,
}

impl<M: ButtonMatrix> GameLoop<M> {
    /// Plays until the game is decided and returns the outcome.
    ///
    /// # Errors
    ///
    /// Any [`DeviceError`] stops the loop. The scanner only reports empty
    /// cells and the opponent only moves on an open board, so an error
    /// here is a broken invariant.
    #[instrument(skip(self), fields(automated = ?self.opponent.as_ref().map(|o| o.player())))]
    pub async fn run(&mut self) -> Result<Outcome, DeviceError> {
        info!("Game started");
        loop {
            let outcome = self.game.outcome();
            if outcome.is_terminal() {
                info!(%outcome, "Game finished");
                return Ok(outcome);
            }

            if let Some(opponent) = &self.opponent
                && opponent.player() == self.game.turn()
            {
                opponent.take_turn(&self.game).await?;
                continue;
            }

            match self.scanner.poll_pressed_cell(self.game.board()).await {
                Some(position) => {
                    self.game.play(position)?;
                }
                None => tokio::time::sleep(self.scan_interval).await,
            }
        }
    }

    /// Returns the shared game.
    pub fn game(&self) -> &Arc<SharedGame> {
        &self.game
    }
}

/// A finished game whose result is still on display.
#[derive(Debug)]
pub struct Halted {
    outcome: Outcome,
    game: Arc<SharedGame>,
    refresh: JoinHandle<()>,
}

impl Halted {
    /// The final outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The final game state.
    pub fn game(&self) -> &SharedGame {
        &self.game
    }

    /// Stops the display refresh.
    pub fn power_off(self) {
        info!("Powering off");
        self.refresh.abort();
    }
}

/// Runs one game from power-on to the halt state.
///
/// Starts the refresh task, then plays in the foreground until the game is
/// decided. The mode is fixed for the whole game. On success the refresh
/// keeps showing the result until [`Halted::power_off`].
///
/// # Errors
///
/// Rejected timing configuration, or any error from [`GameLoop::run`]. The
/// refresh task is stopped before an error is returned.
#[instrument(skip(surface, matrix, config))]
pub async fn power_on<S, M>(
    surface: S,
    matrix: M,
    mode: PlayMode,
    automated_player: Player,
    config: &TimingConfig,
) -> Result<Halted, DeviceError>
where
    S: IndicatorSurface + 'static,
    M: ButtonMatrix,
{
    config.validate()?;
    info!(%mode, "Powering on");

    let game = Arc::new(SharedGame::new());
    let refresh = spawn_refresh(
        Multiplexer::new(surface, config),
        Arc::clone(&game),
        config.tick_period(),
    );

    let opponent = AutomatedOpponent::for_mode(mode, automated_player, config);
    let mut game_loop = GameLoop::new(
        Arc::clone(&game),
        Scanner::new(matrix, config),
        opponent,
        config.scan_interval(),
    );

    match game_loop.run().await {
        Ok(outcome) => Ok(Halted {
            outcome,
            game,
            refresh,
        }),
        Err(err) => {
            error!(error = %err, "Game loop stopped");
            refresh.abort();
            Err(err)
        }
    }
}
