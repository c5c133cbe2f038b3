//! Tests for the refresh task, the game loop and the power-on sequence.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{BouncyMatrix, RecordingSurface, ScriptedPlayer};
use strictly_ledgrid::{Cell, Outcome, Player, Position};
use strictly_ledgrid_device::{
    AutomatedOpponent, DeviceError, GameLoop, Lamp, Multiplexer, PlayMode, Scanner, SharedGame,
    TimingConfig, power_on, spawn_refresh,
};
use tokio::time::Instant;

fn game_loop(
    game: &Arc<SharedGame>,
    script: &[Position],
    opponent: Option<AutomatedOpponent>,
) -> GameLoop<ScriptedPlayer> {
    let config = TimingConfig::default();
    GameLoop::new(
        Arc::clone(game),
        Scanner::new(ScriptedPlayer::new(Arc::clone(game), script.to_vec()), &config),
        opponent,
        config.scan_interval(),
    )
}

fn marks(game: &SharedGame, player: Player) -> usize {
    game.board()
        .snapshot()
        .cells()
        .iter()
        .filter(|c| **c == Cell::Occupied(player))
        .count()
}

fn hold_everything() -> BouncyMatrix {
    Position::ALL
        .into_iter()
        .fold(BouncyMatrix::default(), |m, pos| m.hold(pos))
}

#[tokio::test(start_paused = true)]
async fn test_two_player_game_to_win() {
    let game = Arc::new(SharedGame::new());
    let script = [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::TopCenter,
        Position::Center,
        Position::TopRight,
    ];

    let outcome = game_loop(&game, &script, None)
        .run()
        .await
        .expect("Game completes");

    assert_eq!(outcome, Outcome::Won(Player::Player1));
    assert!(game.board().is_empty(Position::BottomRight));
}

#[tokio::test(start_paused = true)]
async fn test_automated_player_never_loses_scripted_human() {
    let game = Arc::new(SharedGame::new());
    let config = TimingConfig::default();
    let opponent = AutomatedOpponent::new(Player::Player2, &config);

    let outcome = game_loop(&game, &Position::ALL, Some(opponent))
        .run()
        .await
        .expect("Game completes");

    assert!(outcome.is_terminal());
    assert_ne!(outcome, Outcome::Won(Player::Player1));
    let (human, engine) = (marks(&game, Player::Player1), marks(&game, Player::Player2));
    assert!(human == engine || human == engine + 1);
}

#[tokio::test(start_paused = true)]
async fn test_automated_first_player_takes_center_after_delay() {
    let game = Arc::new(SharedGame::new());
    let config = TimingConfig::default();
    let opponent = AutomatedOpponent::new(Player::Player1, &config);
    let mut game_loop = game_loop(&game, &[], Some(opponent));

    let task = tokio::spawn(async move { game_loop.run().await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(game.board().is_empty(Position::Center));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(game.board().cell(Position::Center), Cell::Occupied(Player::Player1));
    assert_eq!(game.turn(), Player::Player2);

    task.abort();
}

#[tokio::test(start_paused = true)]
async fn test_opponent_waits_think_delay() {
    let game = SharedGame::new();
    let opponent = AutomatedOpponent::new(Player::Player1, &TimingConfig::default());
    let start = Instant::now();

    let outcome = opponent.take_turn(&game).await.expect("Open board");

    assert_eq!(outcome, Outcome::InProgress);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_opponent_out_of_turn_rejected() {
    let game = SharedGame::new();
    let opponent = AutomatedOpponent::new(Player::Player2, &TimingConfig::default());
    assert_eq!(
        opponent.take_turn(&game).await,
        Err(DeviceError::WrongPlayer(Player::Player2))
    );
}

#[test]
fn test_opponent_only_in_automated_mode() {
    let config = TimingConfig::default();
    assert!(AutomatedOpponent::for_mode(PlayMode::TwoPlayer, Player::Player2, &config).is_none());
    let opponent = AutomatedOpponent::for_mode(PlayMode::Automated, Player::Player2, &config)
        .expect("Automated mode");
    assert_eq!(opponent.player(), Player::Player2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_runs_during_debounce() {
    let config = TimingConfig::from_toml("debounce_us = 100000").expect("Valid config");
    let game = Arc::new(SharedGame::new());
    let surface = RecordingSurface::default();
    let refresh = spawn_refresh(
        Multiplexer::new(surface.clone(), &config),
        Arc::clone(&game),
        config.tick_period(),
    );

    let mut scanner = Scanner::new(BouncyMatrix::default().hold(Position::Center), &config);
    let pressed = scanner.poll_pressed_cell(game.board()).await;

    assert_eq!(pressed, Some(Position::Center));
    assert!(surface.cycles() >= 10, "only {} refreshes", surface.cycles());
    refresh.abort();
}

#[tokio::test(start_paused = true)]
async fn test_refresh_keeps_period() {
    let config = TimingConfig::default();
    let surface = RecordingSurface::default();
    let refresh = spawn_refresh(
        Multiplexer::new(surface.clone(), &config),
        Arc::new(SharedGame::new()),
        config.tick_period(),
    );

    // First tick fires at once, then one per 8.192 ms.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let cycles = surface.cycles();
    assert!((12..=13).contains(&cycles), "{} refreshes in 100 ms", cycles);
    refresh.abort();
}

#[tokio::test(start_paused = true)]
async fn test_power_on_two_player_halts_on_win() {
    let surface = RecordingSurface::default();
    let halted = power_on(
        surface.clone(),
        hold_everything(),
        PlayMode::TwoPlayer,
        Player::Player2,
        &TimingConfig::default(),
    )
    .await
    .expect("Game completes");

    // Column-major scan: 0, 3, 6, 1, 4, 7, 2 closes the anti-diagonal.
    assert_eq!(halted.outcome(), Outcome::Won(Player::Player1));
    assert!(halted.game().board().is_empty(Position::BottomRight));

    surface.clear();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let shown = surface.status_pulses();
    assert!(!shown.is_empty());
    assert!(shown.iter().all(|p| *p == vec![Lamp::Player1]));

    halted.power_off();
    tokio::task::yield_now().await;
    surface.clear();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(surface.cycles(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_power_on_automated_never_loses() {
    let halted = power_on(
        RecordingSurface::default(),
        hold_everything(),
        PlayMode::Automated,
        Player::Player2,
        &TimingConfig::default(),
    )
    .await
    .expect("Game completes");

    assert!(halted.outcome().is_terminal());
    assert_ne!(halted.outcome(), Outcome::Won(Player::Player1));
    halted.power_off();
}

#[tokio::test(start_paused = true)]
async fn test_power_on_rejects_invalid_timing() {
    let config: TimingConfig = toml::from_str("pulse_width_us = 5000").expect("Parses");
    let result = power_on(
        RecordingSurface::default(),
        BouncyMatrix::default(),
        PlayMode::Automated,
        Player::Player2,
        &config,
    )
    .await;
    assert!(matches!(result, Err(DeviceError::Config(_))));
}
