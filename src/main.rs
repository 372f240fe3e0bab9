use std::io;

use rust_checkers::cli;
use rust_checkers::config::AppConfig;
use rust_checkers::engine::Game;

fn main() -> io::Result<()> {
    let config = AppConfig::from_env();

    // Initialize tracing (structured logging) on stderr; the board owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("rust-checkers v{} starting", env!("CARGO_PKG_VERSION"));

    let mut game = Game::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let winner = cli::run(&mut game, &config, stdin.lock(), stdout.lock())?;

    tracing::info!(
        game_id = %game.id,
        moves = game.move_count(),
        winner = ?winner,
        "session ended"
    );
    Ok(())
}
