use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::cli::input::parse_move_line;
use crate::config::AppConfig;
use crate::engine::game::Game;
use crate::engine::types::{CheckersError, MoveKind, Player};

const WELCOME: &str = "Welcome to Bitboard Checkers!";
const USAGE: &str =
    "Enter moves using Letter-number notation (Ex:'A3 B4' for a move or 'C3 E5' for a capture).";

/// Drive `game` from `input` until one side wins or input runs out.
///
/// Malformed lines and illegal moves are reported on `output` and re-prompted
/// without touching the game. Returns the winner, if the game was decided.
pub fn run<R: BufRead, W: Write>(
    game: &mut Game,
    config: &AppConfig,
    mut input: R,
    mut output: W,
) -> io::Result<Option<Player>> {
    writeln!(output, "{WELCOME}")?;
    writeln!(output, "{USAGE}")?;

    let mut line = Vec::new();
    let winner = loop {
        if config.show_board {
            writeln!(output)?;
            writeln!(output, "{}", game.state())?;
        } else {
            writeln!(output, "Turn: {}", game.current_turn().turn_label())?;
        }

        if game.state().check_for_win() {
            if let Some(winner) = game.state().winner() {
                writeln!(output)?;
                writeln!(
                    output,
                    "*** {} has no pieces left. {winner} wins! ***",
                    !winner
                )?;
                break Some(winner);
            }
        }

        write!(output, "Enter move: ")?;
        output.flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            info!(game_id = %game.id, moves = game.move_count(), "input closed");
            break None;
        }

        let parsed = std::str::from_utf8(&line)
            .map_err(|_| CheckersError::InvalidInput(String::from_utf8_lossy(&line).into_owned()))
            .and_then(parse_move_line);
        let mv = match parsed {
            Ok(mv) => mv,
            Err(CheckersError::InvalidSquare(label)) => {
                debug!(%label, "invalid square label");
                writeln!(output, "Invalid square name. Please use A1-H8.")?;
                continue;
            }
            Err(err) => {
                debug!(error = %err, "unparseable input");
                writeln!(output, "Invalid input format. Please try again.")?;
                continue;
            }
        };

        match game.play(mv) {
            Ok(report) => {
                if let MoveKind::Capture { .. } = report.kind {
                    writeln!(output, "Another one bites the dust...")?;
                }
                if report.promoted.is_not_empty() {
                    writeln!(output, "{} piece promoted to King!", report.player)?;
                }
            }
            Err(CheckersError::IllegalMove(err)) => {
                if let Some(text) = err.diagnostic() {
                    writeln!(output, "Error: {text}")?;
                }
            }
            Err(err) => writeln!(output, "Error: {err}")?,
        }
    };

    writeln!(output, "Game over. Good game :)")?;
    output.flush()?;
    Ok(winner)
}
