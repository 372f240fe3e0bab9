//! Stateful game controller wrapping `GameState`.
//!
//! `Game` runs one full turn per call: validate and apply the move, crown any
//! piece that reached its far row, pass the turn, then re-check for a winner.
//! It also keeps the move history and some metadata for logging.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::board::GameState;
use crate::engine::types::{Bitboard, CheckersError, GameStatus, Move, MoveKind, Player};

// =========================================================================
// MoveRecord / TurnReport
// =========================================================================

/// A move that was accepted and played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Player,
    pub mv: Move,
    pub kind: MoveKind,
    /// Whether the moving piece was crowned on arrival.
    pub promoted: bool,
}

/// Everything the caller needs to report after a successful turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// The side that made the move.
    pub player: Player,
    pub mv: Move,
    pub kind: MoveKind,
    /// Squares crowned this turn.
    pub promoted: Bitboard,
    pub status: GameStatus,
}

// =========================================================================
// Game
// =========================================================================

/// A single checkers game with history and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    state: GameState,
    history: Vec<MoveRecord>,
    status: GameStatus,

    // Metadata
    pub id: String,
    pub started_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_state(GameState::starting())
    }

    /// Create a game from an arbitrary position.
    pub fn from_state(state: GameState) -> Self {
        let mut game = Self {
            state,
            history: Vec::new(),
            status: GameStatus::InProgress,
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        };
        game.status = game.compute_status();
        info!(game_id = %game.id, status = %game.status, "game started");
        game
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current position.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn current_turn(&self) -> Player {
        self.state.current_turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Accepted moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    // -----------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------

    /// Play one move for the side to move.
    ///
    /// Returns `CheckersError::GameOver` once a side has won and
    /// `CheckersError::IllegalMove` when the executor rejects the move. In
    /// both cases the position and turn are unchanged.
    pub fn play(&mut self, mv: Move) -> Result<TurnReport, CheckersError> {
        if let GameStatus::Won { winner } = self.status {
            return Err(CheckersError::GameOver(winner));
        }

        let player = self.state.current_turn;
        let kind = match self.state.execute_move(mv.from, mv.to) {
            Ok(kind) => kind,
            Err(err) => {
                debug!(game_id = %self.id, %player, %mv, error = %err, "move rejected");
                return Err(err.into());
            }
        };

        let promoted = self.state.check_for_promotion();
        self.state.swap_turn();
        self.status = self.compute_status();

        self.history.push(MoveRecord {
            player,
            mv,
            kind,
            promoted: promoted.is_not_empty(),
        });

        if let GameStatus::Won { winner } = self.status {
            info!(
                game_id = %self.id,
                %winner,
                moves = self.history.len(),
                elapsed_secs = (Utc::now() - self.started_at).num_seconds(),
                "game finished"
            );
        }

        Ok(TurnReport {
            player,
            mv,
            kind,
            promoted,
            status: self.status,
        })
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        match self.state.winner() {
            Some(winner) => GameStatus::Won { winner },
            None => GameStatus::InProgress,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
