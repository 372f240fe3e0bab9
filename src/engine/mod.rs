pub mod board;
pub mod game;
pub mod types;

pub use board::{start_game, GameState};
pub use game::{Game, MoveRecord, TurnReport};
pub use types::*;
