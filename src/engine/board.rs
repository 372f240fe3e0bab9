//! Bitboard checkers position.
//!
//! `GameState` stores the board as four bitboards (per-side occupancy plus
//! per-side king subsets) and the side to move. Move validation works on the
//! linear index directly: on a row-major 8×8 board a diagonal step changes the
//! index by 7 or 9 and a jump by 14 or 18, with the column delta ruling out
//! wrap-around between rows.

use std::fmt;

use tracing::{debug, info};

use crate::engine::types::{Bitboard, CheckersError, MoveError, MoveKind, Player, Square};

/// Red's opening squares: the dark squares of rows 1-3.
pub const RED_START: Bitboard = Bitboard(0x0000_0000_0055_AA55);

/// Black's opening squares: the dark squares of rows 6-8.
pub const BLACK_START: Bitboard = Bitboard(0xAA55_AA00_0000_0000);

/// Row 8, where red pieces are crowned.
pub const RED_PROMOTION_ROW: Bitboard = Bitboard(0xFF00_0000_0000_0000);

/// Row 1, where black pieces are crowned.
pub const BLACK_PROMOTION_ROW: Bitboard = Bitboard(0x0000_0000_0000_00FF);

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// A complete checkers position.
///
/// Invariants: `red_kings ⊆ red_pieces`, `black_kings ⊆ black_pieces`, and the
/// two occupancy bitboards never overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Every red piece, kings included.
    pub red_pieces: Bitboard,
    /// Every black piece, kings included.
    pub black_pieces: Bitboard,
    pub red_kings: Bitboard,
    pub black_kings: Bitboard,
    /// Whose turn it is.
    pub current_turn: Player,
}

/// The standard opening position with Red to move.
pub fn start_game() -> GameState {
    GameState::starting()
}

impl GameState {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Standard starting position.
    pub fn starting() -> Self {
        GameState {
            red_pieces: RED_START,
            black_pieces: BLACK_START,
            red_kings: Bitboard::EMPTY,
            black_kings: Bitboard::EMPTY,
            current_turn: Player::Red,
        }
    }

    /// A board with no pieces.
    pub fn empty(current_turn: Player) -> Self {
        GameState {
            red_pieces: Bitboard::EMPTY,
            black_pieces: Bitboard::EMPTY,
            red_kings: Bitboard::EMPTY,
            black_kings: Bitboard::EMPTY,
            current_turn,
        }
    }

    /// Build a custom position, checking the occupancy invariants.
    pub fn from_bitboards(
        red_pieces: Bitboard,
        black_pieces: Bitboard,
        red_kings: Bitboard,
        black_kings: Bitboard,
        current_turn: Player,
    ) -> Result<Self, CheckersError> {
        if (red_pieces & black_pieces).is_not_empty() {
            return Err(CheckersError::InvalidPosition(format!(
                "red and black both occupy {:#018x}",
                (red_pieces & black_pieces).0
            )));
        }
        if !red_kings.is_subset_of(red_pieces) {
            return Err(CheckersError::InvalidPosition(
                "red kings must stand on red pieces".into(),
            ));
        }
        if !black_kings.is_subset_of(black_pieces) {
            return Err(CheckersError::InvalidPosition(
                "black kings must stand on black pieces".into(),
            ));
        }
        Ok(GameState {
            red_pieces,
            black_pieces,
            red_kings,
            black_kings,
            current_turn,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Occupancy of one side, kings included.
    #[inline]
    pub fn pieces(&self, player: Player) -> Bitboard {
        match player {
            Player::Red => self.red_pieces,
            Player::Black => self.black_pieces,
        }
    }

    /// Kings of one side.
    #[inline]
    pub fn kings(&self, player: Player) -> Bitboard {
        match player {
            Player::Red => self.red_kings,
            Player::Black => self.black_kings,
        }
    }

    /// Every occupied square.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.red_pieces | self.black_pieces | self.red_kings | self.black_kings
    }

    /// Hand the move to the other side.
    #[inline]
    pub fn swap_turn(&mut self) {
        self.current_turn = !self.current_turn;
    }

    /// Mutable (own pieces, own kings, their pieces, their kings) for `player`.
    fn sides_mut(
        &mut self,
        player: Player,
    ) -> (&mut Bitboard, &mut Bitboard, &mut Bitboard, &mut Bitboard) {
        match player {
            Player::Red => (
                &mut self.red_pieces,
                &mut self.red_kings,
                &mut self.black_pieces,
                &mut self.black_kings,
            ),
            Player::Black => (
                &mut self.black_pieces,
                &mut self.black_kings,
                &mut self.red_pieces,
                &mut self.red_kings,
            ),
        }
    }

    // -----------------------------------------------------------------------
    // Move execution
    // -----------------------------------------------------------------------

    /// Validate and apply one step or capture for the side to move.
    ///
    /// The position is only modified when `Ok` is returned. The turn is not
    /// passed here; the caller swaps it after promotion.
    pub fn execute_move(&mut self, from: Square, to: Square) -> Result<MoveKind, MoveError> {
        let us = self.current_turn;

        if !self.pieces(us).is_set(from) {
            return Err(MoveError::NoPieceAtOrigin { square: from });
        }
        if self.occupied().is_set(to) {
            return Err(MoveError::DestinationOccupied { square: to });
        }
        if usize::from(to.0) >= Square::NUM {
            return Err(MoveError::InvalidShape { from, to });
        }

        let col_diff = from.col().abs_diff(to.col());
        let pos_diff = i16::from(to.0) - i16::from(from.0);
        let is_king = self.kings(us).is_set(from);

        if col_diff == 2 && matches!(pos_diff.abs(), 14 | 18) {
            let jumped = Square((from.0 + to.0) / 2);
            if !self.pieces(!us).is_set(jumped) {
                return Err(MoveError::JumpWithoutOpponent { over: jumped });
            }
            if !is_king && !us.is_forward(pos_diff) {
                debug!(player = %us, %from, %to, "backward capture rejected");
                return Err(MoveError::BackwardCapture { player: us });
            }

            let (own, own_kings, theirs, their_kings) = self.sides_mut(us);
            own.clear(from);
            own.set(to);
            if is_king {
                own_kings.clear(from);
                own_kings.set(to);
            }
            theirs.clear(jumped);
            their_kings.clear(jumped);

            debug!(player = %us, %from, %to, captured = %jumped, "capture applied");
            return Ok(MoveKind::Capture { captured: jumped });
        }

        if col_diff == 1 && matches!(pos_diff.abs(), 7 | 9) {
            if !is_king && !us.is_forward(pos_diff) {
                return Err(MoveError::BackwardStep { player: us });
            }

            let (own, own_kings, _, _) = self.sides_mut(us);
            own.clear(from);
            own.set(to);
            if is_king {
                own_kings.clear(from);
                own_kings.set(to);
            }

            debug!(player = %us, %from, %to, "step applied");
            return Ok(MoveKind::Step);
        }

        Err(MoveError::InvalidShape { from, to })
    }

    // -----------------------------------------------------------------------
    // Post-move checks
    // -----------------------------------------------------------------------

    /// Crown every uncrowned piece standing on its far row.
    ///
    /// Returns the squares that were promoted (empty if none).
    pub fn check_for_promotion(&mut self) -> Bitboard {
        let red = self.red_pieces & RED_PROMOTION_ROW & !self.red_kings;
        if red.is_not_empty() {
            self.red_kings |= red;
            info!(squares = red.pop_count(), "red piece promoted to king");
        }

        let black = self.black_pieces & BLACK_PROMOTION_ROW & !self.black_kings;
        if black.is_not_empty() {
            self.black_kings |= black;
            info!(squares = black.pop_count(), "black piece promoted to king");
        }

        red | black
    }

    /// The side whose opponent has no pieces left, if any.
    pub fn winner(&self) -> Option<Player> {
        if self.black_pieces.pop_count() == 0 {
            Some(Player::Red)
        } else if self.red_pieces.pop_count() == 0 {
            Some(Player::Black)
        } else {
            None
        }
    }

    /// True once either side has been wiped off the board.
    pub fn check_for_win(&self) -> bool {
        self.winner().is_some()
    }

    // -----------------------------------------------------------------------
    // Occupancy sanity check (debug builds)
    // -----------------------------------------------------------------------

    /// Verify the king-subset and disjoint-colour invariants.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        assert!(
            self.red_kings.is_subset_of(self.red_pieces),
            "red kings outside red occupancy: {:?}",
            self.red_kings
        );
        assert!(
            self.black_kings.is_subset_of(self.black_pieces),
            "black kings outside black occupancy: {:?}",
            self.black_kings
        );
        assert!(
            (self.red_pieces & self.black_pieces).is_empty(),
            "colours overlap"
        );
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Glyph for one square: kings first, then regular pieces.
    pub fn glyph_at(&self, sq: Square) -> char {
        if self.red_kings.is_set(sq) {
            'K'
        } else if self.black_kings.is_set(sq) {
            'Q'
        } else if self.red_pieces.is_set(sq) {
            'r'
        } else if self.black_pieces.is_set(sq) {
            'b'
        } else {
            '.'
        }
    }

    /// Render the board framed by file letters and rank numbers, row 8 on top.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(320);
        s.push_str("   A B C D E F G H\n");
        s.push_str(" +-----------------+\n");
        for row in (0..8u8).rev() {
            let rank = (b'1' + row) as char;
            s.push(rank);
            s.push_str("| ");
            for col in 0..8 {
                s.push(self.glyph_at(Square::from_row_col(row, col)));
                s.push(' ');
            }
            s.push('|');
            s.push(rank);
            s.push('\n');
        }
        s.push_str(" +-----------------+\n");
        s.push_str("   A B C D E F G H");
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::starting()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board_string())?;
        write!(f, "Turn: {}", self.current_turn.turn_label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- helpers --

    fn sq(label: &str) -> Square {
        Square::from_label(label).unwrap()
    }

    fn bb(labels: &[&str]) -> Bitboard {
        labels
            .iter()
            .fold(Bitboard::EMPTY, |acc, l| acc | Bitboard::from_square(sq(l)))
    }

    fn position(red: &[&str], black: &[&str], kings: &[&str], turn: Player) -> GameState {
        let red = bb(red);
        let black = bb(black);
        let kings = bb(kings);
        GameState::from_bitboards(red, black, red & kings, black & kings, turn).unwrap()
    }

    // ===================================================================
    // Starting position
    // ===================================================================

    #[test]
    fn starting_piece_counts() {
        let g = start_game();
        assert_eq!(g.red_pieces.pop_count(), 12);
        assert_eq!(g.black_pieces.pop_count(), 12);
        assert!(g.red_kings.is_empty());
        assert!(g.black_kings.is_empty());
        assert_eq!(g.current_turn, Player::Red);
    }

    #[test]
    fn starting_pieces_on_dark_squares_of_home_rows() {
        let g = start_game();
        for s in g.red_pieces.iter() {
            assert!(s.is_dark(), "{s}");
            assert!(s.row() <= 2, "{s}");
        }
        for s in g.black_pieces.iter() {
            assert!(s.is_dark(), "{s}");
            assert!(s.row() >= 5, "{s}");
        }
        assert!((g.red_pieces & g.black_pieces).is_empty());
        g.assert_consistent();
    }

    #[test]
    fn starting_masks_match_row_col_rule() {
        let mut red = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for i in 0..64 {
            let s = Square(i);
            if s.is_dark() && s.row() <= 2 {
                red.set(s);
            }
            if s.is_dark() && s.row() >= 5 {
                black.set(s);
            }
        }
        assert_eq!(red, RED_START);
        assert_eq!(black, BLACK_START);
    }

    #[test]
    fn from_bitboards_rejects_overlap_and_stray_kings() {
        let a1 = bb(&["A1"]);
        assert!(GameState::from_bitboards(a1, a1, Bitboard::EMPTY, Bitboard::EMPTY, Player::Red)
            .is_err());
        assert!(GameState::from_bitboards(
            Bitboard::EMPTY,
            a1,
            a1,
            Bitboard::EMPTY,
            Player::Red
        )
        .is_err());
        assert!(GameState::from_bitboards(
            a1,
            Bitboard::EMPTY,
            Bitboard::EMPTY,
            a1,
            Player::Red
        )
        .is_err());
    }

    // ===================================================================
    // Preconditions
    // ===================================================================

    #[test]
    fn reject_empty_origin() {
        let mut g = start_game();
        let before = g;
        assert_eq!(
            g.execute_move(sq("B4"), sq("C5")),
            Err(MoveError::NoPieceAtOrigin { square: sq("B4") })
        );
        assert_eq!(g, before);
    }

    #[test]
    fn reject_opponent_piece_at_origin() {
        let mut g = start_game();
        assert!(matches!(
            g.execute_move(sq("B6"), sq("A5")),
            Err(MoveError::NoPieceAtOrigin { .. })
        ));
    }

    #[test]
    fn reject_occupied_destination() {
        let mut g = start_game();
        let before = g;
        assert_eq!(
            g.execute_move(sq("A1"), sq("B2")),
            Err(MoveError::DestinationOccupied { square: sq("B2") })
        );
        assert_eq!(g, before);
    }

    // ===================================================================
    // Steps
    // ===================================================================

    #[test]
    fn red_forward_step_moves_one_bit() {
        let mut g = start_game();
        let before = g;
        assert_eq!(g.execute_move(sq("C3"), sq("D4")), Ok(MoveKind::Step));
        assert_eq!(g.red_pieces.0, (before.red_pieces.0 & !(1 << 18)) | (1 << 27));
        assert_eq!(g.black_pieces, before.black_pieces);
        assert_eq!(g.red_kings, before.red_kings);
        assert_eq!(g.black_kings, before.black_kings);
        assert_eq!(g.current_turn, Player::Red);
    }

    #[test]
    fn black_forward_step() {
        let mut g = start_game();
        g.swap_turn();
        assert_eq!(g.execute_move(sq("B6"), sq("A5")), Ok(MoveKind::Step));
        assert!(g.black_pieces.is_set(sq("A5")));
        assert!(!g.black_pieces.is_set(sq("B6")));
    }

    #[test]
    fn regular_piece_cannot_step_backward() {
        let mut g = position(&["D4"], &["H8"], &[], Player::Red);
        let before = g;
        assert_eq!(
            g.execute_move(sq("D4"), sq("C3")),
            Err(MoveError::BackwardStep { player: Player::Red })
        );
        assert_eq!(g, before);

        let mut g = position(&["A1"], &["D5"], &[], Player::Black);
        let before = g;
        assert_eq!(
            g.execute_move(sq("D5"), sq("E6")),
            Err(MoveError::BackwardStep { player: Player::Black })
        );
        assert_eq!(g, before);
    }

    #[test]
    fn king_steps_backward_and_keeps_crown() {
        let mut g = position(&["D4"], &["H8"], &["D4"], Player::Red);
        assert_eq!(g.execute_move(sq("D4"), sq("C3")), Ok(MoveKind::Step));
        assert!(g.red_kings.is_set(sq("C3")));
        assert!(!g.red_kings.is_set(sq("D4")));
        g.assert_consistent();
    }

    #[test]
    fn reject_invalid_shapes() {
        let mut g = position(&["D4"], &["H8"], &[], Player::Red);
        let before = g;
        for to in ["D5", "E4", "D6", "F4", "H6", "A4"] {
            assert_eq!(
                g.execute_move(sq("D4"), sq(to)),
                Err(MoveError::InvalidShape { from: sq("D4"), to: sq(to) }),
                "{to}"
            );
        }
        assert_eq!(g, before);
    }

    #[test]
    fn off_board_destination_is_rejected() {
        // G8 (62) + 9 = 71: a step by index delta, but past the last square.
        let mut g = position(&["G8"], &["A1"], &["G8"], Player::Red);
        let before = g;
        assert_eq!(
            g.execute_move(Square(62), Square(71)),
            Err(MoveError::InvalidShape { from: Square(62), to: Square(71) })
        );
        assert_eq!(g, before);
        assert!(g.red_pieces.is_set(sq("G8")));
    }

    #[test]
    fn off_board_origin_has_no_piece() {
        let mut g = start_game();
        let before = g;
        assert_eq!(
            g.execute_move(Square(70), Square(61)),
            Err(MoveError::NoPieceAtOrigin { square: Square(70) })
        );
        assert_eq!(g, before);
    }

    #[test]
    fn edge_wraparound_is_not_a_step() {
        // H2 (15) + 9 = A4 (24): index delta of a step, but column delta 7.
        let mut g = position(&["H2"], &["H8"], &[], Player::Red);
        assert!(matches!(
            g.execute_move(sq("H2"), sq("A4")),
            Err(MoveError::InvalidShape { .. })
        ));
    }

    // ===================================================================
    // Captures
    // ===================================================================

    #[test]
    fn red_captures_forward() {
        let mut g = position(&["C3"], &["D4", "H8"], &[], Player::Red);
        assert_eq!(
            g.execute_move(sq("C3"), sq("E5")),
            Ok(MoveKind::Capture { captured: sq("D4") })
        );
        assert!(g.red_pieces.is_set(sq("E5")));
        assert!(!g.red_pieces.is_set(sq("C3")));
        assert!(!g.black_pieces.is_set(sq("D4")));
        assert_eq!(g.black_pieces.pop_count(), 1);
    }

    #[test]
    fn capture_removes_king_status_of_captured_piece() {
        let mut g = position(&["B6", "A1"], &["C7"], &["B6", "C7"], Player::Black);
        assert_eq!(
            g.execute_move(sq("C7"), sq("A5")),
            Ok(MoveKind::Capture { captured: sq("B6") })
        );
        assert!(!g.red_pieces.is_set(sq("B6")));
        assert!(!g.red_kings.is_set(sq("B6")));
        assert!(g.black_kings.is_set(sq("A5")));
        g.assert_consistent();
    }

    #[test]
    fn jump_over_empty_or_own_piece_rejected() {
        let mut g = position(&["C3", "D4"], &["H8"], &[], Player::Red);
        let before = g;
        assert_eq!(
            g.execute_move(sq("C3"), sq("E5")),
            Err(MoveError::JumpWithoutOpponent { over: sq("D4") })
        );
        assert_eq!(
            g.execute_move(sq("D4"), sq("B6")),
            Err(MoveError::JumpWithoutOpponent { over: sq("C5") })
        );
        assert_eq!(g, before);
    }

    #[test]
    fn regular_piece_cannot_capture_backward() {
        let mut g = position(&["E5"], &["D4", "H8"], &[], Player::Red);
        let before = g;
        let result = g.execute_move(sq("E5"), sq("C3"));
        assert!(result.is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn king_captures_backward() {
        let mut g = position(&["E5"], &["D4", "H8"], &["E5"], Player::Red);
        assert!(g.execute_move(sq("E5"), sq("C3")).is_ok());
        assert!(g.red_kings.is_set(sq("C3")));
        assert_eq!(g.black_pieces.pop_count(), 1);
        g.assert_consistent();
    }

    // ===================================================================
    // Promotion
    // ===================================================================

    #[test]
    fn red_promotes_on_row_eight() {
        let mut g = position(&["C7"], &["B4"], &[], Player::Red);
        g.execute_move(sq("C7"), sq("D8")).unwrap();
        let crowned = g.check_for_promotion();
        assert_eq!(crowned, bb(&["D8"]));
        assert!(g.red_kings.is_set(sq("D8")));
    }

    #[test]
    fn black_promotes_on_row_one() {
        let mut g = position(&["A7"], &["B2"], &[], Player::Black);
        g.execute_move(sq("B2"), sq("A1")).unwrap();
        assert_eq!(g.check_for_promotion(), bb(&["A1"]));
        assert!(g.black_kings.is_set(sq("A1")));
    }

    #[test]
    fn promotion_is_not_repeated_and_batches() {
        let mut g = position(&["B8", "D8"], &["A1", "C1"], &["B8"], Player::Red);
        let crowned = g.check_for_promotion();
        assert_eq!(crowned, bb(&["D8", "A1", "C1"]));
        assert_eq!(g.check_for_promotion(), Bitboard::EMPTY);
        g.assert_consistent();
    }

    #[test]
    fn pieces_off_the_far_row_are_not_promoted() {
        let mut g = start_game();
        assert_eq!(g.check_for_promotion(), Bitboard::EMPTY);
        assert!(g.red_kings.is_empty());
        assert!(g.black_kings.is_empty());
    }

    // ===================================================================
    // Win detection
    // ===================================================================

    #[test]
    fn win_detection_by_piece_count() {
        assert!(!start_game().check_for_win());

        let one_each = position(&["A1"], &["H8"], &[], Player::Red);
        assert!(!one_each.check_for_win());
        assert_eq!(one_each.winner(), None);

        let no_black = position(&["A1"], &[], &[], Player::Black);
        assert!(no_black.check_for_win());
        assert_eq!(no_black.winner(), Some(Player::Red));

        let no_red = position(&[], &["H8"], &[], Player::Red);
        assert!(no_red.check_for_win());
        assert_eq!(no_red.winner(), Some(Player::Black));
    }

    // ===================================================================
    // Display
    // ===================================================================

    #[test]
    fn board_string_starting() {
        let s = start_game().board_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "   A B C D E F G H");
        assert_eq!(lines[2], "8| . b . b . b . b |8");
        assert_eq!(lines[6], "4| . . . . . . . . |4");
        assert_eq!(lines[9], "1| r . r . r . r . |1");
    }

    #[test]
    fn kings_render_before_regular_pieces() {
        let g = position(&["A1"], &["H8"], &["A1", "H8"], Player::Black);
        assert_eq!(g.glyph_at(sq("A1")), 'K');
        assert_eq!(g.glyph_at(sq("H8")), 'Q');
        assert!(g.to_string().ends_with("Turn: Black (b/Q)"));
    }
}
