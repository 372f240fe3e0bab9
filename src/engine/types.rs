use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Bit primitives
// ---------------------------------------------------------------------------

/// Number of squares on the board, and the width of every bitboard.
pub const BOARD_SQUARES: u32 = 64;

/// Return `value` with bit `pos` set. Out-of-range positions leave it unchanged.
#[inline]
pub fn set_bit(value: u64, pos: u32) -> u64 {
    if pos >= BOARD_SQUARES {
        return value;
    }
    value | (1u64 << pos)
}

/// Return `value` with bit `pos` cleared. Out-of-range positions leave it unchanged.
#[inline]
pub fn clear_bit(value: u64, pos: u32) -> u64 {
    if pos >= BOARD_SQUARES {
        return value;
    }
    value & !(1u64 << pos)
}

/// Read bit `pos` as 0 or 1. Out-of-range positions read as 0.
#[inline]
pub fn get_bit(value: u64, pos: u32) -> u8 {
    if pos >= BOARD_SQUARES {
        return 0;
    }
    ((value >> pos) & 1) as u8
}

/// Population count, clearing the lowest set bit until none remain.
#[inline]
pub fn count_bits(mut value: u64) -> u32 {
    let mut count = 0;
    while value != 0 {
        value &= value - 1;
        count += 1;
    }
    count
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The two sides. Red starts on rows 1-3 and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Black,
}

impl Player {
    /// Turn label shown under the board, including the glyphs the side plays with.
    pub fn turn_label(self) -> &'static str {
        match self {
            Player::Red => "Red (r/K)",
            Player::Black => "Black (b/Q)",
        }
    }

    /// Whether a linear index delta moves this side's regular pieces forward.
    #[inline]
    pub fn is_forward(self, pos_diff: i16) -> bool {
        match self {
            Player::Red => pos_diff > 0,
            Player::Black => pos_diff < 0,
        }
    }
}

impl std::ops::Not for Player {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Player::Red => Player::Black,
            Player::Black => Player::Red,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => write!(f, "Red"),
            Player::Black => write!(f, "Black"),
        }
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A board index 0..63, row-major: A1 = 0, H1 = 7, A2 = 8, … H8 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub u8);

impl Square {
    pub const NUM: usize = 64;

    #[inline]
    pub fn new(index: u8) -> Self {
        debug_assert!(index < 64, "Square index out of range: {index}");
        Square(index)
    }

    /// Column 0..7 (file A..H).
    #[inline]
    pub fn col(self) -> u8 {
        self.0 & 7
    }

    /// Row 0..7 (rank 1..8).
    #[inline]
    pub fn row(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Square::new(row * 8 + col)
    }

    /// Playable squares are the dark ones, where row + col is even.
    #[inline]
    pub fn is_dark(self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    /// Parse a "file+rank" label like "C3" (file letter is case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        square_to_pos(label)
    }

    /// Label with an uppercase file letter, e.g. "C3".
    pub fn label(self) -> String {
        let file = (b'A' + self.col()) as char;
        let rank = (b'1' + self.row()) as char;
        format!("{file}{rank}")
    }
}

/// Decode a two-character label into a board index.
///
/// Anything other than a file `A-H`/`a-h` followed by a rank `1-8` yields
/// `None`, including empty input and labels of any other length.
pub fn square_to_pos(text: &str) -> Option<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let col = bytes[0].to_ascii_uppercase().wrapping_sub(b'A');
    let row = bytes[1].wrapping_sub(b'1');
    if col < 8 && row < 8 {
        Some(Square::from_row_col(row, col))
    } else {
        None
    }
}

impl FromStr for Square {
    type Err = CheckersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        square_to_pos(s).ok_or_else(|| CheckersError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Bitboard
// ---------------------------------------------------------------------------

/// A 64-bit bitboard — one bit per square.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub fn from_square(sq: Square) -> Self {
        Bitboard(set_bit(0, u32::from(sq.0)))
    }

    /// Build a bitboard from a list of squares.
    pub fn from_squares(squares: &[Square]) -> Self {
        squares
            .iter()
            .fold(Bitboard::EMPTY, |bb, &sq| bb | Bitboard::from_square(sq))
    }

    #[inline]
    pub fn is_set(self, sq: Square) -> bool {
        get_bit(self.0, u32::from(sq.0)) == 1
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 = set_bit(self.0, u32::from(sq.0));
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 = clear_bit(self.0, u32::from(sq.0));
    }

    #[inline]
    pub fn pop_count(self) -> u32 {
        count_bits(self.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Is every square of `self` also in `other`?
    #[inline]
    pub fn is_subset_of(self, other: Bitboard) -> bool {
        self.0 & !other.0 == 0
    }

    /// Pop the least significant bit, returning the square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            let sq = Square(self.0.trailing_zeros() as u8);
            self.0 &= self.0 - 1;
            Some(sq)
        }
    }

    /// Iterate over all set bit positions as `Square`s.
    #[inline]
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

/// Iterator over set bits in a `Bitboard`.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.pop_count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl std::ops::BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Bitboard(self.0 & rhs.0)
    }
}

impl std::ops::BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Bitboard(self.0 | rhs.0)
    }
}

impl std::ops::Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Bitboard(!self.0)
    }
}

impl std::ops::BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard(0x{:016x})", self.0)?;
        for row in (0..8).rev() {
            write!(f, "  {} ", row + 1)?;
            for col in 0..8 {
                let sq = Square::from_row_col(row, col);
                write!(f, "{}", if self.is_set(sq) { '1' } else { '.' })?;
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    A B C D E F G H")
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A candidate move: origin and destination square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

/// How an accepted move was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// One diagonal square.
    Step,
    /// Two diagonal squares over an opponent piece, which was removed.
    Capture { captured: Square },
}

impl MoveKind {
    #[inline]
    pub fn is_capture(self) -> bool {
        matches!(self, MoveKind::Capture { .. })
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Whether the game is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The loser has no pieces left.
    Won { winner: Player },
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won { winner: Player::Red } => "red_wins",
            GameStatus::Won { winner: Player::Black } => "black_wins",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Won { .. })
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won { winner } => Some(*winner),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons the move executor turns a move down. The position is untouched
/// whenever one of these is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("No piece at the starting square.")]
    NoPieceAtOrigin { square: Square },

    #[error("The target square is occupied.")]
    DestinationOccupied { square: Square },

    #[error("A jump must be over an opponent's piece.")]
    JumpWithoutOpponent { over: Square },

    /// Regular piece jumping toward its own side. Rejected without a message.
    #[error("{player} regular pieces cannot capture backward.")]
    BackwardCapture { player: Player },

    #[error("{player} regular pieces must move forward.")]
    BackwardStep { player: Player },

    #[error("Invalid move. Must be a single diagonal step or a valid capture.")]
    InvalidShape { from: Square, to: Square },
}

impl MoveError {
    /// Text shown to the player, or `None` for rejections that stay silent.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            MoveError::BackwardCapture { .. } => None,
            other => Some(other.to_string()),
        }
    }
}

/// Domain errors for the checkers engine.
#[derive(Debug, thiserror::Error)]
pub enum CheckersError {
    #[error("invalid input format: {0:?}")]
    InvalidInput(String),

    #[error("invalid square name: {0:?}")]
    InvalidSquare(String),

    #[error("illegal move: {0}")]
    IllegalMove(#[from] MoveError),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("game is already over: {0} won")]
    GameOver(Player),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
