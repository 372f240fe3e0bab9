use crate::engine::types::{square_to_pos, CheckersError, Move, Square};

/// Parse one input line holding two square labels, e.g. `"C3 D4"`.
///
/// Each label is at most two non-whitespace characters, taken after any
/// leading whitespace, so `"C3D4"` reads as C3 then D4 and `"A3 B45"` as A3
/// then B4. A missing second label is `InvalidInput`; a label the square codec
/// rejects is `InvalidSquare`. Whatever follows the second label is ignored.
pub fn parse_move_line(line: &str) -> Result<Move, CheckersError> {
    let mut rest = line;
    let from = next_label(&mut rest);
    let to = next_label(&mut rest);
    let (Some(from), Some(to)) = (from, to) else {
        return Err(CheckersError::InvalidInput(line.trim().to_string()));
    };

    Ok(Move::new(label(from)?, label(to)?))
}

/// Skip whitespace, then split off up to two non-whitespace characters.
fn next_label<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|(_, c)| !c.is_whitespace())
        .take(2)
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    let (head, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(head)
}

fn label(token: &str) -> Result<Square, CheckersError> {
    square_to_pos(token).ok_or_else(|| CheckersError::InvalidSquare(token.to_string()))
}
