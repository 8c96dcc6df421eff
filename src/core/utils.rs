use crate::core::engine::{Color, Square};

/** Signed (rank, file) difference from `from` to `to`. */
#[inline]
pub fn delta(from: Square, to: Square) -> (i8, i8) {
    (
        to.rank as i8 - from.rank as i8,
        to.file as i8 - from.file as i8,
    )
}

/** Forward rank direction for a color. White pawns move toward rank 0. */
#[inline]
pub fn forward(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

/** Pawn home rank for a color. */
#[inline]
pub fn home_rank(color: Color) -> u8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}

/** Step from a square by a signed offset, `None` when it leaves the board. */
pub fn offset(square: Square, dr: i8, dc: i8) -> Option<Square> {
    let rank = square.rank as i8 + dr;
    let file = square.file as i8 + dc;
    if (0..8).contains(&rank) && (0..8).contains(&file) {
        Some(Square::new(rank as u8, file as u8))
    } else {
        None
    }
}
