mod core;

// module re-exports
pub use crate::core::*;

pub use crate::core::definitions::{
    Cell, Figure, MatchInterface, MoveError, MoveRecord, Resolution,
};
pub use crate::core::engine::{Board, Color, PairId, Piece, PieceType, Square};
pub use crate::core::game::{ui_board, Game, Superposition};
