use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::core::utils::{delta, forward, home_rank, offset};

/** Board coordinate. Rank 0 is the black back rank, rank 7 the white one,
 * so the white e-pawn starts on (6, 4). */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    #[inline]
    pub const fn new(rank: u8, file: u8) -> Square {
        Square { rank, file }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.rank < 8 && self.file < 8
    }
}

impl From<(u8, u8)> for Square {
    fn from(value: (u8, u8)) -> Self {
        Square::new(value.0, value.1)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, 8 - self.rank)
    }
}

#[derive(PartialEq, Eq, Debug, Default, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    #[default]
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PieceType::Pawn => "pawn",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
        })
    }
}

/** Stable identity of one superposition, assigned at split time. Entanglement
 * links refer to these ids, never to squares, so correlation survives any
 * square relocation before collapse. */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/** One occupant of a board square.
 *
 * A quantum piece is one half of a superposed pair: both halves carry the
 * same kind, color and pair id, and the pair's branch squares and weights
 * live in the game-level superposition table under that id. A classical
 * piece carries no branch data at all. */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Piece {
    Classical { kind: PieceType, color: Color },
    Quantum { kind: PieceType, color: Color, pair: PairId },
}

impl Piece {
    pub fn kind(&self) -> PieceType {
        match self {
            Piece::Classical { kind, .. } => *kind,
            Piece::Quantum { kind, .. } => *kind,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Piece::Classical { color, .. } => *color,
            Piece::Quantum { color, .. } => *color,
        }
    }

    pub fn is_quantum(&self) -> bool {
        matches!(self, Piece::Quantum { .. })
    }

    pub fn pair(&self) -> Option<PairId> {
        match self {
            Piece::Classical { .. } => None,
            Piece::Quantum { pair, .. } => Some(*pair),
        }
    }
}

/** 8x8 grid of optional pieces. At most one piece record per square. */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            grid: [[None; 8]; 8],
        }
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        debug_assert!(square.is_valid(), "Square off the board: {square:?}");
        self.grid[square.rank as usize][square.file as usize]
    }

    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        debug_assert!(square.is_valid(), "Square off the board: {square:?}");
        self.grid[square.rank as usize][square.file as usize] = piece;
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        (0..8u8).flat_map(move |rank| {
            (0..8u8).filter_map(move |file| {
                let square = Square::new(rank, file);
                self.get(square).map(|piece| (square, piece))
            })
        })
    }

    /** Reduced-rules legality check: pure, ignores check, pins, castling,
     * en passant and promotion, and does not validate the path of sliding
     * pieces. False when the source square is empty. */
    pub fn is_valid_move(&self, from: Square, to: Square) -> bool {
        if !from.is_valid() || !to.is_valid() || from == to {
            return false;
        }
        let Some(piece) = self.get(from) else {
            return false;
        };
        let (dr, dc) = delta(from, to);
        match piece.kind() {
            PieceType::Pawn => self.is_valid_pawn_move(piece.color(), from, to, dr, dc),
            PieceType::Knight => matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2)),
            PieceType::Bishop => dr.abs() == dc.abs(),
            PieceType::Rook => dr == 0 || dc == 0,
            PieceType::Queen => dr.abs() == dc.abs() || dr == 0 || dc == 0,
            PieceType::King => dr.abs() <= 1 && dc.abs() <= 1,
        }
    }

    fn is_valid_pawn_move(&self, color: Color, from: Square, to: Square, dr: i8, dc: i8) -> bool {
        let dir = forward(color);
        // single push
        if dc == 0 && dr == dir {
            return self.get(to).is_none();
        }
        // double push from the home rank, both squares free
        if dc == 0 && dr == 2 * dir && from.rank == home_rank(color) {
            return offset(from, dir, 0)
                .map(|step| self.get(step).is_none())
                .unwrap_or(false)
                && self.get(to).is_none();
        }
        // diagonal capture only
        if dc.abs() == 1 && dr == dir {
            return self
                .get(to)
                .map(|target| target.color() != color)
                .unwrap_or(false);
        }
        false
    }

    /** Execute a ***validated*** move: the source must hold a piece. Any
     * destination occupant is returned as the capture. */
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.grid[from.rank as usize][from.file as usize].take();
        assert!(piece.is_some(), "Trying to move from an empty square!");
        std::mem::replace(&mut self.grid[to.rank as usize][to.file as usize], piece)
    }
}

impl Default for Board {
    /** Standard chess starting arrangement. */
    fn default() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        let mut board = Board::empty();
        for file in 0..8u8 {
            let kind = BACK_RANK[file as usize];
            board.set(
                Square::new(0, file),
                Some(Piece::Classical {
                    kind,
                    color: Color::Black,
                }),
            );
            board.set(
                Square::new(1, file),
                Some(Piece::Classical {
                    kind: PieceType::Pawn,
                    color: Color::Black,
                }),
            );
            board.set(
                Square::new(6, file),
                Some(Piece::Classical {
                    kind: PieceType::Pawn,
                    color: Color::White,
                }),
            );
            board.set(
                Square::new(7, file),
                Some(Piece::Classical {
                    kind,
                    color: Color::White,
                }),
            );
        }
        board
    }
}
