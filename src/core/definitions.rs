use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::engine::{Color, PieceType, Square};

/** Per-square view handed to presentation collaborators. */
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub kind: PieceType,
    pub color: Color,
    pub quantum: bool,
    /** Branch weight of this square while the figure is superposed,
     * 1.0 for a classical figure. */
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Figure(Figure),
}

/** Why a mutating operation was rejected. Game state is untouched whenever
 * one of these is returned. */
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on the source square")]
    EmptySquare,
    #[error("piece belongs to the opponent")]
    WrongColor,
    #[error("move is not legal for this piece")]
    IllegalMove,
    #[error("classical moves are blocked until the board is collapsed")]
    CollapsePending,
    #[error("piece is already in superposition")]
    AlreadyQuantum,
}

/** One collapsed branch: where the piece settled and which branch square
 * was vacated. */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub kind: PieceType,
    pub color: Color,
    pub settled: Square,
    pub vacated: Square,
}

/** Structured history fact. Carries everything a display layer needs to
 * format a move record; the default rendering lives in the `Display` impl. */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MoveRecord {
    Classical {
        kind: PieceType,
        color: Color,
        from: Square,
        to: Square,
        captured: Option<PieceType>,
    },
    QuantumSplit {
        kind: PieceType,
        color: Color,
        from: Square,
        to: Square,
    },
    Entangled {
        first: Square,
        second: Square,
    },
    Collapsed(Resolution),
    CollapsedPair(Resolution, Resolution),
}

impl Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} settled on {} ({} vacated)",
            self.color, self.kind, self.settled, self.vacated
        )
    }
}

impl Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRecord::Classical {
                kind,
                color,
                from,
                to,
                captured,
            } => match captured {
                Some(target) => write!(f, "{color} {kind} {from}x{to} (takes {target})"),
                None => write!(f, "{color} {kind} {from}-{to}"),
            },
            MoveRecord::QuantumSplit {
                kind,
                color,
                from,
                to,
            } => write!(f, "{color} {kind} splits {from}~{to}"),
            MoveRecord::Entangled { first, second } => {
                write!(f, "entangled {first} with {second}")
            }
            MoveRecord::Collapsed(resolution) => write!(f, "collapse: {resolution}"),
            MoveRecord::CollapsedPair(first, second) => {
                write!(f, "entangled collapse: {first}; {second}")
            }
        }
    }
}

/** Read-only surface a presentation collaborator consumes. The engine never
 * renders anything itself; it only answers these queries. */
pub trait MatchInterface {
    fn current_board(&self) -> Vec<Vec<Cell>>;
    fn cell(&self, rank: usize, file: usize) -> Option<Cell>;
    // info
    fn current_player(&self) -> Color;
    fn quantum_mode(&self) -> bool;
    fn history(&self) -> &[MoveRecord];
}
