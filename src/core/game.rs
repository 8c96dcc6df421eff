use std::collections::HashMap;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::definitions::{Cell, Figure, MatchInterface, MoveError, MoveRecord, Resolution};
use crate::core::engine::{Board, Color, PairId, Piece, PieceType, Square};

/** Shared branch data of one superposed piece: the two candidate squares
 * with their weights, referenced from both board halves through the pair id.
 * The two weights always sum to 1.0. */
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Superposition {
    pub kind: PieceType,
    pub color: Color,
    pub branches: [(Square, f64); 2],
    /** Pair whose collapse outcome must agree with this one. Links are kept
     * reciprocal; breaking one side always breaks the other. */
    pub entangled_with: Option<PairId>,
}

impl Superposition {
    /** Weight of the branch occupying `square`, if it is one of the two. */
    pub fn probability_at(&self, square: Square) -> Option<f64> {
        self.branches
            .iter()
            .find(|(branch, _)| *branch == square)
            .map(|(_, weight)| *weight)
    }
}

/** One quantum chess session. Owns the board and every piece of pending
 * quantum bookkeeping; operations mutate it in place, there is no ambient
 * global state. */
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    current_player: Color,
    selected: Option<Square>,
    split_mode: bool,
    entangle_mode: bool,
    first_entangle: Option<Square>,
    /** Squares currently holding a quantum half, in split order. Both halves
     * of every pair appear here; collapse walks this list. */
    quantum_squares: Vec<Square>,
    superpositions: HashMap<PairId, Superposition>,
    history: Vec<MoveRecord>,
    next_pair: u32,
}

impl Game {
    pub fn new() -> Game {
        Game {
            board: Board::default(),
            current_player: Color::White,
            selected: None,
            split_mode: false,
            entangle_mode: false,
            first_entangle: None,
            quantum_squares: Vec::new(),
            superpositions: HashMap::new(),
            history: Vec::new(),
            next_pair: 0,
        }
    }

    /** Wholesale reset to the starting position. */
    pub fn new_game(&mut self) {
        debug!("Starting a new game");
        *self = Game::new();
    }

    // --- read accessors ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selected_square(&self) -> Option<Square> {
        self.selected
    }

    pub fn split_mode(&self) -> bool {
        self.split_mode
    }

    pub fn entangle_mode(&self) -> bool {
        self.entangle_mode
    }

    pub fn first_entangle_piece(&self) -> Option<Square> {
        self.first_entangle
    }

    /** True while at least one superposed piece awaits collapse. Classical
     * moves are refused until then. */
    pub fn quantum_mode(&self) -> bool {
        !self.quantum_squares.is_empty()
    }

    pub fn quantum_squares(&self) -> &[Square] {
        &self.quantum_squares
    }

    pub fn superposition(&self, pair: PairId) -> Option<&Superposition> {
        self.superpositions.get(&pair)
    }

    pub fn is_valid_move(&self, from: Square, to: Square) -> bool {
        self.board.is_valid_move(from, to)
    }

    // --- selection and input-mode bookkeeping (never touches the board) ---

    pub fn select_square(&mut self, square: Square) {
        if square.is_valid() {
            self.selected = Some(square);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_split_mode(&mut self, on: bool) {
        self.split_mode = on;
        if on {
            self.entangle_mode = false;
            self.first_entangle = None;
        }
    }

    pub fn set_entangle_mode(&mut self, on: bool) {
        self.entangle_mode = on;
        if on {
            self.split_mode = false;
        } else {
            self.first_entangle = None;
        }
    }

    // --- operations ---

    /** Classical move. Captures whatever occupies the destination, records
     * the fact and hands the turn over. Refused while a collapse is
     * pending. */
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        if self.quantum_mode() {
            return Err(MoveError::CollapsePending);
        }
        let piece = self.board.get(from).ok_or(MoveError::EmptySquare)?;
        if piece.color() != self.current_player {
            return Err(MoveError::WrongColor);
        }
        if !self.board.is_valid_move(from, to) {
            return Err(MoveError::IllegalMove);
        }
        let captured = self.board.apply_move(from, to).map(|target| target.kind());
        debug!(
            "{} {} moves {from}-{to}{}",
            piece.color(),
            piece.kind(),
            if captured.is_some() { " (capture)" } else { "" }
        );
        self.history.push(MoveRecord::Classical {
            kind: piece.kind(),
            color: piece.color(),
            from,
            to,
            captured,
        });
        self.selected = None;
        self.current_player = self.current_player.opposite();
        Ok(())
    }

    /** Quantum split: turn one validated move into a dual occupancy of the
     * source and destination squares, each weighted 0.5. The turn does not
     * advance; only collapse does that. A destination occupant is silently
     * overwritten without a capture fact. */
    pub fn split_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        let piece = self.board.get(from).ok_or(MoveError::EmptySquare)?;
        if piece.color() != self.current_player {
            return Err(MoveError::WrongColor);
        }
        if piece.is_quantum() {
            // branches are strictly two; a second split would lose one
            return Err(MoveError::AlreadyQuantum);
        }
        if !self.board.is_valid_move(from, to) {
            return Err(MoveError::IllegalMove);
        }
        let kind = piece.kind();
        let color = piece.color();
        let pair = PairId(self.next_pair);
        self.next_pair += 1;
        let half = Piece::Quantum { kind, color, pair };
        self.board.set(from, Some(half));
        self.board.set(to, Some(half));
        self.superpositions.insert(
            pair,
            Superposition {
                kind,
                color,
                branches: [(from, 0.5), (to, 0.5)],
                entangled_with: None,
            },
        );
        self.track_quantum(from);
        self.track_quantum(to);
        debug!("{color} {kind} splits {from}~{to} as pair {pair}");
        self.history.push(MoveRecord::QuantumSplit {
            kind,
            color,
            from,
            to,
        });
        self.selected = None;
        Ok(())
    }

    /** Two-click entanglement protocol, one call per click.
     *
     * A click on anything but a quantum piece is ignored and a pending first
     * selection stays armed. The second click links the two pairs
     * reciprocally and leaves entangle mode. Clicking two halves of the same
     * pair is ignored: a pair is already correlated with itself. */
    pub fn select_for_entangle(&mut self, square: Square) {
        if !square.is_valid() {
            return;
        }
        let Some(pair) = self.board.get(square).and_then(|piece| piece.pair()) else {
            trace!("Entangle click on non-quantum square {square}, ignored");
            return;
        };
        let Some(first) = self.first_entangle else {
            self.first_entangle = Some(square);
            return;
        };
        let Some(first_pair) = self.board.get(first).and_then(|piece| piece.pair()) else {
            // the first selection was clobbered by a later split; restart
            self.first_entangle = Some(square);
            return;
        };
        if first_pair == pair {
            trace!("Entangle click on the same pair {pair}, ignored");
            return;
        }
        // entanglement stays a perfect matching: drop any previous links
        self.break_link(first_pair);
        self.break_link(pair);
        if let Some(sp) = self.superpositions.get_mut(&first_pair) {
            sp.entangled_with = Some(pair);
        }
        if let Some(sp) = self.superpositions.get_mut(&pair) {
            sp.entangled_with = Some(first_pair);
        }
        debug!("Entangled pair {first_pair} ({first}) with pair {pair} ({square})");
        self.history.push(MoveRecord::Entangled {
            first,
            second: square,
        });
        self.first_entangle = None;
        self.entangle_mode = false;
    }

    fn break_link(&mut self, pair: PairId) {
        let old = self
            .superpositions
            .get_mut(&pair)
            .and_then(|sp| sp.entangled_with.take());
        if let Some(old) = old {
            if let Some(partner) = self.superpositions.get_mut(&old) {
                partner.entangled_with = None;
            }
        }
    }

    /** Collapse every outstanding superposition using the thread-local RNG.
     * See [`Game::collapse_with`] for a substitutable source. */
    pub fn collapse(&mut self) -> bool {
        self.collapse_with(&mut rand::thread_rng())
    }

    /** Measurement. Resolves all quantum pieces to classical board state and
     * flips the turn exactly once. No-op (returns false) when nothing is
     * superposed.
     *
     * An entangled pair and its partner share ONE fair draw and settle on
     * the same branch index; the stored weights are deliberately ignored for
     * them. A lone superposition settles on its first branch with that
     * branch's weight. */
    pub fn collapse_with<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.quantum_squares.is_empty() {
            return false;
        }
        let squares = std::mem::take(&mut self.quantum_squares);
        let mut resolved = 0usize;
        for square in squares {
            // both halves of a pair are listed; settling removes the table
            // entry, so the second visit falls through here
            let Some(pair) = self.board.get(square).and_then(|piece| piece.pair()) else {
                continue;
            };
            let Some(sp) = self.superpositions.remove(&pair) else {
                continue;
            };
            let partner = sp
                .entangled_with
                .and_then(|id| self.superpositions.remove(&id));
            match partner {
                Some(partner_sp) => {
                    let first_state = rng.gen_bool(0.5);
                    let first = self.settle(sp, first_state);
                    let second = self.settle(partner_sp, first_state);
                    trace!("Entangled pair settled on branch {}", !first_state as u8);
                    self.history.push(MoveRecord::CollapsedPair(first, second));
                    resolved += 2;
                }
                None => {
                    let draw: f64 = rng.gen();
                    let first_state = draw < sp.branches[0].1;
                    let resolution = self.settle(sp, first_state);
                    trace!("Pair settled on branch {} (draw {draw:.3})", !first_state as u8);
                    self.history.push(MoveRecord::Collapsed(resolution));
                    resolved += 1;
                }
            }
        }
        // leftovers can only be pairs whose halves were all clobbered by
        // later splits; their branch squares were rewritten, nothing to do
        self.superpositions.clear();
        self.first_entangle = None;
        self.selected = None;
        debug!("Collapse resolved {resolved} superposed pieces, turn passes");
        self.current_player = self.current_player.opposite();
        true
    }

    /** Write the chosen branch back as a classical piece and clear the other
     * branch square, whatever currently sits there. */
    fn settle(&mut self, sp: Superposition, first_state: bool) -> Resolution {
        let (settled, vacated) = if first_state {
            (sp.branches[0].0, sp.branches[1].0)
        } else {
            (sp.branches[1].0, sp.branches[0].0)
        };
        self.board.set(
            settled,
            Some(Piece::Classical {
                kind: sp.kind,
                color: sp.color,
            }),
        );
        self.board.set(vacated, None);
        Resolution {
            kind: sp.kind,
            color: sp.color,
            settled,
            vacated,
        }
    }

    fn track_quantum(&mut self, square: Square) {
        if !self.quantum_squares.contains(&square) {
            self.quantum_squares.push(square);
        }
    }

    fn cell_view(&self, square: Square) -> Cell {
        match self.board.get(square) {
            None => Cell::Empty,
            Some(piece) => Cell::Figure(Figure {
                kind: piece.kind(),
                color: piece.color(),
                quantum: piece.is_quantum(),
                probability: piece
                    .pair()
                    .and_then(|pair| self.superpositions.get(&pair))
                    .and_then(|sp| sp.probability_at(square))
                    .unwrap_or(1.0),
            }),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl MatchInterface for Game {
    fn current_board(&self) -> Vec<Vec<Cell>> {
        ui_board(self)
    }

    fn cell(&self, rank: usize, file: usize) -> Option<Cell> {
        if rank < 8 && file < 8 {
            Some(self.cell_view(Square::new(rank as u8, file as u8)))
        } else {
            None
        }
    }

    fn current_player(&self) -> Color {
        self.current_player
    }

    fn quantum_mode(&self) -> bool {
        !self.quantum_squares.is_empty()
    }

    fn history(&self) -> &[MoveRecord] {
        &self.history
    }
}

/** Full board snapshot for presentation collaborators. */
pub fn ui_board(game: &Game) -> Vec<Vec<Cell>> {
    (0..8u8)
        .map(|rank| {
            (0..8u8)
                .map(|file| game.cell_view(Square::new(rank, file)))
                .collect()
        })
        .collect()
}
