//! Move-ordering history tables: butterfly, capture, counter-move,
//! continuation, and correction history. All of these record how often
//! a move (or move pair, or pawn structure) has paid off in past
//! searches, and feed back into [`crate::movepicker::MovePicker`]'s
//! quiet-move ordering and the negamax driver's static-eval refinement.
//!
//! Every bonus/malus update goes through [`gravity`]: a saturating add
//! followed by a clamp, so a table entry converges toward its bound
//! instead of overflowing under a long search.

use crate::position::{Color, Move, PieceKind, Position};

const HISTORY_MAX: i32 = 16_384;

/// Decaying bonus/malus update shared by every history table: moves an
/// entry toward `bonus`, scaled down as the entry approaches the clamp
/// so repeated cutoffs on the same move keep contributing instead of
/// saturating immediately.
fn gravity(entry: &mut i32, bonus: i32) {
    let bonus = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
    *entry += bonus - *entry * bonus.abs() / HISTORY_MAX;
}

/// `depth`-scaled bonus for a move that caused a beta cutoff.
#[must_use]
pub fn history_bonus(depth: u8) -> i32 {
    (depth as i32 * 155).min(HISTORY_MAX)
}

/// Malus applied to moves tried and rejected before the one that cut off.
#[must_use]
pub fn history_malus(depth: u8) -> i32 {
    -history_bonus(depth)
}

/// Butterfly history: `[color][from][to]`, the classic quiet-move
/// ordering table indexed only by the move itself (not the piece kind).
pub struct ButterflyHistory {
    table: Box<[[[i32; 64]; 64]; 2]>,
}

impl ButterflyHistory {
    #[must_use]
    pub fn new() -> Self {
        ButterflyHistory {
            table: Box::new([[[0; 64]; 64]; 2]),
        }
    }

    #[must_use]
    pub fn get(&self, color: Color, mv: Move) -> i32 {
        self.table[color.index()][mv.from().index() as usize][mv.to().index() as usize]
    }

    pub fn update(&mut self, color: Color, mv: Move, bonus: i32) {
        gravity(&mut self.table[color.index()][mv.from().index() as usize][mv.to().index() as usize], bonus);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for ButterflyHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture history: `[attacker kind][to][victim kind]`, used to order
/// noisy moves alongside SEE — SEE sorts first, this breaks ties among
/// equal-SEE captures.
pub struct CaptureHistory {
    table: Box<[[[i32; 7]; 64]; 7]>,
}

impl CaptureHistory {
    #[must_use]
    pub fn new() -> Self {
        CaptureHistory {
            table: Box::new([[[0; 7]; 64]; 7]),
        }
    }

    #[must_use]
    pub fn get(&self, attacker: PieceKind, to: crate::position::Square, victim: PieceKind) -> i32 {
        self.table[attacker.index()][to.index() as usize][victim.index()]
    }

    pub fn update(&mut self, attacker: PieceKind, to: crate::position::Square, victim: PieceKind, bonus: i32) {
        gravity(&mut self.table[attacker.index()][to.index() as usize][victim.index()], bonus);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for CaptureHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter-move table: indexed by the *previous* ply's moved piece kind
/// and destination square, stores the quiet move that refuted it most
/// recently. MovePicker stage 4 tries this move right after killers.
pub struct CounterMoveTable {
    table: Box<[[Move; 64]; 7]>,
}

impl CounterMoveTable {
    #[must_use]
    pub fn new() -> Self {
        CounterMoveTable {
            table: Box::new([[Move::NONE; 64]; 7]),
        }
    }

    #[must_use]
    pub fn get(&self, prev_piece: PieceKind, prev_to: crate::position::Square) -> Move {
        self.table[prev_piece.index()][prev_to.index() as usize]
    }

    pub fn set(&mut self, prev_piece: PieceKind, prev_to: crate::position::Square, counter: Move) {
        self.table[prev_piece.index()][prev_to.index() as usize] = counter;
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

/// One continuation-history plane: indexed by a prior ply's (piece
/// kind, destination) pair, stores a full `[piece][to]` table of bonus
/// scores for the *current* move given that ancestor. MovePicker's
/// quiet-move stage sums four of these (offsets 1, 2, 4, 6 plies back).
pub struct ContinuationHistory {
    table: Box<[[[[i32; 64]; 7]; 64]; 7]>,
}

impl ContinuationHistory {
    #[must_use]
    pub fn new() -> Self {
        ContinuationHistory {
            table: Box::new([[[[0; 64]; 7]; 64]; 7]),
        }
    }

    #[must_use]
    pub fn get(&self, prev_piece: PieceKind, prev_to: crate::position::Square, piece: PieceKind, to: crate::position::Square) -> i32 {
        self.table[prev_piece.index()][prev_to.index() as usize][piece.index()][to.index() as usize]
    }

    pub fn update(
        &mut self,
        prev_piece: PieceKind,
        prev_to: crate::position::Square,
        piece: PieceKind,
        to: crate::position::Square,
        bonus: i32,
    ) {
        gravity(
            &mut self.table[prev_piece.index()][prev_to.index() as usize][piece.index()][to.index() as usize],
            bonus,
        );
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for ContinuationHistory {
    fn default() -> Self {
        Self::new()
    }
}

const CORRECTION_HISTORY_SIZE: usize = 1 << 14;
const CORRECTION_HISTORY_MASK: u64 = (CORRECTION_HISTORY_SIZE as u64) - 1;
/// Correction history values are scaled down before being added back to
/// a raw eval, so its magnitude can exceed `HISTORY_MAX` without
/// swamping the evaluation it corrects.
const CORRECTION_HISTORY_GRAIN: i32 = 256;
const CORRECTION_HISTORY_MAX: i32 = CORRECTION_HISTORY_GRAIN * 64;

/// Indexed by `(side to move, pawn_key & mask)`: nudges static eval
/// toward what search has actually proven true for positions sharing a
/// pawn skeleton.
pub struct CorrectionHistory {
    table: Box<[[i32; CORRECTION_HISTORY_SIZE]; 2]>,
}

impl CorrectionHistory {
    #[must_use]
    pub fn new() -> Self {
        CorrectionHistory {
            table: Box::new([[0; CORRECTION_HISTORY_SIZE]; 2]),
        }
    }

    fn index(pawn_key: u64) -> usize {
        (pawn_key & CORRECTION_HISTORY_MASK) as usize
    }

    /// Correction term, in centipawns, to add to a raw static eval.
    #[must_use]
    pub fn correction(&self, side: Color, pawn_key: u64) -> i32 {
        self.table[side.index()][Self::index(pawn_key)] / CORRECTION_HISTORY_GRAIN
    }

    pub fn update(&mut self, side: Color, pawn_key: u64, best_score: i32, static_eval: i32, depth: u8) {
        let entry = &mut self.table[side.index()][Self::index(pawn_key)];
        let weight = i32::from(depth).min(16);
        let error = (best_score - static_eval) * CORRECTION_HISTORY_GRAIN;
        let update = (*entry * (256 - weight) + error * weight) / 256;
        *entry = update.clamp(-CORRECTION_HISTORY_MAX, CORRECTION_HISTORY_MAX);
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for CorrectionHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// All move-ordering/eval-correction tables owned by one worker thread.
/// Never shared across threads — each [`crate::search::ThreadData`]
/// keeps its own, exclusive to its owning worker.
pub struct HistoryTables {
    pub butterfly: ButterflyHistory,
    pub capture: CaptureHistory,
    pub counter_move: CounterMoveTable,
    pub continuation: ContinuationHistory,
    pub correction: CorrectionHistory,
}

impl HistoryTables {
    #[must_use]
    pub fn new() -> Self {
        HistoryTables {
            butterfly: ButterflyHistory::new(),
            capture: CaptureHistory::new(),
            counter_move: CounterMoveTable::new(),
            continuation: ContinuationHistory::new(),
            correction: CorrectionHistory::new(),
        }
    }

    pub fn clear(&mut self) {
        self.butterfly.clear();
        self.capture.clear();
        self.counter_move.clear();
        self.continuation.clear();
        self.correction.clear();
    }

    /// Quiet-move ordering score: butterfly history plus continuation
    /// history at the four tracked ancestor offsets.
    #[must_use]
    pub fn quiet_score(&self, pos: &Position, mv: Move, continuations: &[Option<(PieceKind, crate::position::Square)>; 4]) -> i32 {
        let piece = pos.piece_on(mv.from());
        let mut score = self.butterfly.get(pos.side_to_move, mv);
        for ancestor in continuations.iter().flatten() {
            score += self.continuation.get(ancestor.0, ancestor.1, piece, mv.to());
        }
        score
    }
}

impl Default for HistoryTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Square;

    #[test]
    fn gravity_converges_toward_bonus_without_overflow() {
        let mut entry = 0i32;
        for _ in 0..10_000 {
            gravity(&mut entry, HISTORY_MAX);
        }
        assert!(entry <= HISTORY_MAX);
        assert!(entry > HISTORY_MAX - 100);
    }

    #[test]
    fn butterfly_history_records_and_decays() {
        let mut hist = ButterflyHistory::new();
        let mv = Move::new(Square::from_algebraic("e2").unwrap(), Square::from_algebraic("e4").unwrap(), crate::position::MoveFlag::DoublePawnPush);
        assert_eq!(hist.get(Color::White, mv), 0);
        hist.update(Color::White, mv, history_bonus(10));
        assert!(hist.get(Color::White, mv) > 0);
        hist.update(Color::White, mv, history_malus(10));
        assert!(hist.get(Color::White, mv) < history_bonus(10));
    }

    #[test]
    fn correction_history_nudges_toward_proven_score() {
        let mut corr = CorrectionHistory::new();
        let pos = Position::startpos();
        let key = pos.pawn_key();
        assert_eq!(corr.correction(Color::White, key), 0);
        for _ in 0..50 {
            corr.update(Color::White, key, 200, 0, 8);
        }
        assert!(corr.correction(Color::White, key) > 0);
    }

    #[test]
    fn counter_move_table_round_trips() {
        let mut table = CounterMoveTable::new();
        let to = Square::from_algebraic("e4").unwrap();
        assert_eq!(table.get(PieceKind::Pawn, to), Move::NONE);
        let counter = Move::new(Square::from_algebraic("d7").unwrap(), Square::from_algebraic("d5").unwrap(), crate::position::MoveFlag::DoublePawnPush);
        table.set(PieceKind::Pawn, to, counter);
        assert_eq!(table.get(PieceKind::Pawn, to), counter);
    }
}
