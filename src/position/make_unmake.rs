//! Move application via make/unmake on a single mutable [`Position`]:
//! every ply pushes an [`UndoRecord`] capturing exactly what
//! `unmake_move` needs to reverse, instead of cloning the whole board
//! or keeping a parent back-reference.

use super::{
    Color, Move, MoveFlag, PieceKind, Position, Square, CASTLE_BLACK_KINGSIDE,
    CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE, NO_SQUARE,
};
use crate::position::zobrist;

/// One NNUE feature-plane event: a piece of `kind`/`color` placed on or
/// removed from `square`. The search/eval layer turns these into actual
/// feature indices (which depend on each perspective's king bucket);
/// `Position` only reports *what* changed, not how NNUE encodes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceEvent {
    pub color: Color,
    pub kind: PieceKind,
    pub square: Square,
}

/// Up to four piece-plane add/remove events — enough for the busiest
/// case (castling: rook removed and re-added, king removed and re-added).
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceDelta {
    removed: [Option<PieceEvent>; 2],
    added: [Option<PieceEvent>; 2],
}

impl PieceDelta {
    fn push_removed(&mut self, ev: PieceEvent) {
        for slot in &mut self.removed {
            if slot.is_none() {
                *slot = Some(ev);
                return;
            }
        }
        debug_assert!(false, "PieceDelta::removed overflowed its 2 slots");
    }

    fn push_added(&mut self, ev: PieceEvent) {
        for slot in &mut self.added {
            if slot.is_none() {
                *slot = Some(ev);
                return;
            }
        }
        debug_assert!(false, "PieceDelta::added overflowed its 2 slots");
    }

    #[must_use]
    pub fn removed(&self) -> impl Iterator<Item = PieceEvent> + '_ {
        self.removed.iter().filter_map(|e| *e)
    }

    #[must_use]
    pub fn added(&self) -> impl Iterator<Item = PieceEvent> + '_ {
        self.added.iter().filter_map(|e| *e)
    }
}

/// Whether a just-applied move requires a full NNUE accumulator
/// refresh (the king crossed a king-zone boundary) or can be updated
/// incrementally from `PieceDelta`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccumulatorAction {
    Refresh,
    Update,
}

/// Everything needed to reverse one `make_move`/`make_null_move` call.
#[derive(Clone, Copy, Debug)]
pub struct UndoRecord {
    moved_kind: PieceKind,
    captured: Option<PieceEvent>,
    prior_castling_rights: u8,
    prior_en_passant: Square,
    prior_halfmove_clock: u16,
    prior_plies_from_null: u16,
    prior_key: u64,
    prior_in_check: bool,
    prior_needs_refresh: [bool; 2],
    is_null: bool,
}

/// File-quadrant king bucket boundary: buckets are `[0,1]`, `[2,3]`,
/// `[4,5]`, `[6,7]`. Crossing from one quadrant to another invalidates
/// every active feature for that perspective (see `eval::nnue`).
fn king_bucket_of_file(file: u8) -> u8 {
    file / 2
}

fn castle_rights_lost_by_move(from: Square, to: Square) -> u8 {
    let mut lost = 0u8;
    match from.index() {
        4 => lost |= CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        60 => lost |= CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        0 => lost |= CASTLE_WHITE_QUEENSIDE,
        7 => lost |= CASTLE_WHITE_KINGSIDE,
        56 => lost |= CASTLE_BLACK_QUEENSIDE,
        63 => lost |= CASTLE_BLACK_KINGSIDE,
        _ => {}
    }
    match to.index() {
        0 => lost |= CASTLE_WHITE_QUEENSIDE,
        7 => lost |= CASTLE_WHITE_KINGSIDE,
        56 => lost |= CASTLE_BLACK_QUEENSIDE,
        63 => lost |= CASTLE_BLACK_KINGSIDE,
        _ => {}
    }
    lost
}

impl Position {
    /// Apply a move produced by move generation against this exact
    /// position. Calling this with a move that wasn't: the contract is
    /// undefined outside debug builds, where invariant checks abort on
    /// mismatch instead of silently corrupting state.
    pub fn make_move(&mut self, mv: Move) -> (UndoRecord, PieceDelta) {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = mv.from();
        let to = mv.to();
        let flag = mv.flag();
        let moved_kind = self.piece_on(from);
        debug_assert_ne!(moved_kind, PieceKind::None, "make_move: no piece on source square");

        let mut delta = PieceDelta::default();
        let prior_king_bucket = [
            king_bucket_of_file(self.king_square(Color::White).file()),
            king_bucket_of_file(self.king_square(Color::Black).file()),
        ];

        let prior_castling_rights = self.castling_rights;
        let prior_en_passant = self.en_passant;
        let prior_halfmove_clock = self.halfmove_clock;
        let prior_plies_from_null = self.plies_from_null;
        let prior_key = self.key;
        let prior_in_check = self.in_check();
        let prior_needs_refresh = self.needs_refresh;

        // Clear the old en-passant key contribution; a fresh target
        // (or none) is folded in below.
        if !self.en_passant.is_none() {
            self.key ^= zobrist::en_passant_key(self.en_passant.file());
        }
        self.en_passant = NO_SQUARE;

        let mut captured = None;

        if matches!(flag, MoveFlag::EnPassant) {
            let captured_sq = Square::from_file_rank(to.file(), from.rank());
            self.remove_piece(captured_sq, them, PieceKind::Pawn);
            delta.push_removed(PieceEvent {
                color: them,
                kind: PieceKind::Pawn,
                square: captured_sq,
            });
            captured = Some(PieceEvent {
                color: them,
                kind: PieceKind::Pawn,
                square: captured_sq,
            });
        } else if flag.is_capture() {
            let captured_kind = self.piece_on(to);
            debug_assert_ne!(captured_kind, PieceKind::None, "capture flag but destination is empty");
            self.remove_piece(to, them, captured_kind);
            delta.push_removed(PieceEvent {
                color: them,
                kind: captured_kind,
                square: to,
            });
            captured = Some(PieceEvent {
                color: them,
                kind: captured_kind,
                square: to,
            });
        }

        self.remove_piece(from, us, moved_kind);
        delta.push_removed(PieceEvent {
            color: us,
            kind: moved_kind,
            square: from,
        });

        let placed_kind = flag.promotion_kind().unwrap_or(moved_kind);
        self.set_piece(to, us, placed_kind);
        delta.push_added(PieceEvent {
            color: us,
            kind: placed_kind,
            square: to,
        });

        if matches!(flag, MoveFlag::CastleKingside | MoveFlag::CastleQueenside) {
            let rank = from.rank();
            let (rook_from, rook_to) = match flag {
                MoveFlag::CastleKingside => (
                    Square::from_file_rank(7, rank),
                    Square::from_file_rank(5, rank),
                ),
                MoveFlag::CastleQueenside => (
                    Square::from_file_rank(0, rank),
                    Square::from_file_rank(3, rank),
                ),
                _ => unreachable!(),
            };
            self.remove_piece(rook_from, us, PieceKind::Rook);
            delta.push_removed(PieceEvent {
                color: us,
                kind: PieceKind::Rook,
                square: rook_from,
            });
            self.set_piece(rook_to, us, PieceKind::Rook);
            delta.push_added(PieceEvent {
                color: us,
                kind: PieceKind::Rook,
                square: rook_to,
            });
        }

        if matches!(flag, MoveFlag::DoublePawnPush) {
            self.en_passant = Square::from_file_rank(from.file(), (from.rank() + to.rank()) / 2);
            self.key ^= zobrist::en_passant_key(self.en_passant.file());
        }

        let lost_rights = castle_rights_lost_by_move(from, to) | if moved_kind == PieceKind::King {
            match us {
                Color::White => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
                Color::Black => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
            }
        } else {
            0
        };
        if self.castling_rights & lost_rights != 0 {
            self.unapply_castle_keys(self.castling_rights & lost_rights);
            self.castling_rights &= !lost_rights;
        }

        if moved_kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.fullmove_number += if us == Color::Black { 1 } else { 0 };
        self.plies_from_null += 1;

        self.key ^= zobrist::side_to_move_key();
        self.side_to_move = them;
        self.history.push(self.key);

        self.invalidate_attacked_cache();
        self.recompute_in_check();

        let new_king_bucket = [
            king_bucket_of_file(self.king_square(Color::White).file()),
            king_bucket_of_file(self.king_square(Color::Black).file()),
        ];
        self.needs_refresh = [
            new_king_bucket[0] != prior_king_bucket[0],
            new_king_bucket[1] != prior_king_bucket[1],
        ];

        let undo = UndoRecord {
            moved_kind,
            captured,
            prior_castling_rights,
            prior_en_passant,
            prior_halfmove_clock,
            prior_plies_from_null,
            prior_key,
            prior_in_check,
            prior_needs_refresh,
            is_null: false,
        };
        (undo, delta)
    }

    fn unapply_castle_keys(&mut self, lost_mask: u8) {
        if lost_mask & CASTLE_WHITE_KINGSIDE != 0 {
            self.key ^= zobrist::castle_kingside_key(Color::White);
        }
        if lost_mask & CASTLE_WHITE_QUEENSIDE != 0 {
            self.key ^= zobrist::castle_queenside_key(Color::White);
        }
        if lost_mask & CASTLE_BLACK_KINGSIDE != 0 {
            self.key ^= zobrist::castle_kingside_key(Color::Black);
        }
        if lost_mask & CASTLE_BLACK_QUEENSIDE != 0 {
            self.key ^= zobrist::castle_queenside_key(Color::Black);
        }
    }

    /// Which NNUE accumulator action a move's `UndoRecord` requires:
    /// `Refresh` if either side's king changed king-bucket, `Update`
    /// otherwise.
    #[must_use]
    pub fn accumulator_action(&self, undo: &UndoRecord) -> AccumulatorAction {
        if undo.is_null {
            return AccumulatorAction::Update;
        }
        if self.needs_refresh[0] || self.needs_refresh[1] {
            AccumulatorAction::Refresh
        } else {
            AccumulatorAction::Update
        }
    }

    /// Reverse the effects of `make_move`. `mv` and `undo` must be the
    /// exact pair returned by the `make_move` call being undone.
    pub fn unmake_move(&mut self, mv: Move, undo: UndoRecord) {
        let them = self.side_to_move;
        let us = them.opposite();
        self.side_to_move = us;

        self.history.pop();
        self.key = undo.prior_key;
        self.castling_rights = undo.prior_castling_rights;
        self.en_passant = undo.prior_en_passant;
        self.halfmove_clock = undo.prior_halfmove_clock;
        self.plies_from_null = undo.prior_plies_from_null;
        self.fullmove_number -= if us == Color::Black { 1 } else { 0 };

        let from = mv.from();
        let to = mv.to();
        let flag = mv.flag();

        let placed_kind = self.piece_on(to);
        self.remove_piece_no_key(to, us, placed_kind);
        self.set_piece_no_key(from, us, undo.moved_kind);

        if matches!(flag, MoveFlag::CastleKingside | MoveFlag::CastleQueenside) {
            let rank = from.rank();
            let (rook_from, rook_to) = match flag {
                MoveFlag::CastleKingside => (
                    Square::from_file_rank(7, rank),
                    Square::from_file_rank(5, rank),
                ),
                MoveFlag::CastleQueenside => (
                    Square::from_file_rank(0, rank),
                    Square::from_file_rank(3, rank),
                ),
                _ => unreachable!(),
            };
            self.remove_piece_no_key(rook_to, us, PieceKind::Rook);
            self.set_piece_no_key(rook_from, us, PieceKind::Rook);
        }

        if let Some(ev) = undo.captured {
            self.set_piece_no_key(ev.square, ev.color, ev.kind);
        }

        self.invalidate_attacked_cache();
        self.in_check = undo.prior_in_check;
        self.needs_refresh = undo.prior_needs_refresh;
    }

    fn set_piece_no_key(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.pieces[color.index()][kind.index()].set(sq);
        self.occupancy[color.index()].set(sq);
        self.board[sq.index() as usize] = kind;
        self.board_color[sq.index() as usize] = color;
    }

    fn remove_piece_no_key(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.pieces[color.index()][kind.index()].clear(sq);
        self.occupancy[color.index()].clear(sq);
        self.board[sq.index() as usize] = PieceKind::None;
    }

    /// Make a null move: flip side to move, reset the null-move ply
    /// counter, clear any en-passant target, and leave everything else
    /// untouched. Used by null-move pruning to probe "what if I passed".
    pub fn make_null_move(&mut self) -> UndoRecord {
        let prior_en_passant = self.en_passant;
        let prior_key = self.key;
        let prior_plies_from_null = self.plies_from_null;
        let prior_in_check = self.in_check();
        let prior_needs_refresh = self.needs_refresh;
        let prior_halfmove_clock = self.halfmove_clock;

        if !self.en_passant.is_none() {
            self.key ^= zobrist::en_passant_key(self.en_passant.file());
            self.en_passant = NO_SQUARE;
        }
        self.key ^= zobrist::side_to_move_key();
        self.side_to_move = self.side_to_move.opposite();
        self.plies_from_null = 0;
        self.halfmove_clock += 1;
        self.history.push(self.key);
        self.invalidate_attacked_cache();
        self.recompute_in_check();
        self.needs_refresh = [false, false];

        UndoRecord {
            moved_kind: PieceKind::None,
            captured: None,
            prior_castling_rights: self.castling_rights,
            prior_en_passant,
            prior_halfmove_clock,
            prior_plies_from_null,
            prior_key,
            prior_in_check,
            prior_needs_refresh,
            is_null: true,
        }
    }

    pub fn unmake_null_move(&mut self, undo: UndoRecord) {
        debug_assert!(undo.is_null, "unmake_null_move called with a non-null UndoRecord");
        self.history.pop();
        self.side_to_move = self.side_to_move.opposite();
        self.key = undo.prior_key;
        self.en_passant = undo.prior_en_passant;
        self.plies_from_null = undo.prior_plies_from_null;
        self.halfmove_clock = undo.prior_halfmove_clock;
        self.invalidate_attacked_cache();
        self.in_check = undo.prior_in_check;
        self.needs_refresh = undo.prior_needs_refresh;
    }
}
