// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation: piece-movement geometry and occupancy,
//! without the self-check test (see `analysis` for that).
//!
//! Generation order is deterministic: pieces are visited in creation order
//! and each piece's moves come out in the fixed direction and offset table
//! orders, so two generation passes over the same position produce
//! identical lists.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::board::{Board, Piece};
use crate::moves::Move;
use crate::types::{Color, Direction, PieceKind, Rank, Square};
use crate::types::{BISHOP_DIRECTIONS, ROOK_DIRECTIONS};

pub type MoveVec = ArrayVec<[Move; 256]>;

/// Promotion kinds in generation order. The queen leads so that callers
/// that take the first matching move get the conventional choice, but the
/// commit path never defaults: a promotion move must carry its kind.
static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Generates the pseudo-legal moves of a single piece, appending them
    /// to `moves`.
    pub fn generate_for_piece(&self, board: &Board, piece: &Piece, moves: &mut MoveVec) {
        match piece.kind() {
            PieceKind::Pawn => self.add_pawn_moves(board, piece, moves),
            PieceKind::Knight => {
                self.add_step_moves(board, piece, attacks::knight_targets(piece.square()), moves)
            }
            PieceKind::Bishop => self.add_sliding_moves(board, piece, &BISHOP_DIRECTIONS, moves),
            PieceKind::Rook => self.add_sliding_moves(board, piece, &ROOK_DIRECTIONS, moves),
            PieceKind::Queen => {
                self.add_sliding_moves(board, piece, &ROOK_DIRECTIONS, moves);
                self.add_sliding_moves(board, piece, &BISHOP_DIRECTIONS, moves);
            }
            PieceKind::King => self.add_king_moves(board, piece, moves),
        }
    }

    /// Generates the pseudo-legal moves of every live piece of one color,
    /// in piece creation order.
    pub fn generate_moves(&self, board: &Board, color: Color, moves: &mut MoveVec) {
        for piece in board.pieces_of(color) {
            self.generate_for_piece(board, piece, moves);
        }
    }

    fn record(&self, mov: Move, moves: &mut MoveVec) {
        trace!("generated {}", mov);
        moves.push(mov);
    }

    fn add_sliding_moves(
        &self,
        board: &Board,
        piece: &Piece,
        dirs: &[Direction],
        moves: &mut MoveVec,
    ) {
        for &dir in dirs {
            let mut cursor = piece.square();
            while let Some(next) = cursor.towards(dir) {
                if !board.is_occupied(next) {
                    self.record(Move::quiet(piece, next), moves);
                    cursor = next;
                    continue;
                }

                if board.is_enemy_occupied(next, piece.color()) {
                    self.record(Move::capture(piece, next), moves);
                }

                // Friendly occupant: the square is guarded, which the
                // coverage projection reports; it is not a move.
                break;
            }
        }
    }

    fn add_step_moves(
        &self,
        board: &Board,
        piece: &Piece,
        targets: &[Square],
        moves: &mut MoveVec,
    ) {
        for &target in targets {
            if board.is_enemy_occupied(target, piece.color()) {
                self.record(Move::capture(piece, target), moves);
            } else if !board.is_occupied(target) {
                self.record(Move::quiet(piece, target), moves);
            }
        }
    }

    fn add_pawn_moves(&self, board: &Board, piece: &Piece, moves: &mut MoveVec) {
        let color = piece.color();
        let forward = color.forward();
        let promo_rank = match color {
            Color::White => Rank::Eight,
            Color::Black => Rank::One,
        };

        // Forward pushes require an empty square; a double push additionally
        // requires an unmoved pawn and an empty skipped square.
        if let Some(target) = piece.square().towards(forward) {
            if !board.is_occupied(target) {
                if target.rank() == promo_rank {
                    for &kind in &PROMOTION_KINDS {
                        self.record(Move::promotion(piece, target, kind), moves);
                    }
                } else {
                    self.record(Move::quiet(piece, target), moves);
                }

                if !piece.has_moved() {
                    if let Some(two) = target.towards(forward) {
                        if !board.is_occupied(two) {
                            self.record(Move::double_pawn_push(piece, two), moves);
                        }
                    }
                }
            }
        }

        // Diagonal captures, including en passant. An en passant capture
        // takes the pawn beside the mover, not the one on the destination.
        for target in attacks::pawn_capture_targets(piece.square(), color) {
            if board.is_enemy_occupied(target, color) {
                if target.rank() == promo_rank {
                    for &kind in &PROMOTION_KINDS {
                        self.record(Move::promotion_capture(piece, target, kind), moves);
                    }
                } else {
                    self.record(Move::capture(piece, target), moves);
                }
            } else if Some(target) == board.en_passant_square() {
                let captured = target
                    .towards(color.toggle().forward())
                    .expect("en passant target on back rank");
                self.record(Move::en_passant(piece, target, captured), moves);
            }
        }
    }

    fn add_king_moves(&self, board: &Board, piece: &Piece, moves: &mut MoveVec) {
        self.add_step_moves(board, piece, attacks::king_targets(piece.square()), moves);

        let color = piece.color();
        let enemy = color.toggle();
        if !board.can_castle_kingside(color) && !board.can_castle_queenside(color) {
            return;
        }

        // Can't castle out of check.
        if attacks::is_attacked(board, piece.square(), enemy) {
            return;
        }

        if board.can_castle_kingside(color) {
            let one = piece.square().towards(Direction::East).expect("castle transit off board");
            let two = one.towards(Direction::East).expect("castle transit off board");
            if !board.is_occupied(one)
                && !board.is_occupied(two)
                && !attacks::is_attacked(board, one, enemy)
                && !attacks::is_attacked(board, two, enemy)
            {
                self.record(Move::kingside_castle(piece, two), moves);
            }
        }

        if board.can_castle_queenside(color) {
            let one = piece.square().towards(Direction::West).expect("castle transit off board");
            let two = one.towards(Direction::West).expect("castle transit off board");
            let three = two.towards(Direction::West).expect("castle transit off board");
            // The b-file square may be attacked but must be empty: the rook
            // crosses it, the king does not.
            if !board.is_occupied(one)
                && !board.is_occupied(two)
                && !board.is_occupied(three)
                && !attacks::is_attacked(board, one, enemy)
                && !attacks::is_attacked(board, two, enemy)
            {
                self.record(Move::queenside_castle(piece, two), moves);
            }
        }
    }
}

impl Default for MoveGenerator {
    fn default() -> MoveGenerator {
        MoveGenerator::new()
    }
}
