// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Routines for answering analysis questions about a board: check
//! detection, the legality filter over pseudo-legal moves, and square
//! coverage. `Analysis` borrows a board and answers questions about it.
use crate::attacks;
use crate::board::{Board, Piece};
use crate::move_generator::{MoveGenerator, MoveVec};
use crate::moves::Move;
use crate::types::{Color, Square, TableIndex, SQUARES};

/// Per-square attacker counts for both colors, including guarded squares.
/// This is a presentation-facing projection of the attack geometry; the
/// legality filter queries `attacks` directly instead.
pub struct Coverage {
    white: [u32; 64],
    black: [u32; 64],
}

impl Coverage {
    pub fn attackers(&self, square: Square, color: Color) -> u32 {
        match color {
            Color::White => self.white[square.as_index()],
            Color::Black => self.black[square.as_index()],
        }
    }
}

pub struct Analysis<'a> {
    board: &'a Board,
}

impl<'a> Analysis<'a> {
    pub fn new(board: &'a Board) -> Analysis<'a> {
        Analysis { board }
    }

    /// Whether the given color's king is attacked. A board with no king of
    /// that color is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.board.king_square(color) {
            Some(king) => attacks::is_attacked(self.board, king, color.toggle()),
            None => false,
        }
    }

    /// Tests a pseudo-legal move for legality by applying it to a scratch
    /// copy of the board and checking whether the mover's king ends up
    /// attacked. This also covers the mover's own king walking into check.
    pub fn is_legal_given_pseudolegal(&self, mov: &Move) -> bool {
        let color = match self.board.piece(mov.piece()) {
            Some(piece) => piece.color(),
            None => return false,
        };

        let mut scratch = self.board.clone();
        scratch.apply_move(mov);
        !Analysis::new(&scratch).is_check(color)
    }

    /// The legal moves of a single piece.
    pub fn legal_moves(&self, piece: &Piece) -> MoveVec {
        let mut pseudo = MoveVec::default();
        MoveGenerator::new().generate_for_piece(self.board, piece, &mut pseudo);

        let mut legal = MoveVec::default();
        for mov in pseudo {
            if self.is_legal_given_pseudolegal(&mov) {
                legal.push(mov);
            }
        }

        legal
    }

    /// The legal moves of every live piece of one color, in piece creation
    /// order.
    pub fn legal_moves_for_side(&self, color: Color) -> MoveVec {
        let mut pseudo = MoveVec::default();
        MoveGenerator::new().generate_moves(self.board, color, &mut pseudo);

        let mut legal = MoveVec::default();
        for mov in pseudo {
            if self.is_legal_given_pseudolegal(&mov) {
                legal.push(mov);
            }
        }

        legal
    }

    /// Whether the given color has at least one legal move. Stops at the
    /// first one found, so this is the cheap way to drive mate and
    /// stalemate detection.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        for piece in self.board.pieces_of(color) {
            let mut pseudo = MoveVec::default();
            MoveGenerator::new().generate_for_piece(self.board, piece, &mut pseudo);
            for mov in pseudo {
                if self.is_legal_given_pseudolegal(&mov) {
                    return true;
                }
            }
        }

        false
    }

    /// Computes the attacker counts of every square for both colors.
    pub fn coverage(&self) -> Coverage {
        let mut cov = Coverage {
            white: [0; 64],
            black: [0; 64],
        };

        for &square in SQUARES.iter() {
            cov.white[square.as_index()] =
                attacks::attackers_of(self.board, square, Color::White);
            cov.black[square.as_index()] =
                attacks::attackers_of(self.board, square, Color::Black);
        }

        cov
    }
}

#[cfg(test)]
mod tests {
    use super::Analysis;
    use crate::board::Board;
    use crate::types::{Color, PieceKind, Square};

    #[test]
    fn check_smoke() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, Color::White, Square::E1);
        board.place_piece(PieceKind::Rook, Color::Black, Square::E8);

        let analysis = Analysis::new(&board);
        assert!(analysis.is_check(Color::White));
        assert!(!analysis.is_check(Color::Black));
    }

    #[test]
    fn blocked_rook_gives_no_check() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, Color::White, Square::E1);
        board.place_piece(PieceKind::Pawn, Color::Black, Square::E4);
        board.place_piece(PieceKind::Rook, Color::Black, Square::E8);

        let analysis = Analysis::new(&board);
        assert!(!analysis.is_check(Color::White));
    }

    #[test]
    fn pinned_piece_cannot_move_off_the_pin() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, Color::White, Square::E1);
        board.place_piece(PieceKind::Knight, Color::White, Square::E4);
        board.place_piece(PieceKind::Rook, Color::Black, Square::E8);

        let analysis = Analysis::new(&board);
        let knight = board.piece_at(Square::E4).unwrap();
        assert!(analysis.legal_moves(knight).is_empty());
    }

    #[test]
    fn pinned_slider_may_move_along_the_pin() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, Color::White, Square::E1);
        board.place_piece(PieceKind::Rook, Color::White, Square::E4);
        board.place_piece(PieceKind::Rook, Color::Black, Square::E8);

        let analysis = Analysis::new(&board);
        let rook = board.piece_at(Square::E4).unwrap();
        let legal = analysis.legal_moves(rook);
        assert!(!legal.is_empty());
        assert!(legal.iter().all(|mov| mov.destination().file() == Square::E4.file()));
    }

    #[test]
    fn king_cannot_step_into_check() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, Color::White, Square::E1);
        board.place_piece(PieceKind::Rook, Color::Black, Square::D8);

        let analysis = Analysis::new(&board);
        let king = board.piece_at(Square::E1).unwrap();
        let legal = analysis.legal_moves(king);
        assert!(!legal.iter().any(|mov| mov.destination().file() == Square::D8.file()));
    }

    #[test]
    fn checked_side_must_resolve_the_check() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, Color::White, Square::E1);
        board.place_piece(PieceKind::Rook, Color::White, Square::A4);
        board.place_piece(PieceKind::Rook, Color::Black, Square::E8);

        let analysis = Analysis::new(&board);
        let legal = analysis.legal_moves_for_side(Color::White);
        for mov in &legal {
            assert!(analysis.is_legal_given_pseudolegal(mov));
        }
        // The a4 rook's only legal move is the e4 block.
        let rook = board.piece_at(Square::A4).unwrap();
        let rook_moves = analysis.legal_moves(rook);
        assert_eq!(1, rook_moves.len());
        assert_eq!(Square::E4, rook_moves[0].destination());
    }

    #[test]
    fn starting_position_coverage() {
        let board = Board::standard();
        let cov = Analysis::new(&board).coverage();

        // e3 is covered by the d2 and f2 pawns.
        assert_eq!(2, cov.attackers(Square::E3, Color::White));
        // d2 is guarded by queen, king, b1-knight, and c1-bishop.
        assert_eq!(4, cov.attackers(Square::D2, Color::White));
        // No white coverage past the fourth rank at the start.
        assert_eq!(0, cov.attackers(Square::E5, Color::White));
        assert_eq!(2, cov.attackers(Square::E6, Color::Black));
    }
}
