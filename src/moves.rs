// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module defines candidate and committed move descriptions.
//!
//! A move records the piece it belongs to, its source and destination
//! squares, a flag bitset describing its mechanics, the square it captures
//! on (which differs from the destination only for en passant), and the
//! promotion piece kind when the move promotes.
use std::fmt::{self, Write};

use crate::board::{Piece, PieceId};
use crate::types::{PieceKind, Square};

bitflags! {
    /// Mechanics of a move. `CHECK` is a convenience flag resolved at commit
    /// time; the rest are fixed at generation time.
    pub struct MoveFlags: u16 {
        const NONE = 0;
        const CAPTURE = 1 << 0;
        const EN_PASSANT = 1 << 1;
        const DOUBLE_PUSH = 1 << 2;
        const CASTLE_KINGSIDE = 1 << 3;
        const CASTLE_QUEENSIDE = 1 << 4;
        const PROMOTION = 1 << 5;
        const CHECK = 1 << 6;
    }
}

/// A single candidate or committed transition of one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    piece: PieceId,
    source: Square,
    destination: Square,
    flags: MoveFlags,
    captures: Option<Square>,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Constructs a new quiet move of the given piece to the destination
    /// square. The source square is the piece's square at generation time.
    pub fn quiet(piece: &Piece, destination: Square) -> Move {
        Move {
            piece: piece.id(),
            source: piece.square(),
            destination,
            flags: MoveFlags::NONE,
            captures: None,
            promotion: None,
        }
    }

    /// Constructs a new capture of whatever occupies the destination square.
    pub fn capture(piece: &Piece, destination: Square) -> Move {
        let mut mov = Move::quiet(piece, destination);
        mov.flags |= MoveFlags::CAPTURE;
        mov.captures = Some(destination);
        mov
    }

    /// Constructs a new en passant capture. The captured square is the square
    /// of the pawn being taken, beside the mover, not the destination.
    pub fn en_passant(piece: &Piece, destination: Square, captures: Square) -> Move {
        let mut mov = Move::quiet(piece, destination);
        mov.flags |= MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
        mov.captures = Some(captures);
        mov
    }

    /// Constructs a new double pawn push. Committing it arms the en passant
    /// target on the square the pawn skipped.
    pub fn double_pawn_push(piece: &Piece, destination: Square) -> Move {
        let mut mov = Move::quiet(piece, destination);
        mov.flags |= MoveFlags::DOUBLE_PUSH;
        mov
    }

    /// Constructs a new kingside castle, encoded by the king's source and
    /// destination. Committing it also moves the rook h-file to f-file.
    pub fn kingside_castle(piece: &Piece, destination: Square) -> Move {
        let mut mov = Move::quiet(piece, destination);
        mov.flags |= MoveFlags::CASTLE_KINGSIDE;
        mov
    }

    /// Constructs a new queenside castle, encoded by the king's source and
    /// destination. Committing it also moves the rook a-file to d-file.
    pub fn queenside_castle(piece: &Piece, destination: Square) -> Move {
        let mut mov = Move::quiet(piece, destination);
        mov.flags |= MoveFlags::CASTLE_QUEENSIDE;
        mov
    }

    /// Constructs a new pawn promotion to the given piece kind.
    pub fn promotion(piece: &Piece, destination: Square, promoted: PieceKind) -> Move {
        let mut mov = Move::quiet(piece, destination);
        mov.flags |= MoveFlags::PROMOTION;
        mov.promotion = Some(promoted);
        mov
    }

    /// Constructs a new capturing pawn promotion to the given piece kind.
    pub fn promotion_capture(piece: &Piece, destination: Square, promoted: PieceKind) -> Move {
        let mut mov = Move::promotion(piece, destination, promoted);
        mov.flags |= MoveFlags::CAPTURE;
        mov.captures = Some(destination);
        mov
    }

    /// The piece this move belongs to.
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// The square the piece moves from.
    pub fn source(&self) -> Square {
        self.source
    }

    /// The square the piece moves to.
    pub fn destination(&self) -> Square {
        self.destination
    }

    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    /// The square being captured on, if any. Differs from the destination
    /// only for en passant.
    pub fn captures(&self) -> Option<Square> {
        self.captures
    }

    /// The piece kind a promoting pawn becomes, when supplied.
    pub fn promotion_piece(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Returns a copy of this move with the promotion piece kind filled in.
    /// Useful for presentation layers that let the user pick after seeing
    /// the promotion flagged on a generated move.
    pub fn with_promotion(mut self, promoted: PieceKind) -> Move {
        self.promotion = Some(promoted);
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.flags & !MoveFlags::CHECK == MoveFlags::NONE
    }

    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    pub fn is_double_pawn_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PUSH)
    }

    pub fn is_kingside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_KINGSIDE)
    }

    pub fn is_queenside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_QUEENSIDE)
    }

    pub fn is_castle(&self) -> bool {
        self.is_kingside_castle() || self.is_queenside_castle()
    }

    pub fn is_promotion(&self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    /// Whether the committed move put the opponent in check. Meaningful only
    /// on moves returned from a commit or read out of the history.
    pub fn gives_check(&self) -> bool {
        self.flags.contains(MoveFlags::CHECK)
    }

    pub(crate) fn set_check(&mut self) {
        self.flags |= MoveFlags::CHECK;
    }

    /// Returns the coordinate-notation representation of this move, e.g.
    /// "e2e4" or "e7e8q".
    pub fn as_coord(&self) -> String {
        let mut buf = String::new();
        write!(&mut buf, "{}{}", self.source(), self.destination()).unwrap();
        if let Some(promoted) = self.promotion {
            write!(&mut buf, "{}", promoted).unwrap();
        }

        buf
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} -> {} (capture: {}, promotion: {})",
            self.source(),
            self.destination(),
            self.is_capture(),
            self.is_promotion()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::board::Board;
    use crate::types::{PieceKind, Square};

    fn pawn_board() -> Board {
        let mut board = Board::new();
        board.place_piece(PieceKind::Pawn, crate::types::Color::White, Square::A4);
        board
    }

    #[test]
    fn quiet() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        let quiet = Move::quiet(piece, Square::A5);
        assert_eq!(Square::A4, quiet.source());
        assert_eq!(Square::A5, quiet.destination());
        assert!(quiet.is_quiet());
        assert_eq!(None, quiet.captures());
    }

    #[test]
    fn capture() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        let capture = Move::capture(piece, Square::B5);
        assert!(!capture.is_quiet());
        assert!(capture.is_capture());
        assert_eq!(Some(Square::B5), capture.captures());
    }

    #[test]
    fn en_passant_captures_beside_mover() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        let ep = Move::en_passant(piece, Square::B3, Square::B4);
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert_ne!(ep.captures(), Some(ep.destination()));
    }

    #[test]
    fn double_pawn_push() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        let dpp = Move::double_pawn_push(piece, Square::A6);
        assert!(dpp.is_double_pawn_push());
        assert!(!dpp.is_capture());
        assert!(!dpp.is_quiet());
    }

    #[test]
    fn promotion_kinds() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        for &kind in &[
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let promo = Move::promotion(piece, Square::A8, kind);
            assert!(promo.is_promotion());
            assert!(!promo.is_capture());
            assert_eq!(Some(kind), promo.promotion_piece());

            let promo_capture = Move::promotion_capture(piece, Square::B8, kind);
            assert!(promo_capture.is_promotion());
            assert!(promo_capture.is_capture());
            assert_eq!(Some(kind), promo_capture.promotion_piece());
        }
    }

    #[test]
    fn with_promotion_fills_in_the_kind() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        let promo = Move::promotion(piece, Square::A8, PieceKind::Queen);
        let knight = promo.with_promotion(PieceKind::Knight);
        assert_eq!(Some(PieceKind::Knight), knight.promotion_piece());
        assert!(knight.is_promotion());
    }

    #[test]
    fn castles() {
        let mut board = Board::new();
        board.place_piece(PieceKind::King, crate::types::Color::White, Square::E1);
        let king = board.piece_at(Square::E1).unwrap();

        let ks = Move::kingside_castle(king, Square::G1);
        assert!(ks.is_kingside_castle());
        assert!(!ks.is_queenside_castle());
        assert!(ks.is_castle());

        let qs = Move::queenside_castle(king, Square::C1);
        assert!(qs.is_queenside_castle());
        assert!(!qs.is_kingside_castle());
    }

    #[test]
    fn coord_smoke() {
        let board = pawn_board();
        let piece = board.piece_at(Square::A4).unwrap();
        assert_eq!("a4a5", Move::quiet(piece, Square::A5).as_coord());
        assert_eq!(
            "a4a8q",
            Move::promotion(piece, Square::A8, PieceKind::Queen).as_coord()
        );
    }
}
