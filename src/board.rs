// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::moves::Move;
use crate::types::{Color, File, PieceKind, Rank, Square, TableIndex, FILES, RANKS};

/// Stable identity of a piece for the lifetime of a game. Ids index the
/// board's piece table and survive promotion (the piece's kind changes in
/// place) and capture (the entry is retained, marked captured).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(u8);

impl PieceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A live (or captured) piece owned by the board's registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    square: Square,
    has_moved: bool,
    captured: bool,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The square this piece stands on. Meaningless if the piece has been
    /// captured.
    pub fn square(&self) -> Square {
        self.square
    }

    /// Whether this piece has moved at least once. Gates pawn double pushes
    /// and castling eligibility.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind.as_char(self.color))
    }
}

/// The piece registry: owns every piece created during a game and an
/// occupancy index over the 64 squares. Also carries the en passant target
/// so that scratch copies made for legality simulation see it.
///
/// The occupancy index and the pieces' `square` fields are kept in lock-step
/// by every mutation; at most one piece occupies a square at a time.
#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<Piece>,
    occupancy: [Option<PieceId>; 64],
    en_passant_square: Option<Square>,
}

//
// Registry queries
//

impl Board {
    /// An empty board with no pieces.
    pub fn new() -> Board {
        Board {
            pieces: Vec::with_capacity(32),
            occupancy: [None; 64],
            en_passant_square: None,
        }
    }

    /// A board set up with the standard starting layout. Piece creation
    /// order is fixed (pawns a-h, rooks, knights, bishops, queen, king,
    /// White before Black) so that move generation order is deterministic.
    pub fn standard() -> Board {
        let mut board = Board::new();
        for &color in &[Color::White, Color::Black] {
            let (pawn_rank, back_rank) = match color {
                Color::White => (Rank::Two, Rank::One),
                Color::Black => (Rank::Seven, Rank::Eight),
            };

            for &file in &FILES {
                board.place_piece(PieceKind::Pawn, color, Square::of(pawn_rank, file));
            }

            board.place_piece(PieceKind::Rook, color, Square::of(back_rank, File::A));
            board.place_piece(PieceKind::Rook, color, Square::of(back_rank, File::H));
            board.place_piece(PieceKind::Knight, color, Square::of(back_rank, File::B));
            board.place_piece(PieceKind::Knight, color, Square::of(back_rank, File::G));
            board.place_piece(PieceKind::Bishop, color, Square::of(back_rank, File::C));
            board.place_piece(PieceKind::Bishop, color, Square::of(back_rank, File::F));
            board.place_piece(PieceKind::Queen, color, Square::of(back_rank, File::D));
            board.place_piece(PieceKind::King, color, Square::of(back_rank, File::E));
        }

        board
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.occupancy[square.as_index()].map(|id| &self.pieces[id.index()])
    }

    /// All live pieces in creation order. Captured pieces are skipped.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|piece| !piece.captured)
    }

    /// All live pieces of one color, in creation order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.color == color)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.occupancy[square.as_index()].is_some()
    }

    pub fn is_enemy_occupied(&self, square: Square, asking: Color) -> bool {
        match self.piece_at(square) {
            Some(piece) => piece.color != asking,
            None => false,
        }
    }

    pub fn is_friendly_occupied(&self, square: Square, asking: Color) -> bool {
        match self.piece_at(square) {
            Some(piece) => piece.color == asking,
            None => false,
        }
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|piece| piece.kind == PieceKind::King)
            .map(|piece| piece.square)
    }

    /// The square a double-pushed pawn skipped on the immediately preceding
    /// move, if any. Consumable only by the very next move.
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Castling eligibility, derived from the registry: the king stands
    /// unmoved on its home square and an unmoved friendly rook stands on the
    /// h-file corner. A rook captured on its home square loses the right
    /// because the occupant check fails.
    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.can_castle(color, File::H)
    }

    /// Queenside analogue of `can_castle_kingside` (a-file rook).
    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.can_castle(color, File::A)
    }

    fn can_castle(&self, color: Color, rook_file: File) -> bool {
        let home_rank = match color {
            Color::White => Rank::One,
            Color::Black => Rank::Eight,
        };

        let king_ok = match self.piece_at(Square::of(home_rank, File::E)) {
            Some(piece) => {
                piece.kind == PieceKind::King && piece.color == color && !piece.has_moved
            }
            None => false,
        };
        let rook_ok = match self.piece_at(Square::of(home_rank, rook_file)) {
            Some(piece) => {
                piece.kind == PieceKind::Rook && piece.color == color && !piece.has_moved
            }
            None => false,
        };

        king_ok && rook_ok
    }
}

//
// Registry mutation and move application
//

impl Board {
    /// Creates a piece on the given square. Setup-time only; the square must
    /// be vacant.
    pub fn place_piece(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        assert!(
            !self.is_occupied(square),
            "place_piece: {} is already occupied",
            square
        );

        let id = PieceId(self.pieces.len() as u8);
        self.pieces.push(Piece {
            id,
            kind,
            color,
            square,
            has_moved: false,
            captured: false,
        });
        self.occupancy[square.as_index()] = Some(id);
        id
    }

    /// Marks the piece on the given square captured and vacates the square.
    pub fn remove_piece(&mut self, square: Square) -> Result<PieceId, ()> {
        let id = match self.occupancy[square.as_index()] {
            Some(id) => id,
            None => return Err(()),
        };

        self.occupancy[square.as_index()] = None;
        let piece = &mut self.pieces[id.index()];
        piece.captured = true;
        Ok(id)
    }

    pub(crate) fn set_has_moved(&mut self, id: PieceId) {
        self.pieces[id.index()].has_moved = true;
    }

    pub(crate) fn set_en_passant_square(&mut self, square: Option<Square>) {
        self.en_passant_square = square;
    }

    /// Applies a move to the registry: removes the captured piece (which for
    /// en passant is not on the destination square), relocates the castling
    /// rook, swaps the kind of a promoting pawn in place, moves the piece,
    /// and arms or clears the en passant target.
    ///
    /// The move is trusted; legality is the caller's responsibility.
    pub fn apply_move(&mut self, mov: &Move) {
        let mover_id = mov.piece();
        let mover_color = self.pieces[mover_id.index()].color;

        // Captures first, so the destination square is vacant below.
        if mov.is_capture() {
            let target_square = mov
                .captures()
                .expect("invalid move: capture without captured square");
            self.remove_piece(target_square)
                .expect("invalid move: no piece at capture target");
        }

        // Castles move two pieces; the rook slides to the inside of the
        // king's destination.
        if mov.is_castle() {
            let rank = mov.source().rank();
            let (rook_from, rook_to) = if mov.is_kingside_castle() {
                (Square::of(rank, File::H), Square::of(rank, File::F))
            } else {
                (Square::of(rank, File::A), Square::of(rank, File::D))
            };

            let rook_id = self.occupancy[rook_from.as_index()]
                .expect("invalid move: castle without rook");
            self.occupancy[rook_from.as_index()] = None;
            self.occupancy[rook_to.as_index()] = Some(rook_id);
            let rook = &mut self.pieces[rook_id.index()];
            rook.square = rook_to;
            rook.has_moved = true;
        }

        self.occupancy[mov.source().as_index()] = None;
        self.occupancy[mov.destination().as_index()] = Some(mover_id);
        let mover = &mut self.pieces[mover_id.index()];
        mover.square = mov.destination();
        mover.has_moved = true;
        if mov.is_promotion() {
            mover.kind = mov
                .promotion_piece()
                .expect("invalid move: promotion without piece kind");
        }

        // Double pushes arm the en passant target on the skipped square;
        // every other move clears it.
        if mov.is_double_pawn_push() {
            let skipped = mov
                .source()
                .towards(mover_color.forward())
                .expect("invalid move: double push from back rank");
            self.en_passant_square = Some(skipped);
        } else {
            self.en_passant_square = None;
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
