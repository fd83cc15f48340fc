// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack geometry queries over a board. A square is "attacked" by a color
//! if one of that color's pieces could capture on it, which deliberately
//! includes squares occupied by that color's own pieces (guarded squares):
//! a king may not capture a guarded piece. Pawn forward pushes are not
//! attacks; only their diagonals are.
use arrayvec::ArrayVec;

use crate::board::{Board, Piece};
use crate::types::{Color, Direction, Square, TableIndex};
use crate::types::{BISHOP_DIRECTIONS, DIRECTIONS, KNIGHT_JUMPS, ROOK_DIRECTIONS, SQUARES};

/// Precomputed single-step target lists per square, for the fixed-offset
/// pieces. Entries store the fixed-size square array plus the count of
/// targets actually on the board from that square.
struct StepTable {
    table: [([Square; 8], usize); 64],
}

impl StepTable {
    fn from_offsets(offsets: &[(i32, i32); 8]) -> StepTable {
        let mut table = [([Square::A1; 8], 0); 64];
        for &sq in SQUARES.iter() {
            let entry = &mut table[sq.as_index()];
            for &(file_delta, rank_delta) in offsets {
                if let Some(dest) = sq.offset(file_delta, rank_delta) {
                    entry.0[entry.1] = dest;
                    entry.1 += 1;
                }
            }
        }

        StepTable { table }
    }

    fn targets(&self, sq: Square) -> &[Square] {
        let (squares, len) = &self.table[sq.as_index()];
        &squares[..*len]
    }
}

lazy_static! {
    static ref KNIGHT_TABLE: StepTable = StepTable::from_offsets(&KNIGHT_JUMPS);
    static ref KING_TABLE: StepTable = {
        let mut offsets = [(0i32, 0i32); 8];
        for (slot, &dir) in offsets.iter_mut().zip(DIRECTIONS.iter()) {
            *slot = dir.as_vector();
        }
        StepTable::from_offsets(&offsets)
    };
}

/// The on-board squares a knight on `sq` jumps to, in generation order.
pub fn knight_targets(sq: Square) -> &'static [Square] {
    KNIGHT_TABLE.targets(sq)
}

/// The on-board squares adjacent to `sq`, in generation order.
pub fn king_targets(sq: Square) -> &'static [Square] {
    KING_TABLE.targets(sq)
}

/// The diagonal squares a pawn of the given color attacks from `sq`,
/// a-file side first.
pub fn pawn_capture_targets(sq: Square, color: Color) -> ArrayVec<[Square; 2]> {
    let rank_delta = match color {
        Color::White => 1,
        Color::Black => -1,
    };

    let mut targets = ArrayVec::new();
    for &file_delta in &[-1, 1] {
        if let Some(dest) = sq.offset(file_delta, rank_delta) {
            targets.push(dest);
        }
    }

    targets
}

/// Whether the given piece attacks `target` on this board.
pub fn piece_attacks(board: &Board, piece: &Piece, target: Square) -> bool {
    use crate::types::PieceKind::*;
    match piece.kind() {
        Pawn => pawn_capture_targets(piece.square(), piece.color()).contains(&target),
        Knight => knight_targets(piece.square()).contains(&target),
        King => king_targets(piece.square()).contains(&target),
        Bishop => slides_to(board, piece.square(), &BISHOP_DIRECTIONS, target),
        Rook => slides_to(board, piece.square(), &ROOK_DIRECTIONS, target),
        Queen => {
            slides_to(board, piece.square(), &ROOK_DIRECTIONS, target)
                || slides_to(board, piece.square(), &BISHOP_DIRECTIONS, target)
        }
    }
}

/// Whether any piece of `by` attacks `target`.
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|piece| piece_attacks(board, piece, target))
}

/// How many pieces of `by` attack `target`. Presentation-facing coverage
/// statistic; legality only ever needs `is_attacked`.
pub fn attackers_of(board: &Board, target: Square, by: Color) -> u32 {
    board
        .pieces_of(by)
        .filter(|piece| piece_attacks(board, piece, target))
        .count() as u32
}

fn slides_to(board: &Board, from: Square, dirs: &[Direction], target: Square) -> bool {
    for &dir in dirs {
        let mut cursor = from;
        while let Some(next) = cursor.towards(dir) {
            if next == target {
                return true;
            }
            if board.is_occupied(next) {
                // Blocked; the blocker itself was handled above.
                break;
            }
            cursor = next;
        }
    }

    false
}
