// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Perft: counts the leaf nodes of the legal move tree to a fixed depth.
//! The known node counts for standard positions validate the generator
//! and the legality filter together.
use crate::analysis::Analysis;
use crate::board::Board;
use crate::game::Game;
use crate::move_generator::{MoveGenerator, MoveVec};
use crate::types::Color;

pub fn perft(game: &Game, depth: u32) -> u64 {
    walk(game.board(), game.side_to_move(), depth)
}

fn walk(board: &Board, to_move: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveVec::default();
    MoveGenerator::new().generate_moves(board, to_move, &mut moves);

    let analysis = Analysis::new(board);
    let mut nodes = 0;
    for mov in &moves {
        if !analysis.is_legal_given_pseudolegal(mov) {
            continue;
        }

        let mut next = board.clone();
        next.apply_move(mov);
        nodes += walk(&next, to_move.toggle(), depth - 1);
    }

    nodes
}
