// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! caissa is a chess rules engine: an 8x8 board and piece registry, a
//! pseudo-legal move generator, a legality filter, and a turn state
//! machine that commits moves and detects mate, stalemate, and draws.
#![allow(dead_code)]

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate num_derive;

mod analysis;
pub mod attacks;
mod board;
mod game;
mod move_generator;
mod moves;
mod perft;
mod types;

pub use crate::analysis::{Analysis, Coverage};
pub use crate::board::{Board, Piece, PieceId};
pub use crate::game::{CapturedPiece, CommittedMove, FenParseError, Game, MoveError, Outcome};
pub use crate::move_generator::{MoveGenerator, MoveVec};
pub use crate::moves::{Move, MoveFlags};
pub use crate::perft::perft;
pub use crate::types::{Color, Direction, File, PieceKind, Rank, Square};
