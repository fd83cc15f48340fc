// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turn and game state machine. A `Game` owns a board, tracks whose
//! turn it is, validates and commits moves, detects mate, stalemate, and
//! the fifty-move draw, and keeps the committed-move history.
//!
//! Games can be created by parsing FEN and FEN can be produced from
//! particular game states.
use std::convert::TryFrom;
use std::error;
use std::fmt::{self, Write};

use crate::analysis::Analysis;
use crate::board::{Board, PieceId};
use crate::move_generator::MoveVec;
use crate::moves::Move;
use crate::types::{Color, File, PieceKind, Rank, Square, TableIndex, FILES, RANKS};

/// Possible errors that can arise when parsing a FEN string into a `Game`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    EmptyHalfmove,
    InvalidHalfmove,
    EmptyFullmove,
    InvalidFullmove,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected char: {}", c),
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            FenParseError::InvalidDigit => write!(f, "invalid digit"),
            FenParseError::FileDoesNotSumToEight => write!(f, "file does not sum to eight"),
            FenParseError::UnknownPiece => write!(f, "unknown piece"),
            FenParseError::InvalidSideToMove => write!(f, "invalid side to move"),
            FenParseError::InvalidCastle => write!(f, "invalid castle status"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en passant square"),
            FenParseError::EmptyHalfmove => write!(f, "empty halfmove clock"),
            FenParseError::InvalidHalfmove => write!(f, "invalid halfmove clock"),
            FenParseError::EmptyFullmove => write!(f, "empty fullmove clock"),
            FenParseError::InvalidFullmove => write!(f, "invalid fullmove clock"),
        }
    }
}

impl error::Error for FenParseError {}

/// Possible errors that can arise when locating or committing a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// No live piece of the mover sits on the move's source square. Also
    /// covers stale moves built against an earlier board state.
    NoPieceOnSquare,
    /// The piece belongs to the player whose turn it is not.
    NotSideToMove,
    /// The move is not in the legal move set of the current position.
    IllegalMove,
    /// A pawn reached the promotion rank but no promotion kind was given.
    /// There is no default; the caller must choose.
    AmbiguousPromotion,
    /// The game has already ended; no further moves can be committed.
    GameAlreadyOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MoveError::NoPieceOnSquare => write!(f, "no piece on the source square"),
            MoveError::NotSideToMove => write!(f, "piece does not belong to the side to move"),
            MoveError::IllegalMove => write!(f, "move is not legal in this position"),
            MoveError::AmbiguousPromotion => write!(f, "promotion requires a piece choice"),
            MoveError::GameAlreadyOver => write!(f, "the game is already over"),
        }
    }
}

impl error::Error for MoveError {}

/// The result state of a game. `Checkmate` names the side that was mated,
/// not the winner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Checkmate(Color),
    Stalemate,
    Draw,
}

/// A capture recorded in the history: what was taken and where it stood.
/// For en passant the square differs from the move's destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CapturedPiece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

/// A move that has been validated and applied, as recorded in the game
/// history and delivered to observers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommittedMove {
    mov: Move,
    kind: PieceKind,
    color: Color,
    captured: Option<CapturedPiece>,
    is_check: bool,
    outcome: Outcome,
}

impl CommittedMove {
    pub fn mov(&self) -> Move {
        self.mov
    }

    /// The kind of the moving piece at the time it moved; a promotion
    /// records `Pawn` here, with the chosen kind on the move itself.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn captured(&self) -> Option<CapturedPiece> {
        self.captured
    }

    pub fn is_check(&self) -> bool {
        self.is_check
    }

    /// The game outcome as of this move.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

impl fmt::Display for CommittedMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mov.as_coord())
    }
}

pub struct Game {
    board: Board,
    side_to_move: Color,
    halfmove_clock: u32,
    fullmove_clock: u32,
    outcome: Outcome,
    history: Vec<CommittedMove>,
    observers: Vec<Box<dyn FnMut(&CommittedMove)>>,
}

impl Game {
    /// A fresh game from the standard starting position, White to move.
    pub fn new() -> Game {
        Game {
            board: Board::standard(),
            side_to_move: Color::White,
            halfmove_clock: 0,
            fullmove_clock: 1,
            outcome: Outcome::InProgress,
            history: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.fullmove_clock
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn history(&self) -> &[CommittedMove] {
        &self.history
    }

    pub fn is_in_check(&self) -> bool {
        Analysis::new(&self.board).is_check(self.side_to_move)
    }

    /// Registers a callback invoked after every committed move.
    pub fn observe<F: FnMut(&CommittedMove) + 'static>(&mut self, f: F) {
        self.observers.push(Box::new(f));
    }

    /// The legal moves of the side to move, in piece creation order.
    pub fn legal_moves(&self) -> MoveVec {
        Analysis::new(&self.board).legal_moves_for_side(self.side_to_move)
    }

    /// The legal moves of a single piece. Empty for a captured piece or a
    /// piece of the side not on move.
    pub fn legal_moves_for_piece(&self, id: PieceId) -> MoveVec {
        match self.board.piece(id) {
            Some(piece) if !piece.is_captured() && piece.color() == self.side_to_move => {
                Analysis::new(&self.board).legal_moves(piece)
            }
            _ => MoveVec::default(),
        }
    }

    pub fn is_legal_destination(&self, source: Square, destination: Square) -> bool {
        match self.board.piece_at(source) {
            Some(piece) if piece.color() == self.side_to_move => Analysis::new(&self.board)
                .legal_moves(piece)
                .iter()
                .any(|mov| mov.destination() == destination),
            _ => false,
        }
    }

    /// Locates the legal move between two squares, suitable as an argument
    /// to `commit`. A promotion requires `promotion` to be set; every other
    /// move ignores it.
    pub fn find_move(
        &self,
        source: Square,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        if self.outcome != Outcome::InProgress {
            return Err(MoveError::GameAlreadyOver);
        }

        let piece = match self.board.piece_at(source) {
            Some(piece) => piece,
            None => return Err(MoveError::NoPieceOnSquare),
        };
        if piece.color() != self.side_to_move {
            return Err(MoveError::NotSideToMove);
        }

        let legal = Analysis::new(&self.board).legal_moves(piece);
        let mut candidates = legal.iter().filter(|mov| mov.destination() == destination);
        match promotion {
            Some(kind) => candidates
                .find(|mov| mov.promotion_piece() == Some(kind))
                .cloned()
                .ok_or(MoveError::IllegalMove),
            None => match candidates.next() {
                Some(mov) if mov.is_promotion() => Err(MoveError::AmbiguousPromotion),
                Some(mov) => Ok(*mov),
                None => Err(MoveError::IllegalMove),
            },
        }
    }

    /// Validates a move and applies it: the board mutates, the clocks and
    /// side to move advance, the outcome is recomputed, the move lands in
    /// the history, and observers fire. On error nothing changes at all.
    pub fn commit(&mut self, mov: Move) -> Result<CommittedMove, MoveError> {
        if self.outcome != Outcome::InProgress {
            return Err(MoveError::GameAlreadyOver);
        }

        let piece = match self.board.piece(mov.piece()) {
            Some(piece) if !piece.is_captured() && piece.square() == mov.source() => *piece,
            _ => return Err(MoveError::NoPieceOnSquare),
        };
        if piece.color() != self.side_to_move {
            return Err(MoveError::NotSideToMove);
        }
        if mov.is_promotion() && mov.promotion_piece().is_none() {
            return Err(MoveError::AmbiguousPromotion);
        }

        // Revalidate against the generated legal set and commit the
        // generated move, whose flags are authoritative even if the caller
        // hand-built theirs.
        let legal = Analysis::new(&self.board).legal_moves(&piece);
        let mut authoritative = match legal.iter().find(|candidate| {
            candidate.destination() == mov.destination()
                && candidate.promotion_piece() == mov.promotion_piece()
        }) {
            Some(candidate) => *candidate,
            None => return Err(MoveError::IllegalMove),
        };

        let captured = authoritative.captures().map(|square| {
            let victim = self
                .board
                .piece_at(square)
                .expect("capture move with empty capture square");
            CapturedPiece {
                kind: victim.kind(),
                color: victim.color(),
                square,
            }
        });

        self.board.apply_move(&authoritative);

        if authoritative.is_capture() || piece.kind() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.side_to_move == Color::Black {
            self.fullmove_clock += 1;
        }
        self.side_to_move = self.side_to_move.toggle();

        let is_check = Analysis::new(&self.board).is_check(self.side_to_move);
        if is_check {
            authoritative.set_check();
        }
        self.outcome = self.compute_outcome();

        let committed = CommittedMove {
            mov: authoritative,
            kind: piece.kind(),
            color: piece.color(),
            captured,
            is_check,
            outcome: self.outcome,
        };
        debug!(
            "committed {} ({} {}), outcome {:?}",
            committed,
            committed.color,
            committed.kind,
            committed.outcome
        );

        self.history.push(committed);
        for observer in &mut self.observers {
            observer(&committed);
        }

        Ok(committed)
    }

    fn compute_outcome(&self) -> Outcome {
        let analysis = Analysis::new(&self.board);
        if !analysis.has_any_legal_move(self.side_to_move) {
            return if analysis.is_check(self.side_to_move) {
                Outcome::Checkmate(self.side_to_move)
            } else {
                Outcome::Stalemate
            };
        }

        // Fifty full moves without a capture or pawn move.
        if self.halfmove_clock >= 100 {
            return Outcome::Draw;
        }

        Outcome::InProgress
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "{:?} to move", self.side_to_move)
    }
}

//
// FEN parsing and rendering
//

impl Game {
    /// Constructs a game from a FEN representation of a position.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Game, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat<'a>(iter: &mut Stream<'a>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance<'a>(iter: &mut Stream<'a>) -> Result<(), FenParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek<'a>(iter: &mut Stream<'a>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_side_to_move<'a>(iter: &mut Stream<'a>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter)?;
            Ok(side)
        }

        // Rights granted by the FEN, one flag per color and wing.
        fn eat_castle_status<'a>(
            iter: &mut Stream<'a>,
        ) -> Result<[bool; 4], FenParseError> {
            let mut rights = [false; 4];
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(rights);
            }

            for _ in 0..4 {
                match peek(iter)? {
                    'K' => rights[0] = true,
                    'Q' => rights[1] = true,
                    'k' => rights[2] = true,
                    'q' => rights[3] = true,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter)?;
            }

            Ok(rights)
        }

        fn eat_en_passant<'a>(iter: &mut Stream<'a>) -> Result<Option<Square>, FenParseError> {
            let c = peek(iter)?;
            if c == '-' {
                advance(iter)?;
                return Ok(None);
            }

            if let Ok(file) = File::try_from(c) {
                advance(iter)?;
                let rank_c = peek(iter)?;
                if let Ok(rank) = Rank::try_from(rank_c) {
                    advance(iter)?;
                    Ok(Some(Square::of(rank, file)))
                } else {
                    Err(FenParseError::InvalidEnPassant)
                }
            } else {
                Err(FenParseError::InvalidEnPassant)
            }
        }

        fn eat_halfmove<'a>(iter: &mut Stream<'a>) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            loop {
                let c = peek(iter)?;
                if !c.is_digit(10) {
                    break;
                }

                buf.push(c);
                advance(iter)?;
            }

            if buf.is_empty() {
                return Err(FenParseError::EmptyHalfmove);
            }

            buf.parse::<u32>()
                .map_err(|_| FenParseError::InvalidHalfmove)
        }

        fn eat_fullmove<'a>(iter: &mut Stream<'a>) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            for ch in iter {
                if !ch.is_digit(10) {
                    if buf.is_empty() {
                        return Err(FenParseError::EmptyFullmove);
                    }

                    break;
                }

                buf.push(ch);
            }

            if buf.is_empty() {
                return Err(FenParseError::EmptyFullmove);
            }

            buf.parse::<u32>()
                .map_err(|_| FenParseError::InvalidFullmove)
        }

        let mut board = Board::new();
        let str_ref = fen.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for &rank in RANKS.iter().rev() {
            let mut file = File::A as usize;
            while file <= File::H as usize {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_digit(10) {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    let value = c as usize - 48;
                    file += value;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter)?;
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let kind = if let Ok(kind) = PieceKind::try_from(c) {
                    kind
                } else {
                    return Err(FenParseError::UnknownPiece);
                };
                let color = if c.is_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                let square = Square::of(rank, File::from_index(file));
                let id = board.place_piece(kind, color, square);

                // A pawn off its home rank must have moved; this also cuts
                // off its double push.
                let home_rank = match color {
                    Color::White => Rank::Two,
                    Color::Black => Rank::Seven,
                };
                if kind == PieceKind::Pawn && rank != home_rank {
                    board.set_has_moved(id);
                }

                advance(iter)?;
                file += 1;
            }

            if rank != Rank::One {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        let side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        let rights = eat_castle_status(iter)?;
        eat(iter, ' ')?;
        board.set_en_passant_square(eat_en_passant(iter)?);
        eat(iter, ' ')?;
        let halfmove_clock = eat_halfmove(iter)?;
        eat(iter, ' ')?;
        let fullmove_clock = eat_fullmove(iter)?;

        // Castling eligibility derives from movement history, which FEN
        // does not carry. A right the FEN withholds is recorded by marking
        // the corner rook as having moved.
        let corners = [
            (Color::White, Rank::One, File::H, rights[0]),
            (Color::White, Rank::One, File::A, rights[1]),
            (Color::Black, Rank::Eight, File::H, rights[2]),
            (Color::Black, Rank::Eight, File::A, rights[3]),
        ];
        for &(color, rank, file, granted) in &corners {
            if granted {
                continue;
            }

            if let Some(rook) = board.piece_at(Square::of(rank, file)) {
                if rook.kind() == PieceKind::Rook && rook.color() == color {
                    let id = rook.id();
                    board.set_has_moved(id);
                }
            }
        }

        let mut game = Game {
            board,
            side_to_move,
            halfmove_clock,
            fullmove_clock,
            outcome: Outcome::InProgress,
            history: Vec::new(),
            observers: Vec::new(),
        };
        game.outcome = game.compute_outcome();
        Ok(game)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                let square = Square::of(rank, file);
                if let Some(piece) = self.board.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.side_to_move {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }
        buf.push(' ');
        let mut any_castle = false;
        if self.board.can_castle_kingside(Color::White) {
            buf.push('K');
            any_castle = true;
        }
        if self.board.can_castle_queenside(Color::White) {
            buf.push('Q');
            any_castle = true;
        }
        if self.board.can_castle_kingside(Color::Black) {
            buf.push('k');
            any_castle = true;
        }
        if self.board.can_castle_queenside(Color::Black) {
            buf.push('q');
            any_castle = true;
        }
        if !any_castle {
            buf.push('-');
        }
        buf.push(' ');
        if let Some(ep_square) = self.board.en_passant_square() {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }
        buf.push(' ');
        write!(&mut buf, "{} {}", self.halfmove_clock, self.fullmove_clock).unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::{FenParseError, Game, MoveError, Outcome};
    use crate::types::{Color, PieceKind, Square};

    mod fen {
        use super::*;

        #[test]
        fn start_position_round_trips() {
            let game = Game::new();
            assert_eq!(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                game.as_fen()
            );
            let parsed =
                Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                    .unwrap();
            assert_eq!(game.as_fen(), parsed.as_fen());
        }

        #[test]
        fn empty_string() {
            assert_eq!(Some(FenParseError::UnexpectedEnd), Game::from_fen("").err());
        }

        #[test]
        fn unknown_piece() {
            assert_eq!(
                Some(FenParseError::UnknownPiece),
                Game::from_fen("z7/8/8/8/8/8/8/8 w - - 0 1").err()
            );
        }

        #[test]
        fn invalid_digit() {
            assert_eq!(
                Some(FenParseError::InvalidDigit),
                Game::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").err()
            );
        }

        #[test]
        fn file_does_not_sum_to_eight() {
            assert_eq!(
                Some(FenParseError::FileDoesNotSumToEight),
                Game::from_fen("pppp6/8/8/8/8/8/8/8 w - - 0 1").err()
            );
        }

        #[test]
        fn invalid_side_to_move() {
            assert_eq!(
                Some(FenParseError::InvalidSideToMove),
                Game::from_fen("8/8/8/8/8/8/8/8 c - - 0 1").err()
            );
        }

        #[test]
        fn invalid_castle() {
            assert_eq!(
                Some(FenParseError::InvalidCastle),
                Game::from_fen("8/8/8/8/8/8/8/8 w x - 0 1").err()
            );
        }

        #[test]
        fn invalid_en_passant() {
            assert_eq!(
                Some(FenParseError::InvalidEnPassant),
                Game::from_fen("8/8/8/8/8/8/8/8 w - x9 0 1").err()
            );
        }

        #[test]
        fn empty_halfmove() {
            assert_eq!(
                Some(FenParseError::EmptyHalfmove),
                Game::from_fen("8/8/8/8/8/8/8/8 w - - q 1").err()
            );
        }

        #[test]
        fn empty_fullmove() {
            assert_eq!(
                Some(FenParseError::EmptyFullmove),
                Game::from_fen("8/8/8/8/8/8/8/8 w - - 0 ").err()
            );
        }

        #[test]
        fn en_passant_square_parsed() {
            let game =
                Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                    .unwrap();
            assert_eq!(Some(Square::E3), game.board().en_passant_square());
        }

        #[test]
        fn withheld_castle_rights_stick() {
            let game =
                Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
            assert!(game.board().can_castle_kingside(Color::White));
            assert!(!game.board().can_castle_queenside(Color::White));
            assert!(!game.board().can_castle_kingside(Color::Black));
            assert!(game.board().can_castle_queenside(Color::Black));
            assert_eq!(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1",
                game.as_fen()
            );
        }

        #[test]
        fn advanced_pawn_loses_double_push() {
            let game = Game::from_fen("8/8/8/8/8/4P3/8/8 w - - 0 1").unwrap();
            let pawn = game.board().piece_at(Square::E3).unwrap();
            assert!(pawn.has_moved());
        }
    }

    mod commit {
        use super::*;

        #[test]
        fn opening_move_advances_state() {
            let mut game = Game::new();
            let mov = game.find_move(Square::E2, Square::E4, None).unwrap();
            let committed = game.commit(mov).unwrap();

            assert!(committed.mov().is_double_pawn_push());
            assert_eq!(Color::Black, game.side_to_move());
            assert_eq!(0, game.halfmove_clock());
            assert_eq!(1, game.fullmove_clock());
            assert_eq!(Some(Square::E3), game.board().en_passant_square());
            assert_eq!(1, game.history().len());
        }

        #[test]
        fn fullmove_clock_ticks_after_black() {
            let mut game = Game::new();
            let mov = game.find_move(Square::E2, Square::E4, None).unwrap();
            game.commit(mov).unwrap();
            let mov = game.find_move(Square::E7, Square::E5, None).unwrap();
            game.commit(mov).unwrap();
            assert_eq!(2, game.fullmove_clock());
        }

        #[test]
        fn quiet_piece_move_bumps_halfmove_clock() {
            let mut game = Game::new();
            let mov = game.find_move(Square::G1, Square::F3, None).unwrap();
            game.commit(mov).unwrap();
            assert_eq!(1, game.halfmove_clock());
        }

        #[test]
        fn wrong_side_is_rejected() {
            let mut game = Game::new();
            assert_eq!(
                Err(MoveError::NotSideToMove),
                game.find_move(Square::E7, Square::E5, None)
            );

            let mov = game.find_move(Square::E2, Square::E4, None).unwrap();
            game.commit(mov).unwrap();
            assert_eq!(
                Err(MoveError::NotSideToMove),
                game.find_move(Square::D2, Square::D4, None)
            );
        }

        #[test]
        fn empty_square_is_rejected() {
            let game = Game::new();
            assert_eq!(
                Err(MoveError::NoPieceOnSquare),
                game.find_move(Square::E4, Square::E5, None)
            );
        }

        #[test]
        fn illegal_move_is_rejected() {
            let game = Game::new();
            assert_eq!(
                Err(MoveError::IllegalMove),
                game.find_move(Square::E2, Square::E5, None)
            );
        }

        #[test]
        fn rejected_move_changes_nothing() {
            let mut game = Game::new();
            let before = game.as_fen();
            let pawn = *game.board().piece_at(Square::E2).unwrap();
            let bogus = crate::moves::Move::quiet(&pawn, Square::E5);
            assert_eq!(Err(MoveError::IllegalMove), game.commit(bogus));
            assert_eq!(before, game.as_fen());
            assert!(game.history().is_empty());
        }

        #[test]
        fn stale_move_is_rejected() {
            let mut game = Game::new();
            let mov = game.find_move(Square::E2, Square::E3, None).unwrap();
            game.commit(mov).unwrap();

            // The pawn has left e2; replaying the same move is stale.
            assert_eq!(Err(MoveError::NoPieceOnSquare), game.commit(mov));
        }

        #[test]
        fn capture_resets_halfmove_clock() {
            let mut game =
                Game::from_fen("k7/8/8/3p4/4P3/8/8/K7 w - - 7 20").unwrap();
            let mov = game.find_move(Square::E4, Square::D5, None).unwrap();
            assert!(!mov.is_quiet());
            let committed = game.commit(mov).unwrap();

            assert_eq!(0, game.halfmove_clock());
            let captured = committed.captured().unwrap();
            assert_eq!(PieceKind::Pawn, captured.kind);
            assert_eq!(Square::D5, captured.square);
        }

        #[test]
        fn en_passant_capture_records_the_adjacent_square() {
            let mut game =
                Game::from_fen("k7/8/8/8/3p4/8/4P3/K7 w - - 0 1").unwrap();
            let mov = game.find_move(Square::E2, Square::E4, None).unwrap();
            game.commit(mov).unwrap();

            let ep = game.find_move(Square::D4, Square::E3, None).unwrap();
            assert!(ep.is_en_passant());
            let committed = game.commit(ep).unwrap();

            let captured = committed.captured().unwrap();
            assert_eq!(Square::E4, captured.square);
            assert!(!game.board().is_occupied(Square::E4));
            assert!(game.board().is_occupied(Square::E3));
        }

        #[test]
        fn promotion_without_kind_is_ambiguous() {
            let game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
            assert_eq!(
                Err(MoveError::AmbiguousPromotion),
                game.find_move(Square::A7, Square::A8, None)
            );
        }

        #[test]
        fn promotion_swaps_the_kind_in_place() {
            let mut game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
            let before = game.board().piece_at(Square::A7).unwrap().id();
            let mov = game
                .find_move(Square::A7, Square::A8, Some(PieceKind::Queen))
                .unwrap();
            game.commit(mov).unwrap();

            let after = game.board().piece_at(Square::A8).unwrap();
            assert_eq!(before, after.id());
            assert_eq!(PieceKind::Queen, after.kind());
        }

        #[test]
        fn checking_move_is_flagged() {
            let mut game = Game::from_fen("k7/8/8/8/8/8/8/K6R w - - 0 1").unwrap();
            let mov = game.find_move(Square::H1, Square::H8, None).unwrap();
            let committed = game.commit(mov).unwrap();
            assert!(committed.is_check());
            assert!(committed.mov().gives_check());
            assert!(game.is_in_check());
        }

        #[test]
        fn back_rank_mate_ends_the_game() {
            let mut game = Game::from_fen("k7/8/1K6/8/8/8/8/7R w - - 0 1").unwrap();
            let mov = game.find_move(Square::H1, Square::H8, None).unwrap();
            let committed = game.commit(mov).unwrap();

            assert_eq!(Outcome::Checkmate(Color::Black), committed.outcome());
            assert_eq!(Outcome::Checkmate(Color::Black), game.outcome());
            assert_eq!(
                Err(MoveError::GameAlreadyOver),
                game.find_move(Square::A8, Square::A7, None)
            );
        }

        #[test]
        fn stalemate_detected_on_load() {
            let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
            assert_eq!(Outcome::Stalemate, game.outcome());
        }

        #[test]
        fn fifty_move_rule_draws() {
            let mut game = Game::from_fen("k7/8/8/8/8/8/8/K6R w - - 99 80").unwrap();
            let mov = game.find_move(Square::H1, Square::H2, None).unwrap();
            let committed = game.commit(mov).unwrap();
            assert_eq!(100, game.halfmove_clock());
            assert_eq!(Outcome::Draw, committed.outcome());
        }

        #[test]
        fn committed_move_flags_are_authoritative() {
            let mut game = Game::new();
            let pawn = *game.board().piece_at(Square::E2).unwrap();
            // Hand-built as quiet, but e2e4 is a double push; the committed
            // move carries the real flags.
            let hand_built = crate::moves::Move::quiet(&pawn, Square::E4);
            let committed = game.commit(hand_built).unwrap();
            assert!(committed.mov().is_double_pawn_push());
        }

        #[test]
        fn observers_see_every_commit() {
            use std::cell::RefCell;
            use std::rc::Rc;

            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = seen.clone();

            let mut game = Game::new();
            game.observe(move |committed| sink.borrow_mut().push(committed.mov().as_coord()));

            let mov = game.find_move(Square::E2, Square::E4, None).unwrap();
            game.commit(mov).unwrap();
            let mov = game.find_move(Square::G8, Square::F6, None).unwrap();
            game.commit(mov).unwrap();

            assert_eq!(vec!["e2e4".to_string(), "g8f6".to_string()], *seen.borrow());
        }
    }

    mod scenarios {
        use super::*;

        fn play(game: &mut Game, coords: &[(Square, Square)]) {
            for &(source, destination) in coords {
                let mov = game.find_move(source, destination, None).unwrap();
                game.commit(mov).unwrap();
            }
        }

        #[test]
        fn fools_mate() {
            let mut game = Game::new();
            play(
                &mut game,
                &[
                    (Square::F2, Square::F3),
                    (Square::E7, Square::E5),
                    (Square::G2, Square::G4),
                ],
            );

            let mov = game.find_move(Square::D8, Square::H4, None).unwrap();
            let committed = game.commit(mov).unwrap();
            assert!(committed.is_check());
            assert_eq!(Outcome::Checkmate(Color::White), game.outcome());

            // The mated side has no legal move from any piece.
            for piece in game.board().pieces_of(Color::White) {
                assert!(game.legal_moves_for_piece(piece.id()).is_empty());
            }
        }

        #[test]
        fn kingside_castle_commits_both_movements() {
            let mut game = Game::new();
            play(
                &mut game,
                &[
                    (Square::E2, Square::E4),
                    (Square::E7, Square::E5),
                    (Square::G1, Square::F3),
                    (Square::B8, Square::C6),
                    (Square::F1, Square::C4),
                    (Square::G8, Square::F6),
                ],
            );

            let mov = game.find_move(Square::E1, Square::G1, None).unwrap();
            assert!(mov.is_kingside_castle());
            game.commit(mov).unwrap();

            let king = game.board().piece_at(Square::G1).unwrap();
            assert_eq!(PieceKind::King, king.kind());
            let rook = game.board().piece_at(Square::F1).unwrap();
            assert_eq!(PieceKind::Rook, rook.kind());
            assert!(!game.board().is_occupied(Square::H1));
            assert!(!game.board().can_castle_queenside(Color::White));
        }

        #[test]
        fn en_passant_expires_after_one_move() {
            let mut game = Game::new();
            play(
                &mut game,
                &[
                    (Square::E2, Square::E4),
                    (Square::A7, Square::A6),
                    (Square::E4, Square::E5),
                    (Square::D7, Square::D5),
                ],
            );
            assert_eq!(Some(Square::D6), game.board().en_passant_square());

            // Decline the en passant capture; the chance is gone for good.
            play(
                &mut game,
                &[(Square::B1, Square::C3), (Square::A6, Square::A5)],
            );
            assert_eq!(None, game.board().en_passant_square());
            assert_eq!(
                Err(MoveError::IllegalMove),
                game.find_move(Square::E5, Square::D6, None)
            );
        }

        #[test]
        fn replaying_a_history_reproduces_the_game() {
            let mut first = Game::new();
            play(
                &mut first,
                &[
                    (Square::E2, Square::E4),
                    (Square::C7, Square::C5),
                    (Square::G1, Square::F3),
                    (Square::D7, Square::D6),
                    (Square::D2, Square::D4),
                    (Square::C5, Square::D4),
                ],
            );

            let mut second = Game::new();
            for committed in first.history().to_vec() {
                let mov = committed.mov();
                let replayed = second
                    .find_move(mov.source(), mov.destination(), mov.promotion_piece())
                    .unwrap();
                second.commit(replayed).unwrap();
            }

            assert_eq!(first.as_fen(), second.as_fen());
        }
    }
}
