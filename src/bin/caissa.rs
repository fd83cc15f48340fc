// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;

use std::convert::TryFrom;
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Instant;

use caissa::{perft, File, Game, Outcome, PieceKind, Rank, Square};
use clap::{App, Arg, ArgMatches, SubCommand};

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves of a board position")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for a board position")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Play a game on the terminal, entering coordinate moves")
                .arg(
                    Arg::with_name("FEN")
                        .help("FEN string for the starting position")
                        .index(1),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("perft") {
        run_perft(matches);
    }

    if let Some(matches) = matches.subcommand_matches("moves") {
        run_moves(matches);
    }

    if let Some(matches) = matches.subcommand_matches("play") {
        run_play(matches);
    }

    println!("{}", matches.usage());
    process::exit(1);
}

fn game_from_fen(fen: &str) -> Game {
    match Game::from_fen(fen) {
        Ok(game) => game,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let depth = value_t_or_exit!(matches, "depth", u32);
    let game = game_from_fen(fen);

    println!("fen:   {}", fen);
    println!("depth: {}", depth);
    println!();
    println!("{}", game);
    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&game, i);
        let duration = Instant::now() - start;
        let nanos = duration.subsec_nanos() as u64;
        let ms = (1000 * 1000 * 1000 * duration.as_secs() + nanos) / (1000 * 1000);
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

fn run_moves(matches: &ArgMatches) -> ! {
    let fen = matches.value_of("FEN").unwrap();
    let game = game_from_fen(fen);

    println!("{}", game);
    for mov in &game.legal_moves() {
        println!("{}", mov.as_coord());
    }

    process::exit(0);
}

fn run_play(matches: &ArgMatches) -> ! {
    let mut game = match matches.value_of("FEN") {
        Some(fen) => game_from_fen(fen),
        None => Game::new(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    loop {
        println!("{}", game);
        match game.outcome() {
            Outcome::InProgress => {}
            Outcome::Checkmate(mated) => {
                println!("checkmate, {:?} wins", mated.toggle());
                process::exit(0);
            }
            Outcome::Stalemate => {
                println!("stalemate");
                process::exit(0);
            }
            Outcome::Draw => {
                println!("draw");
                process::exit(0);
            }
        }

        print!("> ");
        stdout.lock().flush().unwrap();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap() == 0 {
            process::exit(0);
        }

        let input = line.trim();
        match input {
            "quit" | "exit" => process::exit(0),
            "fen" => {
                println!("{}", game.as_fen());
                continue;
            }
            "" => continue,
            _ => {}
        }

        let (source, destination, promotion) = match parse_coord(input) {
            Some(parsed) => parsed,
            None => {
                println!("moves look like e2e4 or e7e8q");
                continue;
            }
        };

        let result = game
            .find_move(source, destination, promotion)
            .and_then(|mov| game.commit(mov));
        match result {
            Ok(committed) => {
                if let Some(captured) = committed.captured() {
                    println!(
                        "takes {} on {} ({} centipawns)",
                        captured.kind, captured.square, captured.kind.value()
                    );
                }
                if committed.is_check() {
                    println!("{} check!", committed);
                } else {
                    println!("{}", committed);
                }
            }
            Err(err) => println!("{}", err),
        }
    }
}

/// Parses coordinate move notation: source square, destination square, and
/// an optional promotion piece, e.g. `e2e4` or `e7e8q`.
fn parse_coord(input: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    let chars: Vec<_> = input.chars().collect();
    if chars.len() < 4 || chars.len() > 5 {
        return None;
    }

    let source_file = File::try_from(chars[0]).ok()?;
    let source_rank = Rank::try_from(chars[1]).ok()?;
    let dest_file = File::try_from(chars[2]).ok()?;
    let dest_rank = Rank::try_from(chars[3]).ok()?;
    let promotion = match chars.get(4) {
        Some(&c) => Some(match c {
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            _ => return None,
        }),
        None => None,
    };

    Some((
        Square::of(source_rank, source_file),
        Square::of(dest_rank, dest_file),
        promotion,
    ))
}
