// Simple command-line application to play chess between two people

use tilechess::{board::PrettyStyle, Coord, Game, GameError, PromoteKind, Status};
use std::io::{self, BufRead, Write};

fn prompt(stdin: &mut impl BufRead, msg: &str) -> Option<String> {
    print!("{}", msg);
    io::stdout().flush().ok()?;
    let mut s = String::new();
    match stdin.read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s.trim().to_string()),
    }
}

fn parse_dst(s: &str) -> Option<(isize, isize)> {
    let mut parts = s.split(|c| c == ' ' || c == ',').filter(|p| !p.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(_) => None,
        None => Some((row, col)),
    }
}

fn main() {
    env_logger::init();
    let mut stdin = io::stdin().lock();

    println!("Welcome to chess!");
    println!("Enter coordinates as \"row col\" or \"row,col\", e.g. \"6 4\" or \"6,4\".");
    let white = match prompt(&mut stdin, "Player 1 (white) name: ") {
        Some(name) => name,
        None => return,
    };
    let red = match prompt(&mut stdin, "\x1b[31mPlayer 2 (red) name: \x1b[0m") {
        Some(name) => name,
        None => return,
    };
    let mut game = Game::new(white, red);

    println!("{}", game.position().pretty(PrettyStyle::Ansi));
    while game.outcome().is_none() {
        let side = game.side();
        let status = if game.pending_promotion().is_some() {
            println!("You can promote your pawn to a Queen, Rook, Bishop or Knight");
            let s = match prompt(&mut stdin, "Enter Q, R, B or N: ") {
                Some(s) => s,
                None => return,
            };
            let kind: PromoteKind = match s.parse() {
                Ok(kind) => kind,
                Err(e) => {
                    println!("Bad choice: {}", e);
                    continue;
                }
            };
            game.promote(kind)
        } else {
            println!("{}'s turn ({})", game.player_name(side), side);
            let s = match prompt(&mut stdin, "Coordinates of the piece to move: ") {
                Some(s) => s,
                None => return,
            };
            let src: Coord = match s.parse() {
                Ok(src) => src,
                Err(e) => {
                    println!("Bad coordinates: {}", e);
                    continue;
                }
            };
            let s = match prompt(&mut stdin, "Coordinates to move the piece to: ") {
                Some(s) => s,
                None => return,
            };
            let (row, col) = match parse_dst(&s) {
                Some(dst) => dst,
                None => {
                    println!("Bad coordinates: {:?}", s);
                    continue;
                }
            };
            game.make_move(src, row, col)
        };

        match status {
            Ok(status) => {
                println!();
                println!("{}", game.position().pretty(PrettyStyle::Ansi));
                if status == Status::Check {
                    println!("{} is in check!", game.player_name(game.side()));
                }
            }
            Err(GameError::NoPiece(_)) => {
                println!("There is no piece there or it is the opponent's piece. Try again!")
            }
            Err(e) => println!("Try again: {}", e),
        }
    }

    if let Some(outcome) = game.outcome() {
        let winner = outcome.winner();
        println!("CHECKMATE!");
        println!("{} wins!", game.player_name(winner));
    }
}
