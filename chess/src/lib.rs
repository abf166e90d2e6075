//! Two-player chess rules engine
//!
//! The crate decides whether a move is legal, whether a king is in check and whether a side is
//! checkmated. The board is an 8x8 grid indexed by `(row, col)`, with Red on rows 0 and 1 and
//! White on rows 6 and 7. White moves first.
//!
//! # Example
//!
//! ```
//! use tilechess::{Coord, Game, Status, Team};
//!
//! let mut game = Game::new("alice", "bob");
//! assert_eq!(game.make_move(Coord::from_parts(6, 4), 4, 4), Ok(Status::Normal));
//! assert_eq!(game.side(), Team::Red);
//! assert!(game.make_move(Coord::from_parts(1, 4), 4, 4).is_err());
//! ```

pub mod between;
pub mod board;
pub mod check;
pub mod game;
pub mod legal;
pub mod piece;
pub mod position;
pub mod set;

pub use tilechess_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::Board;
pub use game::{Game, GameError, MoveRecord, Outcome, Status};
pub use legal::{Checker, MoveError};
pub use piece::{Piece, PieceState};
pub use position::{Position, ValidateError};
pub use set::{PieceHandle, PieceSet, PromoteError};
pub use types::{Coord, PieceKind, PromoteKind, Team, Tile};
