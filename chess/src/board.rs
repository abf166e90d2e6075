//! Board and related things

use crate::between::{self, Ray};
use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{Coord, PieceKind, Team, Tile};

use std::fmt::{self, Display};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Occupancy grid of the chess board
///
/// The board only knows which team and which piece symbol occupy each tile. It doesn't know
/// anything about piece identity; see [`Position`](crate::position::Position) for the structure
/// which keeps the board in sync with the piece sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: [Tile; 64],
}

impl Board {
    /// Returns a board without any pieces
    #[inline]
    pub const fn empty() -> Board {
        Board {
            tiles: [Tile::EMPTY; 64],
        }
    }

    /// Returns a board with the initial position
    ///
    /// Red occupies rows 0 and 1, White occupies rows 6 and 7.
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for team in Team::iter() {
            let back = geometry::back_row(team);
            let pawns = geometry::pawn_start_row(team);
            for (col, kind) in BACK_ROW.iter().enumerate() {
                res.place(Coord::from_parts(back, col), Tile::from_parts(team, *kind));
                res.place(
                    Coord::from_parts(pawns, col),
                    Tile::from_parts(team, PieceKind::Pawn),
                );
            }
        }
        res
    }

    /// Returns the contents of the tile with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Tile {
        unsafe { *self.tiles.get_unchecked(c.index()) }
    }

    /// Returns the contents of the tile at `row` and `col`
    #[inline]
    pub fn get2(&self, row: usize, col: usize) -> Tile {
        self.get(Coord::from_parts(row, col))
    }

    /// Overwrites the tile with coordinate `c`
    #[inline]
    pub fn place(&mut self, c: Coord, tile: Tile) {
        unsafe {
            *self.tiles.get_unchecked_mut(c.index()) = tile;
        }
    }

    /// Moves the occupant of `src` to `dst`, giving it the symbol of `kind`
    ///
    /// The owner is read from `src` before it gets cleared. Whatever stood on `dst` is
    /// overwritten.
    #[inline]
    pub fn move_occupant(&mut self, src: Coord, dst: Coord, kind: PieceKind) {
        let tile = self.get(src).with_kind(kind);
        self.place(src, Tile::EMPTY);
        self.place(dst, tile);
    }

    /// Replaces the symbol on an occupied tile, keeping its owner
    #[inline]
    pub fn set_symbol(&mut self, c: Coord, kind: PieceKind) {
        let tile = self.get(c).with_kind(kind);
        self.place(c, tile);
    }

    /// Returns `true` if any tile strictly between `src` and `dst` is occupied
    ///
    /// `src` and `dst` must share a row or a column. If they don't, `false` is returned.
    pub fn ray_blocked_orthogonal(&self, src: Coord, dst: Coord) -> bool {
        if !between::is_rook_valid(src, dst) {
            return false;
        }
        self.ray_blocked(src, dst)
    }

    /// Returns `true` if any tile strictly between `src` and `dst` is occupied
    ///
    /// `src` and `dst` must share a diagonal. If they don't, `false` is returned.
    pub fn ray_blocked_diagonal(&self, src: Coord, dst: Coord) -> bool {
        if !between::is_bishop_valid(src, dst) {
            return false;
        }
        self.ray_blocked(src, dst)
    }

    fn ray_blocked(&self, src: Coord, dst: Coord) -> bool {
        Ray::new(src, dst)
            .into_iter()
            .flatten()
            .any(|c| self.get(c).is_occupied())
    }

    /// Returns the bitboard over all the occupied tiles
    pub fn occupied(&self) -> Bitboard {
        Coord::iter()
            .filter(|&c| self.get(c).is_occupied())
            .collect()
    }

    /// Returns the bitboard over all the tiles owned by `t`
    pub fn team(&self, t: Team) -> Bitboard {
        Coord::iter()
            .filter(|&c| self.get(c).owner() == Some(t))
            .collect()
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// # Example
    ///
    /// ```
    /// # use tilechess::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = "   0 1 2 3 4 5 6 7 \n\
    ///            0  R N B Q K B N R \n\
    ///            1  P P P P P P P P \n\
    ///            2  * * * * * * * * \n\
    ///            3  * * * * * * * * \n\
    ///            4  * * * * * * * * \n\
    ///            5  * * * * * * * * \n\
    ///            6  P P P P P P P P \n\
    ///            7  R N B Q K B N R \n";
    /// assert_eq!(b.pretty(PrettyStyle::Plain).to_string(), res);
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print all the tiles without escape codes
    Plain,
    /// Print tiles owned by Red in red using ANSI escape codes
    Ansi,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

const RED_TEXT: &str = "\x1b[31m";
const RESET_COLOR: &str = "\x1b[0m";

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "   ")?;
        for col in 0..8 {
            write!(f, "{} ", col)?;
        }
        writeln!(f)?;
        for row in 0..8 {
            write!(f, "{}  ", row)?;
            for col in 0..8 {
                let tile = self.board.get2(row, col);
                match (self.style, tile.owner()) {
                    (PrettyStyle::Ansi, Some(Team::Red)) => {
                        write!(f, "{}{} {}", RED_TEXT, tile, RESET_COLOR)?
                    }
                    _ => write!(f, "{} ", tile)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
