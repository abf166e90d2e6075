use std::fmt;
use std::hint;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("unexpected row char {0:?}")]
    UnexpectedRowChar(char),
    #[error("unexpected column char {0:?}")]
    UnexpectedColChar(char),
    #[error("unexpected separator {0:?}")]
    UnexpectedSeparator(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromoteParseError {
    #[error("unexpected promote char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Team {
    White = 0,
    Red = 1,
}

impl Team {
    pub const COUNT: usize = 2;

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn inv(&self) -> Team {
        match *self {
            Team::White => Team::Red,
            Team::Red => Team::White,
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        [Team::White, Team::Red].into_iter()
    }

    pub fn as_char(&self) -> char {
        match *self {
            Team::White => 'w',
            Team::Red => 'r',
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Team::White => "white",
            Team::Red => "red",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Rook = 1,
    Knight = 2,
    Bishop = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => PieceKind::Pawn,
            1 => PieceKind::Rook,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Queen,
            5 => PieceKind::King,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn symbol(&self) -> char {
        b"PRNBQK"[self.index()] as char
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.symbol())
    }
}

/// Target kind for pawn promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromoteKind {
    Queen = 0,
    Rook = 1,
    Bishop = 2,
    Knight = 3,
}

impl PromoteKind {
    pub fn iter() -> impl Iterator<Item = Self> {
        [
            PromoteKind::Queen,
            PromoteKind::Rook,
            PromoteKind::Bishop,
            PromoteKind::Knight,
        ]
        .into_iter()
    }

    /// Parses the promotion choice, accepting both upper and lower case letters
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'Q' => Some(PromoteKind::Queen),
            'R' => Some(PromoteKind::Rook),
            'B' => Some(PromoteKind::Bishop),
            'N' => Some(PromoteKind::Knight),
            _ => None,
        }
    }
}

impl From<PromoteKind> for PieceKind {
    #[inline]
    fn from(p: PromoteKind) -> Self {
        match p {
            PromoteKind::Queen => PieceKind::Queen,
            PromoteKind::Rook => PieceKind::Rook,
            PromoteKind::Bishop => PieceKind::Bishop,
            PromoteKind::Knight => PieceKind::Knight,
        }
    }
}

impl TryFrom<PieceKind> for PromoteKind {
    type Error = ();

    #[inline]
    fn try_from(p: PieceKind) -> Result<Self, Self::Error> {
        match p {
            PieceKind::Queen => Ok(PromoteKind::Queen),
            PieceKind::Rook => Ok(PromoteKind::Rook),
            PieceKind::Bishop => Ok(PromoteKind::Bishop),
            PieceKind::Knight => Ok(PromoteKind::Knight),
            _ => Err(()),
        }
    }
}

impl FromStr for PromoteKind {
    type Err = PromoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(PromoteParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        PromoteKind::from_char(ch).ok_or(PromoteParseError::UnexpectedChar(ch))
    }
}

/// Square on the board
///
/// Rows are numbered from 0 (Red's back rank) to 7 (White's back rank), columns
/// from 0 to 7 left to right. A `Coord` is always on the board.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Coord(u8);

impl Coord {
    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "coord must be between 0 and 63");
        Coord(val as u8)
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Coord {
        Coord(val as u8)
    }

    pub const fn from_parts(row: usize, col: usize) -> Coord {
        assert!(row < 8, "row must be between 0 and 7");
        assert!(col < 8, "column must be between 0 and 7");
        Coord(((row as u8) << 3) | col as u8)
    }

    /// Converts unvalidated coordinates, returning `None` if they are off the board
    pub fn try_from_row_col(row: isize, col: isize) -> Option<Coord> {
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return None;
        }
        Some(Coord::from_parts(row as usize, col as usize))
    }

    pub const fn row(&self) -> usize {
        (self.0 >> 3) as usize
    }

    pub const fn col(&self) -> usize {
        (self.0 & 7) as usize
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns `(to.row - self.row, to.col - self.col)`
    pub const fn delta(self, to: Coord) -> (isize, isize) {
        (
            to.row() as isize - self.row() as isize,
            to.col() as isize - self.col() as isize,
        )
    }

    pub fn try_shift(self, delta_row: isize, delta_col: isize) -> Option<Coord> {
        Coord::try_from_row_col(
            self.row() as isize + delta_row,
            self.col() as isize + delta_col,
        )
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Coord)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Coord({})", self);
        }
        write!(f, "Coord(?{:?})", self.0)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{},{}", self.row(), self.col())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    /// Parses `"r c"` or `"r,c"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 {
            return Err(CoordParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let (row_ch, sep, col_ch) = (bytes[0] as char, bytes[1] as char, bytes[2] as char);
        if sep != ' ' && sep != ',' {
            return Err(CoordParseError::UnexpectedSeparator(sep));
        }
        let row = match row_ch {
            '0'..='7' => row_ch as usize - '0' as usize,
            _ => return Err(CoordParseError::UnexpectedRowChar(row_ch)),
        };
        let col = match col_ch {
            '0'..='7' => col_ch as usize - '0' as usize,
            _ => return Err(CoordParseError::UnexpectedColChar(col_ch)),
        };
        Ok(Coord::from_parts(row, col))
    }
}

/// Contents of a single square
///
/// A tile is either empty or holds a piece of some team. Empty tiles are
/// displayed as `*`.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Tile(u8);

impl Tile {
    pub const EMPTY: Tile = Tile(0);
    pub const MAX_INDEX: usize = 13;

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    pub const fn from_parts(t: Team, k: PieceKind) -> Tile {
        Tile(match t {
            Team::White => 1 + k as u8,
            Team::Red => 7 + k as u8,
        })
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub const fn owner(&self) -> Option<Team> {
        match self.0 {
            0 => None,
            1..=6 => Some(Team::White),
            _ => Some(Team::Red),
        }
    }

    pub const fn kind(&self) -> Option<PieceKind> {
        match self.0 {
            0 => None,
            1..=6 => Some(unsafe { PieceKind::from_index_unchecked(self.0 as usize - 1) }),
            _ => Some(unsafe { PieceKind::from_index_unchecked(self.0 as usize - 7) }),
        }
    }

    /// Returns the same tile with the piece kind replaced, or an empty tile if `self` is empty
    pub const fn with_kind(self, k: PieceKind) -> Tile {
        match self.owner() {
            Some(t) => Tile::from_parts(t, k),
            None => Tile::EMPTY,
        }
    }

    pub fn symbol(&self) -> char {
        match self.kind() {
            Some(k) => k.symbol(),
            None => '*',
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::MAX_INDEX as u8).map(Tile)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if (self.0 as usize) < Self::MAX_INDEX {
            return match self.owner() {
                Some(t) => write!(f, "Tile({}{})", t.as_char(), self.symbol()),
                None => write!(f, "Tile(*)"),
            };
        }
        write!(f, "Tile(?{:?})", self.0)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.symbol())
    }
}
