//! Per-team collections of pieces

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::piece::Piece;
use crate::types::{Coord, PieceKind, PromoteKind, Team};

use std::fmt;

use thiserror::Error;

/// Number of pieces in every [`PieceSet`]
pub const SET_SIZE: usize = 16;

/// Kinds of pieces by their index in the set
///
/// Pawns come first, in column order. Then come the back row pieces, also in column order.
pub const LAYOUT: [PieceKind; SET_SIZE] = [
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Pawn,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Error promoting a piece
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum PromoteError {
    /// Only pawns can be promoted
    #[error("piece is not a pawn")]
    NotPawn,
    /// The pawn is not on the board anymore
    #[error("piece is captured")]
    Captured,
}

/// Stable reference to a piece inside its [`PieceSet`]
///
/// Handles are assigned when the set is built and never change, even after the piece is
/// captured or promoted.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceHandle(u8);

impl PieceHandle {
    pub const fn from_index(val: usize) -> PieceHandle {
        assert!(val < SET_SIZE, "piece index must be between 0 and 15");
        PieceHandle(val as u8)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..SET_SIZE as u8).map(PieceHandle)
    }
}

impl fmt::Debug for PieceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "PieceHandle({})", self.0)
    }
}

/// All the pieces of one team
///
/// The set always contains exactly [`SET_SIZE`] pieces, laid out as in [`LAYOUT`]. Pieces are
/// never added or removed after construction; captured pieces stay in the set in
/// [`Captured`](crate::piece::PieceState::Captured) state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceSet {
    team: Team,
    pieces: [Piece; SET_SIZE],
    king: PieceHandle,
}

impl PieceSet {
    /// Returns the set in its initial position
    pub fn initial(team: Team) -> PieceSet {
        let pawns = geometry::pawn_start_row(team);
        let back = geometry::back_row(team);
        let mut pieces = [Piece::captured(PieceKind::Pawn, team); SET_SIZE];
        for (idx, kind) in LAYOUT.iter().enumerate() {
            let pos = if idx < 8 {
                Coord::from_parts(pawns, idx)
            } else {
                Coord::from_parts(back, idx - 8)
            };
            pieces[idx] = Piece::new(*kind, team, pos);
        }
        Self::from_pieces(team, pieces)
    }

    /// Returns the set with every piece in [`LAYOUT`] order, all of them captured
    pub(crate) fn captured(team: Team) -> PieceSet {
        let mut pieces = [Piece::captured(PieceKind::Pawn, team); SET_SIZE];
        for (idx, kind) in LAYOUT.iter().enumerate() {
            pieces[idx] = Piece::captured(*kind, team);
        }
        Self::from_pieces(team, pieces)
    }

    fn from_pieces(team: Team, pieces: [Piece; SET_SIZE]) -> PieceSet {
        let king = LAYOUT
            .iter()
            .position(|&k| k == PieceKind::King)
            .map(PieceHandle::from_index)
            .unwrap();
        PieceSet { team, pieces, king }
    }

    #[inline]
    pub fn team(&self) -> Team {
        self.team
    }

    /// Returns the handle of the piece with index `index` in [`LAYOUT`]
    #[inline]
    pub fn handle(&self, index: usize) -> PieceHandle {
        PieceHandle::from_index(index)
    }

    /// Returns the handle of the king
    #[inline]
    pub fn king(&self) -> PieceHandle {
        self.king
    }

    /// Returns the position of the king
    ///
    /// Returns `None` only if the king was captured, which never happens in a game played by the
    /// rules.
    #[inline]
    pub fn king_pos(&self) -> Option<Coord> {
        self.get(self.king).pos()
    }

    #[inline]
    pub fn get(&self, h: PieceHandle) -> &Piece {
        unsafe { self.pieces.get_unchecked(h.index()) }
    }

    #[inline]
    fn get_mut(&mut self, h: PieceHandle) -> &mut Piece {
        unsafe { self.pieces.get_unchecked_mut(h.index()) }
    }

    /// Returns the alive piece standing on `pos`
    pub fn piece_at(&self, pos: Coord) -> Option<PieceHandle> {
        PieceHandle::iter().find(|&h| self.get(h).pos() == Some(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceHandle, &Piece)> + '_ {
        PieceHandle::iter().map(move |h| (h, self.get(h)))
    }

    /// Iterates over the pieces which are still on the board
    pub fn alive(&self) -> impl Iterator<Item = (PieceHandle, &Piece)> + '_ {
        self.iter().filter(|(_, p)| p.is_alive())
    }

    /// Returns the bitboard over the squares occupied by alive pieces
    pub fn occupied(&self) -> Bitboard {
        self.alive().filter_map(|(_, p)| p.pos()).collect()
    }

    /// Replaces the kind of a pawn, keeping its position
    ///
    /// The board is not updated, so outside the crate promotion goes through
    /// [`Position::promote()`](crate::position::Position::promote).
    ///
    /// ```compile_fail
    /// use tilechess::{Position, PromoteKind, Team};
    ///
    /// let pos = Position::initial();
    /// let mut white = *pos.pieces(Team::White);
    /// let pawn = white.piece_at(tilechess::Coord::from_parts(6, 0)).unwrap();
    /// white.promote(pawn, PromoteKind::Queen).unwrap();
    /// ```
    pub(crate) fn promote(&mut self, h: PieceHandle, kind: PromoteKind) -> Result<(), PromoteError> {
        let piece = self.get_mut(h);
        if piece.kind() != PieceKind::Pawn {
            return Err(PromoteError::NotPawn);
        }
        if !piece.is_alive() {
            return Err(PromoteError::Captured);
        }
        piece.set_kind(kind.into());
        Ok(())
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, h: PieceHandle, pos: Coord) {
        self.get_mut(h).set_pos(pos);
    }

    #[inline]
    pub(crate) fn capture(&mut self, h: PieceHandle) {
        self.get_mut(h).set_captured();
    }

    #[inline]
    pub(crate) fn set_kind(&mut self, h: PieceHandle, kind: PieceKind) {
        self.get_mut(h).set_kind(kind);
    }
}
