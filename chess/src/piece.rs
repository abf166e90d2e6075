//! Pieces and their movement shapes

use crate::geometry;
use crate::types::{Coord, PieceKind, Team, Tile};

/// Returns `true` if a piece of kind `kind` belonging to `team` can move from `src` to `dst`
/// on an empty board
///
/// This is a pure geometric test over the row and column delta; occupancy is not taken into
/// account. In particular, diagonal pawn steps are allowed here regardless of whether they
/// capture anything. Zero delta is never allowed.
pub fn shape_allows(kind: PieceKind, team: Team, src: Coord, dst: Coord) -> bool {
    let (dr, dc) = src.delta(dst);
    match kind {
        PieceKind::Pawn => {
            let fwd = geometry::pawn_forward_delta(team);
            if dr == fwd {
                dc.abs() <= 1
            } else {
                dr == 2 * fwd && dc == 0 && src.row() == geometry::pawn_start_row(team)
            }
        }
        PieceKind::Rook => (dr == 0) != (dc == 0),
        PieceKind::Knight => {
            matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2))
        }
        PieceKind::Bishop => dr != 0 && dr.abs() == dc.abs(),
        PieceKind::Queen => {
            shape_allows(PieceKind::Rook, team, src, dst)
                || shape_allows(PieceKind::Bishop, team, src, dst)
        }
        PieceKind::King => dr.abs().max(dc.abs()) == 1,
    }
}

/// Whether the piece is still in play
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceState {
    Alive(Coord),
    Captured,
}

/// Chess piece with a stable identity
///
/// Captured pieces are not removed from their [`PieceSet`](crate::set::PieceSet). Instead, they
/// lose their coordinate, so they never take part in any geometric computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    team: Team,
    state: PieceState,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, team: Team, pos: Coord) -> Piece {
        Piece {
            kind,
            team,
            state: PieceState::Alive(pos),
        }
    }

    #[inline]
    pub const fn captured(kind: PieceKind, team: Team) -> Piece {
        Piece {
            kind,
            team,
            state: PieceState::Captured,
        }
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn team(&self) -> Team {
        self.team
    }

    #[inline]
    pub const fn state(&self) -> PieceState {
        self.state
    }

    /// Returns the position of the piece, or `None` if it was captured
    #[inline]
    pub const fn pos(&self) -> Option<Coord> {
        match self.state {
            PieceState::Alive(c) => Some(c),
            PieceState::Captured => None,
        }
    }

    #[inline]
    pub const fn is_alive(&self) -> bool {
        matches!(self.state, PieceState::Alive(_))
    }

    #[inline]
    pub fn symbol(&self) -> char {
        self.kind.symbol()
    }

    /// Returns the tile this piece puts on the board
    #[inline]
    pub const fn tile(&self) -> Tile {
        Tile::from_parts(self.team, self.kind)
    }

    /// Returns `true` if the piece may reach `dst` from its current position on an empty board
    ///
    /// Always `false` for captured pieces.
    #[inline]
    pub fn shape_allows(&self, dst: Coord) -> bool {
        match self.state {
            PieceState::Alive(src) => shape_allows(self.kind, self.team, src, dst),
            PieceState::Captured => false,
        }
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, pos: Coord) {
        self.state = PieceState::Alive(pos);
    }

    #[inline]
    pub(crate) fn set_captured(&mut self) {
        self.state = PieceState::Captured;
    }

    #[inline]
    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }
}
