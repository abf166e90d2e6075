//! Position, i.e. the board together with both piece sets

use crate::bitboard::Bitboard;
use crate::board::{Board, Pretty, PrettyStyle};
use crate::check::{self, Threats};
use crate::legal::{Checker, MoveError};
use crate::set::{PieceHandle, PieceSet, PromoteError, LAYOUT, SET_SIZE};
use crate::types::{Coord, PieceKind, PromoteKind, Team};
use crate::geometry;

use thiserror::Error;

/// Position validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// One of the teams doesn't have a king
    #[error("no king of team {0}")]
    NoKing(Team),
    /// One of the teams has more than one king
    #[error("more than one king of team {0}")]
    TooManyKings(Team),
    /// The pieces of one team don't fit into its piece set
    ///
    /// Each team has at most eight pawns, and every piece beyond the initial set must be a
    /// promoted pawn.
    #[error("too many pieces of team {0}")]
    TooManyPieces(Team),
    /// There is a pawn on the first or the last row
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// The board and the piece sets disagree about the given square
    #[error("board and piece sets disagree at {0}")]
    Desync(Coord),
    /// The side which just moved is in check
    #[error("opponent king is under attack")]
    OpponentKingAttacked,
}

/// Chess position
///
/// Contains the board and the piece sets of both teams. The board and the sets are two views
/// of the same position and are always kept in sync: every alive piece stands on a tile with its
/// own team and symbol, and every occupied tile holds exactly one alive piece.
///
/// Positions are created either with [`Position::initial()`] or from an arbitrary [`Board`]
/// via [`Position::try_from()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    sets: [PieceSet; Team::COUNT],
}

impl Position {
    /// Returns the initial position
    pub fn initial() -> Position {
        Position {
            board: Board::initial(),
            sets: [
                PieceSet::initial(Team::White),
                PieceSet::initial(Team::Red),
            ],
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece set of team `t`
    #[inline]
    pub fn pieces(&self, t: Team) -> &PieceSet {
        unsafe { self.sets.get_unchecked(t.index()) }
    }

    #[inline]
    fn pieces_mut(&mut self, t: Team) -> &mut PieceSet {
        unsafe { self.sets.get_unchecked_mut(t.index()) }
    }

    /// Returns the position of the king of team `t`
    #[inline]
    pub fn king_pos(&self, t: Team) -> Option<Coord> {
        self.pieces(t).king_pos()
    }

    /// Checks that the board and the piece sets are in sync
    pub fn validate(&self) -> Result<(), ValidateError> {
        for team in Team::iter() {
            let set = self.pieces(team);
            if set.king_pos().is_none() {
                return Err(ValidateError::NoKing(team));
            }
            let mut seen = Bitboard::EMPTY;
            for (_, piece) in set.alive() {
                let pos = match piece.pos() {
                    Some(pos) => pos,
                    None => continue,
                };
                if seen.has(pos) || self.board.get(pos) != piece.tile() {
                    return Err(ValidateError::Desync(pos));
                }
                seen.set(pos);
            }
            if let Some(pos) = (self.board.team(team) ^ seen).into_iter().next() {
                return Err(ValidateError::Desync(pos));
            }
        }
        Ok(())
    }

    /// Checks whether the piece `piece` of team `side` can move to `(row, col)`
    ///
    /// See [`Checker::validate()`] for the exact rules.
    pub fn validate_move(
        &self,
        side: Team,
        piece: PieceHandle,
        row: isize,
        col: isize,
    ) -> Result<(), MoveError> {
        let dst = Coord::try_from_row_col(row, col).ok_or(MoveError::OutOfBounds)?;
        Checker::new(self, side).validate(piece, dst)
    }

    /// Returns `true` if the piece `piece` of team `side` can move to `dst`
    pub fn is_legal(&self, side: Team, piece: PieceHandle, dst: Coord) -> bool {
        Checker::new(self, side).validate(piece, dst).is_ok()
    }

    /// Returns `true` if the king of team `defender` is attacked
    pub fn in_check(&self, defender: Team) -> bool {
        match self.king_pos(defender) {
            Some(king) => check::in_check(&self.board, self.pieces(defender.inv()), king),
            None => false,
        }
    }

    /// Returns the pieces which attack the king of team `defender`
    pub fn threats_to_king(&self, defender: Team) -> Threats {
        match self.king_pos(defender) {
            Some(king) => check::threats_to_king(&self.board, self.pieces(defender.inv()), king),
            None => Threats::new(),
        }
    }

    /// Returns `true` if team `defender` is checkmated
    pub fn is_checkmate(&self, defender: Team) -> bool {
        check::is_checkmate(self, defender)
    }

    /// Makes the move without checking its legality
    ///
    /// Moves the occupant on the board, updates the stored position of the piece and marks the
    /// enemy piece standing on `dst`, if any, as captured. Returns the handle of the captured
    /// piece.
    ///
    /// The move must be validated beforehand with [`Position::validate_move()`], otherwise the
    /// resulting position may be meaningless.
    ///
    /// # Panics
    ///
    /// Panics if `piece` is captured.
    pub fn apply_move(&mut self, side: Team, piece: PieceHandle, dst: Coord) -> Option<PieceHandle> {
        let moving = *self.pieces(side).get(piece);
        let src = moving.pos().expect("cannot move a captured piece");
        let captured = self.pieces(side.inv()).piece_at(dst);
        if let Some(h) = captured {
            self.pieces_mut(side.inv()).capture(h);
        }
        self.board.move_occupant(src, dst, moving.kind());
        self.pieces_mut(side).set_pos(piece, dst);
        captured
    }

    /// Returns the pawn of team `side` which stands on its promotion row, if any
    pub fn promotable_pawn(&self, side: Team) -> Option<PieceHandle> {
        let row = geometry::promotion_row(side);
        self.pieces(side)
            .alive()
            .find(|(_, p)| p.kind() == PieceKind::Pawn && p.pos().map(|c| c.row()) == Some(row))
            .map(|(h, _)| h)
    }

    /// Promotes the pawn `piece` of team `side`, writing the new symbol onto the board
    pub fn promote(
        &mut self,
        side: Team,
        piece: PieceHandle,
        kind: PromoteKind,
    ) -> Result<(), PromoteError> {
        self.pieces_mut(side).promote(piece, kind)?;
        if let Some(pos) = self.pieces(side).get(piece).pos() {
            self.board.set_symbol(pos, kind.into());
        }
        Ok(())
    }

    /// Wraps the board to allow pretty-printing with the given style
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.board.pretty(style)
    }
}

impl Default for Position {
    #[inline]
    fn default() -> Position {
        Position::initial()
    }
}

fn build_set(board: &Board, team: Team) -> Result<PieceSet, ValidateError> {
    let mut set = PieceSet::captured(team);
    let mut used = [false; SET_SIZE];
    let mut extra = Vec::new();

    for c in Coord::iter() {
        let tile = board.get(c);
        let kind = match (tile.owner(), tile.kind()) {
            (Some(t), Some(k)) if t == team => k,
            _ => continue,
        };
        if kind == PieceKind::Pawn && (c.row() == 0 || c.row() == 7) {
            return Err(ValidateError::InvalidPawn(c));
        }
        let slot = LAYOUT
            .iter()
            .enumerate()
            .position(|(idx, &k)| k == kind && !used[idx]);
        match slot {
            Some(idx) => {
                used[idx] = true;
                set.set_pos(set.handle(idx), c);
            }
            None => extra.push((c, kind)),
        }
    }

    // Pieces which don't fit into their own slots are considered promoted pawns
    for (c, kind) in extra {
        match kind {
            PieceKind::King => return Err(ValidateError::TooManyKings(team)),
            PieceKind::Pawn => return Err(ValidateError::TooManyPieces(team)),
            _ => {}
        }
        let slot = LAYOUT
            .iter()
            .enumerate()
            .position(|(idx, &k)| k == PieceKind::Pawn && !used[idx])
            .ok_or(ValidateError::TooManyPieces(team))?;
        used[slot] = true;
        let h = set.handle(slot);
        set.set_kind(h, kind);
        set.set_pos(h, c);
    }

    if set.king_pos().is_none() {
        return Err(ValidateError::NoKing(team));
    }
    Ok(set)
}

impl TryFrom<Board> for Position {
    type Error = ValidateError;

    /// Builds the piece sets for the pieces standing on `board`
    ///
    /// Pieces are assigned to the slots of [`LAYOUT`] in coordinate order. Pieces beyond the
    /// initial ones (e.g. a second queen) take free pawn slots, as if they were promoted pawns.
    /// Unused slots hold captured pieces.
    fn try_from(board: Board) -> Result<Position, ValidateError> {
        let res = Position {
            board,
            sets: [build_set(&board, Team::White)?, build_set(&board, Team::Red)?],
        };
        res.validate()?;
        Ok(res)
    }
}

impl TryFrom<&Board> for Position {
    type Error = ValidateError;

    fn try_from(board: &Board) -> Result<Position, ValidateError> {
        (*board).try_into()
    }
}
