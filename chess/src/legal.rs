//! Move legality checks

use crate::board::Board;
use crate::check;
use crate::position::Position;
use crate::set::{PieceHandle, PieceSet};
use crate::types::{Coord, PieceKind, Team, Tile};
use crate::{between, geometry};

use log::trace;
use thiserror::Error;

/// Reason why a move is rejected
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq, Hash)]
pub enum MoveError {
    #[error("destination is off board")]
    OutOfBounds,
    #[error("piece cannot move that way")]
    IllegalShape,
    #[error("path is blocked")]
    Blocked,
    #[error("pawn can capture only diagonally")]
    IllegalPawnCapture,
    #[error("move would leave own king in check")]
    SelfCheck,
}

/// Returns the reason why the occupancy of `board` prevents a piece from moving from `src` to
/// `dst`, or `None` if it doesn't
///
/// The move is assumed to have a valid shape for the given piece kind.
pub fn obstruction(
    board: &Board,
    kind: PieceKind,
    team: Team,
    src: Coord,
    dst: Coord,
) -> Option<MoveError> {
    let target = board.get(dst);
    if target.owner() == Some(team) {
        return Some(MoveError::Blocked);
    }
    let blocked = match kind {
        PieceKind::Pawn => {
            if src.col() != dst.col() {
                return None;
            }
            if target.is_occupied() {
                return Some(MoveError::IllegalPawnCapture);
            }
            // The only square a pawn can jump over is the one in front of it
            let (dr, _) = src.delta(dst);
            dr == 2 * geometry::pawn_forward_delta(team) && board.ray_blocked_orthogonal(src, dst)
        }
        PieceKind::Rook => board.ray_blocked_orthogonal(src, dst),
        PieceKind::Bishop => board.ray_blocked_diagonal(src, dst),
        PieceKind::Queen => {
            if between::is_rook_valid(src, dst) {
                board.ray_blocked_orthogonal(src, dst)
            } else {
                board.ray_blocked_diagonal(src, dst)
            }
        }
        PieceKind::Knight | PieceKind::King => false,
    };
    blocked.then_some(MoveError::Blocked)
}

/// Returns `true` if the occupancy of `board` prevents a piece from moving from `src` to `dst`
#[inline]
pub fn path_blocked(board: &Board, kind: PieceKind, team: Team, src: Coord, dst: Coord) -> bool {
    obstruction(board, kind, team, src, dst).is_some()
}

#[derive(Debug, Copy, Clone)]
struct Undo {
    src: Coord,
    dst: Coord,
    src_tile: Tile,
    dst_tile: Tile,
    captured: Option<PieceHandle>,
}

/// Move made on the scratch state of a [`Checker`]
///
/// The move is taken back when the trial is dropped.
struct Trial<'c, 'a> {
    checker: &'c mut Checker<'a>,
    undo: Undo,
}

impl<'c, 'a> Trial<'c, 'a> {
    fn new(checker: &'c mut Checker<'a>, src: Coord, dst: Coord) -> Self {
        let undo = checker.make_move(src, dst);
        Trial { checker, undo }
    }

    fn is_attacked(&self, pos: Coord) -> bool {
        check::in_check(&self.checker.board, &self.checker.opponent, pos)
    }
}

impl Drop for Trial<'_, '_> {
    fn drop(&mut self) {
        self.checker.unmake_move(&self.undo);
    }
}

/// Validates moves of one side in a given position
///
/// The checker keeps its own copy of the board and of the opponent's pieces, which serve as
/// scratch space for self-check simulation. The source position is only borrowed, so it is
/// never changed, no matter how many moves are checked.
///
/// Creating a checker once and reusing it for many queries is cheaper than calling
/// [`Position::validate_move()`] repeatedly.
#[derive(Debug, Clone)]
pub struct Checker<'a> {
    src: &'a Position,
    side: Team,
    board: Board,
    opponent: PieceSet,
}

impl<'a> Checker<'a> {
    pub fn new(src: &'a Position, side: Team) -> Self {
        Checker {
            src,
            side,
            board: *src.board(),
            opponent: *src.pieces(side.inv()),
        }
    }

    #[inline]
    pub fn side(&self) -> Team {
        self.side
    }

    #[inline]
    pub fn position(&self) -> &'a Position {
        self.src
    }

    fn make_move(&mut self, src: Coord, dst: Coord) -> Undo {
        let undo = Undo {
            src,
            dst,
            src_tile: self.board.get(src),
            dst_tile: self.board.get(dst),
            captured: self.opponent.piece_at(dst),
        };
        if let Some(h) = undo.captured {
            self.opponent.capture(h);
        }
        self.board.place(src, Tile::EMPTY);
        self.board.place(dst, undo.src_tile);
        undo
    }

    fn unmake_move(&mut self, u: &Undo) {
        self.board.place(u.src, u.src_tile);
        self.board.place(u.dst, u.dst_tile);
        if let Some(h) = u.captured {
            self.opponent.set_pos(h, u.dst);
        }
    }

    fn reject(&self, piece: PieceHandle, dst: Coord, err: MoveError) -> Result<(), MoveError> {
        trace!(
            "{} piece {:?} cannot move to {}: {}",
            self.side,
            piece,
            dst,
            err
        );
        Err(err)
    }

    /// Checks whether the piece `piece` of the checker's side can move to `dst`
    ///
    /// The checks are performed in the following order, and the first failing one is reported:
    ///
    /// 1. the piece must be alive and the move must have a valid shape ([`MoveError::IllegalShape`]);
    /// 2. the destination must not hold a piece of the same side, and the path must be free
    ///    ([`MoveError::Blocked`]); a pawn moving straight must not land on any piece
    ///    ([`MoveError::IllegalPawnCapture`]);
    /// 3. a pawn moving diagonally must capture an enemy piece ([`MoveError::IllegalPawnCapture`]);
    /// 4. the move must not leave the king of the moving side attacked ([`MoveError::SelfCheck`]).
    ///
    /// Bounds are checked when converting raw numbers into [`Coord`], see
    /// [`Position::validate_move()`].
    pub fn validate(&mut self, piece: PieceHandle, dst: Coord) -> Result<(), MoveError> {
        let ours = self.src.pieces(self.side);
        let p = *ours.get(piece);
        let src = match p.pos() {
            Some(src) if p.shape_allows(dst) => src,
            _ => return self.reject(piece, dst, MoveError::IllegalShape),
        };

        if let Some(err) = obstruction(&self.board, p.kind(), self.side, src, dst) {
            return self.reject(piece, dst, err);
        }

        if p.kind() == PieceKind::Pawn
            && src.col() != dst.col()
            && self.board.get(dst).owner() != Some(self.side.inv())
        {
            return self.reject(piece, dst, MoveError::IllegalPawnCapture);
        }

        let king = if piece == ours.king() {
            Some(dst)
        } else {
            ours.king_pos()
        };
        let attacked = {
            let trial = Trial::new(self, src, dst);
            king.map_or(false, |k| trial.is_attacked(k))
        };
        if attacked {
            return self.reject(piece, dst, MoveError::SelfCheck);
        }
        Ok(())
    }

    /// Returns `true` if the piece `piece` of the checker's side can move to `dst`
    #[inline]
    pub fn is_legal(&mut self, piece: PieceHandle, dst: Coord) -> bool {
        self.validate(piece, dst).is_ok()
    }

    /// Returns `true` if the scratch state matches the source position again
    #[cfg(test)]
    pub(crate) fn is_restored(&self) -> bool {
        self.board == *self.src.board() && self.opponent == *self.src.pieces(self.side.inv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(b: &mut Board, row: usize, col: usize, team: Team, kind: PieceKind) {
        b.place(Coord::from_parts(row, col), Tile::from_parts(team, kind));
    }

    fn handle_at(pos: &Position, team: Team, row: usize, col: usize) -> PieceHandle {
        pos.pieces(team)
            .piece_at(Coord::from_parts(row, col))
            .unwrap()
    }

    fn check_move(pos: &Position, src: (usize, usize), dst: (isize, isize)) -> Result<(), MoveError> {
        let team = pos.board().get2(src.0, src.1).owner().unwrap();
        let h = handle_at(pos, team, src.0, src.1);
        let res = pos.validate_move(team, h, dst.0, dst.1);
        assert_eq!(pos.validate(), Ok(()));
        res
    }

    fn kings() -> Board {
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 3, 7, Team::Red, PieceKind::King);
        b
    }

    #[test]
    fn test_bounds() {
        let pos = Position::initial();
        assert_eq!(check_move(&pos, (7, 1), (8, 2)), Err(MoveError::OutOfBounds));
        assert_eq!(check_move(&pos, (7, 1), (5, -1)), Err(MoveError::OutOfBounds));
        assert_eq!(check_move(&pos, (0, 1), (-2, 0)), Err(MoveError::OutOfBounds));
        assert_eq!(check_move(&pos, (7, 1), (5, 2)), Ok(()));
    }

    #[test]
    fn test_rook() {
        let mut b = kings();
        put(&mut b, 0, 0, Team::White, PieceKind::Rook);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (0, 0), (0, 7)), Ok(()));
        assert_eq!(check_move(&pos, (0, 0), (1, 1)), Err(MoveError::IllegalShape));
        assert_eq!(check_move(&pos, (0, 0), (0, 0)), Err(MoveError::IllegalShape));

        for team in Team::iter() {
            let mut b = b;
            put(&mut b, 0, 3, team, PieceKind::Knight);
            let pos = Position::try_from(b).unwrap();
            assert_eq!(check_move(&pos, (0, 0), (0, 7)), Err(MoveError::Blocked));
            assert_eq!(check_move(&pos, (0, 0), (0, 2)), Ok(()));
        }

        let pos = Position::initial();
        assert_eq!(check_move(&pos, (7, 0), (6, 0)), Err(MoveError::Blocked));
        assert_eq!(check_move(&pos, (7, 0), (5, 0)), Err(MoveError::Blocked));
    }

    #[test]
    fn test_pawn_advance() {
        let mut pos = Position::initial();
        let pawn = handle_at(&pos, Team::White, 6, 4);
        assert_eq!(check_move(&pos, (6, 4), (4, 4)), Ok(()));
        assert_eq!(check_move(&pos, (6, 4), (5, 4)), Ok(()));
        assert_eq!(check_move(&pos, (6, 4), (3, 4)), Err(MoveError::IllegalShape));
        assert_eq!(check_move(&pos, (6, 4), (7, 4)), Err(MoveError::IllegalShape));
        assert_eq!(
            check_move(&pos, (6, 4), (5, 5)),
            Err(MoveError::IllegalPawnCapture)
        );

        pos.apply_move(Team::White, pawn, Coord::from_parts(4, 4));
        assert_eq!(check_move(&pos, (4, 4), (2, 4)), Err(MoveError::IllegalShape));
        assert_eq!(check_move(&pos, (4, 4), (3, 4)), Ok(()));

        // Red pawns move down the board
        assert_eq!(check_move(&pos, (1, 4), (3, 4)), Ok(()));
        assert_eq!(check_move(&pos, (1, 4), (0, 4)), Err(MoveError::IllegalShape));
    }

    #[test]
    fn test_pawn_blocked() {
        let mut b = Board::initial();
        put(&mut b, 5, 4, Team::Red, PieceKind::Knight);
        b.place(Coord::from_parts(0, 1), Tile::EMPTY);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (6, 4), (4, 4)), Err(MoveError::Blocked));
        assert_eq!(
            check_move(&pos, (6, 4), (5, 4)),
            Err(MoveError::IllegalPawnCapture)
        );
        assert_eq!(check_move(&pos, (6, 3), (5, 4)), Ok(()));
        assert_eq!(check_move(&pos, (6, 5), (5, 4)), Ok(()));

        let mut b = Board::initial();
        put(&mut b, 2, 2, Team::White, PieceKind::Pawn);
        b.place(Coord::from_parts(6, 2), Tile::EMPTY);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (1, 2), (3, 2)), Err(MoveError::Blocked));
        assert_eq!(check_move(&pos, (1, 2), (2, 2)), Err(MoveError::IllegalPawnCapture));
    }

    #[test]
    fn test_pawn_capture() {
        let mut b = kings();
        put(&mut b, 3, 4, Team::White, PieceKind::Pawn);
        put(&mut b, 2, 5, Team::Red, PieceKind::Bishop);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (3, 4), (2, 5)), Ok(()));
        assert_eq!(
            check_move(&pos, (3, 4), (2, 3)),
            Err(MoveError::IllegalPawnCapture)
        );
        assert_eq!(check_move(&pos, (3, 4), (2, 4)), Ok(()));

        put(&mut b, 2, 4, Team::Red, PieceKind::Knight);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(
            check_move(&pos, (3, 4), (2, 4)),
            Err(MoveError::IllegalPawnCapture)
        );
        assert_eq!(check_move(&pos, (3, 4), (2, 5)), Ok(()));
    }

    #[test]
    fn test_self_check() {
        // Pinned bishop
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 6, 4, Team::White, PieceKind::Bishop);
        put(&mut b, 0, 4, Team::Red, PieceKind::Rook);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (6, 4), (5, 3)), Err(MoveError::SelfCheck));
        assert_eq!(check_move(&pos, (6, 4), (5, 4)), Err(MoveError::IllegalShape));
        assert_eq!(check_move(&pos, (7, 4), (7, 3)), Ok(()));

        // King cannot step onto an attacked square
        let mut b = Board::empty();
        put(&mut b, 7, 3, Team::White, PieceKind::King);
        put(&mut b, 0, 4, Team::Red, PieceKind::Rook);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (7, 3), (7, 4)), Err(MoveError::SelfCheck));
        assert_eq!(check_move(&pos, (7, 3), (6, 4)), Err(MoveError::SelfCheck));
        assert_eq!(check_move(&pos, (7, 3), (6, 3)), Ok(()));
        assert_eq!(check_move(&pos, (7, 3), (5, 3)), Err(MoveError::IllegalShape));
    }

    #[test]
    fn test_king_capture() {
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 6, 4, Team::Red, PieceKind::Rook);
        put(&mut b, 6, 3, Team::Red, PieceKind::Knight);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::White));
        // The rook is unprotected, so the king may take it
        assert_eq!(check_move(&pos, (7, 4), (6, 4)), Ok(()));
        // Taking the knight leaves the king next to the rook
        assert_eq!(check_move(&pos, (7, 4), (6, 3)), Err(MoveError::SelfCheck));

        put(&mut b, 0, 4, Team::Red, PieceKind::Rook);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(check_move(&pos, (7, 4), (6, 4)), Err(MoveError::SelfCheck));
    }

    #[test]
    fn test_capture_attacker() {
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 5, 6, Team::White, PieceKind::Bishop);
        put(&mut b, 5, 0, Team::White, PieceKind::Knight);
        put(&mut b, 3, 4, Team::Red, PieceKind::Rook);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::White));
        assert_eq!(check_move(&pos, (5, 6), (3, 4)), Ok(()));
        assert_eq!(check_move(&pos, (5, 6), (4, 5)), Err(MoveError::SelfCheck));
        assert_eq!(check_move(&pos, (5, 6), (4, 7)), Err(MoveError::SelfCheck));
        assert_eq!(check_move(&pos, (5, 0), (3, 1)), Err(MoveError::SelfCheck));
    }

    #[test]
    fn test_checker_reuse() {
        let pos = Position::initial();
        let mut checker = Checker::new(&pos, Team::White);
        let mut legal = 0;
        for (h, _) in pos.pieces(Team::White).alive() {
            for dst in Coord::iter() {
                if checker.is_legal(h, dst) {
                    legal += 1;
                }
            }
        }
        assert_eq!(legal, 20);
        assert!(checker.is_restored());
        assert_eq!(pos, Position::initial());
    }

    #[test]
    fn test_scratch_restored_after_capture() {
        let mut b = kings();
        put(&mut b, 4, 4, Team::White, PieceKind::Queen);
        put(&mut b, 1, 4, Team::Red, PieceKind::Rook);
        let pos = Position::try_from(b).unwrap();
        let queen = handle_at(&pos, Team::White, 4, 4);
        let mut checker = Checker::new(&pos, Team::White);
        assert!(checker.is_legal(queen, Coord::from_parts(1, 4)));
        // The queen shields the king from the rook
        assert_eq!(
            checker.validate(queen, Coord::from_parts(1, 1)),
            Err(MoveError::SelfCheck)
        );
        assert!(checker.is_restored());
    }

    #[test]
    fn test_restored_detects_leftovers() {
        let mut b = kings();
        put(&mut b, 4, 4, Team::White, PieceKind::Queen);
        put(&mut b, 1, 4, Team::Red, PieceKind::Rook);
        let pos = Position::try_from(b).unwrap();
        let mut checker = Checker::new(&pos, Team::White);
        assert!(checker.is_restored());
        let undo = checker.make_move(Coord::from_parts(4, 4), Coord::from_parts(1, 4));
        assert!(!checker.is_restored());
        checker.unmake_move(&undo);
        assert!(checker.is_restored());
    }
}
