//! Check and checkmate detection

use crate::between;
use crate::board::Board;
use crate::legal::{self, Checker};
use crate::piece::Piece;
use crate::position::Position;
use crate::set::{PieceHandle, PieceSet, SET_SIZE};
use crate::types::{Coord, PieceKind, Team};

use arrayvec::ArrayVec;

/// Pieces attacking the king
pub type Threats = ArrayVec<PieceHandle, SET_SIZE>;

const KING_STEPS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn reaches(board: &Board, piece: &Piece, target: Coord) -> bool {
    match piece.pos() {
        Some(src) => {
            piece.shape_allows(target)
                && !legal::path_blocked(board, piece.kind(), piece.team(), src, target)
        }
        None => false,
    }
}

/// Returns `true` if any alive piece from `attackers` can reach `king` on `board`
///
/// This is a pure reachability test: whether the attacking move would expose the attacker's own
/// king doesn't matter.
pub fn in_check(board: &Board, attackers: &PieceSet, king: Coord) -> bool {
    attackers.alive().any(|(_, p)| reaches(board, p, king))
}

/// Returns all the pieces from `attackers` which can reach `king` on `board`
pub fn threats_to_king(board: &Board, attackers: &PieceSet, king: Coord) -> Threats {
    attackers
        .alive()
        .filter(|(_, p)| reaches(board, p, king))
        .map(|(h, _)| h)
        .collect()
}

/// Returns `true` if the king of `defender` is in check and no move can get it out of check
///
/// Stalemate is not detected, so a position without any legal moves is not considered
/// checkmate unless the king is attacked.
pub fn is_checkmate(pos: &Position, defender: Team) -> bool {
    let king = match pos.king_pos(defender) {
        Some(king) => king,
        None => return false,
    };
    let attackers = pos.pieces(defender.inv());
    if !in_check(pos.board(), attackers, king) {
        return false;
    }

    let ours = pos.pieces(defender);
    let mut checker = Checker::new(pos, defender);
    let escapes = KING_STEPS
        .iter()
        .filter_map(|&(dr, dc)| king.try_shift(dr, dc));
    for dst in escapes {
        if checker.is_legal(ours.king(), dst) {
            return false;
        }
    }

    // Two attackers can be neither captured nor blocked in one move
    let threats = threats_to_king(pos.board(), attackers, king);
    if threats.len() != 1 {
        return true;
    }
    let threat = attackers.get(threats[0]);
    let threat_pos = match threat.pos() {
        Some(c) => c,
        None => return true,
    };

    let defenders: ArrayVec<PieceHandle, SET_SIZE> = ours.alive().map(|(h, _)| h).collect();
    if defenders.iter().any(|&h| checker.is_legal(h, threat_pos)) {
        return false;
    }

    let line = match threat.kind() {
        PieceKind::Rook => between::rook_strict(threat_pos, king),
        PieceKind::Bishop => between::bishop_strict(threat_pos, king),
        PieceKind::Queen => {
            between::rook_strict(threat_pos, king) | between::bishop_strict(threat_pos, king)
        }
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => return true,
    };
    !line
        .into_iter()
        .any(|dst| defenders.iter().any(|&h| checker.is_legal(h, dst)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Game, Outcome};
    use crate::types::Tile;

    fn put(b: &mut Board, row: usize, col: usize, team: Team, kind: PieceKind) {
        b.place(Coord::from_parts(row, col), Tile::from_parts(team, kind));
    }

    fn back_rank() -> Board {
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 7, 3, Team::White, PieceKind::Rook);
        put(&mut b, 7, 5, Team::White, PieceKind::Rook);
        put(&mut b, 6, 3, Team::White, PieceKind::Pawn);
        put(&mut b, 6, 5, Team::White, PieceKind::Pawn);
        put(&mut b, 0, 4, Team::Red, PieceKind::Rook);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        b
    }

    #[test]
    fn test_in_check() {
        let pos = Position::try_from(back_rank()).unwrap();
        assert!(pos.in_check(Team::White));
        assert!(!pos.in_check(Team::Red));
        let rook = pos.pieces(Team::Red).piece_at(Coord::from_parts(0, 4)).unwrap();
        assert_eq!(pos.threats_to_king(Team::White).as_slice(), &[rook]);
        assert!(pos.threats_to_king(Team::Red).is_empty());

        let mut b = back_rank();
        put(&mut b, 4, 4, Team::White, PieceKind::Knight);
        let pos = Position::try_from(b).unwrap();
        assert!(!pos.in_check(Team::White));
        assert!(!pos.is_checkmate(Team::White));
    }

    #[test]
    fn test_pawn_attacks() {
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 6, 4, Team::Red, PieceKind::Pawn);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        // Red pawns move down the board, so this one attacks nothing on row 7
        assert!(!pos.in_check(Team::White));

        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 6, 3, Team::Red, PieceKind::Pawn);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::White));

        // Pawns never attack straight ahead
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 0, 4, Team::Red, PieceKind::King);
        put(&mut b, 1, 4, Team::White, PieceKind::Pawn);
        let pos = Position::try_from(b).unwrap();
        assert!(!pos.in_check(Team::Red));
        let pawn = pos.pieces(Team::White).piece_at(Coord::from_parts(1, 4)).unwrap();
        assert!(!pos.is_legal(Team::White, pawn, Coord::from_parts(0, 4)));
    }

    #[test]
    fn test_back_rank_mate() {
        let pos = Position::try_from(back_rank()).unwrap();
        assert!(pos.is_checkmate(Team::White));
        assert!(!pos.is_checkmate(Team::Red));
    }

    #[test]
    fn test_block() {
        let mut b = back_rank();
        put(&mut b, 4, 0, Team::White, PieceKind::Rook);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::White));
        assert!(!pos.is_checkmate(Team::White));

        // A bishop can block as well
        let mut b = back_rank();
        put(&mut b, 4, 2, Team::White, PieceKind::Bishop);
        let pos = Position::try_from(b).unwrap();
        assert!(!pos.is_checkmate(Team::White));
    }

    #[test]
    fn test_lone_king_block() {
        let mut b = Board::empty();
        put(&mut b, 7, 4, Team::White, PieceKind::King);
        put(&mut b, 0, 4, Team::Red, PieceKind::Rook);
        put(&mut b, 0, 0, Team::Red, PieceKind::King);
        put(&mut b, 4, 0, Team::White, PieceKind::Rook);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::White));
        assert!(!pos.is_checkmate(Team::White));

        let rook = pos.pieces(Team::White).piece_at(Coord::from_parts(4, 0)).unwrap();
        assert!(pos.is_legal(Team::White, rook, Coord::from_parts(4, 4)));
        assert!(!pos.is_legal(Team::White, rook, Coord::from_parts(4, 3)));
    }

    #[test]
    fn test_capture_threat() {
        let mut b = back_rank();
        put(&mut b, 3, 7, Team::White, PieceKind::Bishop);
        let pos = Position::try_from(b).unwrap();
        assert!(!pos.is_checkmate(Team::White));

        let mut b = back_rank();
        put(&mut b, 2, 3, Team::White, PieceKind::Knight);
        let pos = Position::try_from(b).unwrap();
        assert!(!pos.is_checkmate(Team::White));
    }

    #[test]
    fn test_escape() {
        let mut b = back_rank();
        b.place(Coord::from_parts(6, 5), Tile::EMPTY);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::White));
        assert!(!pos.is_checkmate(Team::White));
    }

    #[test]
    fn test_double_check() {
        let mut b = back_rank();
        put(&mut b, 6, 2, Team::Red, PieceKind::Knight);
        // The bishop could block the rook, but the king is attacked twice
        put(&mut b, 2, 3, Team::White, PieceKind::Bishop);
        let pos = Position::try_from(b).unwrap();
        assert_eq!(pos.threats_to_king(Team::White).len(), 2);
        assert!(pos.is_checkmate(Team::White));
    }

    #[test]
    fn test_knight_mate() {
        // Smothered king
        let mut b = Board::empty();
        put(&mut b, 0, 7, Team::Red, PieceKind::King);
        put(&mut b, 0, 6, Team::Red, PieceKind::Rook);
        put(&mut b, 1, 6, Team::Red, PieceKind::Pawn);
        put(&mut b, 1, 7, Team::Red, PieceKind::Pawn);
        put(&mut b, 1, 5, Team::White, PieceKind::Knight);
        put(&mut b, 7, 0, Team::White, PieceKind::King);
        let pos = Position::try_from(b).unwrap();
        assert!(pos.in_check(Team::Red));
        assert!(pos.is_checkmate(Team::Red));

        put(&mut b, 3, 3, Team::Red, PieceKind::Bishop);
        let pos = Position::try_from(b).unwrap();
        assert!(!pos.is_checkmate(Team::Red));
    }

    #[test]
    fn test_fools_mate() {
        let mut game = Game::new("alice", "bob");
        for (src, dst) in [((6, 5), (5, 5)), ((1, 4), (3, 4)), ((6, 6), (4, 6))] {
            game.make_move(Coord::from_parts(src.0, src.1), dst.0, dst.1)
                .unwrap();
        }
        assert!(!game.position().is_checkmate(Team::White));
        game.make_move(Coord::from_parts(0, 3), 4, 7).unwrap();
        let pos = game.position();
        assert!(pos.in_check(Team::White));
        assert!(pos.is_checkmate(Team::White));
        assert_eq!(game.outcome(), Some(Outcome::Win(Team::Red)));
    }
}
