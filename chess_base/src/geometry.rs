use crate::types::Team;

/// Row delta of a single pawn step
pub const fn pawn_forward_delta(t: Team) -> isize {
    match t {
        Team::White => -1,
        Team::Red => 1,
    }
}

/// Row from which pawns may advance two squares
pub const fn pawn_start_row(t: Team) -> usize {
    match t {
        Team::White => 6,
        Team::Red => 1,
    }
}

/// Row on which pawns get promoted
pub const fn promotion_row(t: Team) -> usize {
    match t {
        Team::White => 0,
        Team::Red => 7,
    }
}

pub const fn back_row(t: Team) -> usize {
    match t {
        Team::White => 7,
        Team::Red => 0,
    }
}
