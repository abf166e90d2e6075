//! Squares lying between two coordinates

use crate::bitboard::Bitboard;
use crate::types::Coord;

/// Iterator over the squares strictly between two aligned coordinates
///
/// The squares are yielded one step at a time, starting next to the source and moving
/// towards the destination. Neither endpoint is yielded.
#[derive(Debug, Clone)]
pub struct Ray {
    cur: Coord,
    dst: Coord,
    step: (isize, isize),
}

impl Ray {
    /// Creates the ray from `src` to `dst`
    ///
    /// Returns `None` if the coordinates are equal or do not share a row, a column or
    /// a diagonal.
    pub fn new(src: Coord, dst: Coord) -> Option<Ray> {
        if !is_rook_valid(src, dst) && !is_bishop_valid(src, dst) {
            return None;
        }
        let (dr, dc) = src.delta(dst);
        Some(Ray {
            cur: src,
            dst,
            step: (dr.signum(), dc.signum()),
        })
    }
}

impl Iterator for Ray {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let next = self.cur.try_shift(self.step.0, self.step.1)?;
        if next == self.dst {
            return None;
        }
        self.cur = next;
        Some(next)
    }
}

#[inline]
pub fn is_bishop_valid(src: Coord, dst: Coord) -> bool {
    let (dr, dc) = src.delta(dst);
    dr != 0 && dr.abs() == dc.abs()
}

#[inline]
pub fn is_rook_valid(src: Coord, dst: Coord) -> bool {
    let (dr, dc) = src.delta(dst);
    (dr == 0) != (dc == 0)
}

/// Squares strictly between `src` and `dst` on a shared diagonal, or empty if there is none
pub fn bishop_strict(src: Coord, dst: Coord) -> Bitboard {
    if !is_bishop_valid(src, dst) {
        return Bitboard::EMPTY;
    }
    Ray::new(src, dst).into_iter().flatten().collect()
}

/// Squares strictly between `src` and `dst` on a shared row or column, or empty if there is none
pub fn rook_strict(src: Coord, dst: Coord) -> Bitboard {
    if !is_rook_valid(src, dst) {
        return Bitboard::EMPTY;
    }
    Ray::new(src, dst).into_iter().flatten().collect()
}
