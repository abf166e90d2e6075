//! # Base types for tilechess
//!
//! This is an auxiliary crate for `tilechess`, which contains plain value types: teams, piece
//! kinds, coordinates, tiles and square sets.
//!
//! Normally you don't want to use this crate directly. Use `tilechess` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
