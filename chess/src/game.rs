//! Game session
//!
//! [`Game`] drives a game between two named players: it keeps track of the side to move, applies
//! validated moves, handles pawn promotion and detects checkmate.

use crate::legal::{Checker, MoveError};
use crate::position::{Position, ValidateError};
use crate::set::{PieceHandle, PromoteError};
use crate::types::{Coord, PieceKind, PromoteKind, Team};

use std::fmt;

use log::{debug, info};
use thiserror::Error;

/// Error making a move or a promotion in a [`Game`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("game is already finished")]
    Finished,
    #[error("pawn promotion is pending")]
    PromotionPending,
    #[error("no pawn to promote")]
    NoPromotion,
    #[error("no piece of the side to move at {0}")]
    NoPiece(Coord),
    #[error("illegal move: {0}")]
    Illegal(#[from] MoveError),
    #[error("cannot promote: {0}")]
    Promote(#[from] PromoteError),
}

/// State of the game after a successful move or promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// The turn passed to the opponent
    Normal,
    /// The turn passed to the opponent, whose king is attacked
    Check,
    /// The moved pawn reached the last row, and [`Game::promote()`] must be called
    PromotionPending,
    /// The opponent is checkmated, and the game is over
    Checkmate,
}

/// Result of a finished game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win(Team),
}

impl Outcome {
    #[inline]
    pub fn winner(&self) -> Team {
        match *self {
            Outcome::Win(t) => t,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Outcome::Win(t) => write!(f, "{} wins", t),
        }
    }
}

/// Move applied in a [`Game`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub side: Team,
    pub piece: PieceHandle,
    pub kind: PieceKind,
    pub src: Coord,
    pub dst: Coord,
    pub captured: Option<PieceKind>,
    pub promote: Option<PromoteKind>,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} {} -> {}", self.kind, self.src, self.dst)?;
        if let Some(kind) = self.captured {
            write!(f, " x{}", kind)?;
        }
        if let Some(kind) = self.promote {
            write!(f, " ={}", PieceKind::from(kind))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    side: Team,
    names: [String; Team::COUNT],
    pending: Option<PieceHandle>,
    outcome: Option<Outcome>,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Starts a new game from the initial position with White to move
    pub fn new(white_name: impl Into<String>, red_name: impl Into<String>) -> Game {
        Game {
            position: Position::initial(),
            side: Team::White,
            names: [white_name.into(), red_name.into()],
            pending: None,
            outcome: None,
            history: Vec::new(),
        }
    }

    /// Starts a new game from an arbitrary position with `side` to move
    ///
    /// The position must be valid, and the side which just moved must not be in check.
    pub fn from_position(position: Position, side: Team) -> Result<Game, ValidateError> {
        position.validate()?;
        if position.in_check(side.inv()) {
            return Err(ValidateError::OpponentKingAttacked);
        }
        Ok(Game {
            position,
            side,
            names: [Team::White.name().to_string(), Team::Red.name().to_string()],
            pending: None,
            outcome: None,
            history: Vec::new(),
        })
    }

    /// Sets the name of the player for team `team`
    pub fn set_player_name(&mut self, team: Team, name: impl Into<String>) {
        self.names[team.index()] = name.into();
    }

    #[inline]
    pub fn player_name(&self, team: Team) -> &str {
        &self.names[team.index()]
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Team {
        self.side
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the pawn awaiting promotion, if any
    #[inline]
    pub fn pending_promotion(&self) -> Option<PieceHandle> {
        self.pending
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    fn check_sync(&self) {
        #[cfg(feature = "selftest")]
        if let Err(err) = self.position.validate() {
            panic!("position is broken after move #{}: {}", self.history.len(), err);
        }
    }

    /// Moves the piece of the side to move from `src` to `(dst_row, dst_col)`
    ///
    /// On success, the move is applied and recorded in the history. If the moved piece is a pawn
    /// which reached the last row, the turn doesn't pass until [`Game::promote()`] is called.
    /// Otherwise, the opponent is checked for checkmate and the turn passes.
    ///
    /// On error, the game is not changed.
    pub fn make_move(
        &mut self,
        src: Coord,
        dst_row: isize,
        dst_col: isize,
    ) -> Result<Status, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::Finished);
        }
        if self.pending.is_some() {
            return Err(GameError::PromotionPending);
        }
        let side = self.side;
        let piece = match self.position.pieces(side).piece_at(src) {
            Some(h) => h,
            None => {
                debug!("{}: no piece at {}", side, src);
                return Err(GameError::NoPiece(src));
            }
        };
        let res = Coord::try_from_row_col(dst_row, dst_col)
            .ok_or(MoveError::OutOfBounds)
            .and_then(|dst| Checker::new(&self.position, side).validate(piece, dst).map(|_| dst));
        let dst = match res {
            Ok(dst) => dst,
            Err(err) => {
                debug!(
                    "{}: rejected move {} -> ({}, {}): {}",
                    side, src, dst_row, dst_col, err
                );
                return Err(err.into());
            }
        };

        let kind = self.position.pieces(side).get(piece).kind();
        let captured = self
            .position
            .apply_move(side, piece, dst)
            .map(|h| self.position.pieces(side.inv()).get(h).kind());
        let record = MoveRecord {
            side,
            piece,
            kind,
            src,
            dst,
            captured,
            promote: None,
        };
        debug!("{}: {}", side, record);
        self.history.push(record);
        self.check_sync();

        if let Some(pawn) = self.position.promotable_pawn(side) {
            self.pending = Some(pawn);
            return Ok(Status::PromotionPending);
        }
        Ok(self.finish_turn())
    }

    /// Promotes the pawn which has just reached the last row
    pub fn promote(&mut self, kind: PromoteKind) -> Result<Status, GameError> {
        let piece = self.pending.ok_or(GameError::NoPromotion)?;
        self.position.promote(self.side, piece, kind)?;
        self.pending = None;
        if let Some(record) = self.history.last_mut() {
            record.promote = Some(kind);
        }
        debug!("{}: pawn promoted to {}", self.side, PieceKind::from(kind));
        self.check_sync();
        Ok(self.finish_turn())
    }

    fn finish_turn(&mut self) -> Status {
        let opponent = self.side.inv();
        if self.position.is_checkmate(opponent) {
            let outcome = Outcome::Win(self.side);
            info!(
                "{} is checkmated, {} ({}) wins",
                opponent,
                self.player_name(self.side),
                self.side
            );
            self.outcome = Some(outcome);
            return Status::Checkmate;
        }
        let check = self.position.in_check(opponent);
        self.side = opponent;
        if check {
            Status::Check
        } else {
            Status::Normal
        }
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new(Team::White.name(), Team::Red.name())
    }
}
