//! Structured error values for the three failure categories the engine
//! distinguishes: input errors (surfaced at the API boundary, state
//! unchanged), resource errors (fatal to driver startup), and internal
//! invariant violations (debug-only assertions, never a `Result`).

use std::fmt;

/// FEN parsing failures, one variant per malformed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    TooFewFields { found: usize },
    InvalidPiece { char: char },
    InvalidRank { rank: usize },
    TooManyFiles { rank: usize },
    TooFewFiles { rank: usize },
    WrongRankCount { found: usize },
    InvalidSideToMove { found: String },
    InvalidCastling { char: char },
    InvalidEnPassant { found: String },
    InvalidHalfmoveClock { found: String },
    InvalidFullmoveNumber { found: String },
    MissingKing { color: crate::position::Color },
    TooManyKings { color: crate::position::Color },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewFields { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::InvalidPiece { char } => write!(f, "invalid piece character '{char}'"),
            FenError::InvalidRank { rank } => write!(f, "invalid rank index {rank}"),
            FenError::TooManyFiles { rank } => write!(f, "too many files in rank {rank}"),
            FenError::TooFewFiles { rank } => write!(f, "too few files in rank {rank}"),
            FenError::WrongRankCount { found } => {
                write!(f, "expected 8 ranks separated by '/', found {found}")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "side to move must be 'w' or 'b', found '{found}'")
            }
            FenError::InvalidCastling { char } => write!(f, "invalid castling character '{char}'"),
            FenError::InvalidEnPassant { found } => {
                write!(f, "invalid en-passant target '{found}'")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "invalid halfmove clock '{found}'")
            }
            FenError::InvalidFullmoveNumber { found } => {
                write!(f, "invalid fullmove number '{found}'")
            }
            FenError::MissingKing { color } => write!(f, "{color:?} has no king"),
            FenError::TooManyKings { color } => write!(f, "{color:?} has more than one king"),
        }
    }
}

impl std::error::Error for FenError {}

/// Coordinate move notation ("e2e4", "e7e8q") parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    InvalidLength { len: usize },
    InvalidSquare { notation: String },
    InvalidPromotion { char: char },
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "invalid square in move '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "'{notation}' is not legal in this position")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// `set_position`'s failure modes: a malformed FEN, or a move in the
/// follow-up list that doesn't parse or isn't legal from wherever the
/// list has reached so far. State is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    Fen(FenError),
    Move(MoveParseError),
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Fen(e) => write!(f, "{e}"),
            PositionError::Move(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PositionError {}

impl From<FenError> for PositionError {
    fn from(e: FenError) -> Self {
        PositionError::Fen(e)
    }
}

impl From<MoveParseError> for PositionError {
    fn from(e: MoveParseError) -> Self {
        PositionError::Move(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareError {
    pub notation: String,
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid square notation '{}'", self.notation)
    }
}

impl SquareError {
    pub fn invalid_notation(notation: impl Into<String>) -> Self {
        SquareError {
            notation: notation.into(),
        }
    }
}

impl std::error::Error for SquareError {}

/// Fatal resource failures: these stop the driver from starting a
/// search at all, rather than being surfaced per-call.
#[derive(Debug)]
pub enum EngineError {
    /// Requested transposition table size rounds down to zero buckets.
    TtTooSmall { requested_mb: usize },
    /// NNUE weights file could not be read or decoded.
    NnueLoad(std::io::Error),
    /// NNUE weights file decoded but its tensor shapes don't match
    /// what the evaluator expects.
    NnueShapeMismatch { expected: usize, found: usize },
    /// NNUE weights magic bytes or version did not match.
    NnueBadMagic,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::TtTooSmall { requested_mb } => {
                write!(f, "transposition table size {requested_mb}MB is too small to hold a bucket")
            }
            EngineError::NnueLoad(e) => write!(f, "failed to load NNUE weights: {e}"),
            EngineError::NnueShapeMismatch { expected, found } => write!(
                f,
                "NNUE weights have the wrong shape: expected {expected} elements, found {found}"
            ),
            EngineError::NnueBadMagic => write!(f, "NNUE weights file has an unrecognized magic/version header"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::NnueLoad(e)
    }
}
