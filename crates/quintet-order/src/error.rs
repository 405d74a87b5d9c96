//! Error type for roster and parameter validation

use thiserror::Error;

/// Which team a roster belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Ours,
    Opponent,
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::Ours => write!(f, "our"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{side} roster has {len} competitors, at most {max} can be searched exhaustively")]
    RosterTooLarge { side: Side, len: usize, max: usize },

    #[error("pinned competitor index {index} out of range for roster of {len}")]
    PinnedIndexOutOfRange { index: usize, len: usize },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] serde_json::Error),
}
