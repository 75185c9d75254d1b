//! Error taxonomy for the tour search core

use crate::board::Cell;
use thiserror::Error;

/// Errors raised by the search core.
///
/// Exhausting the search space is not an error: it is reported as an empty
/// tour so callers can tell "no tour exists" apart from a broken request.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidBoard { width: usize, height: usize },

    #[error("start cell {cell} is outside the {width}x{height} board")]
    StartOutOfBounds { cell: Cell, width: usize, height: usize },

    #[error("invalid partial tour: {0}")]
    InvalidPartialTour(String),

    #[error("solver failure: {0}")]
    Solver(String),

    #[error("solver returned an invalid tour: {0}")]
    InvalidSolution(String),
}

pub type Result<T> = std::result::Result<T, TourError>;
