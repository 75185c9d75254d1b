//! Board dimensions and cell coordinates

use crate::error::{Result, TourError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A board square, 0-indexed from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift by a signed displacement, `None` if either coordinate goes negative
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An immutable `width x height` chess board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Board {
    width: usize,
    height: usize,
}

impl Board {
    /// Create a board, rejecting zero-sized dimensions
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TourError::InvalidBoard { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Linear index of a cell, `width * row + col`
    #[inline]
    pub fn to_index(&self, cell: Cell) -> usize {
        self.width * cell.row + cell.col
    }

    /// Inverse of [`Board::to_index`]
    #[inline]
    pub fn from_index(&self, index: usize) -> Cell {
        Cell::new(index / self.width, index % self.width)
    }

    /// All cells in linear index order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let board = *self;
        (0..board.total_cells()).map(move |index| board.from_index(index))
    }

    /// Fail fast when a start cell lies off the board
    pub fn check_start(&self, cell: Cell) -> Result<()> {
        if !self.in_bounds(cell) {
            return Err(TourError::StartOutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
