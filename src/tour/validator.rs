//! Tour validation

use crate::board::{is_knight_move, Board, Cell};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

/// Checks cell sequences against the tour invariants
pub struct TourValidator {
    board: Board,
}

/// Result of tour validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<TourViolation>,
    pub error_message: Option<String>,
}

/// A single broken invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourViolation {
    Empty,
    WrongLength { expected: usize, actual: usize },
    WrongStart { expected: Cell, actual: Cell },
    OutOfBounds { step: usize, cell: Cell },
    Repeated { step: usize, cell: Cell },
    NotKnightMove { step: usize, from: Cell, to: Cell },
}

impl TourValidator {
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    /// Validate a complete tour from `start`
    pub fn validate(&self, start: Cell, tour: &[Cell]) -> ValidationResult {
        let mut violations = Vec::new();
        if tour.len() != self.board.total_cells() {
            violations.push(TourViolation::WrongLength {
                expected: self.board.total_cells(),
                actual: tour.len(),
            });
        }
        violations.extend(self.path_violations(start, tour));
        Self::result(violations)
    }

    /// Validate a tour prefix that a search will extend
    pub fn validate_partial(&self, start: Cell, prefix: &[Cell]) -> ValidationResult {
        let mut violations = self.path_violations(start, prefix);
        if prefix.len() > self.board.total_cells() {
            violations.push(TourViolation::WrongLength {
                expected: self.board.total_cells(),
                actual: prefix.len(),
            });
        }
        Self::result(violations)
    }

    /// Start, bounds, repeats and move shape
    fn path_violations(&self, start: Cell, cells: &[Cell]) -> Vec<TourViolation> {
        let mut violations = Vec::new();

        let Some(&first) = cells.first() else {
            violations.push(TourViolation::Empty);
            return violations;
        };
        if first != start {
            violations.push(TourViolation::WrongStart {
                expected: start,
                actual: first,
            });
        }

        let mut seen = HashSet::with_capacity(cells.len());
        for (step, &cell) in cells.iter().enumerate() {
            if !self.board.in_bounds(cell) {
                violations.push(TourViolation::OutOfBounds { step, cell });
            }
            if !seen.insert(cell) {
                violations.push(TourViolation::Repeated { step, cell });
            }
        }

        for (step, (&from, &to)) in cells.iter().tuple_windows().enumerate() {
            if !is_knight_move(from, to) {
                violations.push(TourViolation::NotKnightMove {
                    step: step + 1,
                    from,
                    to,
                });
            }
        }

        violations
    }

    fn result(violations: Vec<TourViolation>) -> ValidationResult {
        let is_valid = violations.is_empty();
        let error_message = (!is_valid).then(|| Self::generate_error_message(&violations));
        ValidationResult {
            is_valid,
            violations,
            error_message,
        }
    }

    fn generate_error_message(violations: &[TourViolation]) -> String {
        let mut message = format!("Found {} violation(s). ", violations.len());
        message.push_str(&violations.iter().take(3).join("; "));
        if violations.len() > 3 {
            message.push_str(&format!("; ... and {} more", violations.len() - 3));
        }
        message
    }
}

impl fmt::Display for TourViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourViolation::Empty => write!(f, "tour is empty"),
            TourViolation::WrongLength { expected, actual } => {
                write!(f, "tour has {} cells, expected {}", actual, expected)
            }
            TourViolation::WrongStart { expected, actual } => {
                write!(f, "tour starts at {} instead of {}", actual, expected)
            }
            TourViolation::OutOfBounds { step, cell } => {
                write!(f, "step {} at {} is off the board", step, cell)
            }
            TourViolation::Repeated { step, cell } => {
                write!(f, "step {} revisits {}", step, cell)
            }
            TourViolation::NotKnightMove { step, from, to } => {
                write!(f, "step {} jumps {} -> {}, not a knight move", step, from, to)
            }
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        for violation in &self.violations {
            writeln!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}
