//! SAT encoder for the knight's tour problem

use super::{ConstraintGenerator, SatSolver, SolverSolution};
use crate::board::{Board, Cell};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Builds the tour formula, hands it to CaDiCaL and decodes the model
pub struct SatEncoder {
    board: Board,
    constraint_generator: ConstraintGenerator,
    solver: SatSolver,
}

impl SatEncoder {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            constraint_generator: ConstraintGenerator::new(board),
            solver: SatSolver::new(),
        }
    }

    /// Encode and solve; `Ok(None)` when no tour starts at `start`.
    ///
    /// Every call builds a fresh formula and solver, so one encoder can be
    /// reused for several start cells.
    pub fn solve(&mut self, start: Cell) -> Result<Option<Vec<Cell>>> {
        self.constraint_generator = ConstraintGenerator::new(self.board);
        self.solver = SatSolver::new();

        let clauses = self
            .constraint_generator
            .generate_all_constraints(start)
            .context("Failed to generate SAT constraints")?;

        info!(
            board = %self.board,
            clauses = clauses.len(),
            variables = self.constraint_generator.variable_manager().variable_count(),
            "encoded knight's tour as SAT"
        );

        self.solver
            .add_clauses(&clauses)
            .context("Failed to add clauses to SAT solver")?;

        let Some(solution) = self.solver.solve().context("SAT solving failed")? else {
            debug!("formula is unsatisfiable");
            return Ok(None);
        };

        self.decode_tour(&solution).map(Some)
    }

    /// Read the cell of every step off the model
    fn decode_tour(&mut self, solution: &SolverSolution) -> Result<Vec<Cell>> {
        let total = self.board.total_cells();
        let manager = self.constraint_generator.variable_manager();
        let mut tour = Vec::with_capacity(total);

        for step in 0..total {
            let mut cells = (0..total).filter(|&cell| {
                manager
                    .existing_placement(step, cell)
                    .is_some_and(|var| solution.value(var))
            });
            let (Some(cell), None) = (cells.next(), cells.next()) else {
                anyhow::bail!("Model does not place exactly one cell at step {}", step);
            };
            tour.push(self.board.from_index(cell));
        }

        Ok(tour)
    }

    pub fn statistics(&self) -> EncodingStatistics {
        let constraint_stats = self.constraint_generator.statistics();
        let solver_stats = self.solver.statistics();

        EncodingStatistics {
            board_width: self.board.width(),
            board_height: self.board.height(),
            total_variables: constraint_stats.total_variables,
            total_clauses: solver_stats.clause_count,
        }
    }

    /// Predicted encoding size, computed without building the formula
    pub fn estimate_complexity(board: &Board) -> ComplexityEstimate {
        let total_cells = board.total_cells();
        let estimated_variables = total_cells * total_cells;
        let estimated_clauses = ConstraintGenerator::estimate_clauses(board);

        let complexity_level = if estimated_variables < 1000 {
            ComplexityLevel::Low
        } else if estimated_variables < 10000 {
            ComplexityLevel::Medium
        } else if estimated_variables < 100000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            estimated_variables,
            estimated_clauses,
            board_size: total_cells,
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub board_width: usize,
    pub board_height: usize,
    pub total_variables: usize,
    pub total_clauses: usize,
}

/// Complexity estimate for the SAT encoding of a board
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub estimated_variables: usize,
    pub estimated_clauses: usize,
    pub board_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.board_width, self.board_height)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;
        writeln!(f, "  Board size: {} cells", self.board_size)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to solve",
            ComplexityLevel::High => "Likely to be slow, prefer heuristic backtracking",
            ComplexityLevel::VeryHigh => "Very large formula, prefer heuristic backtracking",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}
