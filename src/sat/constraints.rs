//! Clause generation for the knight's tour SAT encoding

use super::VariableManager;
use crate::board::{Board, Cell};
use anyhow::Result;
use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Generates the clauses whose models are exactly the tours from `start`.
///
/// Variable `p(s, c)` is true when tour step `s` sits on cell index `c`.
/// Each step holds exactly one cell, each cell is used by at most one step,
/// and a cell at any step but the last is followed by one of its knight
/// neighbours.
pub struct ConstraintGenerator {
    variable_manager: VariableManager,
    board: Board,
    graph: Vec<Vec<usize>>,
}

impl ConstraintGenerator {
    pub fn new(board: Board) -> Self {
        Self {
            variable_manager: VariableManager::new(board.total_cells()),
            graph: board.move_graph(),
            board,
        }
    }

    /// Generate every clause of the encoding
    pub fn generate_all_constraints(&mut self, start: Cell) -> Result<Vec<Clause>> {
        let mut clauses = Vec::new();

        // 1. step 0 is the start cell
        clauses.extend(self.generate_start_constraints(start)?);

        // 2. each step takes exactly one cell
        for step in 0..self.board.total_cells() {
            clauses.extend(self.generate_step_domain_constraints(step)?);
        }

        // 3. each cell is used at most once
        for cell in 0..self.board.total_cells() {
            clauses.extend(self.generate_distinct_constraints(cell)?);
        }

        // 4. consecutive steps are a knight move apart
        for step in 0..self.board.total_cells().saturating_sub(1) {
            clauses.extend(self.generate_adjacency_constraints(step)?);
        }

        Ok(clauses)
    }

    fn generate_start_constraints(&mut self, start: Cell) -> Result<Vec<Clause>> {
        if !self.board.in_bounds(start) {
            anyhow::bail!("Start cell {} outside {} board", start, self.board);
        }
        let start_var = self
            .variable_manager
            .placement_variable(0, self.board.to_index(start))?;
        Ok(vec![Clause::unit(start_var)])
    }

    /// At least one and at most one cell per step
    fn generate_step_domain_constraints(&mut self, step: usize) -> Result<Vec<Clause>> {
        let vars = self.variable_manager.step_variables(step)?;
        let mut clauses = vec![Clause::new(vars.clone())];
        clauses.extend(Self::at_most_one(&vars));
        Ok(clauses)
    }

    /// No two steps share a cell
    fn generate_distinct_constraints(&mut self, cell: usize) -> Result<Vec<Clause>> {
        let vars = self.variable_manager.cell_variables(cell)?;
        Ok(Self::at_most_one(&vars))
    }

    /// `p(s, c) -> OR_{d in graph[c]} p(s + 1, d)`
    fn generate_adjacency_constraints(&mut self, step: usize) -> Result<Vec<Clause>> {
        let mut clauses = Vec::with_capacity(self.graph.len());

        for cell in 0..self.graph.len() {
            let mut literals = vec![-self.variable_manager.placement_variable(step, cell)?];
            for &next in &self.graph[cell] {
                literals.push(self.variable_manager.placement_variable(step + 1, next)?);
            }
            clauses.push(Clause::new(literals));
        }

        Ok(clauses)
    }

    /// Pairwise at-most-one
    fn at_most_one(vars: &[i32]) -> Vec<Clause> {
        vars.iter()
            .tuple_combinations()
            .map(|(&a, &b)| Clause::binary(-a, -b))
            .collect()
    }

    pub fn variable_manager(&mut self) -> &mut VariableManager {
        &mut self.variable_manager
    }

    /// Predicted clause count for a board, without building anything
    pub fn estimate_clauses(board: &Board) -> usize {
        let n = board.total_cells();
        let pairs = n * n.saturating_sub(1) / 2;
        1 + n * (1 + pairs) + n * pairs + n * n.saturating_sub(1)
    }

    pub fn statistics(&self) -> ConstraintStatistics {
        ConstraintStatistics {
            width: self.board.width(),
            height: self.board.height(),
            steps: self.board.total_cells(),
            total_variables: self.variable_manager.variable_count(),
        }
    }
}

/// Statistics about constraint generation
#[derive(Debug, Clone)]
pub struct ConstraintStatistics {
    pub width: usize,
    pub height: usize,
    pub steps: usize,
    pub total_variables: usize,
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Generation Statistics:")?;
        writeln!(f, "  Board size: {}x{}", self.width, self.height)?;
        writeln!(f, "  Tour steps: {}", self.steps)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(width: usize, height: usize) -> ConstraintGenerator {
        ConstraintGenerator::new(Board::new(width, height).unwrap())
    }

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());

        let unit_clause = Clause::unit(5);
        assert!(unit_clause.is_unit());
        assert_eq!(unit_clause.literals, vec![5]);
    }

    #[test]
    fn test_start_constraint() {
        let mut cg = generator(3, 3);
        let clauses = cg.generate_start_constraints(Cell::new(1, 2)).unwrap();
        let expected = cg.variable_manager.placement_variable(0, 5).unwrap();
        assert_eq!(clauses, vec![Clause::unit(expected)]);
    }

    #[test]
    fn test_start_out_of_bounds() {
        let mut cg = generator(3, 3);
        assert!(cg.generate_start_constraints(Cell::new(3, 0)).is_err());
    }

    #[test]
    fn test_at_most_one_pairs() {
        let clauses = ConstraintGenerator::at_most_one(&[1, 2, 3]);
        assert_eq!(
            clauses,
            vec![Clause::binary(-1, -2), Clause::binary(-1, -3), Clause::binary(-2, -3)]
        );
    }

    #[test]
    fn test_adjacency_clause_shape() {
        let mut cg = generator(3, 3);
        let clauses = cg.generate_adjacency_constraints(0).unwrap();
        assert_eq!(clauses.len(), 9);
        // corner (0, 0) has two successors
        assert_eq!(clauses[0].literals.len(), 3);
        // the centre has none, so it can never be followed
        assert!(clauses[4].is_unit());
        assert!(clauses.iter().all(|c| c.literals[0] < 0));
    }

    #[test]
    fn test_clause_count_matches_estimate() {
        let board = Board::new(4, 3).unwrap();
        let mut cg = ConstraintGenerator::new(board);
        let clauses = cg.generate_all_constraints(Cell::new(0, 0)).unwrap();
        assert_eq!(clauses.len(), ConstraintGenerator::estimate_clauses(&board));
        assert_eq!(cg.statistics().total_variables, 144);
    }
}
