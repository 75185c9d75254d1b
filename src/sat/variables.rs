//! Variable management for the SAT tour encoding

use anyhow::Result;
use std::collections::HashMap;

/// Types of variables used in the SAT encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Tour step `step` occupies the board cell with linear index `cell`
    Placement { step: usize, cell: usize },
}

/// Manages SAT variables and their mapping to DIMACS integers
#[derive(Debug)]
pub struct VariableManager {
    /// Map from variable type to SAT variable ID (positive integer)
    variable_map: HashMap<VariableType, i32>,
    /// Next available variable ID
    next_id: i32,
    /// Number of tour steps, equal to the number of board cells
    steps: usize,
    total_cells: usize,
}

impl VariableManager {
    pub fn new(total_cells: usize) -> Self {
        Self {
            variable_map: HashMap::new(),
            next_id: 1, // SAT variables start from 1
            steps: total_cells,
            total_cells,
        }
    }

    /// Get or create a variable ID for the given variable type
    pub fn get_variable(&mut self, var_type: VariableType) -> Result<i32> {
        if let Some(&id) = self.variable_map.get(&var_type) {
            return Ok(id);
        }

        self.validate_variable(&var_type)?;

        let id = self.next_id;
        self.next_id += 1;
        self.variable_map.insert(var_type, id);
        Ok(id)
    }

    /// Variable for "step `step` is on cell `cell`"
    pub fn placement_variable(&mut self, step: usize, cell: usize) -> Result<i32> {
        self.get_variable(VariableType::Placement { step, cell })
    }

    /// Look up an existing placement variable without creating it
    pub fn existing_placement(&self, step: usize, cell: usize) -> Option<i32> {
        self.variable_map
            .get(&VariableType::Placement { step, cell })
            .copied()
    }

    /// One variable per cell for a fixed step: the one-hot image of `x_step`
    pub fn step_variables(&mut self, step: usize) -> Result<Vec<i32>> {
        (0..self.total_cells)
            .map(|cell| self.placement_variable(step, cell))
            .collect()
    }

    /// One variable per step for a fixed cell
    pub fn cell_variables(&mut self, cell: usize) -> Result<Vec<i32>> {
        (0..self.steps)
            .map(|step| self.placement_variable(step, cell))
            .collect()
    }

    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    fn validate_variable(&self, var_type: &VariableType) -> Result<()> {
        match var_type {
            VariableType::Placement { step, cell } => {
                if *step >= self.steps {
                    anyhow::bail!("Tour step {} out of bounds (steps: {})", step, self.steps);
                }
                if *cell >= self.total_cells {
                    anyhow::bail!("Cell index {} out of bounds (cells: {})", cell, self.total_cells);
                }
            }
        }
        Ok(())
    }

    pub fn statistics(&self) -> VariableStatistics {
        let placement_variables = self
            .variable_map
            .keys()
            .filter(|var_type| matches!(var_type, VariableType::Placement { .. }))
            .count();

        VariableStatistics {
            total_variables: self.variable_count(),
            placement_variables,
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub placement_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Placement variables: {}", self.placement_variables)?;
        Ok(())
    }
}
