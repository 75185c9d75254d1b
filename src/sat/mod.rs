//! Boolean satisfiability formulation of the tour search

pub mod constraints;
pub mod encoder;
pub mod solver;
pub mod variables;

pub use constraints::{Clause, ConstraintGenerator};
pub use encoder::{EncodingStatistics, SatEncoder};
pub use solver::{SatSolver, SolverSolution};
pub use variables::VariableManager;
