//! Knight's tour problem, outcomes and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::KnightsTour;
pub use solution::{SolutionSummary, StrategyStatistics, TourSolution};
pub use validator::{TourValidator, TourViolation, ValidationResult};
