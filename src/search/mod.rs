//! Backtracking tour search

pub mod backtrack;

pub use backtrack::{Backtracker, MoveOrder, SearchStatistics};
