//! Knight's Tour Solver
//!
//! Finds an open knight's tour on a rectangular board with one of four
//! strategies: plain backtracking, Warnsdorff-ordered backtracking, a SAT
//! encoding solved by CaDiCaL, or an integer program.

pub mod board;
pub mod config;
pub mod error;
pub mod mip;
pub mod sat;
pub mod search;
pub mod tour;
pub mod utils;

pub use board::{Board, Cell};
pub use config::{Settings, Strategy};
pub use error::TourError;
pub use tour::{KnightsTour, TourSolution};

use anyhow::{Context, Result};

/// Main entry point: search for a tour as described by `settings`
pub fn find_tour(settings: &Settings) -> Result<TourSolution> {
    settings.validate()?;
    let problem = KnightsTour::from_settings(settings).context("Failed to create tour problem")?;
    problem.solve().context("Tour search failed")
}
