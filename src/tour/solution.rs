//! Search outcome representation

use crate::board::{Board, Cell};
use crate::config::Strategy;
use crate::mip::ModelStatistics;
use crate::sat::EncodingStatistics;
use crate::search::SearchStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The outcome of one search: a full tour, or an empty one on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSolution {
    pub strategy: Strategy,
    pub width: usize,
    pub height: usize,
    pub start: Cell,
    /// Cell reported by the strategy alongside the tour
    pub end: Cell,
    pub tour: Vec<Cell>,
    #[serde(skip)]
    pub solve_time: Duration,
    #[serde(skip)]
    pub statistics: Option<StrategyStatistics>,
}

/// Counters reported by whichever strategy ran
#[derive(Debug, Clone)]
pub enum StrategyStatistics {
    Search(SearchStatistics),
    Encoding(EncodingStatistics),
    Model(ModelStatistics),
}

/// Compact one-line view of a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub strategy: Strategy,
    pub board: String,
    pub start: Cell,
    pub found: bool,
    pub length: usize,
    pub solve_time_ms: u128,
}

impl TourSolution {
    pub fn new(
        strategy: Strategy,
        board: Board,
        start: Cell,
        (end, tour): (Cell, Vec<Cell>),
        solve_time: Duration,
    ) -> Self {
        Self {
            strategy,
            width: board.width(),
            height: board.height(),
            start,
            end,
            tour,
            solve_time,
            statistics: None,
        }
    }

    pub fn with_statistics(mut self, statistics: StrategyStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Whether a tour was found
    pub fn is_found(&self) -> bool {
        !self.tour.is_empty()
    }

    /// Step number at which each cell is visited, row-major, `None` if never
    pub fn step_grid(&self) -> Vec<Vec<Option<usize>>> {
        let mut grid = vec![vec![None; self.width]; self.height];
        for (step, cell) in self.tour.iter().enumerate() {
            if let Some(slot) = grid.get_mut(cell.row).and_then(|row| row.get_mut(cell.col)) {
                *slot = Some(step);
            }
        }
        grid
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            strategy: self.strategy,
            board: format!("{}x{}", self.width, self.height),
            start: self.start,
            found: self.is_found(),
            length: self.tour.len(),
            solve_time_ms: self.solve_time.as_millis(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.found {
            format!("{} cells", self.length)
        } else {
            "no tour".to_string()
        };
        write!(
            f,
            "{} on {} from {}: {} in {} ms",
            self.strategy, self.board, self.start, outcome, self.solve_time_ms
        )
    }
}

impl fmt::Display for StrategyStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyStatistics::Search(stats) => stats.fmt(f),
            StrategyStatistics::Encoding(stats) => stats.fmt(f),
            StrategyStatistics::Model(stats) => stats.fmt(f),
        }
    }
}
