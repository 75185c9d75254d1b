//! Knight's tour problem definition and strategy dispatch

use super::{StrategyStatistics, TourSolution, TourValidator};
use crate::board::{Board, Cell};
use crate::config::{Settings, Strategy};
use crate::error::{Result, TourError};
use crate::mip::MipEncoder;
use crate::sat::SatEncoder;
use crate::search::{Backtracker, MoveOrder};
use std::time::Instant;
use tracing::{info, warn};

/// A knight's tour search on a fixed board, start cell and strategy
pub struct KnightsTour {
    board: Board,
    start: Cell,
    strategy: Strategy,
    validator: TourValidator,
}

impl KnightsTour {
    /// Create a problem, rejecting a start cell off the board
    pub fn new(board: Board, start: Cell, strategy: Strategy) -> Result<Self> {
        board.check_start(start)?;
        Ok(Self {
            board,
            start,
            strategy,
            validator: TourValidator::new(board),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let board = Board::new(settings.board.width, settings.board.height)?;
        Self::new(board, settings.start(), settings.search.strategy)
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Continue the search from `cell`, the last cell of `tour`.
    ///
    /// Returns the strategy's `(cell, tour)` pair. A failed search yields
    /// `(start, [])`. The constraint strategies only accept `[start]` as
    /// the partial tour.
    pub fn run(&self, cell: Cell, tour: Vec<Cell>) -> Result<(Cell, Vec<Cell>)> {
        self.dispatch(cell, tour).map(|(outcome, _)| outcome)
    }

    /// Search from the configured start cell and time it
    pub fn solve(&self) -> Result<TourSolution> {
        info!(
            board = %self.board,
            start = %self.start,
            strategy = %self.strategy,
            "searching for knight's tour"
        );

        let start_time = Instant::now();
        let (outcome, statistics) = self.dispatch(self.start, vec![self.start])?;
        let solve_time = start_time.elapsed();

        let solution = TourSolution::new(self.strategy, self.board, self.start, outcome, solve_time)
            .with_statistics(statistics);
        info!(
            found = solution.is_found(),
            elapsed_ms = solve_time.as_millis() as u64,
            "search finished"
        );
        Ok(solution)
    }

    fn dispatch(&self, cell: Cell, tour: Vec<Cell>) -> Result<((Cell, Vec<Cell>), StrategyStatistics)> {
        self.check_partial(cell, &tour)?;

        let ((end, tour), statistics) = match self.strategy {
            Strategy::PlainBacktrack => self.backtrack(tour, MoveOrder::Offset),
            Strategy::HeuristicBacktrack => self.backtrack(tour, MoveOrder::Warnsdorff),
            Strategy::BooleanConstraint => {
                self.require_fresh(&tour)?;
                let mut encoder = SatEncoder::new(self.board);
                let found = encoder
                    .solve(self.start)
                    .map_err(|err| TourError::Solver(format!("{:#}", err)))?;
                let statistics = StrategyStatistics::Encoding(encoder.statistics());
                ((self.start, found.unwrap_or_default()), statistics)
            }
            Strategy::IntegerProgram => {
                self.require_fresh(&tour)?;
                let mut encoder = MipEncoder::new(self.board);
                let found = encoder
                    .solve(self.start)
                    .map_err(|err| TourError::Solver(format!("{:#}", err)))?;
                let statistics = StrategyStatistics::Model(encoder.statistics());
                ((self.start, found.unwrap_or_default()), statistics)
            }
        };

        if !tour.is_empty() {
            let validation = self.validator.validate(self.start, &tour);
            if !validation.is_valid {
                warn!(strategy = %self.strategy, "strategy produced an invalid tour");
                return Err(TourError::InvalidSolution(
                    validation.error_message.unwrap_or_default(),
                ));
            }
        }

        Ok(((end, tour), statistics))
    }

    fn backtrack(&self, tour: Vec<Cell>, order: MoveOrder) -> ((Cell, Vec<Cell>), StrategyStatistics) {
        let mut searcher = Backtracker::new(self.board, order);
        let outcome = match searcher.search(tour) {
            Some(tour) => {
                let end = tour.last().copied().unwrap_or(self.start);
                (end, tour)
            }
            None => (self.start, Vec::new()),
        };
        (outcome, StrategyStatistics::Search(searcher.statistics().clone()))
    }

    fn check_partial(&self, cell: Cell, tour: &[Cell]) -> Result<()> {
        let validation = self.validator.validate_partial(self.start, tour);
        if !validation.is_valid {
            return Err(TourError::InvalidPartialTour(
                validation.error_message.unwrap_or_default(),
            ));
        }
        if tour.last() != Some(&cell) {
            return Err(TourError::InvalidPartialTour(format!(
                "current cell {} is not the last cell of the tour",
                cell
            )));
        }
        Ok(())
    }

    fn require_fresh(&self, tour: &[Cell]) -> Result<()> {
        if tour != [self.start] {
            return Err(TourError::InvalidPartialTour(format!(
                "{} searches only from the start cell, got {} placed cells",
                self.strategy,
                tour.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::is_knight_move;
    use itertools::Itertools;

    fn problem(width: usize, height: usize, start: (usize, usize), strategy: Strategy) -> KnightsTour {
        KnightsTour::new(Board::new(width, height).unwrap(), Cell::from(start), strategy).unwrap()
    }

    fn assert_valid(problem: &KnightsTour, tour: &[Cell]) {
        assert_eq!(tour.len(), problem.board().total_cells());
        assert_eq!(tour[0], problem.start());
        assert_eq!(tour.iter().unique().count(), tour.len());
        assert!(tour.iter().tuple_windows().all(|(a, b)| is_knight_move(*a, *b)));
    }

    #[test]
    fn test_start_out_of_bounds_rejected() {
        let board = Board::new(5, 5).unwrap();
        let result = KnightsTour::new(board, Cell::new(0, 5), Strategy::PlainBacktrack);
        assert!(matches!(result, Err(TourError::StartOutOfBounds { .. })));
    }

    #[test]
    fn test_plain_dispatch_6x6() {
        let p = problem(6, 6, (3, 3), Strategy::PlainBacktrack);
        let (end, tour) = p.run(p.start(), vec![p.start()]).unwrap();
        assert_valid(&p, &tour);
        assert_eq!(end, *tour.last().unwrap());
    }

    #[test]
    fn test_heuristic_dispatch_8x8() {
        let p = problem(8, 8, (0, 0), Strategy::HeuristicBacktrack);
        let solution = p.solve().unwrap();
        assert!(solution.is_found());
        assert_valid(&p, &solution.tour);
    }

    #[test]
    fn test_boolean_dispatch_5x5() {
        let p = problem(5, 5, (0, 0), Strategy::BooleanConstraint);
        let (end, tour) = p.run(p.start(), vec![p.start()]).unwrap();
        assert_valid(&p, &tour);
        assert_eq!(end, p.start());
    }

    #[test]
    fn test_integer_dispatch_3x4() {
        let p = problem(3, 4, (0, 0), Strategy::IntegerProgram);
        let (_, tour) = p.run(p.start(), vec![p.start()]).unwrap();
        assert_valid(&p, &tour);
    }

    #[test]
    fn test_solution_carries_statistics() {
        let p = problem(5, 5, (0, 0), Strategy::HeuristicBacktrack);
        let solution = p.solve().unwrap();
        let Some(StrategyStatistics::Search(stats)) = &solution.statistics else {
            panic!("backtracking should report search statistics");
        };
        assert_eq!(stats.max_depth, 25);

        let p = problem(5, 5, (0, 0), Strategy::BooleanConstraint);
        let solution = p.solve().unwrap();
        let Some(StrategyStatistics::Encoding(stats)) = &solution.statistics else {
            panic!("the SAT strategy should report encoding statistics");
        };
        assert_eq!(stats.total_variables, 625);

        let p = problem(3, 4, (0, 0), Strategy::IntegerProgram);
        let solution = p.solve().unwrap();
        assert!(matches!(solution.statistics, Some(StrategyStatistics::Model(_))));
    }

    #[test]
    fn test_failure_signal() {
        let p = problem(3, 3, (0, 0), Strategy::PlainBacktrack);
        let (end, tour) = p.run(p.start(), vec![p.start()]).unwrap();
        assert_eq!(end, p.start());
        assert!(tour.is_empty());
    }

    #[test]
    fn test_partial_tour_must_end_at_cell() {
        let p = problem(5, 5, (0, 0), Strategy::PlainBacktrack);
        let result = p.run(Cell::new(2, 1), vec![p.start()]);
        assert!(matches!(result, Err(TourError::InvalidPartialTour(_))));
    }

    #[test]
    fn test_partial_tour_must_be_knight_path() {
        let p = problem(5, 5, (0, 0), Strategy::HeuristicBacktrack);
        let tour = vec![Cell::new(0, 0), Cell::new(1, 1)];
        let result = p.run(Cell::new(1, 1), tour);
        assert!(matches!(result, Err(TourError::InvalidPartialTour(_))));
    }

    #[test]
    fn test_constraint_strategies_need_fresh_tour() {
        for strategy in [Strategy::BooleanConstraint, Strategy::IntegerProgram] {
            let p = problem(5, 5, (0, 0), strategy);
            let tour = vec![Cell::new(0, 0), Cell::new(2, 1)];
            let result = p.run(Cell::new(2, 1), tour);
            assert!(matches!(result, Err(TourError::InvalidPartialTour(_))));
        }
    }

    #[test]
    fn test_backtracking_resumes_partial_tour() {
        let p = problem(5, 5, (0, 0), Strategy::PlainBacktrack);
        let full = p.solve().unwrap().tour;
        let prefix = full[..4].to_vec();
        let (_, tour) = p.run(prefix[3], prefix.clone()).unwrap();
        assert_valid(&p, &tour);
        assert!(tour.starts_with(&prefix));
    }
}
